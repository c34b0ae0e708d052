//! OAuth token validation configuration

use serde::Deserialize;

/// Settings for validating access tokens via introspection
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthConfig {
    /// RFC 7662 introspection endpoint of the authorization server
    #[serde(default = "default_introspect_endpoint")]
    pub introspect_endpoint: String,

    /// Client id the API authenticates with when introspecting
    #[serde(default)]
    pub introspect_client_id: String,

    /// Client secret the API authenticates with when introspecting
    #[serde(default)]
    pub introspect_client_secret: String,

    /// Timeout for introspection requests in seconds (default: 5)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound on how long composed claims stay cached (default: 15)
    #[serde(default = "default_max_claims_cache_minutes")]
    pub max_claims_cache_minutes: u32,

    /// Scope that the sample API routes require
    #[serde(default = "default_required_scope")]
    pub required_scope: String,
}

fn default_introspect_endpoint() -> String {
    "http://localhost:8443/oauth/v2/oauth-introspect".to_string()
}

fn default_request_timeout() -> u64 {
    5
}

fn default_max_claims_cache_minutes() -> u32 {
    15
}

fn default_required_scope() -> String {
    "investments".to_string()
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            introspect_endpoint: default_introspect_endpoint(),
            introspect_client_id: String::new(),
            introspect_client_secret: String::new(),
            request_timeout_secs: default_request_timeout(),
            max_claims_cache_minutes: default_max_claims_cache_minutes(),
            required_scope: default_required_scope(),
        }
    }
}

impl OAuthConfig {
    /// Maximum claims cache lifetime in seconds
    pub fn max_claims_cache_secs(&self) -> i64 {
        i64::from(self.max_claims_cache_minutes) * 60
    }
}
