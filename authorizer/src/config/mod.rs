pub(crate) use crate::config::cache::{CacheConfig, CacheStore};
pub(crate) use crate::config::oauth::OAuthConfig;
use config::{Config, ConfigError};
use serde::Deserialize;

pub mod cache;
pub mod oauth;

/// Main configuration structure for the API authorizer
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// The port the server will listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Name of this API, matched against the test exception header
    #[serde(default = "default_api_name")]
    pub api_name: String,

    /// Path prefix of the routes that require an access token
    #[serde(default = "default_api_base_path")]
    pub api_base_path: String,

    /// OAuth token validation configuration
    #[serde(default)]
    pub oauth: OAuthConfig,

    /// Claims cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_port() -> u16 {
    8101
}

fn default_api_name() -> String {
    "sampleapi".to_string()
}

fn default_api_base_path() -> String {
    "/api".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: default_port(),
            api_name: default_api_name(),
            api_base_path: default_api_base_path(),
            oauth: OAuthConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Settings {
    /// Loads the settings from `API_` prefixed environment variables
    pub fn new() -> Result<Self, String> {
        let settings: Self = Config::builder()
            .add_source(
                config::Environment::with_prefix("API")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(config::Case::Snake),
            )
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())?;

        settings.validate()?;
        Ok(settings)
    }

    /// Rejects combinations that would make the authorizer unusable
    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.oauth.introspect_endpoint).map_err(|e| {
            format!(
                "Invalid introspection endpoint '{}': {}",
                self.oauth.introspect_endpoint, e
            )
        })?;

        if !self.api_base_path.starts_with('/')
            || self.api_base_path.len() < 2
            || self.api_base_path.ends_with('/')
        {
            return Err(format!(
                "API base path must start with '/' and must not end with '/': {}",
                self.api_base_path
            ));
        }

        if self.oauth.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than zero".to_string());
        }

        if self.cache.store != CacheStore::None && self.oauth.max_claims_cache_minutes == 0 {
            return Err(
                "max_claims_cache_minutes must be greater than zero when claims caching is enabled"
                    .to_string(),
            );
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(introspection_mock: &wiremock::MockServer) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            api_name: "sampleapi".to_string(),
            api_base_path: "/api".to_string(),
            oauth: OAuthConfig {
                introspect_endpoint: format!("{}/oauth/introspect", introspection_mock.uri()),
                introspect_client_id: "test-introspect-client".to_string(),
                introspect_client_secret: "test-introspect-secret".to_string(),
                request_timeout_secs: 2,
                max_claims_cache_minutes: 15,
                required_scope: "investments".to_string(),
            },
            cache: CacheConfig {
                store: CacheStore::InMemory,
                ..CacheConfig::default()
            },
        }
    }
}
