use super::{ApiClaims, CustomClaims};
use async_trait::async_trait;
use http::{HeaderMap, Method, Request, Uri};
use thiserror::Error;

/// Errors raised while adding product specific claims
#[derive(Debug, Error)]
pub enum ClaimsEnrichmentError {
    #[error("Custom claims lookup failed: {0}")]
    Lookup(String),
    #[error("Custom claims data is invalid: {0}")]
    InvalidData(String),
}

/// Read-only view of the request being authorized
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(request: &'a Request<B>) -> Self {
        Self {
            method: request.method(),
            uri: request.uri(),
            headers: request.headers(),
        }
    }
}

/// Adds product specific claims to freshly validated claims.
///
/// Called once per cache miss, after the token and user info claims are set
/// and before the result is cached, so whatever it adds lives as long as the
/// cache entry. Implementations must not cache anything themselves.
#[async_trait]
pub trait CustomClaimsProvider: Send + Sync + 'static {
    type Claims: CustomClaims;

    async fn augment(
        &self,
        access_token: &str,
        request: RequestContext<'_>,
        claims: &mut ApiClaims<Self::Claims>,
    ) -> Result<(), ClaimsEnrichmentError>;
}
