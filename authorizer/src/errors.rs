use crate::claims::ClaimsEnrichmentError;
use crate::oauth::IntrospectionError;
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

/// Failures while authorizing a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Access token does not have a valid scope for this API")]
    InsufficientScope,
    #[error("Token introspection at {endpoint} failed: {source}")]
    IntrospectionFailed {
        endpoint: String,
        #[source]
        source: IntrospectionError,
    },
    #[error("Introspection response is missing the '{0}' claim")]
    MissingClaim(String),
    #[error("Failed to add custom claims: {0}")]
    ClaimsEnrichmentFailed(#[from] ClaimsEnrichmentError),
}

impl AuthError {
    pub fn missing_token() -> Self {
        Self::Unauthorized("No access token was supplied in the bearer header".to_string())
    }

    pub fn token_expired() -> Self {
        Self::Unauthorized("Access token is expired or invalid".to_string())
    }
}

/// Error response returned to API clients
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: &'static str,
    pub detail: String,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with an error code, detail message and status code
    pub fn new<S: ToString>(code: &'static str, detail: S, status_code: StatusCode) -> Self {
        Self {
            code,
            detail: detail.to_string(),
            status_code,
        }
    }

    /// Create new Unauthorized Error (401) with a detail message
    pub fn unauthorized<S: ToString>(detail: S) -> Self {
        Self::new("unauthorized", detail, StatusCode::UNAUTHORIZED)
    }

    /// The error returned when a client asks for a simulated failure
    pub fn exception_simulation() -> Self {
        Self::new(
            "exception_simulation",
            "An exception was simulated in the API",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = json!({
            "code": self.code,
            "detail": self.detail,
        });
        (status_code, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized(reason) => {
                warn!("Request unauthorized: {}", reason);
                ApiError::unauthorized("Missing, invalid or expired access token")
            }
            AuthError::InsufficientScope => {
                warn!("{}", err);
                ApiError::new("insufficient_scope", err, StatusCode::FORBIDDEN)
            }
            // Server side details stay in the logs
            AuthError::IntrospectionFailed { .. } | AuthError::MissingClaim(_) => {
                error!("{}", err);
                ApiError::unauthorized("Missing, invalid or expired access token")
            }
            AuthError::ClaimsEnrichmentFailed(ref cause) => {
                error!("{}", cause);
                ApiError::new(
                    "claims_failure",
                    "Problem encountered processing claims",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
            }
        }
    }
}
