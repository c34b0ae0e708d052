//! Access token validation through OAuth 2.0 Token Introspection (RFC 7662)

use crate::claims::ClaimsPayload;
use crate::config::OAuthConfig;
use crate::errors::AuthError;
use async_trait::async_trait;
use http::header::ACCEPT;
use http::StatusCode;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Why an introspection call could not produce an answer
#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("Failed to send introspection request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Introspection returned error '{code}': {description}")]
    Protocol { code: String, description: String },
    #[error("Introspection request failed with status: {0}")]
    Status(StatusCode),
    #[error("Failed to parse introspection response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Validates an access token and returns the claims it carries
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, access_token: &str) -> Result<ClaimsPayload, AuthError>;
}

/// Body of a successful introspection response
#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    #[serde(default)]
    active: bool,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// Standard OAuth error body
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Introspects tokens at the authorization server using the API's own client credentials
#[derive(Clone)]
pub struct IntrospectionValidator {
    client: Client,
    endpoint: String,
    client_id: String,
    client_secret: String,
}

impl IntrospectionValidator {
    pub fn new(config: &OAuthConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.request_timeout_secs.min(2)))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.introspect_endpoint.clone(),
            client_id: config.introspect_client_id.clone(),
            client_secret: config.introspect_client_secret.clone(),
        })
    }

    fn failed(&self, source: impl Into<IntrospectionError>) -> AuthError {
        AuthError::IntrospectionFailed {
            endpoint: self.endpoint.clone(),
            source: source.into(),
        }
    }

    async fn introspect(&self, access_token: &str) -> Result<IntrospectionResponse, AuthError> {
        debug!("Introspecting access token at: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(ACCEPT, "application/json")
            .form(&[("token", access_token), ("token_type_hint", "access_token")])
            .send()
            .await
            .map_err(|e| self.failed(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.failed(e))?;

        if !status.is_success() {
            let error = match serde_json::from_slice::<OAuthErrorResponse>(&body) {
                Ok(oauth_error) => IntrospectionError::Protocol {
                    code: oauth_error.error,
                    description: oauth_error.error_description.unwrap_or_default(),
                },
                Err(_) => IntrospectionError::Status(status),
            };
            return Err(self.failed(error));
        }

        serde_json::from_slice(&body).map_err(|e| self.failed(e))
    }
}

#[async_trait]
impl TokenValidator for IntrospectionValidator {
    async fn validate(&self, access_token: &str) -> Result<ClaimsPayload, AuthError> {
        let response = self.introspect(access_token).await?;
        if !response.active {
            return Err(AuthError::token_expired());
        }

        Ok(ClaimsPayload::new(response.fields))
    }
}
