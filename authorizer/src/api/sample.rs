//! Sample API routes that consume the claims produced by the authorizer

use crate::claims::sample::SampleCustomClaims;
use crate::claims::ApiClaims;
use crate::errors::ApiError;
use crate::openapi::SAMPLE_TAG;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

type SampleClaims = Arc<ApiClaims<SampleCustomClaims>>;

/// User attributes returned to clients for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ClientUserInfo {
    pub role: String,
    pub regions: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/userinfo",
    tag = SAMPLE_TAG,
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
    ),
    responses(
        (status = 200, description = "Role and regions of the calling user", body = ClientUserInfo),
        (status = 401, description = "Missing, invalid or expired access token"),
        (status = 403, description = "Access token lacks the required scope")
    )
)]
pub(crate) async fn user_info_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<SampleClaims>,
) -> Result<Json<ClientUserInfo>, ApiError> {
    claims.verify_scope(&state.settings.oauth.required_scope)?;

    let custom = claims.custom();
    Ok(Json(ClientUserInfo {
        role: custom.user_role.clone(),
        regions: custom.user_regions.clone(),
    }))
}

/// Called by the authorization server while issuing tokens, to ask this API
/// for the custom claims of a user
#[utoipa::path(
    get,
    path = "/api/customclaims/{subject}",
    tag = SAMPLE_TAG,
    params(
        ("subject" = String, Path, description = "Subject the token is being issued for"),
        ("Authorization" = String, Header, description = "Bearer access token"),
    ),
    responses(
        (status = 200, description = "Custom claims for the subject", body = SampleCustomClaims),
        (status = 401, description = "Missing, invalid or expired access token")
    )
)]
pub(crate) async fn custom_claims_handler(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Json<SampleCustomClaims> {
    Json(state.authorizer.provider().issue(&subject))
}

/// Routes relative to the API base path
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/userinfo", get(user_info_handler))
        .route("/customclaims/{subject}", get(custom_claims_handler))
}
