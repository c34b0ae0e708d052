pub(crate) mod classifier;
pub(crate) mod health;
mod middleware;
pub(crate) mod sample;

use crate::api::middleware::{authorization_middleware, custom_header_middleware};
use crate::errors::ApiError;
use crate::state::AppState;
use axum::{middleware::from_fn_with_state, Router};
use http::StatusCode;

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest(&state.settings.api_base_path, sample::router())
}

/// Wraps the fully merged app in the API middleware.
///
/// Must be applied after every router has been merged, the fallback is set
/// here so that unmatched API paths still pass through authorization.
pub(super) fn with_middleware(app: Router<AppState>, state: &AppState) -> Router<AppState> {
    app.fallback(not_found)
        // Layers run bottom up, so the test header check comes before authorization
        .layer(from_fn_with_state(state.clone(), authorization_middleware))
        .layer(from_fn_with_state(state.clone(), custom_header_middleware))
}

async fn not_found() -> ApiError {
    ApiError::new(
        "not_found",
        "The requested resource was not found",
        StatusCode::NOT_FOUND,
    )
}
