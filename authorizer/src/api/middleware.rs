use crate::api::classifier::DispatchMarker;
use crate::claims::RequestContext;
use crate::errors::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::warn;

const TEST_EXCEPTION_HEADER: &str = "x-mycompany-test-exception";

/// Lets testers force a 500 from this API by naming it in a request header
pub(super) async fn custom_header_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.classifier.is_api_start_request(&request) {
        let api_to_break = request
            .headers()
            .get(TEST_EXCEPTION_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if !api_to_break.is_empty() && api_to_break.eq_ignore_ascii_case(&state.settings.api_name)
        {
            warn!("Simulating an exception for API '{}'", state.settings.api_name);
            return ApiError::exception_simulation().into_response();
        }
    }

    next.run(request).await
}

/// Authorizes API requests and makes the resulting claims available to handlers
/// as an `Extension<Arc<ApiClaims<_>>>`
pub(super) async fn authorization_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if !state.classifier.is_api_start_request(&request) {
        return next.run(request).await;
    }

    let context = RequestContext::from_request(&request);
    let result = state.authorizer.authorize(context).await;

    match result {
        Ok(claims) => {
            let extensions = request.extensions_mut();
            extensions.insert(claims);
            extensions.insert(DispatchMarker);
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}
