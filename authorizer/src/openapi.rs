use crate::state::AppState;
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const SAMPLE_TAG: &str = "Sample API";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::health_check,
        crate::api::health::ready_check,
        crate::api::sample::user_info_handler,
        crate::api::sample::custom_claims_handler,
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = SAMPLE_TAG, description = "Endpoints protected by OAuth access tokens"),
    ),
    info(
        title = "Sample API",
        description = "API secured with OAuth token introspection and claims caching",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;

/// Base path the route annotations are written against
const DOCUMENTED_API_BASE_PATH: &str = "/api";

/// Moves the documented API routes under the base path they are nested at
pub(crate) fn with_base_path(
    mut api_doc: utoipa::openapi::OpenApi,
    api_base_path: &str,
) -> utoipa::openapi::OpenApi {
    if api_base_path == DOCUMENTED_API_BASE_PATH {
        return api_doc;
    }

    let prefix = format!("{}/", DOCUMENTED_API_BASE_PATH);
    let paths = std::mem::take(&mut api_doc.paths.paths);
    api_doc.paths.paths = paths
        .into_iter()
        .map(|(path, item)| match path.strip_prefix(&prefix) {
            Some(rest) => (format!("{}/{}", api_base_path, rest), item),
            None => (path, item),
        })
        .collect();
    api_doc
}

/// Serves the generated OpenAPI document
pub(crate) fn router(api_doc: utoipa::openapi::OpenApi) -> Router<AppState> {
    Router::new().route(
        "/openapi.json",
        get(move || {
            let api_doc = api_doc.clone();
            async move { Json(api_doc) }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestFixture;

    #[test]
    fn test_documented_paths_follow_base_path() {
        let api_doc = with_base_path(ApiDoc::openapi(), "/investments");
        let paths = &api_doc.paths.paths;

        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/investments/userinfo"));
        assert!(paths.contains_key("/investments/customclaims/{subject}"));
        assert!(!paths.contains_key("/api/userinfo"));
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let fixture = TestFixture::new().await;

        let response = fixture.get_anonymous("/openapi.json").await;

        response.assert_ok();
        let paths = &response.json["paths"];
        assert!(paths.get("/health").is_some());
        assert!(paths.get("/ready").is_some());
        assert!(paths.get("/api/userinfo").is_some());
        assert!(paths.get("/api/customclaims/{subject}").is_some());
    }
}
