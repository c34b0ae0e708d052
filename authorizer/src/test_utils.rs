use crate::config::Settings;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use chrono::Utc;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Access token sent by [`TestFixture::get`]
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// Test fixture for exercising the full router against a mocked authorization server.
///
/// The fixture starts a wiremock server standing in for the introspection
/// endpoint, builds the app with an in-memory claims cache and provides
/// helpers for sending requests.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     fixture.mock_active_token("openid investments", 1).await;
///
///     let response = fixture.get("/api/userinfo").await;
///
///     response.assert_ok();
///     let user_info = response.json_as::<ClientUserInfo>();
///     assert_eq!(user_info.role, "user");
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub settings: Settings,
    /// Mock server for the introspection endpoint
    pub introspection_mock: MockServer,
}

impl TestFixture {
    /// Creates a new test fixture with a mocked authorization server
    pub async fn new() -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let introspection_mock = MockServer::start().await;
        let settings = Settings::for_test_with_mocks(&introspection_mock);

        let state = AppState::for_testing(&settings);
        let app = create_app(state).await;

        Self {
            app,
            settings,
            introspection_mock,
        }
    }

    /// Initializes the test logger with the given level, only the first call has any effect
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Creates a request builder that sends [`TEST_ACCESS_TOKEN`] as a bearer token
    pub fn request_builder(&self, method: Method, uri: impl AsRef<str>) -> http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri.as_ref())
            .header("Authorization", format!("Bearer {}", TEST_ACCESS_TOKEN))
    }

    /// Sends an authenticated GET request to the specified URI
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        self.get_with_headers(uri, &[]).await
    }

    /// Sends an authenticated GET request with additional headers
    pub async fn get_with_headers(
        &self,
        uri: impl AsRef<str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = self.request_builder(Method::GET, uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = builder
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a GET request without an Authorization header
    pub async fn get_anonymous(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri.as_ref())
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    ///
    /// Non JSON bodies are reported as an empty JSON object.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| json!({}))
        } else {
            json!({})
        };

        TestResponse { status, json }
    }

    /// Mocks the introspection endpoint with the given response.
    ///
    /// The mock only matches requests authenticated with the configured
    /// introspection client credentials.
    pub async fn add_introspection_mock(
        &self,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/oauth/introspect"))
            .and(matchers::header_exists("authorization"))
            .and(matchers::body_string_contains(TEST_ACCESS_TOKEN))
            .respond_with(ResponseTemplate::new(status_code.as_u16()).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.introspection_mock)
            .await;
    }

    /// Mocks introspection of an active token with the given scopes, valid for ten minutes
    pub async fn mock_active_token(&self, scope: &str, expected_calls: u64) {
        self.add_introspection_mock(
            json!({
                "active": true,
                "sub": "test-user",
                "scope": scope,
                "exp": Utc::now().timestamp() + 600,
                "given_name": "Test",
                "family_name": "User"
            }),
            StatusCode::OK,
            expected_calls,
        )
        .await;
    }
}

/// Response from a test request with convenient access to status and JSON body
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Shorthand for `assert_status(StatusCode::OK)`
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if the JSON cannot be deserialized into the requested type.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).unwrap_or_else(|e| {
            panic!(
                "Failed to deserialize response: {}\nResponse body: {}",
                e,
                serde_json::to_string_pretty(&self.json).unwrap_or_default()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_exception_through_full_router() {
        let fixture = TestFixture::new().await;
        fixture.mock_active_token("investments", 0).await;

        let response = fixture
            .get_with_headers(
                "/api/userinfo",
                &[("x-mycompany-test-exception", &fixture.settings.api_name)],
            )
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json["code"], "exception_simulation");
    }

    #[tokio::test]
    async fn test_unknown_api_path_still_requires_a_token() {
        let fixture = TestFixture::new().await;

        let response = fixture.get_anonymous("/api/unknown").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json["code"], "unauthorized");
    }

    #[tokio::test]
    async fn test_unknown_api_path_with_token_is_not_found() {
        let fixture = TestFixture::new().await;
        fixture.mock_active_token("investments", 1).await;

        let response = fixture.get("/api/unknown").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json["code"], "not_found");
    }

    #[tokio::test]
    async fn test_lowercase_bearer_scheme_is_rejected() {
        let fixture = TestFixture::new().await;
        fixture.mock_active_token("investments", 0).await;

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/userinfo")
            .header("Authorization", format!("bearer {}", TEST_ACCESS_TOKEN))
            .body(Body::empty())
            .unwrap();
        let response = fixture.send(request).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
