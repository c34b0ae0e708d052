use http::{Method, Request};

/// Request extension set once a request has been through the API pipeline
#[derive(Debug, Clone, Copy)]
pub(crate) struct DispatchMarker;

/// Decides which requests the API middleware runs for
#[derive(Debug, Clone)]
pub(crate) struct RequestClassifier {
    api_base_path: String,
}

impl RequestClassifier {
    pub fn new(api_base_path: &str) -> Self {
        Self {
            api_base_path: api_base_path.to_lowercase(),
        }
    }

    /// Requests under the API base path, except CORS pre-flight requests
    pub fn is_api_request<B>(&self, request: &Request<B>) -> bool {
        if request.method() == Method::OPTIONS {
            return false;
        }

        request
            .uri()
            .path()
            .to_lowercase()
            .starts_with(&self.api_base_path)
    }

    /// API requests seen for the first time, re-dispatched requests are skipped
    pub fn is_api_start_request<B>(&self, request: &Request<B>) -> bool {
        self.is_api_request(request) && request.extensions().get::<DispatchMarker>().is_none()
    }
}
