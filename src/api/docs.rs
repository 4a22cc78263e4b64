//! OpenAPI document for the public endpoints.

use utoipa::OpenApi;

use super::handlers::{GreetingResponse, HealthResponse};

/// OpenAPI description of the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(title = "hello-backend", description = "Health check and backend greeting"),
    paths(super::handlers::health, super::handlers::hello),
    components(schemas(HealthResponse, GreetingResponse))
)]
pub struct ApiDoc;

/// Render the OpenAPI document as pretty-printed JSON.
pub fn openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_both_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/"));
        assert!(doc.paths.paths.contains_key("/api/hello"));
        assert!(openapi_json().unwrap().contains("GreetingResponse"));
    }
}
