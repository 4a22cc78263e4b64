//! HTTP API module for the health and greeting endpoints.

pub mod cors;
pub mod docs;
pub mod handlers;
pub mod routes;

pub use cors::CorsPolicy;
pub use docs::ApiDoc;
pub use handlers::AppState;
pub use routes::create_router;
