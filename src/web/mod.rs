//! Web surface for the contact form.
//!
//! Serves the HTML page with its embedded forms, a JSON submission API for
//! script-driven pages, and a health check.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
