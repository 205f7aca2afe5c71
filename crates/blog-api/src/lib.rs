//! # blog-api
//!
//! HTTP server built with Axum: server-rendered pages, the ajax endpoints
//! used by those pages, cookie/bearer authentication and health checks.

pub mod cookies;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
