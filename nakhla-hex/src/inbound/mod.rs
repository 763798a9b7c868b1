//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

pub mod cors;
pub(crate) mod handlers;
mod server;

pub use cors::{CorsPolicy, Environment};
pub use server::HttpServer;
