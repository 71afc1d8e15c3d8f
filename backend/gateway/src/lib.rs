//! FileKit Gateway HTTP API Server
//!
//! Exposes the upload pipeline, the JSON helpers and the download responder
//! over HTTP.

pub mod error;
pub mod health_api;
pub mod json_api;
pub mod server;
pub mod upload_api;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
