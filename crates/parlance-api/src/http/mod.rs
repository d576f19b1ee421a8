//! HTTP API layer for Parlance.
//!
//! Axum router exposing the conversation endpoints, with CORS and request
//! tracing.

pub mod error;
pub mod handlers;
pub mod router;
