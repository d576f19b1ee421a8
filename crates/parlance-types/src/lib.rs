//! Shared domain types for Parlance.
//!
//! This crate contains the types passed between the conversation store,
//! the model backends, and the HTTP layer: turns, configuration, upload
//! metadata, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod upload;
