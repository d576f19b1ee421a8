//! Business logic and backend trait definitions for Parlance.
//!
//! This crate owns the only state the service has -- the in-memory
//! conversation store -- and the orchestration of a send-message call
//! around it. It defines the `ModelBackend` port that the infrastructure
//! layer implements and depends only on `parlance-types`.

pub mod chat;
pub mod conversation;
pub mod llm;
