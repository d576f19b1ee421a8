//! Model backend abstractions for Parlance.
//!
//! - `ModelBackend`: native async trait for concrete backend implementations
//! - `BoxModelBackend`: object-safe wrapper for dynamic dispatch

pub mod backend;
pub mod box_backend;
