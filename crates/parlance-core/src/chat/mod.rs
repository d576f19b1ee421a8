//! Chat orchestration: send-message flow over the store and a model backend.

pub mod service;
