//! Infrastructure layer for Parlance.
//!
//! Contains the implementations of the ports defined in `parlance-core`:
//! an OpenAI-compatible HTTP model backend, plus loading of the TOML
//! configuration file.

pub mod config;
pub mod llm;
