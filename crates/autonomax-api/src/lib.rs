//! AutonomaX REST API and CLI application layer.
//!
//! The `axmx` binary in `main.rs` is a thin shell over these modules so the
//! router and state can be driven directly from integration tests.

pub mod cli;
pub mod http;
pub mod state;
