//! Shared domain types for AutonomaX.
//!
//! Product briefs and drafts, publish tasks, product events, LLM request
//! shapes, service settings, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod llm;
pub mod product;
pub mod publish;
