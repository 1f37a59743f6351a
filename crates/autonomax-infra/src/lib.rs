//! Infrastructure layer for AutonomaX.
//!
//! Contains implementations of the ports defined in `autonomax-core`:
//! OpenAI-compatible LLM providers, the Shopify channel publisher, and an
//! in-memory draft store, plus the settings and credentials loader.

pub mod config;
pub mod llm;
pub mod memory;
pub mod shopify;
