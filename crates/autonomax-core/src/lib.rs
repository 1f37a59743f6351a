//! Draft generation and publishing logic for AutonomaX.
//!
//! This crate defines the "ports" (provider, channel, and repository traits)
//! that the infrastructure layer implements. It depends only on
//! `autonomax-types` -- never on `autonomax-infra` or any network crate.

pub mod draft;
pub mod event;
pub mod llm;
pub mod publish;
pub mod repository;
