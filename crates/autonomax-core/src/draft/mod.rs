//! Draft generation: prompt construction, the provider call, and the
//! parse-or-fallback boundary that guarantees a complete draft.

pub mod generator;
pub mod parse;
pub mod prompt;
