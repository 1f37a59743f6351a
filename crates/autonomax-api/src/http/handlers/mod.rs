//! REST API handler modules.

pub mod product;
pub mod system;
