//! HTTP/REST API layer for AutonomaX.
//!
//! Axum-based REST API under `/v1/products` plus `/health` and `/ready`,
//! with a JSON error body and CORS support.

pub mod error;
pub mod handlers;
pub mod router;
