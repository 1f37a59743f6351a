//! Observability setup for AutonomaX: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
