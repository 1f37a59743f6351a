//! Product event distribution.
//!
//! The `EventBus` broadcasts `ProductEvent` to any number of subscribers
//! (dashboards, tests) and records each event as a structured log line.

pub mod bus;
