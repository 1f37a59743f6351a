//! Asynchronous publishing of drafts to commerce channels.

pub mod channel;
pub mod queue;
pub mod retry;
