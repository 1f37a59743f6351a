//! Process-local storage backends.

pub mod draft_store;
