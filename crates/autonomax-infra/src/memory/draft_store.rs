//! In-memory draft repository.
//!
//! Drafts live for the lifetime of the process. Each save stamps a
//! monotonically increasing sequence number so listing can return the most
//! recently saved drafts first without relying on wall-clock time.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use autonomax_core::repository::draft::DraftRepository;
use autonomax_types::error::RepositoryError;
use autonomax_types::product::ProductDraft;

#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    drafts: DashMap<String, (u64, ProductDraft)>,
    seq: AtomicU64,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

impl DraftRepository for InMemoryDraftStore {
    async fn save(&self, draft: &ProductDraft) -> Result<Option<ProductDraft>, RepositoryError> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let previous = self.drafts.insert(draft.id.clone(), (seq, draft.clone()));
        Ok(previous.map(|(_, draft)| draft))
    }

    async fn get(&self, id: &str) -> Result<Option<ProductDraft>, RepositoryError> {
        Ok(self.drafts.get(id).map(|entry| entry.1.clone()))
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<ProductDraft>, RepositoryError> {
        let mut entries: Vec<(u64, ProductDraft)> =
            self.drafts.iter().map(|e| e.value().clone()).collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(entries
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(_, draft)| draft)
            .collect())
    }
}
