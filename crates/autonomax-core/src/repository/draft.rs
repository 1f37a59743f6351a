//! Draft repository trait definition.

use autonomax_types::error::RepositoryError;
use autonomax_types::product::ProductDraft;

/// Repository trait for generated drafts.
///
/// The generator never writes here; the API layer records each draft it
/// returns so it can be listed and later published.
///
/// Implementations live in autonomax-infra (e.g., InMemoryDraftStore).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait DraftRepository: Send + Sync {
    /// Store a draft. A draft with an existing id replaces the old one,
    /// which is returned.
    fn save(
        &self,
        draft: &ProductDraft,
    ) -> impl std::future::Future<Output = Result<Option<ProductDraft>, RepositoryError>> + Send;

    /// Get a draft by id.
    fn get(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ProductDraft>, RepositoryError>> + Send;

    /// List drafts, most recently saved first.
    fn list(
        &self,
        limit: Option<usize>,
    ) -> impl std::future::Future<Output = Result<Vec<ProductDraft>, RepositoryError>> + Send;
}
