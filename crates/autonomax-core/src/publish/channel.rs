//! Commerce channel port.
//!
//! `ChannelPublisher` is implemented by each storefront adapter (Shopify in
//! autonomax-infra). `BoxChannelPublisher` erases the concrete type so the
//! publish worker and application state do not carry it as a generic.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use autonomax_types::error::PublishError;
use autonomax_types::product::ProductDraft;
use autonomax_types::publish::{PublishChannel, PublishReceipt};

/// Price used when the draft being published is not known to the store.
pub const PLACEHOLDER_PRICE: f64 = 7.0;

/// The product as a channel receives it.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub draft_id: String,
    pub title: String,
    pub body_html: String,
    pub tags: Vec<String>,
    pub price: f64,
}

impl Listing {
    pub fn from_draft(draft: &ProductDraft) -> Self {
        Self {
            draft_id: draft.id.clone(),
            title: draft.title.clone(),
            body_html: draft.description.clone(),
            tags: draft.tags.clone(),
            price: draft.price,
        }
    }

    /// Minimal listing for a draft id the store has never seen.
    pub fn placeholder(draft_id: &str) -> Self {
        Self {
            draft_id: draft_id.to_string(),
            title: format!("AutonomaX Draft {draft_id}"),
            body_html: "Generated by AutonomaX".to_string(),
            tags: Vec::new(),
            price: PLACEHOLDER_PRICE,
        }
    }
}

/// Trait for commerce channel adapters.
pub trait ChannelPublisher: Send + Sync {
    /// The channel this adapter publishes to.
    fn channel(&self) -> PublishChannel;

    /// Create the product on the channel. One call, no retries; the publish
    /// worker owns the retry policy.
    fn publish(
        &self,
        listing: &Listing,
    ) -> impl Future<Output = Result<PublishReceipt, PublishError>> + Send;
}

/// Object-safe version of [`ChannelPublisher`] with boxed futures.
pub trait ChannelPublisherDyn: Send + Sync {
    fn channel(&self) -> PublishChannel;

    fn publish_boxed<'a>(
        &'a self,
        listing: &'a Listing,
    ) -> Pin<Box<dyn Future<Output = Result<PublishReceipt, PublishError>> + Send + 'a>>;
}

impl<T: ChannelPublisher> ChannelPublisherDyn for T {
    fn channel(&self) -> PublishChannel {
        ChannelPublisher::channel(self)
    }

    fn publish_boxed<'a>(
        &'a self,
        listing: &'a Listing,
    ) -> Pin<Box<dyn Future<Output = Result<PublishReceipt, PublishError>> + Send + 'a>> {
        Box::pin(self.publish(listing))
    }
}

/// Type-erased channel publisher.
#[derive(Clone)]
pub struct BoxChannelPublisher {
    inner: Arc<dyn ChannelPublisherDyn>,
}

impl BoxChannelPublisher {
    pub fn new<T: ChannelPublisher + 'static>(publisher: T) -> Self {
        Self {
            inner: Arc::new(publisher),
        }
    }

    pub fn channel(&self) -> PublishChannel {
        self.inner.channel()
    }

    pub async fn publish(&self, listing: &Listing) -> Result<PublishReceipt, PublishError> {
        self.inner.publish_boxed(listing).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_from_draft() {
        let draft = ProductDraft {
            id: "draft-1".to_string(),
            title: "Serene Print".to_string(),
            description: "Calm art".to_string(),
            tags: vec!["zen".to_string()],
            assets: vec![],
            price: 12.5,
            score: 4.0,
        };
        let listing = Listing::from_draft(&draft);
        assert_eq!(listing.draft_id, "draft-1");
        assert_eq!(listing.title, "Serene Print");
        assert_eq!(listing.body_html, "Calm art");
        assert_eq!(listing.tags, vec!["zen"]);
        assert_eq!(listing.price, 12.5);
    }

    #[test]
    fn test_placeholder_listing() {
        let listing = Listing::placeholder("demo-1");
        assert_eq!(listing.title, "AutonomaX Draft demo-1");
        assert_eq!(listing.body_html, "Generated by AutonomaX");
        assert_eq!(listing.price, PLACEHOLDER_PRICE);
        assert!(listing.tags.is_empty());
    }
}
