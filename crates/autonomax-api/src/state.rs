//! Application state wiring all services together.
//!
//! AppState holds the service handles used by both CLI and REST API.
//! The provider and channel publisher are constructed once here and
//! injected; nothing downstream builds its own clients.

use std::sync::Arc;
use std::time::Duration;

use autonomax_core::draft::generator::{DraftGenerator, GeneratorConfig};
use autonomax_core::event::bus::EventBus;
use autonomax_core::llm::box_provider::BoxLlmProvider;
use autonomax_core::publish::channel::BoxChannelPublisher;
use autonomax_core::publish::queue::{PublishQueue, PublishWorker};
use autonomax_core::publish::retry::RetryPolicy;
use autonomax_infra::config::Credentials;
use autonomax_infra::llm::create_provider;
use autonomax_infra::memory::draft_store::InMemoryDraftStore;
use autonomax_infra::shopify::ShopifyPublisher;
use autonomax_types::config::Settings;

/// Publish worker pinned to the in-memory draft store.
pub type ConcretePublishWorker = PublishWorker<InMemoryDraftStore>;

/// Buffered product events per subscriber.
const EVENT_BUS_CAPACITY: usize = 1024;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub generator: DraftGenerator,
    pub drafts: Arc<InMemoryDraftStore>,
    pub publish_queue: PublishQueue,
    pub events: EventBus,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Build the provider and Shopify publisher from settings and credentials,
    /// then wire the services.
    ///
    /// Fails when the provider has no API key. A missing Shopify domain or
    /// token only produces a warning; publishing then fails per task.
    pub fn init(
        settings: Settings,
        credentials: Credentials,
    ) -> anyhow::Result<(Self, ConcretePublishWorker)> {
        let provider = create_provider(&settings.llm, credentials.llm_api_key.as_ref())
            .map_err(|e| anyhow::anyhow!("LLM provider unavailable (set OPENAI_API_KEY): {e}"))?;

        let shopify = ShopifyPublisher::new(&settings.shopify, credentials.shopify_admin_token)?;
        if !shopify.is_configured() {
            tracing::warn!(
                "SHOPIFY_SHOP_DOMAIN or SHOPIFY_ADMIN_TOKEN not set; publish tasks will fail"
            );
        }
        if let Some(broker_url) = settings.broker_url.as_deref() {
            tracing::info!(%broker_url, "broker URL recorded; publish queue runs in-process");
        }

        Ok(Self::from_parts(
            settings,
            provider,
            BoxChannelPublisher::new(shopify),
        ))
    }

    /// Wire services around an already-built provider and publisher.
    pub fn from_parts(
        settings: Settings,
        provider: BoxLlmProvider,
        publisher: BoxChannelPublisher,
    ) -> (Self, ConcretePublishWorker) {
        let generator = DraftGenerator::new(
            provider,
            GeneratorConfig {
                model: settings.llm.model.clone(),
                temperature: settings.llm.temperature,
                max_tokens: settings.llm.max_tokens,
                timeout: Duration::from_secs(settings.llm.timeout_secs),
            },
        );

        let events = EventBus::new(EVENT_BUS_CAPACITY);
        let drafts = Arc::new(InMemoryDraftStore::new());
        let (publish_queue, receiver) =
            PublishQueue::new(settings.publish.queue_capacity, events.clone());
        let publish_queue = publish_queue.with_retention(settings.publish.retain_finished);
        let worker = PublishWorker::new(
            publish_queue.clone(),
            receiver,
            publisher,
            drafts.clone(),
            RetryPolicy::from_settings(&settings.publish),
        )
        .with_concurrency(settings.publish.concurrency);

        let state = Self {
            generator,
            drafts,
            publish_queue,
            events,
            settings: Arc::new(settings),
        };
        (state, worker)
    }
}
