//! Brief-to-draft generation.
//!
//! `DraftGenerator` makes exactly one provider call per brief, bounded by a
//! timeout, and resolves whatever text comes back into a complete
//! [`ProductDraft`]. Only a call that does not complete is an error.

use std::time::Duration;

use autonomax_types::error::DraftError;
use autonomax_types::llm::{CompletionRequest, LlmError, Message};
use autonomax_types::product::{ProductBrief, ProductDraft};

use super::parse::{new_draft_id, resolve_draft, ResolvedDraft};
use super::prompt::{build_user_message, DRAFT_SYSTEM_PROMPT};
use crate::llm::box_provider::BoxLlmProvider;

/// Advisory title length from the system prompt.
const ADVISORY_TITLE_CHARS: usize = 70;

/// Tuning for the generation call.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model identifier; empty means the provider's default.
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Upper bound on the provider call.
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.7,
            max_tokens: 1024,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Stateless draft generator over an injected provider handle.
///
/// Cheap to clone; clones share the provider.
#[derive(Debug, Clone)]
pub struct DraftGenerator {
    provider: BoxLlmProvider,
    config: GeneratorConfig,
}

impl DraftGenerator {
    pub fn new(provider: BoxLlmProvider, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Generate a draft for `brief`.
    pub async fn generate(&self, brief: &ProductBrief) -> Result<ProductDraft, DraftError> {
        Ok(self.generate_resolved(brief).await?.draft)
    }

    /// Generate a draft and report whether it came from the fallback path.
    #[tracing::instrument(
        name = "generate_draft",
        skip(self, brief),
        fields(
            gen_ai.operation.name = "generate_draft",
            gen_ai.provider.name = %self.provider.name(),
            gen_ai.request.model = %self.config.model,
            category = %brief.category,
        )
    )]
    pub async fn generate_resolved(
        &self,
        brief: &ProductBrief,
    ) -> Result<ResolvedDraft, DraftError> {
        brief.validate()?;

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![Message::user(build_user_message(brief))],
            system: Some(DRAFT_SYSTEM_PROMPT.to_string()),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        };

        let response = tokio::time::timeout(self.config.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| LlmError::Timeout(self.config.timeout.as_secs()))?
            .inspect_err(|e| tracing::warn!(error = %e, "draft provider call failed"))?;

        tracing::debug!(
            response_id = %response.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "draft provider call completed"
        );

        let resolved = resolve_draft(&response.content, brief, new_draft_id);
        if resolved.fallback {
            tracing::warn!(draft_id = %resolved.draft.id, "provider returned unstructured text, draft synthesized");
        }
        warn_on_advisory_limits(&resolved.draft);

        Ok(resolved)
    }
}

/// Log drafts that break the prompt's advisory limits. They are returned as-is.
fn warn_on_advisory_limits(draft: &ProductDraft) {
    let title_chars = draft.title.chars().count();
    if title_chars > ADVISORY_TITLE_CHARS {
        tracing::warn!(draft_id = %draft.id, title_chars, "draft title exceeds advisory length");
    }
    if !(0.0..=5.0).contains(&draft.score) {
        tracing::warn!(draft_id = %draft.id, score = draft.score, "draft score outside [0, 5]");
    }
    if draft.price < 0.0 {
        tracing::warn!(draft_id = %draft.id, price = draft.price, "draft price is negative");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use autonomax_types::llm::{
        CompletionResponse, MessageRole, ProviderCapabilities, StopReason, Usage,
    };

    use super::*;
    use crate::llm::provider::LlmProvider;

    // --- Scripted provider ---

    #[derive(Clone)]
    enum Script {
        Reply(String),
        Fail,
        Hang,
    }

    struct ScriptedProvider {
        script: Script,
        calls: Arc<AtomicUsize>,
        last_request: Arc<Mutex<Option<CompletionRequest>>>,
        capabilities: ProviderCapabilities,
    }

    impl ScriptedProvider {
        fn new(script: Script) -> Self {
            Self {
                script,
                calls: Arc::new(AtomicUsize::new(0)),
                last_request: Arc::new(Mutex::new(None)),
                capabilities: ProviderCapabilities {
                    json_mode: false,
                    max_context_tokens: 8_192,
                    max_output_tokens: 1_024,
                },
            }
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        fn complete(
            &self,
            request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            let script = self.script.clone();
            async move {
                match script {
                    Script::Reply(content) => Ok(CompletionResponse {
                        id: "resp-1".to_string(),
                        content,
                        model: "scripted-model".to_string(),
                        stop_reason: StopReason::EndTurn,
                        usage: Usage::default(),
                    }),
                    Script::Fail => Err(LlmError::Provider {
                        message: "connection refused".to_string(),
                    }),
                    Script::Hang => {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        Err(LlmError::Provider {
                            message: "unreachable".to_string(),
                        })
                    }
                }
            }
        }
    }

    fn zen_brief() -> ProductBrief {
        ProductBrief {
            category: "Zen Print".to_string(),
            audience: "home decor buyers".to_string(),
            keywords: vec!["minimal".to_string(), "serene".to_string()],
            refs: vec![],
        }
    }

    fn generator(script: Script) -> (DraftGenerator, Arc<AtomicUsize>, Arc<Mutex<Option<CompletionRequest>>>) {
        let provider = ScriptedProvider::new(script);
        let calls = provider.calls.clone();
        let last = provider.last_request.clone();
        let config = GeneratorConfig {
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_millis(100),
            ..Default::default()
        };
        (DraftGenerator::new(BoxLlmProvider::new(provider), config), calls, last)
    }

    #[tokio::test]
    async fn refusal_text_becomes_fallback_draft() {
        let (generator, _, _) = generator(Script::Reply("I cannot help with that.".to_string()));

        let draft = generator.generate(&zen_brief()).await.unwrap();

        assert!(!draft.id.is_empty());
        assert_eq!(draft.title, "I cannot help with that.");
        assert_eq!(draft.description, "I cannot help with that.");
        assert_eq!(draft.tags, vec!["minimal", "serene"]);
        assert!(draft.assets.is_empty());
        assert_eq!(draft.price, 7.0);
        assert_eq!(draft.score, 4.0);
    }

    #[tokio::test]
    async fn structured_reply_is_returned_unmodified() {
        let raw = r#"{"id":"zen-001","title":"Serene Zen Print","description":"Minimal calm wall art","tags":["zen","minimal"],"assets":[],"price":12.0,"score":4.4}"#;
        let (generator, _, _) = generator(Script::Reply(raw.to_string()));

        let resolved = generator.generate_resolved(&zen_brief()).await.unwrap();

        assert!(!resolved.fallback);
        assert_eq!(resolved.draft.id, "zen-001");
        assert_eq!(resolved.draft.title, "Serene Zen Print");
        assert_eq!(resolved.draft.price, 12.0);
        assert_eq!(resolved.draft.score, 4.4);
    }

    #[tokio::test]
    async fn request_carries_system_prompt_and_brief() {
        let (generator, _, last) = generator(Script::Reply("ok".to_string()));

        generator.generate(&zen_brief()).await.unwrap();

        let request = last.lock().unwrap().clone().unwrap();
        assert_eq!(request.system.as_deref(), Some(DRAFT_SYSTEM_PROMPT));
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert!(request.messages[0].content.contains("Keywords: minimal, serene"));
    }

    #[tokio::test]
    async fn provider_failure_propagates_without_retry() {
        let (generator, calls, _) = generator(Script::Fail);

        let err = generator.generate(&zen_brief()).await.unwrap_err();

        assert!(matches!(err, DraftError::UpstreamUnavailable(LlmError::Provider { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hung_provider_times_out() {
        let (generator, _, _) = generator(Script::Hang);

        let err = generator.generate(&zen_brief()).await.unwrap_err();

        assert!(matches!(err, DraftError::UpstreamUnavailable(LlmError::Timeout(_))));
    }

    #[tokio::test]
    async fn invalid_brief_never_reaches_provider() {
        let (generator, calls, _) = generator(Script::Reply("ok".to_string()));
        let mut brief = zen_brief();
        brief.category = String::new();

        let err = generator.generate(&brief).await.unwrap_err();

        assert!(matches!(err, DraftError::InvalidBrief(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn every_response_shape_yields_complete_draft() {
        let responses = [
            "",
            "not json at all",
            "{\"title\": \"half\"}",
            "[]",
            r#"{"title":"t","description":"d","tags":[],"assets":[],"price":1.0,"score":2.0}"#,
            r#"{"id":"x","title":"t","description":"d","tags":["a"],"assets":["b"],"price":1.0,"score":2.0}"#,
        ];
        for raw in responses {
            let (generator, _, _) = generator(Script::Reply(raw.to_string()));
            let draft = generator.generate(&zen_brief()).await.unwrap();
            assert!(!draft.id.is_empty(), "empty id for {raw:?}");
            assert!(draft.price.is_finite());
            assert!(draft.score.is_finite());
        }
    }

    #[tokio::test]
    async fn generated_ids_are_unique() {
        let raw = r#"{"title":"t","description":"d","tags":[],"assets":[],"price":1.0,"score":2.0}"#;
        let (generator, _, _) = generator(Script::Reply(raw.to_string()));

        let mut ids = HashSet::new();
        for _ in 0..1_000 {
            let draft = generator.generate(&zen_brief()).await.unwrap();
            assert!(ids.insert(draft.id));
        }
        assert_eq!(ids.len(), 1_000);
    }
}
