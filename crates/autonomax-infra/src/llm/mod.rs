//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `autonomax-core`, and a provider factory
//! ([`create_provider`]) that builds it from [`LlmSettings`].
//!
//! [`LlmProvider`]: autonomax_core::llm::provider::LlmProvider

pub mod openai_compat;

use secrecy::{ExposeSecret, SecretString};

use autonomax_core::llm::box_provider::BoxLlmProvider;
use autonomax_types::config::LlmSettings;
use autonomax_types::llm::{LlmError, ProviderKind};

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{gemini_defaults, mistral_defaults, openai_defaults};

/// Create a [`BoxLlmProvider`] from [`LlmSettings`].
///
/// `base_url`, when set, replaces the backend's default endpoint while
/// keeping its name and capabilities.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is available.
pub fn create_provider(
    settings: &LlmSettings,
    api_key: Option<&SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = api_key
        .map(|k| k.expose_secret())
        .filter(|k| !k.is_empty())
        .ok_or(LlmError::AuthenticationFailed)?;

    let mut config = match settings.provider {
        ProviderKind::OpenAi => openai_defaults(key, &settings.model),
        ProviderKind::Gemini => gemini_defaults(key, &settings.model),
        ProviderKind::Mistral => mistral_defaults(key, &settings.model),
    };
    if let Some(base_url) = settings.base_url.as_deref() {
        config.base_url = base_url.to_string();
    }

    tracing::debug!(
        provider = %config.provider_name,
        model = %config.model,
        base_url = %config.base_url,
        "LLM provider configured"
    );

    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(config)))
}
