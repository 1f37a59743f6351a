//! Service configuration types for AutonomaX.
//!
//! `Settings` mirrors `autonomax.toml`. Every field has a default so an
//! empty file (or no file) yields a runnable local configuration.
//! Secrets (provider API key, Shopify token) are not part of this file;
//! they are resolved from the environment by the infra layer.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderKind;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Environment tag reported by `/health` (e.g. "local", "prod").
    #[serde(default = "default_app_env")]
    pub app_env: String,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub shopify: ShopifySettings,

    #[serde(default)]
    pub publish: PublishSettings,

    /// Message broker URL. Recorded for deployments that still export it;
    /// the publish queue runs in-process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_url: Option<String>,
}

fn default_app_env() -> String {
    "local".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_env: default_app_env(),
            api: ApiSettings::default(),
            llm: LlmSettings::default(),
            shopify: ShopifySettings::default(),
            publish: PublishSettings::default(),
            broker_url: None,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Text-generation provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_model")]
    pub model: String,
    /// Override the backend's default base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Upper bound on a single provider call.
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            base_url: None,
            timeout_secs: default_llm_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Shopify Admin API settings (the access token comes from the environment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifySettings {
    /// Shop domain, e.g. `autonomax.myshopify.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_domain: Option<String>,
    #[serde(default = "default_shopify_api_version")]
    pub api_version: String,
    #[serde(default = "default_shopify_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_shopify_api_version() -> String {
    "2024-07".to_string()
}

fn default_shopify_timeout_secs() -> u64 {
    30
}

impl Default for ShopifySettings {
    fn default() -> Self {
        Self {
            shop_domain: None,
            api_version: default_shopify_api_version(),
            timeout_secs: default_shopify_timeout_secs(),
        }
    }
}

/// Publish queue and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSettings {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Total attempts per task, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Tasks the worker publishes at the same time.
    #[serde(default = "default_worker_concurrency")]
    pub concurrency: usize,
    /// Published or failed tasks kept for status lookup before the oldest
    /// are evicted. Dead letters are always kept.
    #[serde(default = "default_retain_finished")]
    pub retain_finished: usize,
}

fn default_queue_capacity() -> usize {
    256
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_worker_concurrency() -> usize {
    4
}

fn default_retain_finished() -> usize {
    1024
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            concurrency: default_worker_concurrency(),
            retain_finished: default_retain_finished(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.app_env, "local");
        assert_eq!(settings.api.port, 8080);
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert_eq!(settings.llm.timeout_secs, 30);
        assert_eq!(settings.shopify.api_version, "2024-07");
        assert_eq!(settings.publish.max_attempts, 3);
        assert_eq!(settings.publish.concurrency, 4);
        assert_eq!(settings.publish.retain_finished, 1024);
        assert!(settings.broker_url.is_none());
    }

    #[test]
    fn test_settings_deserialize_empty() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.app_env, "local");
        assert_eq!(settings.api.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(settings.llm.provider, ProviderKind::OpenAi);
    }

    #[test]
    fn test_settings_deserialize_partial_sections() {
        let toml_str = r#"
app_env = "prod"

[llm]
provider = "gemini"
model = "gemini-2.5-flash"
timeout_secs = 10

[shopify]
shop_domain = "autonomax.myshopify.com"

[publish]
max_attempts = 5
concurrency = 2
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.app_env, "prod");
        assert_eq!(settings.llm.provider, ProviderKind::Gemini);
        assert_eq!(settings.llm.timeout_secs, 10);
        assert!((settings.llm.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(
            settings.shopify.shop_domain.as_deref(),
            Some("autonomax.myshopify.com")
        );
        assert_eq!(settings.shopify.api_version, "2024-07");
        assert_eq!(settings.publish.max_attempts, 5);
        assert_eq!(settings.publish.queue_capacity, 256);
        assert_eq!(settings.publish.concurrency, 2);
    }
}
