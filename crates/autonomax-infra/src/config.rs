//! Settings loader for AutonomaX.
//!
//! Reads an optional `autonomax.toml` into [`Settings`], then applies
//! environment variable overrides. Falls back to defaults when the file is
//! missing or malformed. Secrets never come from the file; they are read
//! from the environment into [`Credentials`].

use std::path::Path;
use std::str::FromStr;

use secrecy::SecretString;

use autonomax_types::config::Settings;

/// Load settings from `path` (if any), then apply environment overrides.
pub async fn load_settings(path: Option<&Path>) -> Settings {
    let mut settings = match path {
        Some(path) => load_settings_file(path).await,
        None => Settings::default(),
    };
    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Read and parse a settings file.
///
/// - If the file does not exist, returns [`Settings::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_settings_file(path: &Path) -> Settings {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Settings::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return Settings::default();
        }
    };

    match toml::from_str::<Settings>(&content) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            Settings::default()
        }
    }
}

/// Apply environment overrides using `lookup` to resolve variable names.
///
/// Empty values are ignored. A value that fails to parse is logged and
/// the current setting kept.
pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("APP_ENV") {
        settings.app_env = v;
    }
    if let Some(v) = get("API_HOST") {
        settings.api.host = v;
    }
    override_parsed(&mut settings.api.port, "API_PORT", get("API_PORT"));
    override_parsed(&mut settings.llm.provider, "LLM_PROVIDER", get("LLM_PROVIDER"));
    if let Some(v) = get("LLM_MODEL") {
        settings.llm.model = v;
    }
    if let Some(v) = get("LLM_BASE_URL") {
        settings.llm.base_url = Some(v);
    }
    override_parsed(
        &mut settings.llm.timeout_secs,
        "LLM_TIMEOUT_SECS",
        get("LLM_TIMEOUT_SECS"),
    );
    if let Some(v) = get("SHOPIFY_SHOP_DOMAIN") {
        settings.shopify.shop_domain = Some(v);
    }
    if let Some(v) = get("SHOPIFY_API_VERSION") {
        settings.shopify.api_version = v;
    }
    if let Some(v) = get("REDIS_URL") {
        settings.broker_url = Some(v);
    }
}

fn override_parsed<T: FromStr>(target: &mut T, key: &str, value: Option<String>)
where
    T::Err: std::fmt::Display,
{
    let Some(raw) = value else { return };
    match raw.trim().parse::<T>() {
        Ok(parsed) => *target = parsed,
        Err(err) => tracing::warn!("Ignoring {key}={raw:?}: {err}"),
    }
}

/// Secrets resolved from the environment.
///
/// Does not derive Debug; values are only exposed where a request header
/// is built.
#[derive(Default)]
pub struct Credentials {
    pub llm_api_key: Option<SecretString>,
    pub shopify_admin_token: Option<SecretString>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
        };
        Self {
            llm_api_key: secret("OPENAI_API_KEY"),
            shopify_admin_token: secret("SHOPIFY_ADMIN_TOKEN"),
        }
    }
}
