//! Shopify Admin API channel publisher.
//!
//! Creates one product per call via `POST /admin/api/{version}/products.json`.
//! Retries are owned by the publish worker; this adapter only classifies
//! failures so the worker can tell transient from permanent ones.
//!
//! The access token is held as a [`SecretString`] and only exposed when
//! building the request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use autonomax_core::publish::channel::{ChannelPublisher, Listing};
use autonomax_types::config::ShopifySettings;
use autonomax_types::error::PublishError;
use autonomax_types::publish::{PublishChannel, PublishReceipt};

const VENDOR: &str = "AutonomaX";
const PRODUCT_TYPE: &str = "Digital";

#[derive(Debug, Serialize)]
struct ProductEnvelope<'a> {
    product: ProductPayload<'a>,
}

#[derive(Debug, Serialize)]
struct ProductPayload<'a> {
    title: &'a str,
    body_html: &'a str,
    vendor: &'static str,
    product_type: &'static str,
    /// Shopify takes tags as one comma-separated string.
    tags: String,
    variants: Vec<VariantPayload>,
}

#[derive(Debug, Serialize)]
struct VariantPayload {
    price: String,
}

/// Shopify channel adapter.
///
/// Constructed even when the shop domain or token is missing, so the
/// service can start and generate drafts; publishing then fails with
/// [`PublishError::MissingCredentials`].
pub struct ShopifyPublisher {
    client: reqwest::Client,
    shop_domain: Option<String>,
    access_token: Option<SecretString>,
    api_version: String,
}

impl ShopifyPublisher {
    pub fn new(
        settings: &ShopifySettings,
        access_token: Option<SecretString>,
    ) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| PublishError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            shop_domain: settings
                .shop_domain
                .clone()
                .filter(|d| !d.trim().is_empty()),
            access_token: access_token.filter(|t| !t.expose_secret().is_empty()),
            api_version: settings.api_version.clone(),
        })
    }

    /// Whether both the shop domain and the access token are present.
    pub fn is_configured(&self) -> bool {
        self.shop_domain.is_some() && self.access_token.is_some()
    }

    fn products_url(&self, shop_domain: &str) -> String {
        format!(
            "https://{}/admin/api/{}/products.json",
            shop_domain.trim_end_matches('/'),
            self.api_version
        )
    }

    fn payload(listing: &Listing) -> ProductEnvelope<'_> {
        ProductEnvelope {
            product: ProductPayload {
                title: &listing.title,
                body_html: &listing.body_html,
                vendor: VENDOR,
                product_type: PRODUCT_TYPE,
                tags: listing.tags.join(", "),
                variants: vec![VariantPayload {
                    price: format!("{:.2}", listing.price),
                }],
            },
        }
    }
}

// No Debug: the struct holds the access token.

impl ChannelPublisher for ShopifyPublisher {
    fn channel(&self) -> PublishChannel {
        PublishChannel::Shopify
    }

    #[tracing::instrument(name = "shopify_publish", skip_all, fields(draft_id = %listing.draft_id))]
    async fn publish(&self, listing: &Listing) -> Result<PublishReceipt, PublishError> {
        let shop_domain = self
            .shop_domain
            .as_deref()
            .ok_or_else(|| PublishError::MissingCredentials("SHOPIFY_SHOP_DOMAIN".to_string()))?;
        let token = self
            .access_token
            .as_ref()
            .ok_or_else(|| PublishError::MissingCredentials("SHOPIFY_ADMIN_TOKEN".to_string()))?;

        let response = self
            .client
            .post(self.products_url(shop_domain))
            .header("X-Shopify-Access-Token", token.expose_secret())
            .json(&Self::payload(listing))
            .send()
            .await
            .map_err(|e| PublishError::Unavailable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PublishError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let product_id = product_id_from(&body).ok_or_else(|| {
            PublishError::InvalidResponse("response has no product.id".to_string())
        })?;

        tracing::debug!(%product_id, "shopify product created");
        Ok(PublishReceipt { product_id })
    }
}

/// Shopify returns numeric ids; keep them as strings.
fn product_id_from(body: &serde_json::Value) -> Option<String> {
    match body.get("product")?.get("id")? {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
