use serde::{Deserialize, Serialize};

use crate::error::DraftError;

/// Input for a product draft: what to sell and to whom.
///
/// `keywords` and `refs` keep insertion order; keywords are rendered into
/// the prompt in the order given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductBrief {
    pub category: String,
    pub audience: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Opaque reference identifiers (mood boards, source listings).
    #[serde(default)]
    pub refs: Vec<String>,
}

impl ProductBrief {
    /// Reject briefs whose `category` or `audience` is blank.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.category.trim().is_empty() {
            return Err(DraftError::InvalidBrief(
                "category must not be empty".to_string(),
            ));
        }
        if self.audience.trim().is_empty() {
            return Err(DraftError::InvalidBrief(
                "audience must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A generated, not-yet-published product listing.
///
/// `title` is advised to stay within 70 characters and `score` within
/// [0, 5]; neither is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub assets: Vec<String>,
    pub price: f64,
    pub score: f64,
}

/// Request body for publishing a draft to a commerce channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    pub channel: String,
    pub draft_id: String,
    /// Accepted for compatibility with older dashboard builds; unused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_defaults_empty_sequences() {
        let brief: ProductBrief =
            serde_json::from_str(r#"{"category":"Zen Print","audience":"home decor buyers"}"#)
                .unwrap();
        assert!(brief.keywords.is_empty());
        assert!(brief.refs.is_empty());
        assert!(brief.validate().is_ok());
    }

    #[test]
    fn test_brief_preserves_keyword_order() {
        let brief: ProductBrief = serde_json::from_str(
            r#"{"category":"c","audience":"a","keywords":["serene","minimal","printable"]}"#,
        )
        .unwrap();
        assert_eq!(brief.keywords, vec!["serene", "minimal", "printable"]);
    }

    #[test]
    fn test_brief_rejects_blank_fields() {
        let brief = ProductBrief {
            category: "  ".to_string(),
            audience: "buyers".to_string(),
            keywords: vec![],
            refs: vec![],
        };
        assert!(matches!(brief.validate(), Err(DraftError::InvalidBrief(_))));

        let brief = ProductBrief {
            category: "Prints".to_string(),
            audience: String::new(),
            keywords: vec![],
            refs: vec![],
        };
        let err = brief.validate().unwrap_err();
        assert!(err.to_string().contains("audience"));
    }

    #[test]
    fn test_draft_wire_shape() {
        let draft = ProductDraft {
            id: "draft-1".to_string(),
            title: "Zen Print".to_string(),
            description: "Calm".to_string(),
            tags: vec!["minimal".to_string()],
            assets: vec![],
            price: 7.0,
            score: 4.0,
        };
        let value = serde_json::to_value(&draft).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["assets", "description", "id", "price", "score", "tags", "title"]
        );
    }

    #[test]
    fn test_publish_request_ignores_pricing() {
        let req: PublishRequest = serde_json::from_str(
            r#"{"channel":"shopify","draft_id":"demo-1","pricing":{"base":9.5}}"#,
        )
        .unwrap();
        assert_eq!(req.channel, "shopify");
        assert!(req.pricing.is_some());

        let req: PublishRequest =
            serde_json::from_str(r#"{"channel":"etsy","draft_id":"demo-1"}"#).unwrap();
        assert!(req.pricing.is_none());
    }
}
