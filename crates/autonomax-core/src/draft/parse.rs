//! Parse-or-fallback boundary for raw provider output.
//!
//! The raw completion text is decoded into a typed payload. Any decode
//! failure (not JSON, not an object, a required field missing or of the
//! wrong type) takes the fallback branch, which synthesizes a readable
//! draft from the raw text and the brief. The only gap filled on a decoded
//! payload is a missing `id` (and `assets`, which the schema treats as
//! optional).

use serde::Deserialize;
use uuid::Uuid;

use autonomax_types::product::{ProductBrief, ProductDraft};

/// Characters of raw text kept as the fallback title.
pub const FALLBACK_TITLE_CHARS: usize = 64;

/// Price assigned to a fallback draft.
pub const FALLBACK_PRICE: f64 = 7.0;

/// Score assigned to a fallback draft.
pub const FALLBACK_SCORE: f64 = 4.0;

/// The draft shape the provider is asked to return.
#[derive(Debug, Deserialize)]
struct DraftPayload {
    #[serde(default)]
    id: Option<String>,
    title: String,
    description: String,
    tags: Vec<String>,
    #[serde(default)]
    assets: Vec<String>,
    price: f64,
    score: f64,
}

/// Outcome of resolving a raw response into a draft.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDraft {
    pub draft: ProductDraft,
    /// The raw text did not decode and the draft was synthesized.
    pub fallback: bool,
    /// The id was minted here rather than supplied by the provider.
    pub id_generated: bool,
}

/// Mint a fresh draft identifier: `draft-` followed by 16 hex characters.
pub fn new_draft_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("draft-{}", &hex[..16])
}

/// Turn raw provider text into a complete draft.
///
/// Never fails: undecodable text becomes a fallback draft, and a missing
/// or empty `id` is replaced by `mint_id()`.
pub fn resolve_draft(
    raw: &str,
    brief: &ProductBrief,
    mint_id: impl FnOnce() -> String,
) -> ResolvedDraft {
    let (id, mut draft, fallback) = match serde_json::from_str::<DraftPayload>(raw) {
        Ok(payload) => (
            payload.id,
            ProductDraft {
                id: String::new(),
                title: payload.title,
                description: payload.description,
                tags: payload.tags,
                assets: payload.assets,
                price: payload.price,
                score: payload.score,
            },
            false,
        ),
        Err(err) => {
            tracing::debug!(error = %err, "provider output is not a draft payload, using fallback");
            (None, fallback_draft(raw, brief), true)
        }
    };

    let id_generated = match id.filter(|id| !id.is_empty()) {
        Some(id) => {
            draft.id = id;
            false
        }
        None => {
            draft.id = mint_id();
            true
        }
    };

    ResolvedDraft {
        draft,
        fallback,
        id_generated,
    }
}

/// Synthesize a draft from text that could not be decoded. The id is left
/// empty for the caller to fill.
fn fallback_draft(raw: &str, brief: &ProductBrief) -> ProductDraft {
    ProductDraft {
        id: String::new(),
        title: raw.chars().take(FALLBACK_TITLE_CHARS).collect(),
        description: raw.to_string(),
        tags: brief.keywords.clone(),
        assets: Vec::new(),
        price: FALLBACK_PRICE,
        score: FALLBACK_SCORE,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn brief() -> ProductBrief {
        ProductBrief {
            category: "Zen Print".to_string(),
            audience: "home decor buyers".to_string(),
            keywords: vec!["minimal".to_string(), "serene".to_string()],
            refs: vec![],
        }
    }

    fn fixed_id() -> String {
        "draft-fixed".to_string()
    }

    #[test]
    fn test_plain_text_falls_back() {
        let resolved = resolve_draft("I cannot help with that.", &brief(), fixed_id);
        assert!(resolved.fallback);
        assert!(resolved.id_generated);
        let draft = resolved.draft;
        assert_eq!(draft.id, "draft-fixed");
        assert_eq!(draft.title, "I cannot help with that.");
        assert_eq!(draft.description, "I cannot help with that.");
        assert_eq!(draft.tags, vec!["minimal", "serene"]);
        assert!(draft.assets.is_empty());
        assert_eq!(draft.price, 7.0);
        assert_eq!(draft.score, 4.0);
    }

    #[test]
    fn test_fallback_title_truncates_to_64_chars() {
        let raw = "x".repeat(200);
        let draft = resolve_draft(&raw, &brief(), fixed_id).draft;
        assert_eq!(draft.title.chars().count(), 64);
        assert_eq!(draft.description, raw);
    }

    #[test]
    fn test_fallback_title_counts_chars_not_bytes() {
        let raw = "禅".repeat(70);
        let draft = resolve_draft(&raw, &brief(), fixed_id).draft;
        assert_eq!(draft.title, "禅".repeat(64));
    }

    #[test]
    fn test_empty_response_falls_back() {
        let resolved = resolve_draft("", &brief(), fixed_id);
        assert!(resolved.fallback);
        assert_eq!(resolved.draft.title, "");
        assert_eq!(resolved.draft.description, "");
        assert_eq!(resolved.draft.id, "draft-fixed");
    }

    #[test]
    fn test_non_object_json_falls_back() {
        for raw in ["[1,2,3]", "42", "null", "\"a string\""] {
            let resolved = resolve_draft(raw, &brief(), fixed_id);
            assert!(resolved.fallback, "{raw} should fall back");
            assert_eq!(resolved.draft.description, raw);
        }
    }

    #[test]
    fn test_partial_object_falls_back() {
        let raw = r#"{"title":"Serene Print","description":"Calm art"}"#;
        let resolved = resolve_draft(raw, &brief(), fixed_id);
        assert!(resolved.fallback);
        assert_eq!(resolved.draft.description, raw);
        assert_eq!(resolved.draft.price, FALLBACK_PRICE);
    }

    #[test]
    fn test_wrong_field_type_falls_back() {
        let raw = r#"{"id":"a","title":"t","description":"d","tags":[],"assets":[],"price":"19.99","score":4}"#;
        assert!(resolve_draft(raw, &brief(), fixed_id).fallback);
    }

    #[test]
    fn test_complete_payload_passes_through() {
        let raw = r#"{"id":"p-1","title":"Serene Zen Print","description":"Calm abstract art","tags":["zen","calm"],"assets":["s3://a/1.jpg"],"price":19.5,"score":4.6}"#;
        let resolved = resolve_draft(raw, &brief(), || panic!("id must not be minted"));
        assert!(!resolved.fallback);
        assert!(!resolved.id_generated);
        assert_eq!(
            resolved.draft,
            ProductDraft {
                id: "p-1".to_string(),
                title: "Serene Zen Print".to_string(),
                description: "Calm abstract art".to_string(),
                tags: vec!["zen".to_string(), "calm".to_string()],
                assets: vec!["s3://a/1.jpg".to_string()],
                price: 19.5,
                score: 4.6,
            }
        );
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let raw = r#"{"id":"p-2","title":"t","description":"d","tags":[],"assets":[],"price":-3.0,"score":9.0}"#;
        let draft = resolve_draft(raw, &brief(), fixed_id).draft;
        assert_eq!(draft.price, -3.0);
        assert_eq!(draft.score, 9.0);
    }

    #[test]
    fn test_missing_id_is_injected() {
        let raw = r#"{"title":"t","description":"d","tags":["a"],"price":12.0,"score":3.5}"#;
        let resolved = resolve_draft(raw, &brief(), fixed_id);
        assert!(!resolved.fallback);
        assert!(resolved.id_generated);
        assert_eq!(resolved.draft.id, "draft-fixed");
        assert!(resolved.draft.assets.is_empty());
        assert_eq!(resolved.draft.tags, vec!["a"]);
    }

    #[test]
    fn test_null_or_empty_id_is_injected() {
        for id in ["null", "\"\""] {
            let raw = format!(
                r#"{{"id":{id},"title":"t","description":"d","tags":[],"assets":[],"price":1.0,"score":1.0}}"#
            );
            let resolved = resolve_draft(&raw, &brief(), fixed_id);
            assert!(!resolved.fallback);
            assert_eq!(resolved.draft.id, "draft-fixed");
        }
    }

    #[test]
    fn test_new_draft_id_format() {
        let id = new_draft_id();
        assert!(id.starts_with("draft-"));
        assert_eq!(id.len(), "draft-".len() + 16);
        assert!(id["draft-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_new_draft_id_unique_over_many_samples() {
        let ids: HashSet<String> = (0..5_000).map(|_| new_draft_id()).collect();
        assert_eq!(ids.len(), 5_000);
    }
}
