//! Prompt text for brief-to-draft generation.

use autonomax_types::product::ProductBrief;

/// System prompt for the draft generation LLM call.
///
/// The length and score limits are advisory; nothing downstream enforces them.
pub const DRAFT_SYSTEM_PROMPT: &str = "You are a senior e-commerce copywriter. Return strict JSON with keys: \
id,title,description,tags,assets,price,score. Title ≤ 70 chars; score in [0,5].";

/// Render a brief into the user turn of the generation request.
///
/// Keywords are joined with ", " in the order given. `refs` are not
/// rendered; they travel with the brief for downstream asset lookup.
pub fn build_user_message(brief: &ProductBrief) -> String {
    format!(
        "Category: {}\nAudience: {}\nKeywords: {}\nReturn JSON only.",
        brief.category,
        brief.audience,
        brief.keywords.join(", ")
    )
}
