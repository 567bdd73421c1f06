//! Normalization of free-form model output into a complete record.
//!
//! The vision model is asked for pure JSON but routinely returns fenced
//! blocks, chatty prefixes, parroted prompt placeholders or outright
//! refusals. Every field goes through its own validator with its own
//! fallback, so a record always comes out fully populated no matter how
//! mangled the input is. Nothing in this module errors or panics on bad
//! input.

use tracing::warn;

use crate::models::NormalizedAnalysis;
use crate::prompts::DESCRIPTION_FALLBACK;

/// Case-sensitive substrings that mark a model refusal.
pub const REFUSAL_MARKERS: [&str; 2] = ["cannot assist", "I cannot"];

/// Prompt tokens that, appearing in a proposed name, prove the model
/// echoed the output example instead of analyzing the image.
const NAME_PLACEHOLDER_TOKENS: [&str; 2] = ["상품명", "JSON"];

const MIN_DESCRIPTION_CHARS: usize = 10;

pub fn is_refusal(text: &str) -> bool {
    REFUSAL_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Pull the outermost JSON object out of chatty model output.
///
/// Takes the slice from the first `{` to the last `}` (fenced or not),
/// strips markdown fence tokens, then parses. Returns `None` when no
/// object can be recovered; the caller falls back per field.
pub fn extract_json_block(text: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    let candidate = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };

    let cleaned = candidate.replace("```json", "").replace("```", "");

    match serde_json::from_str::<serde_json::Value>(&cleaned) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(err) => {
            let preview: String = text.chars().take(50).collect();
            warn!(%err, preview = %preview, "model output is not parseable JSON");
            None
        }
    }
}

/// A name is rejected when missing, blank or echoing the prompt.
pub fn normalize_name(raw: Option<&str>, file_stem: &str) -> String {
    match raw {
        Some(name)
            if !name.trim().is_empty()
                && !NAME_PLACEHOLDER_TOKENS.iter().any(|t| name.contains(t)) =>
        {
            name.to_string()
        }
        _ => format!("AI 추천 상품 ({})", file_stem),
    }
}

/// Descriptions shorter than ten characters are treated as absent.
pub fn normalize_description(raw: Option<&str>) -> String {
    match raw {
        Some(desc) if desc.chars().count() >= MIN_DESCRIPTION_CHARS => desc.to_string(),
        _ => DESCRIPTION_FALLBACK.to_string(),
    }
}

pub fn normalize_category(raw: Option<&str>) -> String {
    match raw {
        Some(cat) if !cat.trim().is_empty() => cat.to_string(),
        _ => "Uncategorized".to_string(),
    }
}

/// Coerce whatever the model put in `price` into a non-negative number.
///
/// Accepts numbers and strings alike; keeps only the digit characters
/// (`"₩10,000"` becomes 10000) and defaults to 0 when none remain.
pub fn normalize_price(raw: Option<&serde_json::Value>) -> i64 {
    let text = match raw {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return 0,
    };

    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Normalize a raw vision response into a complete record.
///
/// `file_stem` labels the name fallback so operators can trace the
/// record back to its upload. A refusal skips extraction entirely and
/// yields the all-fallback record; no field of a refused response is
/// ever trusted.
pub fn normalize_analysis(raw_text: &str, file_stem: &str) -> NormalizedAnalysis {
    if is_refusal(raw_text) {
        warn!("model refused the analysis request");
        return NormalizedAnalysis {
            name: normalize_name(None, file_stem),
            category: normalize_category(None),
            description: normalize_description(None),
            price: 0,
        };
    }

    let fields = extract_json_block(raw_text).unwrap_or_default();

    NormalizedAnalysis {
        name: normalize_name(fields.get("name").and_then(|v| v.as_str()), file_stem),
        category: normalize_category(fields.get("category").and_then(|v| v.as_str())),
        description: normalize_description(fields.get("description").and_then(|v| v.as_str())),
        price: normalize_price(fields.get("price")),
    }
}

/// Trimmed passthrough for generated answers; empty output gets the
/// fixed apology.
pub fn normalize_text_answer(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        crate::prompts::ANSWER_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}
