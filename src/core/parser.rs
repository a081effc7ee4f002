use crate::core::{compare, normalize};
use crate::domain::model::{Item, SessionResult, SessionStatus};
use serde_json::Value;

/// Turn one automation session's raw textual output into a SessionResult.
/// The agent's output is untrusted text: any decode failure downgrades to a
/// failed result with the original text preserved, never an error.
pub fn parse_session_output(platform: &str, raw: &str) -> SessionResult {
    let candidate = strip_code_fence(raw.trim());

    if !(candidate.starts_with('[') || candidate.starts_with('{')) {
        tracing::warn!("[{}] no structured payload in session output", platform);
        return SessionResult::failed(platform, raw);
    }

    let decoded: Value = match serde_json::from_str(candidate) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("[{}] parsing error: {}", platform, e);
            return SessionResult::failed(platform, raw);
        }
    };

    let candidates = match decoded {
        Value::Array(entries) => entries,
        // A single object is promoted to a one-element list.
        object @ Value::Object(_) => vec![object],
        other => {
            tracing::warn!("[{}] unexpected payload shape: {}", platform, other);
            return SessionResult::failed(platform, raw);
        }
    };

    let mut valid_items = Vec::new();
    for entry in candidates {
        let Some(fields) = entry.as_object() else {
            tracing::warn!("[{}] non-object candidate in item list", platform);
            return SessionResult::failed(platform, raw);
        };

        let title = field_text(fields, "title").unwrap_or_else(|| "Unknown".to_string());
        let price = field_text(fields, "price").unwrap_or_else(|| "999999".to_string());
        let rating = field_text(fields, "rating").unwrap_or_else(|| "0".to_string());

        let numeric_price = normalize::extract_price(&price);
        let numeric_rating = normalize::extract_rating(&rating);

        // Zero or negative prices are placeholder entries, never a real deal.
        if numeric_price <= 0.0 {
            tracing::debug!("[{}] discarding invalid item: {}", platform, title);
            continue;
        }

        valid_items.push(Item {
            title,
            price,
            rating,
            numeric_price,
            numeric_rating,
        });
    }

    let items = compare::rank(valid_items);
    let best_item = items.first().cloned();

    SessionResult {
        platform: platform.to_string(),
        status: SessionStatus::Success,
        items,
        best_item,
        raw_response: raw.to_string(),
    }
}

/// Interior of a ```json block if present, else the first generic fenced
/// block, else the text itself.
fn strip_code_fence(text: &str) -> &str {
    fence_interior(text, "```json")
        .or_else(|| fence_interior(text, "```"))
        .unwrap_or(text)
}

fn fence_interior<'a>(text: &'a str, opening: &str) -> Option<&'a str> {
    let (_, rest) = text.split_once(opening)?;
    let interior = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(interior.trim())
}

fn field_text(fields: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        // Numbers, booleans and nulls go through their text form, same as
        // the extraction regex expects.
        Some(other) => Some(other.to_string()),
    }
}
