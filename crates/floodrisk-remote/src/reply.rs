//! Pull a structured result out of a free-text model reply.

use floodrisk_core::{RemoteFindings, RiskLevel};
use serde_json::{Map, Value};

use crate::RemoteError;

/// Locate the first balanced `{...}` in `text`.
///
/// Braces inside JSON string literals are ignored, so prose like
/// `"analysis": "see {note}"` does not end the object early.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract, parse and validate an analysis reply.
pub fn parse_findings(text: &str) -> Result<RemoteFindings, RemoteError> {
    let object = extract_json_object(text)
        .ok_or_else(|| RemoteError::Malformed("no JSON object in reply".into()))?;
    let value: Value =
        serde_json::from_str(object).map_err(|e| RemoteError::Malformed(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(RemoteError::Malformed("reply is not a JSON object".into()));
    };

    let raw_level = required_text(&fields, "riskLevel")?;
    let level = RiskLevel::parse(&raw_level)
        .ok_or_else(|| RemoteError::Malformed(format!("unrecognised risk level '{raw_level}'")))?;

    let mut probability = required_text(&fields, "riskProbability")?;
    if !probability.ends_with('%') && probability.parse::<f64>().is_ok() {
        probability.push('%');
    }

    let analysis = required_text(&fields, "analysis")?;

    let recommendations: Vec<String> = match fields.get("recommendations") {
        Some(Value::Array(items)) => items.iter().filter_map(text_of).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            return Err(RemoteError::Malformed(
                "recommendations must be an array".into(),
            ));
        }
    };
    if recommendations.is_empty() {
        return Err(RemoteError::MissingField("recommendations"));
    }

    Ok(RemoteFindings {
        level,
        probability,
        elevation: fields.get("elevation").and_then(text_of),
        distance_from_water: fields.get("distanceFromWater").and_then(text_of),
        analysis,
        recommendations,
    })
}

fn required_text(fields: &Map<String, Value>, name: &'static str) -> Result<String, RemoteError> {
    fields
        .get(name)
        .and_then(text_of)
        .ok_or(RemoteError::MissingField(name))
}

/// Non-empty string, or a number rendered as text.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
