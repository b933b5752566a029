use composite_core::json_to_text;
use serde_json::Value as JsonValue;
use serde_json_path::JsonPath;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid JSONPath expression '{expression}': {message}")]
    InvalidExpression { expression: String, message: String },
}

/// Roots a bare expression at the document: `id` -> `$.id`, `[0].id` -> `$[0].id`.
pub fn normalize_expression(expression: &str) -> String {
    let trimmed = expression.trim();
    if trimmed.starts_with('$') {
        trimmed.to_string()
    } else if trimmed.starts_with('[') || trimmed.starts_with('.') {
        format!("${trimmed}")
    } else {
        format!("$.{trimmed}")
    }
}

/// All nodes matching `expression`, in document order. Zero matches is not an error.
pub fn select(document: &JsonValue, expression: &str) -> Result<Vec<JsonValue>, ExtractError> {
    let normalized = normalize_expression(expression);
    let path = JsonPath::parse(&normalized).map_err(|e| ExtractError::InvalidExpression {
        expression: normalized.clone(),
        message: e.to_string(),
    })?;
    Ok(path.query(document).all().into_iter().cloned().collect())
}

/// Like [`select`], with each match turned into its string representation.
pub fn select_text(document: &JsonValue, expression: &str) -> Result<Vec<String>, ExtractError> {
    Ok(select(document, expression)?
        .iter()
        .map(json_to_text)
        .collect())
}
