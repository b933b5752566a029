use std::fmt;

use serde_json::Value as JsonValue;

/// A bound variable. Lists keep the `["a", "b"]` wire shape when rendered, but
/// are never sniffed back out of strings at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    Scalar(String),
    List(Vec<String>),
}

impl VariableValue {
    pub fn scalar(s: impl Into<String>) -> Self {
        VariableValue::Scalar(s.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        VariableValue::List(items.into_iter().map(Into::into).collect())
    }

    /// The string form substituted into templates and response bodies.
    pub fn to_wire(&self) -> String {
        match self {
            VariableValue::Scalar(s) => s.clone(),
            VariableValue::List(items) => encode_list(items),
        }
    }

    /// Elements iterated by `foreach`. A scalar holding JSON array text yields
    /// its elements; any other scalar is a one-element sequence.
    pub fn elements(&self) -> Vec<String> {
        match self {
            VariableValue::List(items) => items.clone(),
            VariableValue::Scalar(s) => decode_list(s).unwrap_or_else(|| vec![s.clone()]),
        }
    }

    /// Appends `item`, promoting a scalar to a list.
    pub fn appended(self, item: String) -> Self {
        match self {
            VariableValue::List(mut items) => {
                items.push(item);
                VariableValue::List(items)
            }
            VariableValue::Scalar(s) => match decode_list(&s) {
                Some(mut items) => {
                    items.push(item);
                    VariableValue::List(items)
                }
                None => VariableValue::List(vec![s, item]),
            },
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

/// `["a", "b"]`: each element JSON-string-escaped, joined with `, `.
pub fn encode_list(items: &[String]) -> String {
    let inner = items
        .iter()
        .map(|s| JsonValue::String(s.clone()).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{inner}]")
}

/// Parses JSON array text into element strings. Non-string elements use
/// [`json_to_text`], so `[1, 2]` decodes as `["1", "2"]`.
pub fn decode_list(s: &str) -> Option<Vec<String>> {
    let trimmed = s.trim();
    if !trimmed.starts_with('[') {
        return None;
    }
    match serde_json::from_str::<JsonValue>(trimmed).ok()? {
        JsonValue::Array(items) => Some(items.iter().map(json_to_text).collect()),
        _ => None,
    }
}

/// String representation of a JSON node: strings unquoted, everything else as
/// compact JSON text.
pub fn json_to_text(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
