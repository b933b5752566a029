use std::fmt;

use composite_core::VariableStore;
use serde_json::Value as JsonValue;

/// Final result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResponse {
    pub status: u16,
    pub content: String,
}

impl StringResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Collects the debug trace and renders the response body.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    debug: bool,
    lines: Vec<String>,
    body: String,
}

impl ResponseBuilder {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            ..Default::default()
        }
    }

    /// No-op unless debug is enabled.
    pub fn append_debug_line(&mut self, line: impl Into<String>) {
        if self.debug {
            self.lines.push(line.into());
        }
    }

    pub fn trace(&self) -> &[String] {
        &self.lines
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Renders `template` against `variables`, or dumps every variable as one
    /// indented JSON object when there is no template.
    pub fn append_response_object(&mut self, template: Option<&JsonValue>, variables: &VariableStore) {
        let rendered = match template {
            Some(t) => render_template(t, variables),
            None => dump_variables(variables),
        };
        self.body.push_str(&rendered);
    }

    pub fn into_response(self, status: u16) -> StringResponse {
        StringResponse {
            status,
            content: self.to_string(),
        }
    }
}

impl fmt::Display for ResponseBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        f.write_str(&self.body)
    }
}

fn render_template(template: &JsonValue, variables: &VariableStore) -> String {
    let mut out = match template {
        JsonValue::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    // The quoted form goes first so `"{ids}"` becomes a bare JSON array.
    for (name, value) in variables.iter() {
        let wire = value.to_wire();
        out = out.replace(&format!("\"{{{name}}}\""), &wire);
        out = out.replace(&format!("{{{name}}}"), &wire);
    }
    out
}

fn dump_variables(variables: &VariableStore) -> String {
    let mut map = serde_json::Map::new();
    for (name, value) in variables.iter() {
        let wire = value.to_wire();
        let parsed = serde_json::from_str::<JsonValue>(&wire).unwrap_or(JsonValue::String(wire));
        map.insert(name.clone(), parsed);
    }
    let obj = JsonValue::Object(map);
    serde_json::to_string_pretty(&obj).unwrap_or_else(|_| obj.to_string())
}
