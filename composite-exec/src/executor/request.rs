use std::collections::BTreeMap;

use composite_core::{json_to_text, render, ApiRequest, VariableStore};
use serde_json::Value as JsonValue;

use crate::executor::context::RunContext;
use crate::executor::http::HttpRequestParts;
use crate::executor::result::StepError;

/// The step's static parameters rendered once against the variables. Used as
/// the second lookup scope after the variables themselves.
pub(crate) fn parameter_scope(step: &ApiRequest, variables: &VariableStore) -> BTreeMap<String, String> {
    step.parameters()
        .map(|(k, v)| {
            let rendered = match v {
                JsonValue::String(s) => render(s, &[variables]),
                other => json_to_text(other),
            };
            (k.clone(), rendered)
        })
        .collect()
}

pub(crate) fn build_request(
    index: usize,
    step: &ApiRequest,
    ctx: &RunContext,
    params: &BTreeMap<String, String>,
) -> Result<HttpRequestParts, StepError> {
    let vars = &ctx.variables;
    let method = render(step.method.as_deref().unwrap_or_default(), &[vars, params])
        .trim()
        .to_ascii_uppercase();
    let endpoint = render(step.endpoint.as_deref().unwrap_or_default(), &[vars, params]);
    let url = url::Url::parse(endpoint.trim()).map_err(|e| StepError::Unhandled {
        index,
        message: format!("invalid URL '{endpoint}': {e}"),
    })?;

    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    if let Some(auth) = &ctx.authorization {
        headers.insert("Authorization".to_string(), auth.header_value());
    }

    let body = if step.has_parameters() {
        let mut obj = serde_json::Map::new();
        for (k, v) in step.parameters() {
            let value = match v {
                JsonValue::String(s) => JsonValue::String(render(s, &[vars, params])),
                other => other.clone(),
            };
            obj.insert(k.clone(), value);
        }
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        serde_json::to_vec(&JsonValue::Object(obj)).map_err(|e| StepError::Unhandled {
            index,
            message: format!("failed to serialize request body: {e}"),
        })?
    } else {
        Vec::new()
    };

    Ok(HttpRequestParts {
        method,
        url,
        headers,
        body,
    })
}
