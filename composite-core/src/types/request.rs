use serde_json::Value as JsonValue;

use crate::types::ApiRequest;

/// One inbound composite call: an ordered chain of outbound requests plus an
/// optional response template.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<Vec<ApiRequest>>,

    /// Either a string or a JSON object; rendered against the final variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub debug: bool,
}

impl CompositeRequest {
    pub fn steps(&self) -> &[ApiRequest] {
        self.requests.as_deref().unwrap_or_default()
    }

    pub fn has_steps(&self) -> bool {
        !self.steps().is_empty()
    }
}
