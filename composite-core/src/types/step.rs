use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::types::Returns;

/// A single outbound call in a composite request.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ApiRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// URL template, e.g. `https://svc/items/{newId}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Name of a variable whose bound list drives one call per element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreach: Option<String>,

    /// Static body fields; string values may contain `{var}` tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, JsonValue>>,

    /// Variable name -> JSONPath expression template, kept in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<Returns>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.parameters
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_return(mut self, variable: impl Into<String>, expression: impl Into<String>) -> Self {
        self.returns
            .get_or_insert_with(Returns::default)
            .push(variable, expression);
        self
    }

    pub fn with_foreach(mut self, variable: impl Into<String>) -> Self {
        self.foreach = Some(variable.into());
        self
    }

    /// The `foreach` name, if present and not blank.
    pub fn foreach_variable(&self) -> Option<&str> {
        self.foreach
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.parameters.iter().flatten()
    }

    pub fn has_parameters(&self) -> bool {
        self.parameters.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn returns(&self) -> &[crate::types::ReturnSpec] {
        self.returns.as_ref().map(Returns::as_slice).unwrap_or_default()
    }
}
