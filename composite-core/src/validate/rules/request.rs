use serde_json::Value as JsonValue;

use crate::types::CompositeRequest;
use crate::validate::rules::step;
use crate::validate::validator::Validator;

pub(crate) fn validate_request(v: &mut Validator, req: &CompositeRequest) {
    match &req.requests {
        None => v.push("$.requests", "is required"),
        Some(steps) if steps.is_empty() => v.push("$.requests", "must have at least one entry"),
        Some(steps) => {
            for (idx, s) in steps.iter().enumerate() {
                step::validate_step(v, s, &format!("$.requests[{idx}]"));
            }
        }
    }

    match &req.response {
        None | Some(JsonValue::String(_)) | Some(JsonValue::Object(_)) => {}
        Some(_) => v.push("$.response", "must be a string or an object"),
    }
}
