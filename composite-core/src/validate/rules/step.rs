use crate::types::ApiRequest;
use crate::validate::rules::common::{is_templated, validate_required, validate_variable_name};
use crate::validate::validator::{Validator, METHOD_RE};

pub(crate) fn validate_step(v: &mut Validator, step: &ApiRequest, path: &str) {
    let method_path = format!("{path}.method");
    if let Some(method) = validate_required(v, &method_path, step.method.as_deref()) {
        if !is_templated(method) && !METHOD_RE.is_match(method) {
            v.push(method_path, "must be an HTTP method token");
        }
    }

    let endpoint_path = format!("{path}.endpoint");
    if let Some(endpoint) = validate_required(v, &endpoint_path, step.endpoint.as_deref()) {
        // A leading token may supply the scheme and host at runtime.
        if !endpoint.starts_with('{') && !endpoint.contains("://") {
            v.push(endpoint_path, "must be an absolute URL");
        }
    }

    if let Some(name) = step.foreach_variable() {
        validate_variable_name(v, &format!("{path}.foreach"), name);
    }

    for r in step.returns() {
        let rpath = format!("{path}.returns.{}", r.variable);
        validate_variable_name(v, &rpath, &r.variable);
        if r.expression.trim().is_empty() {
            v.push(rpath, "expression must not be empty");
        }
    }
}
