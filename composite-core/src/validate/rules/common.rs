use crate::expressions::{is_token_name, placeholders};
use crate::validate::validator::Validator;

pub(crate) fn validate_variable_name(v: &mut Validator, path: &str, name: &str) {
    if !is_token_name(name) {
        v.push(path, "variable name must match regex ^[A-Za-z0-9_.\\-]+$");
    }
}

pub(crate) fn validate_required<'a>(
    v: &mut Validator,
    path: &str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => Some(s),
        _ => {
            v.push(path, "is required");
            None
        }
    }
}

pub(crate) fn is_templated(s: &str) -> bool {
    !placeholders(s).is_empty()
}
