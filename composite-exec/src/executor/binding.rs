use composite_core::{ApiRequest, VariableStore, VariableValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// No match; any existing binding is left alone.
    Skipped,
    Bound,
    Appended,
    BoundList(usize),
}

/// Whether a single match is appended to an existing binding rather than
/// replacing it. Keyed on the *current* step having a `foreach`, not on how
/// the target variable was produced.
pub fn appends_to_existing(step: &ApiRequest, existing: Option<&VariableValue>) -> bool {
    existing.is_some() && step.foreach_variable().is_some()
}

/// Binds the matches of one `returns` entry: one match binds a scalar (or
/// appends, see [`appends_to_existing`]), several bind a list.
pub fn bind_matches(
    variables: &mut VariableStore,
    step: &ApiRequest,
    name: &str,
    mut matches: Vec<String>,
) -> BindOutcome {
    match matches.len() {
        0 => BindOutcome::Skipped,
        1 => {
            let item = matches.remove(0);
            if appends_to_existing(step, variables.get(name)) {
                if let Some(existing) = variables.remove(name) {
                    variables.bind(name, existing.appended(item));
                    return BindOutcome::Appended;
                }
            }
            variables.bind(name, VariableValue::Scalar(item));
            BindOutcome::Bound
        }
        n => {
            variables.bind(name, VariableValue::List(matches));
            BindOutcome::BoundList(n)
        }
    }
}
