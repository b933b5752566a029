use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::expressions::Scope;
use crate::variables::VariableValue;

/// Variables bound during one orchestration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    vars: BTreeMap<String, VariableValue>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.vars.get(name)
    }

    /// Binds `name`, returning the previous value.
    pub fn bind(&mut self, name: impl Into<String>, value: VariableValue) -> Option<VariableValue> {
        self.vars.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<VariableValue> {
        self.vars.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariableValue)> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Scope for VariableStore {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.vars.get(name).map(|v| match v {
            VariableValue::Scalar(s) => Cow::Borrowed(s.as_str()),
            list => Cow::Owned(list.to_wire()),
        })
    }
}

impl FromIterator<(String, VariableValue)> for VariableStore {
    fn from_iter<I: IntoIterator<Item = (String, VariableValue)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}
