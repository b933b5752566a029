use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnSpec {
    pub variable: String,
    pub expression: String,
}

/// `returns` map of a step. Serialized as a plain object, but unlike a
/// `BTreeMap` it keeps the order the entries were declared in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Returns(Vec<ReturnSpec>);

impl Returns {
    pub fn push(&mut self, variable: impl Into<String>, expression: impl Into<String>) {
        let variable = variable.into();
        let expression = expression.into();
        // A repeated key overrides the earlier expression but keeps its position.
        if let Some(existing) = self.0.iter_mut().find(|r| r.variable == variable) {
            existing.expression = expression;
        } else {
            self.0.push(ReturnSpec {
                variable,
                expression,
            });
        }
    }

    pub fn as_slice(&self) -> &[ReturnSpec] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Returns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for r in &self.0 {
            map.serialize_entry(&r.variable, &r.expression)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Returns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReturnsVisitor;

        impl<'de> Visitor<'de> for ReturnsVisitor {
            type Value = Returns;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of variable names to JSONPath expressions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Returns, A::Error> {
                let mut out = Returns::default();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    out.push(k, v);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(ReturnsVisitor)
    }
}
