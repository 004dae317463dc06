//! Binding context
//!
//! Placeholders resolve by name against a caller-supplied context. The
//! trait keeps the engine decoupled from where values actually come from;
//! `Bindings` is the plain map-backed implementation used by most callers.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named-value lookup consumed by the resolution phase.
pub trait Context {
    /// Look up a binding by name. `None` means the name is unknown, which
    /// the caller reports as a resolution error.
    fn lookup(&self, name: &str) -> Option<Value>;
}

impl<C: Context + ?Sized> Context for &C {
    fn lookup(&self, name: &str) -> Option<Value> {
        (**self).lookup(name)
    }
}

impl Context for HashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Map-backed binding set with a builder-style API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    values: HashMap<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, consuming and returning the set.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Context for Bindings {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}

impl From<HashMap<String, Value>> for Bindings {
    fn from(values: HashMap<String, Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, Value)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

// JSON objects are a common source of bindings; non-scalar members follow
// the `Value` bridge rules.
impl From<serde_json::Map<String, serde_json::Value>> for Bindings {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect()
    }
}
