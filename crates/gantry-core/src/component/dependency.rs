use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::component::{downcast_ref, Component, ComponentRef, Key};
use crate::lifecycle::error::LifecycleError;

/// A dependency declaration as written by the caller.
///
/// `List` names keys whose local field name equals the container key; it is
/// shorthand for the identity `Map`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySpec {
    /// Keys injected under their own names
    List(Vec<Key>),
    /// Local field name -> container key
    Map(BTreeMap<String, Key>),
}

impl DependencySpec {
    /// Build a list-style declaration
    pub fn list<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        DependencySpec::List(keys.into_iter().map(Into::into).collect())
    }

    /// Build a map-style declaration from `(field, key)` pairs
    pub fn map<I, F, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (F, K)>,
        F: Into<String>,
        K: Into<Key>,
    {
        DependencySpec::Map(
            entries
                .into_iter()
                .map(|(field, key)| (field.into(), key.into()))
                .collect(),
        )
    }

    /// Expand into `(field, key)` pairs
    pub fn entries(&self) -> Vec<(String, Key)> {
        match self {
            DependencySpec::List(keys) => keys
                .iter()
                .map(|key| (key.as_str().to_string(), key.clone()))
                .collect(),
            DependencySpec::Map(map) => map
                .iter()
                .map(|(field, key)| (field.clone(), key.clone()))
                .collect(),
        }
    }
}

impl From<Vec<Key>> for DependencySpec {
    fn from(keys: Vec<Key>) -> Self {
        DependencySpec::List(keys)
    }
}

impl From<BTreeMap<String, Key>> for DependencySpec {
    fn from(map: BTreeMap<String, Key>) -> Self {
        DependencySpec::Map(map)
    }
}

impl TryFrom<&Value> for DependencySpec {
    type Error = LifecycleError;

    /// Accepts an array of key names or an object of field -> key name.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let invalid = || LifecycleError::InvalidDependencySpec {
            spec: value.to_string(),
        };
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(Key::from).ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()
                .map(DependencySpec::List),
            Value::Object(entries) => entries
                .iter()
                .map(|(field, key)| {
                    key.as_str()
                        .map(|key| (field.clone(), Key::from(key)))
                        .ok_or_else(invalid)
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(DependencySpec::Map),
            _ => Err(invalid()),
        }
    }
}

/// The accumulated dependency declaration of one component.
///
/// Merging is additive: re-declaring a field overwrites that entry only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    entries: BTreeMap<String, Key>,
}

impl Declaration {
    /// Create an empty declaration
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a spec into this declaration
    pub fn merge(&mut self, spec: &DependencySpec) {
        for (field, key) in spec.entries() {
            self.entries.insert(field, key);
        }
    }

    /// Get the key bound to a local field
    pub fn get(&self, field: &str) -> Option<&Key> {
        self.entries.get(field)
    }

    /// Iterate `(field, key)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Key)> {
        self.entries.iter()
    }

    /// Iterate the keys this component depends on
    pub fn targets(&self) -> impl Iterator<Item = &Key> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&DependencySpec> for Declaration {
    fn from(spec: &DependencySpec) -> Self {
        let mut declaration = Declaration::new();
        declaration.merge(spec);
        declaration
    }
}

/// Dependencies resolved from the system and injected before an operation.
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    values: BTreeMap<String, ComponentRef>,
}

impl Dependencies {
    /// Create an empty set of dependencies
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a field to a resolved component, replacing any previous binding
    pub fn insert(&mut self, field: impl Into<String>, component: ComponentRef) {
        self.values.insert(field.into(), component);
    }

    /// Get the injected component for a field, downcast to its concrete type
    pub fn get<T: Component>(&self, field: &str) -> Option<&T> {
        self.values
            .get(field)
            .and_then(|component| downcast_ref::<T>(component.as_ref()))
    }

    /// Get the raw component handle for a field
    pub fn component(&self, field: &str) -> Option<&ComponentRef> {
        self.values.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Field names in order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ComponentRef)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Dependencies {
    /// Identity comparison: the same fields bound to the same component values.
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|((f1, c1), (f2, c2))| f1 == f2 && Arc::ptr_eq(c1, c2))
    }
}
