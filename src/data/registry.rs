//! Live field state.
//!
//! The registry is the single source of truth for what the user has entered.
//! The render host only ever reflects it; nothing is read back from the
//! host. Entries are created once per rendered field and mutated in place on
//! every edit; a reset rebuilds the whole form, registry included.

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    data::{path::FieldPath, schema::FieldConfig},
    host::NodeId,
};

/// Live scalar tracked for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Empty in the required-field sense: only the empty string counts.
    /// Booleans are never empty, so `false` satisfies `required`.
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.is_empty())
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Registry record for one rendered field.
#[derive(Debug, Clone)]
pub struct FieldEntry {
    /// Structured position in the schema tree.
    pub path: FieldPath,
    /// Current value as last committed by a change handler.
    pub value: FieldValue,
    /// The field's validated configuration.
    pub config: FieldConfig,
    /// Wrapper element toggled by the visibility pass.
    pub wrapper: NodeId,
    /// Inline error slot written by the save pass.
    pub error: NodeId,
}

/// Mapping from flat path identifier to live field state, in registration
/// order.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    entries: IndexMap<String, FieldEntry>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the entry for its path, overwriting any earlier one.
    ///
    /// Duplicate flat paths (including distinct structured paths that
    /// flatten identically) are a schema-authoring problem; last write wins
    /// and the collision is logged.
    pub fn register(&mut self, entry: FieldEntry) {
        let key = entry.path.flat();
        if self.entries.contains_key(&key) {
            warn!("duplicate field path {key:?}, overwriting earlier entry");
        }
        self.entries.insert(key, entry);
    }

    /// Overwrite the current value for `path`. No side effects; callers
    /// trigger the visibility pass themselves.
    pub fn update(&mut self, path: &FieldPath, value: FieldValue) {
        let key = path.flat();
        match self.entries.get_mut(&key) {
            Some(entry) => entry.value = value,
            None => warn!("update for unregistered field path {key:?} dropped"),
        }
    }

    /// Look up an entry by flat path identifier.
    pub fn get(&self, flat_path: &str) -> Option<&FieldEntry> {
        self.entries.get(flat_path)
    }

    pub fn get_mut(&mut self, flat_path: &str) -> Option<&mut FieldEntry> {
        self.entries.get_mut(flat_path)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flat mapping of path identifier to current value.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.to_json()))
            .collect()
    }
}
