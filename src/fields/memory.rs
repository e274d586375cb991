//! @acp:module "In-Memory Field Space"
//! @acp:summary "BTreeMap-backed field space with JSON persistence"
//! @acp:domain scoring
//! @acp:layer data

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{FieldId, FieldSpace};
use crate::error::Result;

/// @acp:summary "Flat key -> text map of report cells"
/// Unknown keys (course name, instructor notes, ...) are kept untouched so a
/// snapshot round-trips through the engine without losing editor data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryFields {
    values: BTreeMap<String, String>,
}

impl MemoryFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// @acp:summary "Load a field space snapshot from JSON"
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Write the snapshot as pretty JSON"
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Builder-style insert, mostly for fixtures
    pub fn with(mut self, id: FieldId, value: impl Into<String>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&mut self, id: FieldId, value: impl Into<String>) {
        self.values.insert(id.to_string(), value.into());
    }

    /// Insert by raw key, including keys the engine does not know
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Only the fields written by the engine
    pub fn derived(&self) -> MemoryFields {
        let values = self
            .values
            .iter()
            .filter(|(k, _)| {
                k.parse::<FieldId>()
                    .map(|id| id.is_derived())
                    .unwrap_or(false)
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        MemoryFields { values }
    }
}

impl FieldSpace for MemoryFields {
    fn get(&self, id: &FieldId) -> Option<&str> {
        self.values.get(&id.to_string()).map(String::as_str)
    }

    fn set(&mut self, id: &FieldId, value: String) -> Result<()> {
        self.values.insert(id.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, id: &FieldId) -> Option<String> {
        self.values.remove(&id.to_string())
    }
}
