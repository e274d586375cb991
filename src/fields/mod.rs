//! @acp:module "Field Space"
//! @acp:summary "Key-addressed cell storage shared between the editor and the engine"
//! @acp:domain scoring
//! @acp:layer data
//!
//! The editor surface owns the cells. The engine only reads and writes
//! through [`FieldSpace`], never through table structure.

mod id;
mod memory;

pub use id::FieldId;
pub use memory::MemoryFields;

use crate::error::Result;

/// @acp:summary "Read/write access to report cells by stable key"
pub trait FieldSpace {
    /// Raw text of a field, `None` when the field does not exist
    fn get(&self, id: &FieldId) -> Option<&str>;

    /// Write a field, creating it when missing
    fn set(&mut self, id: &FieldId, value: String) -> Result<()>;

    /// Remove a field, returning its previous text
    fn remove(&mut self, id: &FieldId) -> Option<String>;

    fn contains(&self, id: &FieldId) -> bool {
        self.get(id).is_some()
    }

    /// Trimmed text, `None` for missing or blank fields
    fn text(&self, id: &FieldId) -> Option<&str> {
        self.get(id).map(str::trim).filter(|s| !s.is_empty())
    }
}
