//! Per-dialect type classification for wrapper generation.
//!
//! A closed table over an explicitly enumerated DB-type set. Unknown types
//! are rejected at lookup, never defaulted; duplicate entries are rejected
//! at construction.

use rustc_hash::FxHashMap;

use crate::errors::CodegenError;

/// Format-placeholder class of a database type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    /// Emitted as a bare placeholder in call strings.
    Numeric,
    /// Emitted as a quoted placeholder: text, binary, and temporal types.
    Text,
}

/// Classification of one database type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeEntry {
    pub class: TypeClass,
    /// Whether the type is a large object needing special materialization.
    pub lob: bool,
}

/// The closed type set of one dialect.
#[derive(Debug, Clone)]
pub struct TypeTable {
    dialect: &'static str,
    entries: FxHashMap<&'static str, TypeEntry>,
}

impl TypeTable {
    /// Build a table from `(type, class, is_lob)` rows.
    /// Duplicate type names fail construction.
    pub fn from_entries(
        dialect: &'static str,
        rows: &[(&'static str, TypeClass, bool)],
    ) -> Result<Self, CodegenError> {
        let mut entries = FxHashMap::default();
        for &(name, class, lob) in rows {
            if entries.insert(name, TypeEntry { class, lob }).is_some() {
                return Err(CodegenError::DuplicateTypeEntry {
                    data_type: name.to_string(),
                });
            }
        }
        Ok(Self { dialect, entries })
    }

    pub fn dialect(&self) -> &'static str {
        self.dialect
    }

    /// Classify a raw database type. Declared types vary in case, so the
    /// lookup lowercases.
    pub fn entry(&self, data_type: &str) -> Result<TypeEntry, CodegenError> {
        let key = data_type.to_lowercase();
        self.entries
            .get(key.as_str())
            .copied()
            .ok_or_else(|| CodegenError::UnknownType {
                dialect: self.dialect,
                data_type: data_type.to_string(),
            })
    }
}
