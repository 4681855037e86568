//! Routine metadata: the durable record carried across runs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::designation::Designation;

/// Whether the routine is a stored procedure or a stored function,
/// taken from the `create procedure|function` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineKind {
    Procedure,
    Function,
}

impl RoutineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Procedure => "procedure",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared routine parameter, in database declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Raw database type, e.g. `varchar`.
    pub data_type: String,
    /// Full declared descriptor, e.g. `varchar(40)`.
    pub data_type_descriptor: String,
    /// 1-based ordinal matching the database declaration order.
    pub position: usize,
}

/// Per-routine record persisted in the metadata store.
///
/// Created at first successful load, overwritten in place on reload, and
/// carried over byte-identical when the fingerprint says nothing changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineMetadata {
    pub routine_name: String,
    pub schema_name: Option<String>,
    pub kind: RoutineKind,
    pub designation: Designation,
    /// Bulk-insert target table.
    pub table_name: Option<String>,
    /// Key or index columns declared in the annotation.
    pub columns: Option<Vec<String>>,
    pub parameters: Vec<Parameter>,
    /// Column names introspected from the bulk-insert target table.
    pub fields: Option<Vec<String>>,
    /// Bare column types introspected from the bulk-insert target table.
    pub column_types: Option<Vec<String>>,
    /// Source file modification time, unix seconds.
    pub timestamp: i64,
    /// Placeholders actually referenced by this routine, keyed by the
    /// spelling first seen in the file. Magic placeholders never appear.
    pub replace: BTreeMap<String, String>,
}
