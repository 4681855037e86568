//! The designation: how a wrapper must invoke a routine and interpret
//! its results.

use serde::{Deserialize, Serialize};

/// Calling-convention tag parsed from the `-- type:` annotation line.
///
/// Dialects may define designations beyond the built-in set; those pass
/// through uninterpreted as [`Designation::Other`] and are not
/// argument-shape-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Designation {
    Function,
    Procedure,
    BulkInsert {
        table: String,
        columns: Vec<String>,
    },
    RowsWithKey {
        columns: Vec<String>,
    },
    RowsWithIndex {
        columns: Vec<String>,
    },
    Other {
        tag: String,
    },
}

impl Designation {
    /// The annotation tag this designation was parsed from.
    pub fn tag(&self) -> &str {
        match self {
            Self::Function => "function",
            Self::Procedure => "procedure",
            Self::BulkInsert { .. } => "bulk_insert",
            Self::RowsWithKey { .. } => "rows_with_key",
            Self::RowsWithIndex { .. } => "rows_with_index",
            Self::Other { tag } => tag,
        }
    }

    /// The key or index columns, for the designations that carry them.
    pub fn columns(&self) -> Option<&[String]> {
        match self {
            Self::BulkInsert { columns, .. }
            | Self::RowsWithKey { columns }
            | Self::RowsWithIndex { columns } => Some(columns),
            _ => None,
        }
    }

    /// The bulk-insert target table, if any.
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::BulkInsert { table, .. } => Some(table),
            _ => None,
        }
    }

    pub fn is_bulk_insert(&self) -> bool {
        matches!(self, Self::BulkInsert { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_of_builtin_and_custom() {
        assert_eq!(Designation::Procedure.tag(), "procedure");
        let other = Designation::Other {
            tag: "row1".to_string(),
        };
        assert_eq!(other.tag(), "row1");
    }

    #[test]
    fn serde_tagged_roundtrip() {
        let d = Designation::BulkInsert {
            table: "users".to_string(),
            columns: vec!["name".to_string(), "email".to_string()],
        };
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"type\":\"bulk_insert\""));
        let back: Designation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
