//! The per-dialect database metadata provider.

use std::collections::BTreeSet;

use regex::Regex;

use crate::errors::DialectError;
use crate::types::{LabelEntry, Parameter, SchemaColumn, TableColumn, TypeTable};

/// Database-side collaborator of the routine loader and the constants
/// synchronizer. One implementing variant per dialect, chosen once at
/// startup from the static registry.
///
/// The loader orchestration is written once against this trait; dialects
/// never duplicate it.
pub trait MetadataProvider: std::fmt::Debug {
    /// Registry tag of this dialect, e.g. `sqlite`.
    fn dialect(&self) -> &'static str;

    /// Install a stored routine from its substituted source text.
    fn install(&self, source: &str) -> Result<(), DialectError>;

    /// Drop the named routine if it is installed. Idempotent.
    fn drop_if_exists(&self, name: &str) -> Result<(), DialectError>;

    /// Parameters of an installed routine, in declaration order.
    fn introspect_parameters(&self, name: &str) -> Result<Vec<Parameter>, DialectError>;

    /// Columns of one table, in declaration order.
    fn introspect_table_columns(&self, table: &str) -> Result<Vec<TableColumn>, DialectError>;

    /// Every user table column in the schema, with declared widths.
    fn introspect_schema_columns(&self) -> Result<Vec<SchemaColumn>, DialectError>;

    /// Primary-key label rows from tables whose label column name matches
    /// `pattern`.
    fn introspect_labels(&self, pattern: &Regex) -> Result<Vec<LabelEntry>, DialectError>;

    /// Names of routines that have a database-side record. Fetched once
    /// per batch; consumed by the change fingerprint.
    fn routine_registry(&self) -> Result<BTreeSet<String>, DialectError>;

    /// True if `line` is this dialect's routine-body start marker.
    fn is_body_start(&self, line: &str) -> bool;

    /// The dialect's closed type table for wrapper generation.
    fn type_table(&self) -> &TypeTable;
}
