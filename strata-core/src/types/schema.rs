//! Schema introspection records and constants entries.

/// One column of a single table, as returned by
/// `MetadataProvider::introspect_table_columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: String,
    /// Declared type as the database reports it, e.g. `VARCHAR(40)`.
    pub declared_type: String,
}

/// One column of the whole schema, as returned by
/// `MetadataProvider::introspect_schema_columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    pub table: String,
    pub column: String,
    pub declared_type: String,
    /// Declared width, when the type carries one.
    pub width: Option<i64>,
}

/// One primary-key label row: the label text becomes the constant symbol,
/// the key value becomes the constant value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    pub table: String,
    pub column: String,
    pub symbol: String,
    pub value: i64,
}

/// One named integer constant in the generated constants module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantEntry {
    pub table: String,
    pub column: String,
    /// Column width or database ID.
    pub value: i64,
    pub symbol: String,
}
