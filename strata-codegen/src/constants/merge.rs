//! Reconciles the stored registry with the current schema.

use std::collections::BTreeMap;

use strata_core::types::{ConstantEntry, SchemaColumn};

use crate::constants::registry::RegistryColumn;

/// Symbol derived from a column position: `PREFIX_TABLE_COLUMN`, uppercased,
/// with every non-alphanumeric character flattened to an underscore.
pub fn derive_symbol(prefix: &str, table: &str, column: &str) -> String {
    let prefix = prefix.trim_end_matches('_');
    format!("{prefix}_{table}_{column}")
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Merges registry state into the current width-bearing columns.
///
/// Columns that disappeared from the schema are dropped. New columns get a
/// derived symbol. A registry symbol is kept (uppercased) only when it
/// differs from the derived one, so renaming the prefix re-derives
/// everything that was never customized.
pub fn merge_columns(
    prefix: &str,
    old: &[RegistryColumn],
    current: &[SchemaColumn],
) -> Vec<ConstantEntry> {
    let prior: BTreeMap<(&str, &str), &RegistryColumn> = old
        .iter()
        .map(|column| ((column.table.as_str(), column.column.as_str()), column))
        .collect();

    let mut entries: Vec<ConstantEntry> = current
        .iter()
        .filter_map(|column| {
            let width = column.width?;
            let derived = derive_symbol(prefix, &column.table, &column.column);
            let symbol = prior
                .get(&(column.table.as_str(), column.column.as_str()))
                .and_then(|registry| registry.symbol.as_deref())
                .map(str::to_uppercase)
                .filter(|custom| custom != "*" && *custom != derived)
                .unwrap_or(derived);
            Some(ConstantEntry {
                table: column.table.clone(),
                column: column.column.clone(),
                value: width,
                symbol,
            })
        })
        .collect();
    entries.sort_by(|a, b| (&a.table, &a.column).cmp(&(&b.table, &b.column)));
    entries
}
