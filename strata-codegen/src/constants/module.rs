//! Rendering of the generated constants module.

use strata_core::errors::CodegenError;
use strata_core::types::ConstantEntry;

/// Renders all entries as `pub const` items sorted by symbol, rejecting
/// duplicate symbols before anything is written.
pub fn render_module(entries: &[ConstantEntry]) -> Result<String, CodegenError> {
    let mut sorted: Vec<&ConstantEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    for pair in sorted.windows(2) {
        if pair[0].symbol == pair[1].symbol {
            return Err(CodegenError::DuplicateSymbol {
                symbol: pair[0].symbol.clone(),
                first: format!("{}.{}", pair[0].table, pair[0].column),
                second: format!("{}.{}", pair[1].table, pair[1].column),
            });
        }
    }

    let mut out = String::new();
    out.push_str("//! Database constants. Generated; do not edit by hand.\n");
    for entry in &sorted {
        out.push('\n');
        out.push_str(&format!("/// `{}.{}`\n", entry.table, entry.column));
        out.push_str(&format!("pub const {}: i64 = {};\n", entry.symbol, entry.value));
    }
    Ok(out)
}
