//! Plain-text registry of width-based constants.
//!
//! Each non-blank line describes one column: `table column width [symbol]`.
//! Three-field lines have no symbol assigned yet and receive a derived one
//! on the next synchronization. The file is the durable record that lets
//! hand-picked symbols survive schema changes.

use strata_core::errors::CodegenError;
use strata_core::types::ConstantEntry;

/// One parsed registry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryColumn {
    pub table: String,
    pub column: String,
    pub width: i64,
    pub symbol: Option<String>,
}

/// Parses the registry text. Blank lines separate tables and are ignored.
pub fn parse_registry(text: &str) -> Result<Vec<RegistryColumn>, CodegenError> {
    let mut columns = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let malformed = || CodegenError::MalformedRegistryLine {
            line: index + 1,
            content: line.to_string(),
        };
        let (table, column, width, symbol) = match fields.as_slice() {
            [table, column, width] => (table, column, width, None),
            [table, column, width, symbol] => (table, column, width, Some(symbol.to_string())),
            _ => return Err(malformed()),
        };
        let width: i64 = width.parse().map_err(|_| malformed())?;
        columns.push(RegistryColumn {
            table: table.to_string(),
            column: column.to_string(),
            width,
            symbol,
        });
    }
    Ok(columns)
}

/// Renders width entries back into registry text: columns aligned, one
/// blank line between tables. Entries must already be sorted by table.
pub fn render_registry(entries: &[ConstantEntry]) -> String {
    let table_width = entries.iter().map(|e| e.table.len()).max().unwrap_or(0);
    let column_width = entries.iter().map(|e| e.column.len()).max().unwrap_or(0);
    let value_width = entries
        .iter()
        .map(|e| e.value.to_string().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let mut last_table: Option<&str> = None;
    for entry in entries {
        if last_table.is_some_and(|table| table != entry.table) {
            out.push('\n');
        }
        out.push_str(&format!(
            "{:<table_width$} {:<column_width$} {:>value_width$} {}\n",
            entry.table, entry.column, entry.value, entry.symbol,
        ));
        last_table = Some(&entry.table);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_and_four_field_lines() {
        let text = "users usr_name 80\n\norders ord_code 10 CODE_WIDTH\n";
        let columns = parse_registry(text).unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].table, "users");
        assert_eq!(columns[0].width, 80);
        assert_eq!(columns[0].symbol, None);
        assert_eq!(columns[1].symbol.as_deref(), Some("CODE_WIDTH"));
    }

    #[test]
    fn rejects_malformed_lines() {
        let err = parse_registry("users usr_name\n").unwrap_err();
        assert!(matches!(
            err,
            CodegenError::MalformedRegistryLine { line: 1, .. }
        ));

        let err = parse_registry("users usr_name eighty\n").unwrap_err();
        assert!(matches!(err, CodegenError::MalformedRegistryLine { .. }));
    }

    #[test]
    fn renders_aligned_and_grouped_by_table() {
        let entries = vec![
            ConstantEntry {
                table: "orders".to_string(),
                column: "ord_code".to_string(),
                value: 10,
                symbol: "ORD_CODE".to_string(),
            },
            ConstantEntry {
                table: "users".to_string(),
                column: "usr_name".to_string(),
                value: 80,
                symbol: "USR_NAME".to_string(),
            },
        ];
        let text = render_registry(&entries);
        assert_eq!(text, "orders ord_code 10 ORD_CODE\n\nusers  usr_name 80 USR_NAME\n");
        let reparsed = parse_registry(&text).unwrap();
        assert_eq!(reparsed.len(), 2);
        assert_eq!(reparsed[1].symbol.as_deref(), Some("USR_NAME"));
    }
}
