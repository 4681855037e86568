//! Per-routine wrapper rendering.
//!
//! Each routine becomes one `pub fn` that builds its SQL command string
//! and dispatches to a runtime entry in the fixed `support` prelude. The
//! command verb follows the routine kind: `call` for procedures, `select`
//! for functions. Numeric parameters are formatted bare, text parameters
//! quoted and escaped, and large objects bound positionally so their
//! bytes never pass through the command string.

use strata_core::errors::CodegenError;
use strata_core::types::{RoutineKind, RoutineMetadata, TypeClass, TypeTable};

/// Fixed prelude of the generated module: the row alias and the runtime
/// entries the per-routine functions dispatch to. Entries a given project
/// does not use are tolerated by the `dead_code` allowance.
pub const MODULE_HEADER: &str = r##"//! Stored routine wrappers. Generated; do not edit by hand.

#![allow(dead_code)]

use std::collections::BTreeMap;

use rusqlite::types::Value;
use rusqlite::{Connection, Error, Result, ToSql};

/// One result row, keyed by column name.
pub type Row = BTreeMap<String, Value>;

mod support {
    use super::*;

    /// Doubles single quotes for embedding text in a quoted literal.
    pub fn escape(text: &str) -> String {
        text.replace('\'', "''")
    }

    fn key_text(value: Option<&Value>) -> String {
        match value {
            Some(Value::Integer(value)) => value.to_string(),
            Some(Value::Real(value)) => value.to_string(),
            Some(Value::Text(value)) => value.clone(),
            _ => String::new(),
        }
    }

    fn rows(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>> {
        let mut stmt = conn.prepare(sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut result = Vec::new();
        let mut raw = stmt.query(params)?;
        while let Some(row) = raw.next()? {
            let mut map = Row::new();
            for (index, name) in names.iter().enumerate() {
                map.insert(name.clone(), row.get::<_, Value>(index)?);
            }
            result.push(map);
        }
        Ok(result)
    }

    pub fn execute_none(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        conn.execute(sql, params)
    }

    pub fn execute_function(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Value> {
        execute_singleton1(conn, sql, params)
    }

    pub fn execute_row0(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Option<Row>> {
        let mut result = rows(conn, sql, params)?;
        match result.len() {
            0 => Ok(None),
            1 => Ok(Some(result.remove(0))),
            found => Err(Error::StatementChangedRows(found)),
        }
    }

    pub fn execute_row1(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Row> {
        let mut result = rows(conn, sql, params)?;
        match result.len() {
            0 => Err(Error::QueryReturnedNoRows),
            1 => Ok(result.remove(0)),
            found => Err(Error::StatementChangedRows(found)),
        }
    }

    pub fn execute_rows(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>> {
        rows(conn, sql, params)
    }

    pub fn execute_rows_with_key(
        conn: &Connection,
        sql: &str,
        params: &[&dyn ToSql],
        key_columns: &[&str],
    ) -> Result<BTreeMap<Vec<String>, Row>> {
        let mut keyed = BTreeMap::new();
        for row in rows(conn, sql, params)? {
            let key: Vec<String> = key_columns
                .iter()
                .map(|column| key_text(row.get(*column)))
                .collect();
            keyed.insert(key, row);
        }
        Ok(keyed)
    }

    pub fn execute_rows_with_index(
        conn: &Connection,
        sql: &str,
        params: &[&dyn ToSql],
        key_columns: &[&str],
    ) -> Result<BTreeMap<Vec<String>, Vec<Row>>> {
        let mut indexed: BTreeMap<Vec<String>, Vec<Row>> = BTreeMap::new();
        for row in rows(conn, sql, params)? {
            let key: Vec<String> = key_columns
                .iter()
                .map(|column| key_text(row.get(*column)))
                .collect();
            indexed.entry(key).or_default().push(row);
        }
        Ok(indexed)
    }

    pub fn execute_singleton0(
        conn: &Connection,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Option<Value>> {
        let mut stmt = conn.prepare(sql)?;
        let mut raw = stmt.query(params)?;
        let value = match raw.next()? {
            Some(row) => Some(row.get::<_, Value>(0)?),
            None => None,
        };
        let mut found = usize::from(value.is_some());
        while raw.next()?.is_some() {
            found += 1;
        }
        if found > 1 {
            return Err(Error::StatementChangedRows(found));
        }
        Ok(value)
    }

    pub fn execute_singleton1(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Value> {
        match execute_singleton0(conn, sql, params)? {
            Some(value) => Ok(value),
            None => Err(Error::QueryReturnedNoRows),
        }
    }

    pub fn execute_table(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>> {
        rows(conn, sql, params)
    }

    pub fn execute_log(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        let result = rows(conn, sql, params)?;
        for row in &result {
            println!("{row:?}");
        }
        Ok(result.len())
    }

    pub fn execute_bulk_insert(
        conn: &Connection,
        sql: &str,
        fields: &[&str],
        rows: &[Row],
    ) -> Result<usize> {
        const NULL: &Value = &Value::Null;
        let mut stmt = conn.prepare(sql)?;
        let mut total = 0;
        for row in rows {
            let params: Vec<&dyn ToSql> = fields
                .iter()
                .map(|field| {
                    row.get(*field)
                        .map_or(NULL as &dyn ToSql, |value| value as &dyn ToSql)
                })
                .collect();
            total += stmt.execute(params.as_slice())?;
        }
        Ok(total)
    }
}
"##;

/// How one designation maps onto the runtime prelude.
struct EntryShape {
    function: &'static str,
    return_type: &'static str,
    /// Whether the entry takes the key or index columns as an extra slice.
    keyed: bool,
}

fn entry_shape(tag: &str) -> Result<EntryShape, CodegenError> {
    let shape = match tag {
        "procedure" | "none" => EntryShape {
            function: "execute_none",
            return_type: "usize",
            keyed: false,
        },
        "function" => EntryShape {
            function: "execute_function",
            return_type: "Value",
            keyed: false,
        },
        "row0" => EntryShape {
            function: "execute_row0",
            return_type: "Option<Row>",
            keyed: false,
        },
        "row1" => EntryShape {
            function: "execute_row1",
            return_type: "Row",
            keyed: false,
        },
        "rows" => EntryShape {
            function: "execute_rows",
            return_type: "Vec<Row>",
            keyed: false,
        },
        "rows_with_key" => EntryShape {
            function: "execute_rows_with_key",
            return_type: "BTreeMap<Vec<String>, Row>",
            keyed: true,
        },
        "rows_with_index" => EntryShape {
            function: "execute_rows_with_index",
            return_type: "BTreeMap<Vec<String>, Vec<Row>>",
            keyed: true,
        },
        "singleton0" => EntryShape {
            function: "execute_singleton0",
            return_type: "Option<Value>",
            keyed: false,
        },
        "singleton1" => EntryShape {
            function: "execute_singleton1",
            return_type: "Value",
            keyed: false,
        },
        "table" => EntryShape {
            function: "execute_table",
            return_type: "Vec<Row>",
            keyed: false,
        },
        "log" => EntryShape {
            function: "execute_log",
            return_type: "usize",
            keyed: false,
        },
        other => {
            return Err(CodegenError::UnknownDesignation {
                tag: other.to_string(),
            })
        }
    };
    Ok(shape)
}

/// One parameter's contribution to the wrapper signature and command.
struct RenderedParameter {
    declaration: String,
    placeholder: String,
    format_arg: Option<String>,
    bind: Option<String>,
}

fn render_parameters(
    metadata: &RoutineMetadata,
    types: &TypeTable,
    lob_as_string: bool,
) -> Result<Vec<RenderedParameter>, CodegenError> {
    let mut rendered = Vec::with_capacity(metadata.parameters.len());
    let mut lob_ordinal = 0;
    for parameter in &metadata.parameters {
        let entry = types.entry(&parameter.data_type)?;
        let parameter_name = parameter.name.as_str();
        let rendered_parameter = if entry.lob && !lob_as_string {
            lob_ordinal += 1;
            RenderedParameter {
                declaration: format!("{parameter_name}: &[u8]"),
                placeholder: format!("?{lob_ordinal}"),
                format_arg: None,
                bind: Some(format!("&{parameter_name}")),
            }
        } else {
            match entry.class {
                TypeClass::Numeric => RenderedParameter {
                    declaration: format!("{parameter_name}: i64"),
                    placeholder: "{}".to_string(),
                    format_arg: Some(parameter_name.to_string()),
                    bind: None,
                },
                TypeClass::Text => RenderedParameter {
                    declaration: format!("{parameter_name}: &str"),
                    placeholder: "'{}'".to_string(),
                    format_arg: Some(format!("support::escape({parameter_name})")),
                    bind: None,
                },
            }
        };
        rendered.push(rendered_parameter);
    }
    Ok(rendered)
}

fn render_bulk_insert(metadata: &RoutineMetadata) -> Result<String, CodegenError> {
    let incomplete = |detail| CodegenError::IncompleteMetadata {
        routine: metadata.routine_name.clone(),
        detail,
    };
    let table = metadata
        .table_name
        .as_deref()
        .ok_or_else(|| incomplete("the bulk-insert table"))?;
    let fields = metadata
        .fields
        .as_deref()
        .ok_or_else(|| incomplete("the bulk-insert fields"))?;

    let columns = fields.join(", ");
    let values: Vec<String> = (1..=fields.len()).map(|n| format!("?{n}")).collect();
    let keys: Vec<String> = fields.iter().map(|field| format!("\"{field}\"")).collect();

    let mut out = String::new();
    out.push_str(&format!(
        "/// Bulk inserts rows into `{table}` for `{}`.\n",
        metadata.routine_name
    ));
    out.push_str(&format!(
        "pub fn {}(conn: &Connection, rows: &[Row]) -> Result<usize> {{\n",
        metadata.routine_name
    ));
    out.push_str(&format!(
        "    let sql = \"insert into {table}({columns}) values({})\";\n",
        values.join(", ")
    ));
    out.push_str(&format!(
        "    support::execute_bulk_insert(conn, sql, &[{}], rows)\n",
        keys.join(", ")
    ));
    out.push_str("}\n");
    Ok(out)
}

/// Renders the wrapper function of one routine.
pub fn render_routine(
    metadata: &RoutineMetadata,
    types: &TypeTable,
    lob_as_string: bool,
) -> Result<String, CodegenError> {
    if metadata.designation.is_bulk_insert() {
        return render_bulk_insert(metadata);
    }

    let shape = entry_shape(metadata.designation.tag())?;
    let rendered = render_parameters(metadata, types, lob_as_string)?;

    let verb = match metadata.kind {
        RoutineKind::Procedure => "call",
        RoutineKind::Function => "select",
    };
    let placeholders: Vec<&str> = rendered
        .iter()
        .map(|parameter| parameter.placeholder.as_str())
        .collect();
    let command = format!("{verb} {}({})", metadata.routine_name, placeholders.join(", "));

    let format_args: Vec<&str> = rendered
        .iter()
        .filter_map(|parameter| parameter.format_arg.as_deref())
        .collect();
    let binds: Vec<&str> = rendered
        .iter()
        .filter_map(|parameter| parameter.bind.as_deref())
        .collect();

    let mut arguments = vec!["conn: &Connection".to_string()];
    arguments.extend(
        rendered
            .iter()
            .map(|parameter| parameter.declaration.clone()),
    );

    let key_columns = if shape.keyed {
        let columns = metadata
            .columns
            .as_deref()
            .ok_or_else(|| CodegenError::IncompleteMetadata {
                routine: metadata.routine_name.clone(),
                detail: "the key columns",
            })?;
        let quoted: Vec<String> = columns
            .iter()
            .map(|column| format!("\"{column}\""))
            .collect();
        format!(", &[{}]", quoted.join(", "))
    } else {
        String::new()
    };

    let mut out = String::new();
    out.push_str(&format!(
        "/// Calls stored {} `{}`.\n",
        metadata.kind, metadata.routine_name
    ));
    out.push_str(&format!(
        "pub fn {}({}) -> Result<{}> {{\n",
        metadata.routine_name,
        arguments.join(", "),
        shape.return_type
    ));

    let command_expr = if format_args.is_empty() {
        out.push_str(&format!("    let sql = \"{command}\";\n"));
        "sql"
    } else {
        out.push_str(&format!(
            "    let sql = format!(\"{command}\", {});\n",
            format_args.join(", ")
        ));
        "&sql"
    };

    let params = if binds.is_empty() {
        "&[]".to_string()
    } else {
        format!("&[{}]", binds.join(", "))
    };
    out.push_str(&format!(
        "    support::{}(conn, {command_expr}, {params}{key_columns})\n",
        shape.function
    ));
    out.push_str("}\n");
    Ok(out)
}
