//! The sqlite dialect provider.
//!
//! SQLite has no native stored-routine DDL, so `install` validates the
//! routine header, parses the declared parameter list, and upserts the
//! routine into the catalog table. Introspection of routines reads the
//! catalog back; table, schema, and label introspection run against the
//! real database objects via `pragma_table_info` and `sqlite_master`.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use strata_core::errors::DialectError;
use strata_core::traits::MetadataProvider;
use strata_core::types::{
    LabelEntry, Parameter, SchemaColumn, TableColumn, TypeClass, TypeTable,
};
use tracing::debug;

use crate::migrations::{self, CATALOG_TABLE};

/// Routine header: `create procedure|function [schema.]name(`.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)create\s+(procedure|function)\s+(?:([A-Za-z0-9_]+)\.)?([A-Za-z0-9_]+)\s*\(")
        .unwrap()
});

/// First parenthesized number of a declared type, e.g. the 40 of `varchar(40)`.
static WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d+)").unwrap());

/// The closed set of declared types this dialect understands.
///
/// SQLite stores text natively, so `text` is an ordinary string type here;
/// only `clob` and `blob` need large-object handling.
static TYPE_TABLE: LazyLock<TypeTable> = LazyLock::new(|| {
    TypeTable::from_entries(
        "sqlite",
        &[
            ("int", TypeClass::Numeric, false),
            ("integer", TypeClass::Numeric, false),
            ("tinyint", TypeClass::Numeric, false),
            ("smallint", TypeClass::Numeric, false),
            ("mediumint", TypeClass::Numeric, false),
            ("bigint", TypeClass::Numeric, false),
            ("int2", TypeClass::Numeric, false),
            ("int8", TypeClass::Numeric, false),
            ("real", TypeClass::Numeric, false),
            ("double", TypeClass::Numeric, false),
            ("float", TypeClass::Numeric, false),
            ("numeric", TypeClass::Numeric, false),
            ("decimal", TypeClass::Numeric, false),
            ("boolean", TypeClass::Numeric, false),
            ("bit", TypeClass::Numeric, false),
            ("char", TypeClass::Text, false),
            ("character", TypeClass::Text, false),
            ("varchar", TypeClass::Text, false),
            ("nchar", TypeClass::Text, false),
            ("nvarchar", TypeClass::Text, false),
            ("text", TypeClass::Text, false),
            ("date", TypeClass::Text, false),
            ("datetime", TypeClass::Text, false),
            ("time", TypeClass::Text, false),
            ("timestamp", TypeClass::Text, false),
            ("clob", TypeClass::Text, true),
            ("blob", TypeClass::Text, true),
        ],
    )
    .unwrap()
});

/// Parsed `create` header of a routine source, including its declared
/// parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InstallHeader {
    name: String,
    schema: Option<String>,
    kind: String,
    parameters: Vec<Parameter>,
}

/// `MetadataProvider` over one rusqlite connection.
#[derive(Debug)]
pub struct SqliteProvider {
    conn: Connection,
}

impl SqliteProvider {
    /// Opens (or creates) the database file and prepares the catalog.
    pub fn open(path: &Path) -> Result<Self, DialectError> {
        let conn = Connection::open(path).map_err(|e| DialectError::Connection {
            message: e.to_string(),
        })?;
        Self::from_connection(conn)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, DialectError> {
        let conn = Connection::open_in_memory().map_err(|e| DialectError::Connection {
            message: e.to_string(),
        })?;
        Self::from_connection(conn)
    }

    /// The underlying connection, for callers that need ad-hoc SQL such
    /// as test fixtures.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn from_connection(conn: Connection) -> Result<Self, DialectError> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| DialectError::Connection {
            message: e.to_string(),
        })?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Names of user tables, the catalog and sqlite internals excluded.
    fn user_tables(&self) -> Result<Vec<String>, DialectError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name <> ?1
                 ORDER BY name",
            )
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        let rows = stmt
            .query_map(params![CATALOG_TABLE], |row| row.get::<_, String>(0))
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })
    }

    fn table_info(&self, table: &str) -> Result<Vec<ColumnInfo>, DialectError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type, pk FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        let rows = stmt
            .query_map(params![table], |row| {
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    declared_type: row.get(1)?,
                    pk: row.get::<_, i64>(2)? != 0,
                })
            })
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })
    }
}

struct ColumnInfo {
    name: String,
    declared_type: String,
    pk: bool,
}

impl MetadataProvider for SqliteProvider {
    fn dialect(&self) -> &'static str {
        "sqlite"
    }

    fn install(&self, source: &str) -> Result<(), DialectError> {
        let header = parse_install_header(source)?;
        let parameters_json =
            serde_json::to_string(&header.parameters).map_err(|e| DialectError::Sqlite {
                message: format!("serialize parameters: {e}"),
            })?;
        let installed_at = unix_now();

        self.conn
            .execute(
                "INSERT OR REPLACE INTO strata_routines
                     (routine_name, schema_name, routine_kind, parameters_json, body, installed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    header.name,
                    header.schema,
                    header.kind,
                    parameters_json,
                    source,
                    installed_at,
                ],
            )
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        debug!(
            routine = %header.name,
            kind = %header.kind,
            parameters = header.parameters.len(),
            "routine installed"
        );
        Ok(())
    }

    fn drop_if_exists(&self, name: &str) -> Result<(), DialectError> {
        let dropped = self
            .conn
            .execute(
                "DELETE FROM strata_routines WHERE routine_name = ?1",
                params![name],
            )
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        if dropped > 0 {
            debug!(routine = name, "routine dropped");
        }
        Ok(())
    }

    fn introspect_parameters(&self, name: &str) -> Result<Vec<Parameter>, DialectError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT parameters_json FROM strata_routines WHERE routine_name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        let json = json.ok_or_else(|| DialectError::MissingRoutine {
            name: name.to_string(),
        })?;
        serde_json::from_str(&json).map_err(|e| DialectError::Sqlite {
            message: format!("corrupt parameter record for '{name}': {e}"),
        })
    }

    fn introspect_table_columns(&self, table: &str) -> Result<Vec<TableColumn>, DialectError> {
        let columns: Vec<TableColumn> = self
            .table_info(table)?
            .into_iter()
            .map(|column| TableColumn {
                name: column.name,
                declared_type: column.declared_type,
            })
            .collect();
        // pragma_table_info yields nothing for unknown tables.
        if columns.is_empty() {
            return Err(DialectError::MissingTable {
                table: table.to_string(),
            });
        }
        Ok(columns)
    }

    fn introspect_schema_columns(&self) -> Result<Vec<SchemaColumn>, DialectError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT m.name, p.name, p.type
                 FROM sqlite_master m, pragma_table_info(m.name) p
                 WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%' AND m.name <> ?1
                 ORDER BY m.name, p.cid",
            )
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        let rows = stmt
            .query_map(params![CATALOG_TABLE], |row| {
                let declared_type: String = row.get(2)?;
                Ok(SchemaColumn {
                    table: row.get(0)?,
                    column: row.get(1)?,
                    width: declared_width(&declared_type),
                    declared_type,
                })
            })
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })
    }

    fn introspect_labels(&self, pattern: &Regex) -> Result<Vec<LabelEntry>, DialectError> {
        let mut labels = Vec::new();
        for table in self.user_tables()? {
            let info = self.table_info(&table)?;
            if info.iter().filter(|column| column.pk).count() != 1 {
                continue;
            }
            let id_column = info
                .iter()
                .find(|column| column.pk && is_integer_type(&column.declared_type));
            let label_column = info
                .iter()
                .find(|column| pattern.is_match(&column.name) && is_text_type(&column.declared_type));
            let (Some(id_column), Some(label_column)) = (id_column, label_column) else {
                continue;
            };

            let sql = format!(
                "SELECT {label}, {id} FROM {table} WHERE {label} IS NOT NULL ORDER BY {id}",
                label = quote_ident(&label_column.name),
                id = quote_ident(&id_column.name),
                table = quote_ident(&table),
            );
            let mut stmt = self.conn.prepare(&sql).map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })
                .map_err(|e| DialectError::Sqlite {
                    message: e.to_string(),
                })?;
            for row in rows {
                let (symbol, value) = row.map_err(|e| DialectError::Sqlite {
                    message: e.to_string(),
                })?;
                labels.push(LabelEntry {
                    table: table.clone(),
                    column: label_column.name.clone(),
                    symbol,
                    value,
                });
            }
        }
        debug!(labels = labels.len(), "labels introspected");
        Ok(labels)
    }

    fn routine_registry(&self) -> Result<BTreeSet<String>, DialectError> {
        let mut stmt = self
            .conn
            .prepare("SELECT routine_name FROM strata_routines ORDER BY routine_name")
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })?;
        rows.collect::<Result<BTreeSet<_>, _>>()
            .map_err(|e| DialectError::Sqlite {
                message: e.to_string(),
            })
    }

    fn is_body_start(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case("begin")
    }

    fn type_table(&self) -> &TypeTable {
        &TYPE_TABLE
    }
}

/// Parses the `create` header and the declared parameter list.
fn parse_install_header(source: &str) -> Result<InstallHeader, DialectError> {
    let captures = HEADER_RE
        .captures(source)
        .ok_or_else(|| DialectError::InstallRejected {
            message: "no `create procedure|function name(...)` header found".to_string(),
        })?;

    let kind = captures[1].to_lowercase();
    let schema = captures.get(2).map(|m| m.as_str().to_string());
    let name = captures[3].to_string();

    let open = captures.get(0).map(|m| m.end()).unwrap_or(0);
    let list = parameter_list(&source[open..]).ok_or_else(|| DialectError::InstallRejected {
        message: format!("unterminated parameter list of routine '{name}'"),
    })?;

    let mut parameters = Vec::new();
    for (index, declaration) in split_declarations(list).into_iter().enumerate() {
        let mut words = declaration.splitn(2, char::is_whitespace);
        let parameter_name = words.next().unwrap_or("").to_string();
        let descriptor = words.next().unwrap_or("").trim().to_string();
        if parameter_name.is_empty() || descriptor.is_empty() {
            return Err(DialectError::InstallRejected {
                message: format!(
                    "malformed parameter declaration '{declaration}' of routine '{name}'"
                ),
            });
        }
        parameters.push(Parameter {
            name: parameter_name,
            data_type: bare_type(&descriptor),
            data_type_descriptor: descriptor,
            position: index + 1,
        });
    }

    Ok(InstallHeader {
        name,
        schema,
        kind,
        parameters,
    })
}

/// The text between the header's opening paren and its matching close.
fn parameter_list(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    for (offset, ch) in rest.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits a parameter list on top-level commas, so `decimal(8,2)` stays
/// one declaration.
fn split_declarations(list: &str) -> Vec<&str> {
    let mut declarations = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (offset, ch) in list.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                declarations.push(list[start..offset].trim());
                start = offset + 1;
            }
            _ => {}
        }
    }
    declarations.push(list[start..].trim());
    declarations.retain(|declaration| !declaration.is_empty());
    declarations
}

/// First word of a declared type, lowercased: `VARCHAR(40)` -> `varchar`.
fn bare_type(descriptor: &str) -> String {
    descriptor
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect::<String>()
        .to_lowercase()
}

fn declared_width(declared_type: &str) -> Option<i64> {
    WIDTH_RE
        .captures(declared_type)
        .and_then(|captures| captures[1].parse().ok())
}

fn is_integer_type(declared_type: &str) -> bool {
    bare_type(declared_type).contains("int")
}

fn is_text_type(declared_type: &str) -> bool {
    let bare = bare_type(declared_type);
    bare.contains("char") || bare.contains("text") || bare.contains("clob")
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}
