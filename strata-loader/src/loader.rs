//! Loading of one routine source file.
//!
//! One orchestration over the [`MetadataProvider`] trait; dialects supply
//! the database operations, never the sequencing. Every failure is scoped
//! to the routine at hand so the surrounding batch can continue.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;
use std::time::UNIX_EPOCH;

use strata_core::errors::{RoutineError, SourceError};
use strata_core::traits::MetadataProvider;
use strata_core::types::{Designation, PlaceholderMap, RoutineMetadata};
use tracing::debug;

use crate::designation::parse_designation;
use crate::fingerprint::must_reload;
use crate::header::parse_header;
use crate::placeholders::{substitute, MagicOverlay};

/// Result of loading one routine.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub metadata: RoutineMetadata,
    /// False when the fingerprint found nothing changed and the prior
    /// metadata was returned untouched.
    pub reloaded: bool,
}

/// Loads routine sources against one provider and placeholder map.
pub struct RoutineLoader<'a> {
    provider: &'a dyn MetadataProvider,
    placeholders: &'a PlaceholderMap,
}

impl<'a> RoutineLoader<'a> {
    pub fn new(provider: &'a dyn MetadataProvider, placeholders: &'a PlaceholderMap) -> Self {
        Self {
            provider,
            placeholders,
        }
    }

    /// Loads one routine file.
    ///
    /// `expected_name` is the file's base name; the routine declared in
    /// the source must carry the same name. `registry` is the set of
    /// routines the database already has a record of, fetched once per
    /// batch.
    pub fn load(
        &self,
        path: &Path,
        expected_name: &str,
        prior: Option<&RoutineMetadata>,
        registry: &BTreeSet<String>,
    ) -> Result<LoadOutcome, RoutineError> {
        let mtime = file_mtime(path)?;

        if let Some(prior) = prior {
            if !must_reload(Some(prior), mtime, self.placeholders, registry) {
                debug!(routine = expected_name, "routine unchanged");
                return Ok(LoadOutcome {
                    metadata: prior.clone(),
                    reloaded: false,
                });
            }
        }

        let source = read_source(path)?;
        let magic = MagicOverlay::new(path, expected_name);
        let substitution = substitute(&source, self.placeholders, &magic)?;
        let designation =
            parse_designation(&substitution.lines, |line| self.provider.is_body_start(line))?;

        let text = substitution.text();
        let header = parse_header(&text)?;
        if header.name != expected_name {
            return Err(SourceError::NameMismatch {
                declared: header.name,
                expected: expected_name.to_string(),
            }
            .into());
        }

        self.provider.drop_if_exists(&header.name)?;
        self.provider.install(&text)?;

        let (fields, column_types) = match &designation {
            Designation::BulkInsert { table, columns } => {
                let introspected = self.provider.introspect_table_columns(table)?;
                if introspected.len() != columns.len() {
                    return Err(SourceError::ColumnCountMismatch {
                        table: table.clone(),
                        fields: introspected.len(),
                        columns: columns.len(),
                    }
                    .into());
                }
                let fields: Vec<String> = introspected
                    .iter()
                    .map(|column| column.name.clone())
                    .collect();
                let types: Vec<String> = introspected
                    .iter()
                    .map(|column| bare_type(&column.declared_type))
                    .collect();
                (Some(fields), Some(types))
            }
            _ => (None, None),
        };

        let parameters = self.provider.introspect_parameters(&header.name)?;

        let table_name = designation.table().map(str::to_string);
        let columns = designation.columns().map(|columns| columns.to_vec());
        let metadata = RoutineMetadata {
            routine_name: header.name,
            schema_name: header.schema,
            kind: header.kind,
            designation,
            table_name,
            columns,
            parameters,
            fields,
            column_types,
            timestamp: mtime,
            replace: substitution.replace,
        };
        debug!(
            routine = %metadata.routine_name,
            kind = %metadata.kind,
            "routine loaded"
        );
        Ok(LoadOutcome {
            metadata,
            reloaded: true,
        })
    }
}

fn file_mtime(path: &Path) -> Result<i64, SourceError> {
    let metadata = std::fs::metadata(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => SourceError::Missing,
        _ => SourceError::Read {
            message: err.to_string(),
        },
    })?;
    let modified = metadata.modified().map_err(|err| SourceError::Read {
        message: err.to_string(),
    })?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0))
}

fn read_source(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => SourceError::Missing,
        _ => SourceError::Read {
            message: err.to_string(),
        },
    })
}

/// First word of a declared type: `varchar(40)` -> `varchar`.
fn bare_type(declared_type: &str) -> String {
    declared_type
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect::<String>()
        .to_lowercase()
}
