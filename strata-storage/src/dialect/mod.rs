//! Dialect registry.
//!
//! One `MetadataProvider` implementation per dialect, chosen once at
//! startup from the configured dialect tag. Adding a dialect means
//! adding a trait impl and one arm here; the loader and generators
//! never see anything but the trait.

pub mod sqlite;

use strata_core::config::DatabaseConfig;
use strata_core::errors::DialectError;
use strata_core::traits::MetadataProvider;
use tracing::debug;

use self::sqlite::SqliteProvider;

/// Opens the provider registered under `tag`.
pub fn create_provider(
    tag: &str,
    database: &DatabaseConfig,
) -> Result<Box<dyn MetadataProvider>, DialectError> {
    match tag {
        "sqlite" => {
            let path = database
                .path
                .as_deref()
                .ok_or_else(|| DialectError::Connection {
                    message: "database.path is required for the sqlite dialect".to_string(),
                })?;
            let provider = SqliteProvider::open(path)?;
            debug!(dialect = tag, path = %path.display(), "provider ready");
            Ok(Box::new(provider))
        }
        _ => Err(DialectError::UnknownDialect {
            tag: tag.to_string(),
        }),
    }
}
