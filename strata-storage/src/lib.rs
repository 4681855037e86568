//! # strata-storage
//!
//! Database-facing half of strata: the dialect registry with its
//! SQLite `MetadataProvider`, the routine catalog schema, and the JSON
//! metadata store that carries routine records across runs.

pub mod dialect;
pub mod migrations;
pub mod store;

pub use dialect::create_provider;
pub use dialect::sqlite::SqliteProvider;
pub use store::MetadataStore;
