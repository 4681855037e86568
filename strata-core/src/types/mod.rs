//! Data model shared across the strata crates.

pub mod designation;
pub mod placeholder;
pub mod routine;
pub mod schema;
pub mod type_table;

pub use designation::Designation;
pub use placeholder::PlaceholderMap;
pub use routine::{Parameter, RoutineKind, RoutineMetadata};
pub use schema::{ConstantEntry, LabelEntry, SchemaColumn, TableColumn};
pub use type_table::{TypeClass, TypeEntry, TypeTable};
