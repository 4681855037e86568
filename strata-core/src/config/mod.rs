//! Configuration system for strata.
//! One TOML file per project, passed to the CLI, validated before any
//! database I/O.

pub mod constants_config;
pub mod database_config;
pub mod project_config;
pub mod strata_config;
pub mod wrapper_config;

pub use constants_config::ConstantsConfig;
pub use database_config::DatabaseConfig;
pub use project_config::ProjectConfig;
pub use strata_config::StrataConfig;
pub use wrapper_config::WrapperConfig;
