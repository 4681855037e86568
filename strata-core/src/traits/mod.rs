//! Traits implemented outside this crate.

pub mod provider;

pub use provider::MetadataProvider;
