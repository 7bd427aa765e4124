// Re-export core modules for use by the binary or other consumers
pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod rules;
pub mod systems;

// Expose the session wrapper and the types needed to drive it
pub use crate::catalog::{Catalog, CatalogRepository, JsonCatalogRepository, SqliteCatalogRepository};
pub use crate::config::EngineConfig;
pub use crate::core::session::{BuildSession, FinalizedBuild, SessionSnapshot};
pub use crate::error::{CatalogError, ConfigError};
pub use crate::rules::{Build, Tier, ValidationReport};
pub use crate::systems::intake::{EditRejection, SelectionEdit};
