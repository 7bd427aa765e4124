use crate::catalog::index::{Catalog, CatalogStats};
use crate::error::CatalogError;

/// Read-only source of catalog content.
pub trait CatalogRepository {
    fn stats(&self) -> Result<CatalogStats, CatalogError>;
    fn load_catalog(&self) -> Result<Catalog, CatalogError>;
}
