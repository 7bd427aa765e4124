pub mod index;
pub mod json;
pub mod model;
pub mod repository;
pub mod schema;
pub mod sqlite;

pub use index::{Catalog, CatalogSnapshot, CatalogStats};
pub use json::{load_catalog, JsonCatalogRepository, DEFAULT_CATALOG_PATH};
pub use model::{
    AwakeningPredicate, CardId, ClauseGroup, CombinationId, CombinationItem, CombinationKind,
    CoreItem, CoreItemId, GridPosition, GroupId, PassiveCard, PrerequisiteClause, Slot, GRID_SIZE,
    MAX_CARD_COST,
};
pub use repository::CatalogRepository;
pub use sqlite::SqliteCatalogRepository;
