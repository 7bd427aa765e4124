use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::index::{Catalog, CatalogSnapshot, CatalogStats};
use crate::catalog::repository::CatalogRepository;
use crate::error::CatalogError;

pub const DEFAULT_CATALOG_PATH: &str = "./assets/data/catalog.json";

pub struct JsonCatalogRepository {
    path: PathBuf,
}

impl JsonCatalogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogRepository for JsonCatalogRepository {
    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        Ok(self.load_catalog()?.stats())
    }

    fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        load_catalog(&self.path)
    }
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = parse_catalog(&raw).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::from_snapshot(snapshot)
}

pub fn parse_catalog(raw: &str) -> Result<CatalogSnapshot, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{AwakeningPredicate, CardId, Slot};

    const SMALL: &str = r#"{
        "schema_version": 1,
        "cores": [
            { "id": 101, "name": "Heaven Strike", "group": 1, "slot": "ATTACK" }
        ],
        "combinations": [
            { "id": 900, "name": "Lonely", "kind": "LEGENDARY", "groups": [1],
              "clauses": [ { "group": 1, "members": [101] } ] }
        ],
        "cards": [
            { "id": 1, "name": "Night", "position": { "row": 0, "col": 3 }, "cost": 0,
              "effects": ["a", "b", "c", "d"], "awakening": "ADJACENCY_ANY" },
            { "id": 2, "name": "Loose", "cost": 2, "effects": ["a", "b", "c", "d"] }
        ]
    }"#;

    #[test]
    fn parses_wire_format() {
        let snapshot = parse_catalog(SMALL).unwrap();
        let catalog = Catalog::from_snapshot(snapshot).unwrap();
        assert_eq!(catalog.cores()[0].slot, Slot::Attack);
        assert_eq!(
            catalog.card(CardId(1)).and_then(|c| c.awakening),
            Some(AwakeningPredicate::AdjacencyAny)
        );
        assert!(catalog.card(CardId(2)).unwrap().position.is_none());
    }

    #[test]
    fn repository_reads_the_shipped_catalog() {
        let repo = JsonCatalogRepository::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/assets/data/catalog.json"
        ));
        let stats = repo.stats().unwrap();
        assert_eq!(stats.card_count, 25);
        assert_eq!(stats.awakening_count, 6);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_catalog("./does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
