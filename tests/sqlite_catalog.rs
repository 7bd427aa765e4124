use std::path::PathBuf;

use arcana_builder::catalog::{load_catalog, CatalogRepository, CombinationId, SqliteCatalogRepository};

fn reference_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/data/catalog.json")
}

#[test]
fn imported_catalog_reads_back_identically() {
    let catalog = load_catalog(reference_path()).unwrap();
    let mut repo = SqliteCatalogRepository::create_in_memory().unwrap();
    repo.import(&catalog).unwrap();

    assert_eq!(repo.stats().unwrap(), catalog.stats());

    let restored = repo.load_catalog().unwrap();
    assert_eq!(
        serde_json::to_value(restored.snapshot()).unwrap(),
        serde_json::to_value(catalog.snapshot()).unwrap()
    );

    let duo = restored.combination(CombinationId(501)).unwrap();
    assert_eq!(duo.clauses.len(), 2);
    assert_eq!(duo.clauses[1].members.len(), 4);
}

#[test]
fn reimport_replaces_previous_content() {
    let catalog = load_catalog(reference_path()).unwrap();
    let mut repo = SqliteCatalogRepository::create_in_memory().unwrap();
    repo.import(&catalog).unwrap();
    repo.import(&catalog).unwrap();
    assert_eq!(repo.stats().unwrap().card_count, 25);
}
