pub const CATALOG_SCHEMA_VERSION: i64 = 1;
pub const CATALOG_CONTENT_VERSION: &str = "arcana_v1";

pub const CATALOG_DB_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS content_meta (
  id INTEGER PRIMARY KEY CHECK (id = 1),
  schema_version INTEGER NOT NULL,
  content_version TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS core_item (
  core_id INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  group_id INTEGER NOT NULL,
  slot TEXT NOT NULL,
  ordinal INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS combination_item (
  combination_id INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  kind TEXT NOT NULL,
  ordinal INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS combination_group (
  combination_id INTEGER NOT NULL,
  position INTEGER NOT NULL,
  group_id INTEGER NOT NULL,
  PRIMARY KEY (combination_id, position)
);

CREATE TABLE IF NOT EXISTS prerequisite_clause (
  combination_id INTEGER NOT NULL,
  clause_group INTEGER NOT NULL,
  core_id INTEGER NOT NULL,
  ordinal INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS passive_card (
  card_id INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  grid_row INTEGER,
  grid_col INTEGER,
  cost INTEGER NOT NULL,
  awakening TEXT,
  ordinal INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS passive_card_effect (
  card_id INTEGER NOT NULL,
  rank INTEGER NOT NULL CHECK (rank BETWEEN 1 AND 4),
  effect TEXT NOT NULL,
  PRIMARY KEY (card_id, rank)
);
"#;
