use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use bevy_utils::tracing::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::catalog::index::{Catalog, CatalogSnapshot, CatalogStats};
use crate::catalog::model::{
    AwakeningPredicate, CardId, ClauseGroup, CombinationId, CombinationItem, CombinationKind,
    CoreItem, CoreItemId, GridPosition, GroupId, PassiveCard, PrerequisiteClause, Slot,
};
use crate::catalog::repository::CatalogRepository;
use crate::catalog::schema::{CATALOG_CONTENT_VERSION, CATALOG_DB_SCHEMA, CATALOG_SCHEMA_VERSION};
use crate::error::CatalogError;

pub struct SqliteCatalogRepository {
    conn: Connection,
}

impl SqliteCatalogRepository {
    /// Open an existing content database and check its version row.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, CatalogError> {
        validate_content_meta(&conn)?;
        Ok(Self { conn })
    }

    /// Create (or reuse) a database file with the catalog schema and version row.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn create_in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Replace the stored content with `catalog`.
    pub fn import(&mut self, catalog: &Catalog) -> Result<(), CatalogError> {
        let tx = self.conn.transaction()?;
        for table in [
            "passive_card_effect",
            "passive_card",
            "prerequisite_clause",
            "combination_group",
            "combination_item",
            "core_item",
        ] {
            tx.execute(&format!("DELETE FROM {}", table), [])?;
        }

        for (ordinal, core) in catalog.cores().iter().enumerate() {
            tx.execute(
                "INSERT INTO core_item (core_id, name, group_id, slot, ordinal) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![core.id.0, core.name, core.group.0, core.slot.as_str(), ordinal as i64],
            )?;
        }

        for (ordinal, item) in catalog.combinations().iter().enumerate() {
            tx.execute(
                "INSERT INTO combination_item (combination_id, name, kind, ordinal) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![item.id.0, item.name, item.kind.as_str(), ordinal as i64],
            )?;
            for (position, group) in item.groups.iter().enumerate() {
                tx.execute(
                    "INSERT INTO combination_group (combination_id, position, group_id) \
                     VALUES (?1, ?2, ?3)",
                    params![item.id.0, position as i64, group.0],
                )?;
            }
            let members = item
                .clauses
                .iter()
                .flat_map(|clause| clause.members.iter().map(move |m| (clause.group, *m)));
            for (ordinal, (group, member)) in members.enumerate() {
                tx.execute(
                    "INSERT INTO prerequisite_clause (combination_id, clause_group, core_id, ordinal) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![item.id.0, group.0, member.0, ordinal as i64],
                )?;
            }
        }

        for (ordinal, card) in catalog.cards().iter().enumerate() {
            tx.execute(
                "INSERT INTO passive_card (card_id, name, grid_row, grid_col, cost, awakening, ordinal) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    card.id.0,
                    card.name,
                    card.position.map(|pos| pos.row as i64),
                    card.position.map(|pos| pos.col as i64),
                    card.cost as i64,
                    card.awakening.map(AwakeningPredicate::as_str),
                    ordinal as i64,
                ],
            )?;
            for (idx, effect) in card.effects.iter().enumerate() {
                tx.execute(
                    "INSERT INTO passive_card_effect (card_id, rank, effect) VALUES (?1, ?2, ?3)",
                    params![card.id.0, idx as i64 + 1, effect],
                )?;
            }
        }

        tx.commit()?;
        debug!(
            cores = catalog.cores().len(),
            combinations = catalog.combinations().len(),
            cards = catalog.cards().len(),
            "imported catalog into content database"
        );
        Ok(())
    }

    pub fn load_snapshot(&self) -> Result<CatalogSnapshot, CatalogError> {
        Ok(CatalogSnapshot {
            schema_version: CATALOG_SCHEMA_VERSION as u32,
            cores: load_cores(&self.conn)?,
            combinations: load_combinations(&self.conn)?,
            cards: load_cards(&self.conn)?,
        })
    }
}

impl CatalogRepository for SqliteCatalogRepository {
    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        Ok(CatalogStats {
            core_count: count_rows(&self.conn, "core_item", None)?,
            duo_count: count_rows(&self.conn, "combination_item", Some("kind = 'DUO'"))?,
            legendary_count: count_rows(
                &self.conn,
                "combination_item",
                Some("kind = 'LEGENDARY'"),
            )?,
            card_count: count_rows(&self.conn, "passive_card", None)?,
            awakening_count: count_rows(&self.conn, "passive_card", Some("cost = 0"))?,
        })
    }

    fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::from_snapshot(self.load_snapshot()?)
    }
}

fn init_schema(conn: &Connection) -> Result<(), CatalogError> {
    conn.execute_batch(CATALOG_DB_SCHEMA)?;
    conn.execute(
        "INSERT OR REPLACE INTO content_meta (id, schema_version, content_version) \
         VALUES (1, ?1, ?2)",
        params![CATALOG_SCHEMA_VERSION, CATALOG_CONTENT_VERSION],
    )?;
    Ok(())
}

fn load_cores(conn: &Connection) -> Result<Vec<CoreItem>, CatalogError> {
    let mut stmt =
        conn.prepare("SELECT core_id, name, group_id, slot FROM core_item ORDER BY ordinal")?;
    let rows = stmt.query_map([], |row| {
        let id: i64 = row.get(0)?;
        let name: String = row.get(1)?;
        let group: i64 = row.get(2)?;
        let slot: String = row.get(3)?;
        Ok((id, name, group, slot))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, name, group, slot) = row?;
        out.push(CoreItem {
            id: CoreItemId(id),
            name,
            group: GroupId(group),
            slot: Slot::from_str(&slot)?,
        });
    }
    Ok(out)
}

fn load_combinations(conn: &Connection) -> Result<Vec<CombinationItem>, CatalogError> {
    let groups = load_combination_groups(conn)?;
    let mut clauses = load_clauses(conn)?;

    let mut stmt = conn
        .prepare("SELECT combination_id, name, kind FROM combination_item ORDER BY ordinal")?;
    let rows = stmt.query_map([], |row| {
        let id: i64 = row.get(0)?;
        let name: String = row.get(1)?;
        let kind: String = row.get(2)?;
        Ok((id, name, kind))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, name, kind) = row?;
        out.push(CombinationItem {
            id: CombinationId(id),
            name,
            kind: CombinationKind::from_str(&kind)?,
            groups: groups.get(&id).cloned().unwrap_or_default(),
            clauses: clauses.remove(&id).unwrap_or_default(),
        });
    }
    Ok(out)
}

fn load_combination_groups(conn: &Connection) -> Result<HashMap<i64, Vec<GroupId>>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT combination_id, group_id FROM combination_group \
         ORDER BY combination_id, position",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;

    let mut out: HashMap<i64, Vec<GroupId>> = HashMap::new();
    for row in rows {
        let (id, group) = row?;
        out.entry(id).or_default().push(GroupId(group));
    }
    Ok(out)
}

fn load_clauses(conn: &Connection) -> Result<HashMap<i64, Vec<PrerequisiteClause>>, CatalogError> {
    let mut stmt = conn.prepare(
        "SELECT combination_id, clause_group, core_id FROM prerequisite_clause \
         ORDER BY combination_id, ordinal",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;

    let mut out: HashMap<i64, Vec<PrerequisiteClause>> = HashMap::new();
    for row in rows {
        let (id, group, core) = row?;
        let clauses = out.entry(id).or_default();
        match clauses.iter_mut().find(|c| c.group == ClauseGroup(group)) {
            Some(clause) => clause.members.push(CoreItemId(core)),
            None => clauses.push(PrerequisiteClause {
                group: ClauseGroup(group),
                members: vec![CoreItemId(core)],
            }),
        }
    }
    Ok(out)
}

fn load_cards(conn: &Connection) -> Result<Vec<PassiveCard>, CatalogError> {
    let mut effects = load_effects(conn)?;

    let mut stmt = conn.prepare(
        "SELECT card_id, name, grid_row, grid_col, cost, awakening FROM passive_card \
         ORDER BY ordinal",
    )?;
    let rows = stmt.query_map([], |row| {
        let id: i64 = row.get(0)?;
        let name: String = row.get(1)?;
        let grid_row: Option<i64> = row.get(2)?;
        let grid_col: Option<i64> = row.get(3)?;
        let cost: i64 = row.get(4)?;
        let awakening: Option<String> = row.get(5)?;
        Ok((id, name, grid_row, grid_col, cost, awakening))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, name, grid_row, grid_col, cost, awakening) = row?;
        let position = match (grid_row, grid_col) {
            (Some(r), Some(c)) => match (u8::try_from(r), u8::try_from(c)) {
                (Ok(row), Ok(col)) => Some(GridPosition::new(row, col)),
                _ => None,
            },
            _ => None,
        };
        let cost = u8::try_from(cost)
            .map_err(|_| CatalogError::Validation(format!("card {} has cost {}", id, cost)))?;
        let awakening = awakening
            .as_deref()
            .map(AwakeningPredicate::from_str)
            .transpose()?;
        let ranks = effects.remove(&id).unwrap_or_default();
        out.push(PassiveCard {
            id: CardId(id),
            name,
            position,
            cost,
            effects: collect_effects(id, ranks)?,
            awakening,
        });
    }
    Ok(out)
}

fn load_effects(conn: &Connection) -> Result<HashMap<i64, Vec<(i64, String)>>, CatalogError> {
    let mut stmt = conn.prepare("SELECT card_id, rank, effect FROM passive_card_effect")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut out: HashMap<i64, Vec<(i64, String)>> = HashMap::new();
    for row in rows {
        let (id, rank, effect) = row?;
        out.entry(id).or_default().push((rank, effect));
    }
    Ok(out)
}

fn collect_effects(card_id: i64, ranks: Vec<(i64, String)>) -> Result<[String; 4], CatalogError> {
    let mut slots: [Option<String>; 4] = Default::default();
    for (rank, effect) in ranks {
        if let Some(slot) = usize::try_from(rank - 1).ok().and_then(|idx| slots.get_mut(idx)) {
            *slot = Some(effect);
        }
    }
    let [r1, r2, r3, r4] = slots;
    match (r1, r2, r3, r4) {
        (Some(r1), Some(r2), Some(r3), Some(r4)) => Ok([r1, r2, r3, r4]),
        _ => Err(CatalogError::Validation(format!(
            "card {} missing rank effects",
            card_id
        ))),
    }
}

fn count_rows(conn: &Connection, table: &str, filter: Option<&str>) -> Result<usize, CatalogError> {
    let sql = match filter {
        Some(filter) => format!("SELECT COUNT(*) FROM {} WHERE {}", table, filter),
        None => format!("SELECT COUNT(*) FROM {}", table),
    };
    let count = conn.query_row(&sql, [], |row| row.get::<_, i64>(0))?;
    Ok(usize::try_from(count).unwrap_or_default())
}

fn validate_content_meta(conn: &Connection) -> Result<(), CatalogError> {
    let table = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='content_meta'",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    if table.is_none() {
        return Err(CatalogError::Meta(
            "table missing (rebuild the database with `arcana-builder import`)".to_string(),
        ));
    }

    let meta = conn
        .query_row(
            "SELECT schema_version, content_version FROM content_meta WHERE id = 1",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    let Some((schema_version, content_version)) = meta else {
        return Err(CatalogError::Meta("missing row id=1".to_string()));
    };

    if schema_version != CATALOG_SCHEMA_VERSION {
        return Err(CatalogError::Meta(format!(
            "schema_version {} != expected {}",
            schema_version, CATALOG_SCHEMA_VERSION
        )));
    }
    if content_version != CATALOG_CONTENT_VERSION {
        return Err(CatalogError::Meta(format!(
            "content_version {} != expected {}",
            content_version, CATALOG_CONTENT_VERSION
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::index::fixtures::*;

    #[test]
    fn rejects_database_without_meta() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteCatalogRepository::from_connection(conn).err().unwrap();
        assert!(err.to_string().contains("table missing"));
    }

    #[test]
    fn rejects_stale_content_version() {
        let repo = SqliteCatalogRepository::create_in_memory().unwrap();
        repo.connection()
            .execute("UPDATE content_meta SET content_version = 'old' WHERE id = 1", [])
            .unwrap();
        let conn = repo.conn;
        let err = SqliteCatalogRepository::from_connection(conn).err().unwrap();
        assert!(err.to_string().contains("content_version old"));
    }

    #[test]
    fn import_preserves_clause_grouping_and_order() {
        let catalog = catalog(
            vec![core(1, 1, Slot::Attack), core(2, 1, Slot::Special), core(3, 2, Slot::Cast)],
            vec![combination(
                10,
                CombinationKind::Duo,
                vec![clause(7, &[1, 2]), clause(3, &[3])],
            )],
            vec![
                card(2, Some((0, 1)), 1, None),
                card(1, None, 0, Some(AwakeningPredicate::CostCoverage)),
            ],
        );
        let mut repo = SqliteCatalogRepository::create_in_memory().unwrap();
        repo.import(&catalog).unwrap();

        let loaded = repo.load_catalog().unwrap();
        let duo = loaded.combination(CombinationId(10)).unwrap();
        assert_eq!(duo.clauses.len(), 2);
        assert_eq!(duo.clauses[0].group, ClauseGroup(7));
        assert_eq!(duo.clauses[0].members, vec![CoreItemId(1), CoreItemId(2)]);
        assert_eq!(loaded.cards()[0].id, CardId(2));
        assert!(loaded.cards()[1].position.is_none());

        let stats = repo.stats().unwrap();
        assert_eq!(stats, catalog.stats());
    }
}
