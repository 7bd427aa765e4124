use std::collections::{HashMap, HashSet};

use bevy_utils::tracing::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::model::{
    CardId, CombinationId, CombinationItem, CombinationKind, CoreItem, CoreItemId, GridPosition,
    PassiveCard, MAX_CARD_COST,
};
use crate::error::CatalogError;

/// Raw catalog document as stored on disk or in the content database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub schema_version: u32,
    #[serde(default)]
    pub cores: Vec<CoreItem>,
    #[serde(default)]
    pub combinations: Vec<CombinationItem>,
    #[serde(default)]
    pub cards: Vec<PassiveCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub core_count: usize,
    pub duo_count: usize,
    pub legendary_count: usize,
    pub card_count: usize,
    pub awakening_count: usize,
}

impl CatalogSnapshot {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.schema_version == 0 {
            return Err(CatalogError::Validation(
                "catalog schema_version must be >= 1".to_string(),
            ));
        }

        let mut core_ids = HashSet::new();
        for core in &self.cores {
            if !core_ids.insert(core.id) {
                return Err(CatalogError::Validation(format!(
                    "duplicate core id {}",
                    core.id.0
                )));
            }
            if core.name.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "core {} missing name",
                    core.id.0
                )));
            }
        }

        let mut combination_ids = HashSet::new();
        for item in &self.combinations {
            if !combination_ids.insert(item.id) {
                return Err(CatalogError::Validation(format!(
                    "duplicate combination id {}",
                    item.id.0
                )));
            }
            if item.name.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "combination {} missing name",
                    item.id.0
                )));
            }
            if item.groups.len() != item.kind.group_count() {
                return Err(CatalogError::Validation(format!(
                    "{} {} names {} groups, expected {}",
                    item.kind.as_str().to_lowercase(),
                    item.id.0,
                    item.groups.len(),
                    item.kind.group_count()
                )));
            }
        }

        let mut card_ids = HashSet::new();
        let mut positions = HashSet::new();
        for card in &self.cards {
            if !card_ids.insert(card.id) {
                return Err(CatalogError::Validation(format!(
                    "duplicate card id {}",
                    card.id.0
                )));
            }
            if card.name.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "card {} missing name",
                    card.id.0
                )));
            }
            if card.cost > MAX_CARD_COST {
                return Err(CatalogError::Validation(format!(
                    "card {} cost {} exceeds {}",
                    card.id.0, card.cost, MAX_CARD_COST
                )));
            }
            if card.cost > 0 && card.awakening.is_some() {
                return Err(CatalogError::Validation(format!(
                    "card {} has cost {} but carries an awakening predicate",
                    card.id.0, card.cost
                )));
            }
            if let Some(pos) = card.grid_position() {
                if !positions.insert(pos) {
                    return Err(CatalogError::Validation(format!(
                        "card {} shares grid position ({}, {})",
                        card.id.0, pos.row, pos.col
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Validated, indexed, read-only catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    snapshot: CatalogSnapshot,
    core_index: HashMap<CoreItemId, usize>,
    combination_index: HashMap<CombinationId, usize>,
    card_index: HashMap<CardId, usize>,
    grid: HashMap<GridPosition, CardId>,
}

impl Catalog {
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self, CatalogError> {
        snapshot.validate()?;

        let core_index = snapshot
            .cores
            .iter()
            .enumerate()
            .map(|(idx, core)| (core.id, idx))
            .collect::<HashMap<_, _>>();
        let combination_index = snapshot
            .combinations
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id, idx))
            .collect();
        let card_index = snapshot
            .cards
            .iter()
            .enumerate()
            .map(|(idx, card)| (card.id, idx))
            .collect();
        let grid = snapshot
            .cards
            .iter()
            .filter_map(|card| card.grid_position().map(|pos| (pos, card.id)))
            .collect();

        for item in &snapshot.combinations {
            if item.clauses.is_empty() {
                debug!(combination = item.id.0, "combination has no prerequisites and stays locked");
            }
            for clause in &item.clauses {
                for member in &clause.members {
                    if !core_index.contains_key(member) {
                        debug!(
                            combination = item.id.0,
                            core = member.0,
                            "prerequisite references unknown core item"
                        );
                    }
                }
            }
        }
        for card in &snapshot.cards {
            if card.is_awakening() && card.awakening.is_none() {
                warn!(card = card.id.0, "zero-cost card has no awakening predicate");
            }
            if card.grid_position().is_none() {
                warn!(card = card.id.0, "card has no grid position");
            }
        }

        Ok(Self {
            snapshot,
            core_index,
            combination_index,
            card_index,
            grid,
        })
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn cores(&self) -> &[CoreItem] {
        &self.snapshot.cores
    }

    pub fn combinations(&self) -> &[CombinationItem] {
        &self.snapshot.combinations
    }

    pub fn cards(&self) -> &[PassiveCard] {
        &self.snapshot.cards
    }

    pub fn core(&self, id: CoreItemId) -> Option<&CoreItem> {
        self.core_index.get(&id).map(|&idx| &self.snapshot.cores[idx])
    }

    pub fn combination(&self, id: CombinationId) -> Option<&CombinationItem> {
        self.combination_index
            .get(&id)
            .map(|&idx| &self.snapshot.combinations[idx])
    }

    pub fn card(&self, id: CardId) -> Option<&PassiveCard> {
        self.card_index.get(&id).map(|&idx| &self.snapshot.cards[idx])
    }

    pub fn card_at(&self, pos: GridPosition) -> Option<CardId> {
        self.grid.get(&pos).copied()
    }

    pub fn combinations_of(&self, kind: CombinationKind) -> impl Iterator<Item = &CombinationItem> {
        self.snapshot
            .combinations
            .iter()
            .filter(move |item| item.kind == kind)
    }

    pub fn duos(&self) -> impl Iterator<Item = &CombinationItem> {
        self.combinations_of(CombinationKind::Duo)
    }

    pub fn legendaries(&self) -> impl Iterator<Item = &CombinationItem> {
        self.combinations_of(CombinationKind::Legendary)
    }

    /// Zero-cost cards, in catalog order.
    pub fn awakening_cards(&self) -> impl Iterator<Item = &PassiveCard> {
        self.snapshot.cards.iter().filter(|card| card.is_awakening())
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            core_count: self.snapshot.cores.len(),
            duo_count: self.duos().count(),
            legendary_count: self.legendaries().count(),
            card_count: self.snapshot.cards.len(),
            awakening_count: self.awakening_cards().count(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::catalog::model::{
        AwakeningPredicate, ClauseGroup, GroupId, PrerequisiteClause, Slot,
    };

    pub fn core(id: i64, group: i64, slot: Slot) -> CoreItem {
        CoreItem {
            id: CoreItemId(id),
            name: format!("core {}", id),
            group: GroupId(group),
            slot,
        }
    }

    pub fn clause(group: i64, members: &[i64]) -> PrerequisiteClause {
        PrerequisiteClause {
            group: ClauseGroup(group),
            members: members.iter().copied().map(CoreItemId).collect(),
        }
    }

    pub fn combination(
        id: i64,
        kind: CombinationKind,
        clauses: Vec<PrerequisiteClause>,
    ) -> CombinationItem {
        let groups = match kind {
            CombinationKind::Duo => vec![GroupId(1), GroupId(2)],
            CombinationKind::Legendary => vec![GroupId(1)],
        };
        CombinationItem {
            id: CombinationId(id),
            name: format!("combination {}", id),
            kind,
            groups,
            clauses,
        }
    }

    pub fn card(
        id: i64,
        pos: Option<(u8, u8)>,
        cost: u8,
        awakening: Option<AwakeningPredicate>,
    ) -> PassiveCard {
        PassiveCard {
            id: CardId(id),
            name: format!("card {}", id),
            position: pos.map(|(row, col)| GridPosition::new(row, col)),
            cost,
            effects: [
                "rank 1".to_string(),
                "rank 2".to_string(),
                "rank 3".to_string(),
                "rank 4".to_string(),
            ],
            awakening,
        }
    }

    pub fn catalog(
        cores: Vec<CoreItem>,
        combinations: Vec<CombinationItem>,
        cards: Vec<PassiveCard>,
    ) -> Catalog {
        Catalog::from_snapshot(CatalogSnapshot {
            schema_version: 1,
            cores,
            combinations,
            cards,
        })
        .expect("fixture catalog is valid")
    }
}
