//! Zero-cost card activation.
//!
//! Awakening cards are never picked directly. Each one carries a predicate
//! over the other active cards, and activating one can flip the inputs of
//! another, so [`evaluate_awakening`] loops until a full pass changes nothing
//! or the pass cap runs out.

use std::collections::{BTreeMap, BTreeSet};

use bevy_ecs::prelude::*;
use bevy_utils::tracing::{debug, warn};
use serde::Serialize;

use crate::catalog::{
    AwakeningPredicate, CardId, Catalog, GridPosition, PassiveCard, GRID_SIZE, MAX_CARD_COST,
};

pub const DEFAULT_MAX_AWAKENING_PASSES: usize = 10;

/// Most active costed cards allowed to share one cost value.
const MAX_SHARED_COST: usize = 2;
/// Most active costed cards allowed in total.
const MAX_COSTED_CARDS: usize = 3;

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AwakeningOutcome {
    /// Converged active set, costed and awakened cards together.
    pub active: BTreeSet<CardId>,
    /// Zero-cost cards in `active`, in catalog order.
    pub awakened: Vec<CardId>,
    pub passes: usize,
    /// False when the pass cap ran out while cards were still flipping.
    pub converged: bool,
}

/// Recompute zero-cost membership against `active` until it settles.
///
/// Toggles apply immediately within a pass, in catalog order. The returned
/// set is the last one computed even when `converged` is false.
pub fn evaluate_awakening(
    catalog: &Catalog,
    active: &BTreeSet<CardId>,
    max_passes: usize,
) -> AwakeningOutcome {
    let mut current = active.clone();
    let mut passes = 0;
    let mut converged = false;

    while passes < max_passes {
        passes += 1;
        let mut changed = false;
        for card in catalog.awakening_cards() {
            let should_be_active = predicate_holds(catalog, card, &current);
            if should_be_active != current.contains(&card.id) {
                if should_be_active {
                    current.insert(card.id);
                } else {
                    current.remove(&card.id);
                }
                changed = true;
            }
        }
        if !changed {
            converged = true;
            break;
        }
    }

    if converged {
        debug!(passes, active = current.len(), "awakening converged");
    } else {
        warn!(
            passes,
            "awakening did not converge; check zero-cost card predicates for cycles"
        );
    }

    let awakened = catalog
        .awakening_cards()
        .filter(|card| current.contains(&card.id))
        .map(|card| card.id)
        .collect();

    AwakeningOutcome {
        active: current,
        awakened,
        passes,
        converged,
    }
}

/// Whether `card` should be awake given `active`. The card never counts
/// toward its own predicate. Cards without a predicate or a grid position
/// never awaken.
pub fn predicate_holds(catalog: &Catalog, card: &PassiveCard, active: &BTreeSet<CardId>) -> bool {
    let (Some(predicate), Some(position)) = (card.awakening, card.grid_position()) else {
        return false;
    };
    let others = ActiveView::new(catalog, card.id, active);

    match predicate {
        AwakeningPredicate::AdjacencyAny => position
            .neighbors()
            .into_iter()
            .any(|pos| others.occupied(pos)),
        AwakeningPredicate::AdjacencyAll => {
            let neighbors = position.neighbors();
            !neighbors.is_empty() && neighbors.into_iter().all(|pos| others.occupied(pos))
        }
        AwakeningPredicate::CostCoverage => {
            let counts = others.cost_counts();
            (1..=MAX_CARD_COST).all(|cost| counts.contains_key(&cost))
        }
        AwakeningPredicate::CostCardinalityCap => {
            let counts = others.cost_counts();
            !counts.is_empty() && counts.values().all(|&n| n <= MAX_SHARED_COST)
        }
        AwakeningPredicate::LineCoverage => {
            let full_row = (0..GRID_SIZE)
                .filter(|&row| row != position.row)
                .any(|row| (0..GRID_SIZE).all(|col| others.occupied(GridPosition::new(row, col))));
            let full_col = (0..GRID_SIZE)
                .filter(|&col| col != position.col)
                .any(|col| (0..GRID_SIZE).all(|row| others.occupied(GridPosition::new(row, col))));
            full_row || full_col
        }
        AwakeningPredicate::TotalCardinalityCap => {
            let costed = others.costed_count();
            costed > 0 && costed <= MAX_COSTED_CARDS
        }
    }
}

/// The active set as seen by one card: itself removed, unknown ids ignored.
struct ActiveView<'a> {
    catalog: &'a Catalog,
    cards: Vec<&'a PassiveCard>,
}

impl<'a> ActiveView<'a> {
    fn new(catalog: &'a Catalog, exclude: CardId, active: &BTreeSet<CardId>) -> Self {
        let cards = active
            .iter()
            .filter(|&&id| id != exclude)
            .filter_map(|&id| catalog.card(id))
            .collect();
        Self { catalog, cards }
    }

    fn occupied(&self, pos: GridPosition) -> bool {
        match self.catalog.card_at(pos) {
            Some(id) => self.cards.iter().any(|card| card.id == id),
            None => false,
        }
    }

    fn cost_counts(&self) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for card in self.cards.iter().filter(|card| card.cost > 0) {
            *counts.entry(card.cost).or_insert(0) += 1;
        }
        counts
    }

    fn costed_count(&self) -> usize {
        self.cards.iter().filter(|card| card.cost > 0).count()
    }
}
