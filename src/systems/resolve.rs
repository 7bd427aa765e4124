use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use bevy_utils::tracing::debug;

use crate::core::ecs::{CatalogHandle, SessionSettings};
use crate::rules::awakening::{evaluate_awakening, AwakeningOutcome};
use crate::rules::budget::{budget_status, BudgetStatus};
use crate::rules::selection::{Rank, Selection};
use crate::rules::unlock::{resolve_all, Availability};

/// System: recomputes which duo and legendary items the selected cores unlock.
pub fn resolve_unlocks_system(
    catalog: Res<CatalogHandle>,
    selection: Res<Selection>,
    mut availability: ResMut<Availability>,
) {
    let resolved = resolve_all(&catalog.0, &selection.core_ids());
    let locked = resolved.locked_selections(&selection);
    if !locked.is_empty() {
        debug!(?locked, "selected combinations lost their prerequisites");
    }
    *availability = resolved;
}

/// System: settles zero-cost cards and writes the result back into the selection.
///
/// Picked cards keep their rank; newly awakened ones enter at the base rank.
pub fn awaken_system(
    catalog: Res<CatalogHandle>,
    settings: Res<SessionSettings>,
    mut selection: ResMut<Selection>,
    mut report: ResMut<AwakeningOutcome>,
) {
    let outcome = evaluate_awakening(
        &catalog.0,
        &selection.card_ids(),
        settings.max_awakening_passes,
    );
    let cards: BTreeMap<_, _> = outcome
        .active
        .iter()
        .map(|id| (*id, selection.cards.get(id).copied().unwrap_or(Rank::BASE)))
        .collect();
    if selection.cards != cards {
        selection.cards = cards;
    }
    *report = outcome;
}

/// System: refreshes the grasp total against the current cap.
pub fn budget_system(
    catalog: Res<CatalogHandle>,
    selection: Res<Selection>,
    mut budget: ResMut<BudgetStatus>,
) {
    *budget = budget_status(&catalog.0, selection.cards.keys(), selection.grasp_cap.get());
}
