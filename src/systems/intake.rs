use bevy_ecs::prelude::*;
use bevy_utils::tracing::debug;
use serde::Serialize;

use crate::catalog::{CardId, Catalog, CombinationId, CombinationKind, CoreItemId, Slot};
use crate::core::ecs::CatalogHandle;
use crate::rules::budget::GraspCap;
use crate::rules::prerequisite::is_satisfied;
use crate::rules::selection::{Rank, Selection};

/// Player intents applied to the selection on the next session update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEdit {
    SelectCore { slot: Slot, core: CoreItemId },
    ClearSlot(Slot),
    SelectCombination(CombinationId),
    DeselectCombination(CombinationId),
    SelectCard { card: CardId, rank: Rank },
    DeselectCard(CardId),
    SetGraspCap(GraspCap),
}

/// Resource storing the edits for the next update.
#[derive(Resource, Default, Debug)]
pub struct EditQueue(pub Vec<SelectionEdit>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum EditRejection {
    #[error("{0} is not in the catalog")]
    UnknownCore(CoreItemId),

    #[error("{item} belongs in slot {expected}, not {requested}")]
    SlotMismatch {
        item: CoreItemId,
        requested: Slot,
        expected: Slot,
    },

    #[error("{0} is not in the catalog")]
    UnknownCombination(CombinationId),

    #[error("{0} prerequisites not met")]
    CombinationLocked(CombinationId),

    #[error("{0} is not in the catalog")]
    UnknownCard(CardId),

    #[error("{0} awakens automatically and cannot be toggled")]
    AwakeningCard(CardId),
}

/// Edits rejected during the most recent update.
#[derive(Resource, Default, Debug)]
pub struct EditLog(pub Vec<EditRejection>);

/// System: applies queued edits in order, rejecting the ones that would break
/// a selection invariant.
pub fn apply_edits_system(
    catalog: Res<CatalogHandle>,
    mut queue: ResMut<EditQueue>,
    mut selection: ResMut<Selection>,
    mut log: ResMut<EditLog>,
) {
    log.0.clear();
    if queue.0.is_empty() {
        return;
    }
    for edit in queue.0.drain(..) {
        match check_edit(&catalog.0, &selection, &edit) {
            Ok(()) => apply_edit(&catalog.0, &mut selection, edit),
            Err(rejection) => {
                debug!(%rejection, "selection edit rejected");
                log.0.push(rejection);
            }
        }
    }
}

/// Whether `edit` may be applied to `selection` as it stands.
pub fn check_edit(
    catalog: &Catalog,
    selection: &Selection,
    edit: &SelectionEdit,
) -> Result<(), EditRejection> {
    match *edit {
        SelectionEdit::SelectCore { slot, core } => {
            let item = catalog.core(core).ok_or(EditRejection::UnknownCore(core))?;
            if item.slot != slot {
                return Err(EditRejection::SlotMismatch {
                    item: core,
                    requested: slot,
                    expected: item.slot,
                });
            }
            Ok(())
        }
        SelectionEdit::SelectCombination(id) => {
            let item = catalog
                .combination(id)
                .ok_or(EditRejection::UnknownCombination(id))?;
            if !is_satisfied(&item.clauses, &selection.core_ids()) {
                return Err(EditRejection::CombinationLocked(id));
            }
            Ok(())
        }
        SelectionEdit::SelectCard { card, .. } | SelectionEdit::DeselectCard(card) => {
            let item = catalog.card(card).ok_or(EditRejection::UnknownCard(card))?;
            if item.is_awakening() {
                return Err(EditRejection::AwakeningCard(card));
            }
            Ok(())
        }
        SelectionEdit::ClearSlot(_)
        | SelectionEdit::DeselectCombination(_)
        | SelectionEdit::SetGraspCap(_) => Ok(()),
    }
}

fn apply_edit(catalog: &Catalog, selection: &mut Selection, edit: SelectionEdit) {
    match edit {
        SelectionEdit::SelectCore { slot, core } => {
            selection.cores.insert(slot, core);
        }
        SelectionEdit::ClearSlot(slot) => {
            selection.cores.remove(&slot);
        }
        SelectionEdit::SelectCombination(id) => {
            match catalog.combination(id).map(|item| item.kind) {
                Some(CombinationKind::Duo) => {
                    selection.duos.insert(id);
                }
                Some(CombinationKind::Legendary) => {
                    selection.legendaries.insert(id);
                }
                None => {}
            }
        }
        SelectionEdit::DeselectCombination(id) => {
            selection.duos.remove(&id);
            selection.legendaries.remove(&id);
        }
        SelectionEdit::SelectCard { card, rank } => {
            selection.cards.insert(card, rank);
        }
        SelectionEdit::DeselectCard(card) => {
            selection.cards.remove(&card);
        }
        SelectionEdit::SetGraspCap(cap) => {
            selection.grasp_cap = cap;
        }
    }
}
