use std::collections::BTreeSet;

use bevy_ecs::prelude::*;
use serde::Serialize;

use crate::catalog::{Catalog, CombinationId, CombinationKind, CoreItemId};
use crate::rules::prerequisite::is_satisfied;
use crate::rules::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemAvailability {
    pub id: CombinationId,
    pub is_available: bool,
}

/// Availability for one catalog subset, in catalog order.
pub fn resolve_availability(
    catalog: &Catalog,
    selected: &BTreeSet<CoreItemId>,
    kind: CombinationKind,
) -> Vec<ItemAvailability> {
    catalog
        .combinations_of(kind)
        .map(|item| ItemAvailability {
            id: item.id,
            is_available: is_satisfied(&item.clauses, selected),
        })
        .collect()
}

/// Both subsets, recomputed together after a core selection change.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub duos: Vec<ItemAvailability>,
    pub legendaries: Vec<ItemAvailability>,
}

impl Availability {
    pub fn is_available(&self, id: CombinationId) -> bool {
        self.duos
            .iter()
            .chain(self.legendaries.iter())
            .any(|entry| entry.id == id && entry.is_available)
    }

    /// Items still in the selection whose prerequisites no longer hold.
    pub fn locked_selections(&self, selection: &Selection) -> Vec<CombinationId> {
        selection
            .duos
            .iter()
            .chain(selection.legendaries.iter())
            .copied()
            .filter(|id| !self.is_available(*id))
            .collect()
    }
}

pub fn resolve_all(catalog: &Catalog, selected: &BTreeSet<CoreItemId>) -> Availability {
    Availability {
        duos: resolve_availability(catalog, selected, CombinationKind::Duo),
        legendaries: resolve_availability(catalog, selected, CombinationKind::Legendary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::index::fixtures::*;
    use crate::catalog::Slot;
    use crate::rules::budget::GraspCap;

    fn sample() -> Catalog {
        catalog(
            vec![
                core(1, 1, Slot::Attack),
                core(2, 1, Slot::Special),
                core(3, 2, Slot::Cast),
            ],
            vec![
                combination(10, CombinationKind::Duo, vec![clause(1, &[1, 2]), clause(2, &[3])]),
                combination(11, CombinationKind::Duo, Vec::new()),
                combination(20, CombinationKind::Legendary, vec![clause(1, &[1]), clause(2, &[2])]),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn reports_each_subset_in_catalog_order() {
        let catalog = sample();
        let selected: BTreeSet<_> = [CoreItemId(1), CoreItemId(3)].into_iter().collect();

        let duos = resolve_availability(&catalog, &selected, CombinationKind::Duo);
        assert_eq!(
            duos,
            vec![
                ItemAvailability { id: CombinationId(10), is_available: true },
                ItemAvailability { id: CombinationId(11), is_available: false },
            ]
        );

        let legendaries = resolve_availability(&catalog, &selected, CombinationKind::Legendary);
        assert_eq!(
            legendaries,
            vec![ItemAvailability { id: CombinationId(20), is_available: false }]
        );
    }

    #[test]
    fn repeated_resolution_is_identical() {
        let catalog = sample();
        let selected: BTreeSet<_> = [CoreItemId(2), CoreItemId(3)].into_iter().collect();
        assert_eq!(resolve_all(&catalog, &selected), resolve_all(&catalog, &selected));
    }

    #[test]
    fn locked_selections_are_reported_not_evicted() {
        let catalog = sample();
        let mut selection = Selection::new(GraspCap::default());
        selection.duos.insert(CombinationId(10));

        let availability = resolve_all(&catalog, &BTreeSet::new());
        assert_eq!(availability.locked_selections(&selection), vec![CombinationId(10)]);
        assert!(selection.duos.contains(&CombinationId(10)));
    }
}
