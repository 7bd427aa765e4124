use std::ops::RangeInclusive;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{CardId, Catalog};
use crate::error::ConfigError;

/// Accepted values for the grasp cap.
pub const GRASP_CAP_RANGE: RangeInclusive<u32> = 1..=30;
pub const DEFAULT_GRASP_CAP: u32 = 10;

/// Budget available to costed passive cards. Only values inside
/// [`GRASP_CAP_RANGE`] can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GraspCap(u32);

impl GraspCap {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for GraspCap {
    fn default() -> Self {
        GraspCap(DEFAULT_GRASP_CAP)
    }
}

impl TryFrom<u32> for GraspCap {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if GRASP_CAP_RANGE.contains(&value) {
            Ok(GraspCap(value))
        } else {
            Err(ConfigError::GraspCapOutOfRange {
                value,
                min: *GRASP_CAP_RANGE.start(),
                max: *GRASP_CAP_RANGE.end(),
            })
        }
    }
}

impl From<GraspCap> for u32 {
    fn from(cap: GraspCap) -> Self {
        cap.0
    }
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub total: u32,
    pub cap: u32,
    pub is_over_cap: bool,
}

/// Sum of costs over the active cards. Unknown ids and zero-cost cards add nothing.
pub fn total_cost<'a>(catalog: &Catalog, active: impl IntoIterator<Item = &'a CardId>) -> u32 {
    active
        .into_iter()
        .filter_map(|id| catalog.card(*id))
        .map(|card| u32::from(card.cost))
        .sum()
}

pub fn is_over_budget(total: u32, cap: u32) -> bool {
    total > cap
}

pub fn budget_status<'a>(
    catalog: &Catalog,
    active: impl IntoIterator<Item = &'a CardId>,
    cap: u32,
) -> BudgetStatus {
    let total = total_cost(catalog, active);
    BudgetStatus {
        total,
        cap,
        is_over_cap: is_over_budget(total, cap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::index::fixtures::*;
    use crate::catalog::AwakeningPredicate;

    fn priced_catalog() -> Catalog {
        catalog(
            Vec::new(),
            Vec::new(),
            vec![
                card(1, Some((0, 0)), 1, None),
                card(2, Some((0, 1)), 2, None),
                card(3, Some((0, 2)), 5, None),
                card(4, Some((0, 3)), 0, Some(AwakeningPredicate::AdjacencyAny)),
            ],
        )
    }

    #[test]
    fn sums_costs_against_cap() {
        let catalog = priced_catalog();
        let active = [CardId(1), CardId(2), CardId(3)];

        let status = budget_status(&catalog, &active, 10);
        assert_eq!(status.total, 8);
        assert!(!status.is_over_cap);

        let status = budget_status(&catalog, &active, 7);
        assert!(status.is_over_cap);
    }

    #[test]
    fn awakened_and_unknown_cards_are_free() {
        let catalog = priced_catalog();
        assert_eq!(total_cost(&catalog, &[CardId(4), CardId(99)]), 0);
    }

    #[test]
    fn cap_at_total_is_not_over() {
        assert!(!is_over_budget(8, 8));
        assert!(is_over_budget(9, 8));
    }

    #[test]
    fn cap_rejects_out_of_range_values() {
        assert!(GraspCap::try_from(0).is_err());
        assert!(GraspCap::try_from(31).is_err());
        assert_eq!(GraspCap::try_from(30).map(GraspCap::get).ok(), Some(30));
        assert!(serde_json::from_str::<GraspCap>("45").is_err());
    }
}
