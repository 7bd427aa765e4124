use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{
    CardId, Catalog, ClauseGroup, CombinationId, CombinationKind, CoreItemId, Slot,
};
use crate::rules::awakening::predicate_holds;
use crate::rules::budget::{budget_status, GRASP_CAP_RANGE};
use crate::rules::prerequisite::{is_satisfied, unmet_groups};
use crate::rules::selection::{Build, MAX_RANK, MIN_RANK};

/// One reason a build cannot be finalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("build name is empty")]
    MissingName,

    #[error("weapon aspect is missing")]
    MissingWeaponAspect,

    #[error("slot {slot} holds {} core items", .cores.len())]
    DuplicateSlot { slot: Slot, cores: Vec<CoreItemId> },

    #[error("{item} belongs in slot {expected}, not {assigned}")]
    SlotMismatch {
        item: CoreItemId,
        assigned: Slot,
        expected: Slot,
    },

    #[error("{0} is not in the catalog")]
    UnknownCore(CoreItemId),

    #[error("{0} is not in the catalog")]
    UnknownCombination(CombinationId),

    #[error("{id} is not a {} item", .expected.as_str().to_lowercase())]
    WrongCombinationKind {
        id: CombinationId,
        expected: CombinationKind,
    },

    #[error("{id} prerequisites not met ({} clause groups unsatisfied)", .missing.len())]
    PrerequisitesUnmet {
        id: CombinationId,
        missing: Vec<ClauseGroup>,
    },

    #[error("{0} is not in the catalog")]
    UnknownCard(CardId),

    #[error("{0} selected more than once")]
    DuplicateCard(CardId),

    #[error("{card} rank {rank} outside 1..=4")]
    RankOutOfRange { card: CardId, rank: u8 },

    #[error("grasp cap {0} outside the allowed range")]
    GraspCapOutOfRange(u32),

    #[error("cards cost {total} grasp, cap is {cap}")]
    OverBudget { total: u32, cap: u32 },

    #[error("{card} should {} awake", awake_word(.should_be_active))]
    AwakeningMismatch { card: CardId, should_be_active: bool },
}

fn awake_word(should_be_active: &bool) -> &'static str {
    if *should_be_active {
        "be"
    } else {
        "not be"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn ok(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn reasons(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Check every build invariant and report all failures together.
pub fn validate_build(catalog: &Catalog, build: &Build) -> ValidationReport {
    let mut issues = Vec::new();

    if build.name.trim().is_empty() {
        issues.push(ValidationIssue::MissingName);
    }
    if build
        .weapon_aspect
        .as_deref()
        .map_or(true, |aspect| aspect.trim().is_empty())
    {
        issues.push(ValidationIssue::MissingWeaponAspect);
    }

    check_cores(catalog, build, &mut issues);
    check_combinations(catalog, build, &mut issues);
    check_cards(catalog, build, &mut issues);

    ValidationReport { issues }
}

fn check_cores(catalog: &Catalog, build: &Build, issues: &mut Vec<ValidationIssue>) {
    let mut by_slot: BTreeMap<Slot, Vec<CoreItemId>> = BTreeMap::new();
    for assignment in &build.cores {
        by_slot
            .entry(assignment.slot)
            .or_default()
            .push(assignment.core);
    }
    for (slot, cores) in by_slot {
        if cores.len() > 1 {
            issues.push(ValidationIssue::DuplicateSlot { slot, cores });
        }
    }

    for assignment in &build.cores {
        match catalog.core(assignment.core) {
            None => issues.push(ValidationIssue::UnknownCore(assignment.core)),
            Some(core) if core.slot != assignment.slot => {
                issues.push(ValidationIssue::SlotMismatch {
                    item: core.id,
                    assigned: assignment.slot,
                    expected: core.slot,
                });
            }
            Some(_) => {}
        }
    }
}

fn check_combinations(catalog: &Catalog, build: &Build, issues: &mut Vec<ValidationIssue>) {
    let selected = build.core_ids();
    let picks = build
        .duos
        .iter()
        .map(|id| (*id, CombinationKind::Duo))
        .chain(
            build
                .legendaries
                .iter()
                .map(|id| (*id, CombinationKind::Legendary)),
        );

    for (id, expected) in picks {
        let Some(item) = catalog.combination(id) else {
            issues.push(ValidationIssue::UnknownCombination(id));
            continue;
        };
        if item.kind != expected {
            issues.push(ValidationIssue::WrongCombinationKind { id, expected });
        }
        if !is_satisfied(&item.clauses, &selected) {
            issues.push(ValidationIssue::PrerequisitesUnmet {
                id,
                missing: unmet_groups(&item.clauses, &selected),
            });
        }
    }
}

/// Zero-cost cards are checked for self-consistency only: any awakened set in
/// which every predicate agrees with membership is accepted, including a set
/// that a cold evaluation would not reach.
fn check_cards(catalog: &Catalog, build: &Build, issues: &mut Vec<ValidationIssue>) {
    let mut seen = BTreeSet::new();
    for pick in &build.cards {
        if !seen.insert(pick.card) {
            issues.push(ValidationIssue::DuplicateCard(pick.card));
        }
        if catalog.card(pick.card).is_none() {
            issues.push(ValidationIssue::UnknownCard(pick.card));
        }
        if !(MIN_RANK..=MAX_RANK).contains(&pick.rank) {
            issues.push(ValidationIssue::RankOutOfRange {
                card: pick.card,
                rank: pick.rank,
            });
        }
    }

    if !GRASP_CAP_RANGE.contains(&build.grasp_cap) {
        issues.push(ValidationIssue::GraspCapOutOfRange(build.grasp_cap));
    }
    let status = budget_status(catalog, &seen, build.grasp_cap);
    if status.is_over_cap {
        issues.push(ValidationIssue::OverBudget {
            total: status.total,
            cap: status.cap,
        });
    }

    for card in catalog.awakening_cards() {
        let should_be_active = predicate_holds(catalog, card, &seen);
        if should_be_active != seen.contains(&card.id) {
            issues.push(ValidationIssue::AwakeningMismatch {
                card: card.id,
                should_be_active,
            });
        }
    }
}
