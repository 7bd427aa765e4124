pub mod awakening;
pub mod budget;
pub mod prerequisite;
pub mod selection;
pub mod tier;
pub mod unlock;
pub mod validate;

pub use awakening::{
    evaluate_awakening, predicate_holds, AwakeningOutcome, DEFAULT_MAX_AWAKENING_PASSES,
};
pub use budget::{
    budget_status, is_over_budget, total_cost, BudgetStatus, GraspCap, DEFAULT_GRASP_CAP,
    GRASP_CAP_RANGE,
};
pub use prerequisite::{group_clauses, is_satisfied, unmet_groups};
pub use selection::{Build, CardPick, Rank, Selection, SlotAssignment};
pub use tier::{build_score, score_tier, tier_from_score, Tier};
pub use unlock::{resolve_all, resolve_availability, Availability, ItemAvailability};
pub use validate::{validate_build, ValidationIssue, ValidationReport};
