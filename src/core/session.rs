use std::sync::Arc;

use bevy_ecs::prelude::*;
use serde::Serialize;

use crate::catalog::{Catalog, CombinationId};
use crate::config::EngineConfig;
use crate::core::ecs::{create_schedule, create_world, CatalogHandle, SessionSettings};
use crate::error::ConfigError;
use crate::rules::awakening::AwakeningOutcome;
use crate::rules::budget::BudgetStatus;
use crate::rules::selection::{Build, Selection};
use crate::rules::tier::{build_score, tier_from_score, Tier};
use crate::rules::unlock::Availability;
use crate::rules::validate::{validate_build, ValidationReport};
use crate::systems::intake::{EditLog, EditQueue, EditRejection, SelectionEdit};

/// Data snapshot returned to the caller after each update.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub selection: Selection,
    pub availability: Availability,
    /// Selected combinations whose prerequisites no longer hold.
    pub locked: Vec<CombinationId>,
    pub awakening: AwakeningOutcome,
    pub budget: BudgetStatus,
    /// Provisional, computed from the selection as it stands.
    pub score: u32,
    pub tier: Tier,
    pub rejections: Vec<EditRejection>,
}

impl SessionSnapshot {
    fn capture(world: &World) -> Self {
        let selection = world.resource::<Selection>().clone();
        let availability = world.resource::<Availability>().clone();
        let score = build_score(&selection.to_build("", None));
        Self {
            locked: availability.locked_selections(&selection),
            availability,
            awakening: world.resource::<AwakeningOutcome>().clone(),
            budget: *world.resource::<BudgetStatus>(),
            score,
            tier: tier_from_score(score),
            rejections: world.resource::<EditLog>().0.clone(),
            selection,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalizedBuild {
    pub build: Build,
    pub score: u32,
    pub tier: Tier,
    pub grasp_total: u32,
}

/// One player's build-in-progress: an ECS world over a shared catalog.
pub struct BuildSession {
    world: World,
    schedule: Schedule,
}

impl BuildSession {
    /// Start an empty build using the configured cap and pass limit.
    pub fn new(catalog: Arc<Catalog>, config: &EngineConfig) -> Result<Self, ConfigError> {
        let selection = Selection::new(config.grasp_cap()?);
        Self::resume(catalog, config, selection)
    }

    /// Continue from a previously saved selection. Derived state is
    /// recomputed before this returns.
    pub fn resume(
        catalog: Arc<Catalog>,
        config: &EngineConfig,
        selection: Selection,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let settings = SessionSettings {
            max_awakening_passes: config.max_awakening_passes,
        };
        let mut world = create_world(catalog, settings, selection);
        let mut schedule = create_schedule();
        schedule.run(&mut world);
        Ok(Self { world, schedule })
    }

    /// Run one update with the provided edits and return the resulting state.
    pub fn apply(&mut self, edits: Vec<SelectionEdit>) -> SessionSnapshot {
        {
            let mut queue = self.world.resource_mut::<EditQueue>();
            queue.0 = edits;
        }

        self.schedule.run(&mut self.world);
        SessionSnapshot::capture(&self.world)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.world)
    }

    pub fn selection(&self) -> &Selection {
        self.world.resource::<Selection>()
    }

    /// Validate the current selection as a named build.
    pub fn finalize(
        &self,
        name: impl Into<String>,
        weapon_aspect: Option<String>,
    ) -> Result<FinalizedBuild, ValidationReport> {
        let catalog = &self.world.resource::<CatalogHandle>().0;
        let build = self.selection().to_build(name, weapon_aspect);
        let report = validate_build(catalog, &build);
        if !report.ok() {
            return Err(report);
        }
        let score = build_score(&build);
        Ok(FinalizedBuild {
            score,
            tier: tier_from_score(score),
            grasp_total: self.world.resource::<BudgetStatus>().total,
            build,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::index::fixtures::*;
    use crate::catalog::{
        AwakeningPredicate, CardId, ClauseGroup, CombinationKind, CoreItemId, Slot,
    };
    use crate::rules::selection::Rank;
    use crate::rules::validate::ValidationIssue;

    fn sample() -> Arc<Catalog> {
        Arc::new(catalog(
            vec![
                core(1, 1, Slot::Attack),
                core(2, 2, Slot::Special),
                core(3, 2, Slot::Cast),
            ],
            vec![combination(
                10,
                CombinationKind::Duo,
                vec![clause(1, &[1]), clause(2, &[2, 3])],
            )],
            vec![
                card(1, Some((0, 0)), 3, None),
                card(2, Some((0, 1)), 0, Some(AwakeningPredicate::AdjacencyAny)),
                card(3, Some((4, 4)), 4, None),
            ],
        ))
    }

    fn session() -> BuildSession {
        BuildSession::new(sample(), &EngineConfig::default()).unwrap()
    }

    fn pick_cores() -> Vec<SelectionEdit> {
        vec![
            SelectionEdit::SelectCore { slot: Slot::Attack, core: CoreItemId(1) },
            SelectionEdit::SelectCore { slot: Slot::Special, core: CoreItemId(2) },
        ]
    }

    #[test]
    fn new_session_starts_empty_and_locked() {
        let snapshot = session().snapshot();
        assert!(!snapshot.availability.is_available(CombinationId(10)));
        assert_eq!(snapshot.budget.total, 0);
        assert_eq!(snapshot.budget.cap, 10);
        assert_eq!(snapshot.tier, Tier::D);
        assert!(snapshot.rejections.is_empty());
    }

    #[test]
    fn cores_unlock_duo_and_selection_sticks() {
        let mut session = session();
        let mut edits = pick_cores();
        edits.push(SelectionEdit::SelectCombination(CombinationId(10)));
        let snapshot = session.apply(edits);

        assert!(snapshot.rejections.is_empty());
        assert!(snapshot.availability.is_available(CombinationId(10)));
        assert!(snapshot.selection.duos.contains(&CombinationId(10)));
        assert_eq!(snapshot.score, 2 * 10 + 25);
    }

    #[test]
    fn locked_and_mismatched_picks_are_rejected() {
        let mut session = session();
        let snapshot = session.apply(vec![
            SelectionEdit::SelectCombination(CombinationId(10)),
            SelectionEdit::SelectCore { slot: Slot::Cast, core: CoreItemId(1) },
            SelectionEdit::SelectCore { slot: Slot::Magick, core: CoreItemId(99) },
        ]);

        assert_eq!(
            snapshot.rejections,
            vec![
                EditRejection::CombinationLocked(CombinationId(10)),
                EditRejection::SlotMismatch {
                    item: CoreItemId(1),
                    requested: Slot::Cast,
                    expected: Slot::Attack,
                },
                EditRejection::UnknownCore(CoreItemId(99)),
            ]
        );
        assert!(snapshot.selection.cores.is_empty());
        assert!(snapshot.selection.duos.is_empty());
    }

    #[test]
    fn rejections_reset_each_update() {
        let mut session = session();
        let snapshot = session.apply(vec![SelectionEdit::SelectCombination(CombinationId(10))]);
        assert_eq!(snapshot.rejections.len(), 1);
        let snapshot = session.apply(Vec::new());
        assert!(snapshot.rejections.is_empty());
    }

    #[test]
    fn awakened_cards_are_written_back_at_base_rank() {
        let mut session = session();
        let snapshot = session.apply(vec![SelectionEdit::SelectCard {
            card: CardId(1),
            rank: Rank::try_from(3).unwrap(),
        }]);

        assert_eq!(snapshot.awakening.awakened, vec![CardId(2)]);
        assert!(snapshot.awakening.converged);
        assert_eq!(snapshot.selection.cards.get(&CardId(1)).map(|r| r.get()), Some(3));
        assert_eq!(snapshot.selection.cards.get(&CardId(2)), Some(&Rank::BASE));
        assert_eq!(snapshot.budget.total, 3);

        let snapshot = session.apply(vec![SelectionEdit::DeselectCard(CardId(1))]);
        assert!(snapshot.selection.cards.is_empty());
        assert!(snapshot.awakening.awakened.is_empty());
    }

    #[test]
    fn awakening_cards_cannot_be_toggled() {
        let mut session = session();
        let snapshot = session.apply(vec![SelectionEdit::SelectCard {
            card: CardId(2),
            rank: Rank::BASE,
        }]);
        assert_eq!(snapshot.rejections, vec![EditRejection::AwakeningCard(CardId(2))]);
        assert!(snapshot.selection.cards.is_empty());
    }

    #[test]
    fn over_budget_is_reported_not_blocked() {
        let mut session = session();
        let snapshot = session.apply(vec![
            SelectionEdit::SelectCard { card: CardId(1), rank: Rank::BASE },
            SelectionEdit::SelectCard { card: CardId(3), rank: Rank::BASE },
            SelectionEdit::SetGraspCap(crate::rules::budget::GraspCap::try_from(5).unwrap()),
        ]);
        assert_eq!(snapshot.budget.total, 7);
        assert_eq!(snapshot.budget.cap, 5);
        assert!(snapshot.budget.is_over_cap);
        assert!(snapshot.selection.cards.contains_key(&CardId(3)));
    }

    #[test]
    fn clearing_a_prerequisite_reports_locked_selection() {
        let mut session = session();
        let mut edits = pick_cores();
        edits.push(SelectionEdit::SelectCombination(CombinationId(10)));
        session.apply(edits);

        let snapshot = session.apply(vec![SelectionEdit::ClearSlot(Slot::Special)]);
        assert!(!snapshot.availability.is_available(CombinationId(10)));
        assert_eq!(snapshot.locked, vec![CombinationId(10)]);
    }

    #[test]
    fn finalize_reports_every_issue() {
        let mut session = session();
        let mut edits = pick_cores();
        edits.push(SelectionEdit::SelectCombination(CombinationId(10)));
        edits.push(SelectionEdit::ClearSlot(Slot::Special));
        session.apply(edits);

        let report = session.finalize("", None).unwrap_err();
        assert_eq!(
            report.issues,
            vec![
                ValidationIssue::MissingName,
                ValidationIssue::MissingWeaponAspect,
                ValidationIssue::PrerequisitesUnmet {
                    id: CombinationId(10),
                    missing: vec![ClauseGroup(2)],
                },
            ]
        );
    }

    #[test]
    fn finalize_scores_a_valid_build() {
        let mut session = session();
        let mut edits = pick_cores();
        edits.push(SelectionEdit::SelectCombination(CombinationId(10)));
        edits.push(SelectionEdit::SelectCard { card: CardId(1), rank: Rank::BASE });
        session.apply(edits);

        let finalized = session
            .finalize("Storm Front", Some("Aspect of Melinoe".to_string()))
            .unwrap();
        assert_eq!(finalized.score, 45);
        assert_eq!(finalized.tier, Tier::D);
        assert_eq!(finalized.grasp_total, 3);
        assert_eq!(finalized.build.cards.len(), 2);
    }

    #[test]
    fn resume_recomputes_derived_state() {
        let mut selection = Selection::new(Default::default());
        selection.cores.insert(Slot::Attack, CoreItemId(1));
        selection.cores.insert(Slot::Cast, CoreItemId(3));
        selection.cards.insert(CardId(1), Rank::BASE);

        let session = BuildSession::resume(sample(), &EngineConfig::default(), selection).unwrap();
        let snapshot = session.snapshot();
        assert!(snapshot.availability.is_available(CombinationId(10)));
        assert_eq!(snapshot.awakening.awakened, vec![CardId(2)]);
        assert_eq!(snapshot.budget.total, 3);
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = EngineConfig {
            grasp_cap: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            BuildSession::new(sample(), &config),
            Err(ConfigError::GraspCapOutOfRange { value: 0, .. })
        ));
    }
}
