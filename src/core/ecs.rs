use std::sync::Arc;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;

use crate::catalog::Catalog;
use crate::rules::awakening::{AwakeningOutcome, DEFAULT_MAX_AWAKENING_PASSES};
use crate::rules::budget::BudgetStatus;
use crate::rules::selection::Selection;
use crate::rules::unlock::Availability;
use crate::systems::intake::{apply_edits_system, EditLog, EditQueue};
use crate::systems::resolve::{awaken_system, budget_system, resolve_unlocks_system};

/// Canonical update ordering for a build session.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SessionSet {
    Intake,
    Resolve,
    Report,
}

/// Read-only catalog shared by every session in the process.
#[derive(Resource, Debug, Clone)]
pub struct CatalogHandle(pub Arc<Catalog>);

#[derive(Resource, Debug, Clone, Copy)]
pub struct SessionSettings {
    pub max_awakening_passes: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_awakening_passes: DEFAULT_MAX_AWAKENING_PASSES,
        }
    }
}

/// Build the ECS world with baseline resources.
pub fn create_world(catalog: Arc<Catalog>, settings: SessionSettings, selection: Selection) -> World {
    let mut world = World::new();
    world.insert_resource(CatalogHandle(catalog));
    world.insert_resource(settings);
    world.insert_resource(selection);
    world.insert_resource(EditQueue::default());
    world.insert_resource(EditLog::default());
    world.insert_resource(Availability::default());
    world.insert_resource(AwakeningOutcome::default());
    world.insert_resource(BudgetStatus::default());
    world
}

/// Build the system schedule in the canonical order. Derived state is only
/// recomputed when the selection changed since the last update.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets(
        (SessionSet::Intake, SessionSet::Resolve, SessionSet::Report).chain(),
    );
    schedule.configure_sets(SessionSet::Resolve.run_if(resource_changed::<Selection>));
    schedule.configure_sets(SessionSet::Report.run_if(resource_changed::<Selection>));

    schedule.add_systems((
        apply_edits_system.in_set(SessionSet::Intake),
        (resolve_unlocks_system, awaken_system)
            .chain()
            .in_set(SessionSet::Resolve),
        budget_system.in_set(SessionSet::Report),
    ));

    schedule
}
