pub mod ecs;
pub mod session;

pub use ecs::{create_schedule, create_world, CatalogHandle, SessionSet, SessionSettings};
pub use session::{BuildSession, FinalizedBuild, SessionSnapshot};
