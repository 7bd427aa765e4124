pub mod intake;
pub mod resolve;

pub use intake::{apply_edits_system, check_edit, EditLog, EditQueue, EditRejection, SelectionEdit};
pub use resolve::{awaken_system, budget_system, resolve_unlocks_system};
