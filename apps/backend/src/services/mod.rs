pub mod event_loop;
pub mod health;
pub mod move_flow;

pub use event_loop::{spawn_coordinator, CoordinatorHandle};
pub use move_flow::MoveCoordinator;
