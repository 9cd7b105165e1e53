//! Wire boundary between the bus and the coordinator.

pub mod inbound;
pub mod outbound;
pub mod status;
pub mod topics;

pub use inbound::{BusEvent, LogEcho, Rejection, StateEcho};
pub use outbound::{BusMessage, GameOver, Notification, Outbound};
pub use status::{Component, RawStatus, Signal};
pub use topics::Topic;
