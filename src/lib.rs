pub mod config;
pub mod control;
pub mod coordinator;
pub mod elevator;
pub mod shared;

pub use coordinator::{Building, BuildingReport};
pub use elevator::{ElevatorReport, ElevatorUnit};
pub use shared::{Direction, DoorState, ElevatorStatus, Request, SystemStatus};
