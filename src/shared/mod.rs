pub mod macros;
pub mod structs;

pub use structs::format_requests;
pub use structs::Direction;
pub use structs::DoorState;
pub use structs::ElevatorStatus;
pub use structs::Request;
pub use structs::SystemStatus;
