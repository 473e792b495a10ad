pub mod fsm;
pub mod report;

pub use fsm::AssignError;
pub use fsm::ElevatorUnit;
pub use report::ElevatorReport;
