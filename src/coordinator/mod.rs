pub mod coordinator;
pub mod coordinator_tests;
pub mod report;

pub use coordinator::Building;
pub use coordinator::ConstructionError;
pub use coordinator::RequestError;
pub use report::BuildingReport;
