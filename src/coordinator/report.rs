/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Serialize;
use std::fmt;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::elevator::report::format_reports;
use crate::elevator::ElevatorReport;
use crate::shared::{format_requests, Request, SystemStatus};

/***************************************/
/*       Public data structures        */
/***************************************/

/**
 * Immutable snapshot of the whole building, produced by `Building::status_snapshot`.
 *
 * # Fields
 * - `n_floors`, `n_elevators`, `capacity`: Building dimensions.
 * - `tick`:               Number of ticks the building has advanced.
 * - `elevator_reports`:   One report per car, in fleet order.
 * - `up_requests`:        Pending upward requests, oldest first.
 * - `down_requests`:      Pending downward requests, oldest first.
 * - `system_status`:      Building wide status.
 */
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildingReport {
    pub n_floors: usize,
    pub n_elevators: usize,
    pub capacity: usize,
    pub tick: u64,
    pub elevator_reports: Vec<ElevatorReport>,
    pub up_requests: Vec<Request>,
    pub down_requests: Vec<Request>,
    pub system_status: SystemStatus,
}

impl fmt::Display for BuildingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BuildingReport:")?;
        writeln!(
            f,
            "Number of floors: {}, Number of elevators: {}, Elevator capacity: {}, \
             Up requests: [{}], Down requests: [{}], System status: {}",
            self.n_floors,
            self.n_elevators,
            self.capacity,
            format_requests(&self.up_requests),
            format_requests(&self.down_requests),
            self.system_status
        )?;
        writeln!(
            f,
            "Elevator reports: [{}]",
            format_reports(&self.elevator_reports)
        )
    }
}
