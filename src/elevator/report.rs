/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Serialize;
use std::fmt;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, DoorState};

/***************************************/
/*       Public data structures        */
/***************************************/

/**
 * Point-in-time view of one car.
 *
 * The variant set is closed: a car is either idle at a terminal floor, parked out of
 * service, or active (moving or stopped with the door cycling). `Display` produces the
 * fixed text format consumed by text-mode frontends.
 */
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ElevatorReport {
    #[serde(rename_all = "camelCase")]
    Waiting {
        floor: usize,
        idle_timer: u32,
    },
    #[serde(rename_all = "camelCase")]
    Active {
        floor: usize,
        direction: Direction,
        door: DoorState,
        stops: Vec<usize>,
        n_floors: usize,
    },
    OutOfService {
        floor: usize,
    },
}

impl ElevatorReport {
    pub fn current_floor(&self) -> usize {
        match *self {
            ElevatorReport::Waiting { floor, .. } => floor,
            ElevatorReport::Active { floor, .. } => floor,
            ElevatorReport::OutOfService { floor } => floor,
        }
    }

    pub fn is_door_closed(&self) -> bool {
        match self {
            ElevatorReport::Active { door, .. } => door.is_closed(),
            _ => true,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            ElevatorReport::Active { direction, .. } => *direction,
            _ => Direction::Stop,
        }
    }
}

impl fmt::Display for ElevatorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevatorReport::Waiting { floor, idle_timer } => {
                write!(f, "Waiting[Floor {}, Time {}]", floor, idle_timer)
            }
            ElevatorReport::OutOfService { floor } => {
                write!(f, "Out of Service[Floor {}]", floor)
            }
            ElevatorReport::Active {
                floor,
                direction,
                door,
                stops,
                n_floors,
            } => {
                let door_marker = match door {
                    DoorState::Closed => "C  ".to_string(),
                    DoorState::Open(remaining) => format!("O {}", remaining),
                };
                write!(f, "[{}|{}|{}]<", floor, direction.symbol(), door_marker)?;
                for slot in 0..*n_floors {
                    if stops.contains(&slot) {
                        write!(f, " {:>2}", slot)?;
                    } else {
                        write!(f, " --")?;
                    }
                }
                write!(f, ">")
            }
        }
    }
}

/// Joins reports the way the building report prints them: `a, b, c`.
pub fn format_reports(reports: &[ElevatorReport]) -> String {
    reports
        .iter()
        .map(|report| report.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}
