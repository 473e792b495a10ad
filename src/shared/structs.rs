/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Serialize;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stop,
}

impl Direction {
    pub fn symbol(&self) -> char {
        match *self {
            Direction::Up => '^',
            Direction::Down => 'v',
            Direction::Stop => '-',
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DoorState {
    Closed,
    Open(u32),
}

impl DoorState {
    pub fn is_closed(&self) -> bool {
        *self == DoorState::Closed
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ElevatorStatus {
    Waiting,
    Moving,
    StoppedAtFloor,
    OutOfService,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SystemStatus {
    OutOfService,
    Running,
    Stopping,
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SystemStatus::OutOfService => write!(f, "Out of Service"),
            SystemStatus::Running => write!(f, "Running"),
            SystemStatus::Stopping => write!(f, "Stopping"),
        }
    }
}

/**
 * A transport intent from one floor to another.
 *
 * Floors are 0-indexed internally; `Display` renders them 1-indexed (`"3->4"` for a
 * request from floor 2 to floor 3). Range checking against a particular building is
 * done by the building when the request is submitted.
 */
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    start_floor: usize,
    end_floor: usize,
}

impl Request {
    pub fn new(start_floor: usize, end_floor: usize) -> Request {
        Request {
            start_floor,
            end_floor,
        }
    }

    pub fn start_floor(&self) -> usize {
        self.start_floor
    }

    pub fn end_floor(&self) -> usize {
        self.end_floor
    }

    pub fn direction(&self) -> Direction {
        if self.start_floor < self.end_floor {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.start_floor + 1, self.end_floor + 1)
    }
}

/// Renders a request queue the way reports show it: `3->4, 5->4`.
pub fn format_requests<'a, I>(requests: I) -> String
where
    I: IntoIterator<Item = &'a Request>,
{
    requests
        .into_iter()
        .map(|request| request.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

/***************************************/
/*             Unit tests              */
/***************************************/
