/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, warn};
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ElevatorConfig;
use crate::elevator::report::ElevatorReport;
use crate::shared::{Direction, DoorState, ElevatorStatus, Request};

/***************************************/
/*               Errors                */
/***************************************/
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error("elevator {0} is not taking requests")]
    NotTakingRequests(usize),
    #[error("batch of {batch} requests exceeds capacity {capacity}")]
    OverCapacity { batch: usize, capacity: usize },
    #[error("request {0} does not match the direction of the batch")]
    MixedDirections(Request),
    #[error("request {request} cannot be picked up travelling {direction:?} from floor {floor}")]
    WrongDirection {
        request: Request,
        direction: Direction,
        floor: usize,
    },
    #[error("request {0} names a floor outside the building")]
    FloorOutOfRange(Request),
}

/**
 * Tick driven state machine for a single car.
 *
 * The `ElevatorUnit` owns the physical state of one car (floor, direction, door) and its
 * operational state (status, stop list, idle timer). It never acts on its own: the
 * building hands it batches of requests and advances it one tick at a time.
 *
 * # Fields
 * - `id`:              Index of the car within the fleet.
 * - `n_floors`:        Number of floors in the building.
 * - `capacity`:        Maximum number of requests in one batch.
 * - `door_open_ticks`: Ticks the door stays open at a stop.
 * - `idle_ticks`:      Ticks a car idles at a terminal floor before sweeping onward.
 * - `current_floor`:   Floor the car is at.
 * - `direction`:       Direction of travel, `Stop` while idle.
 * - `door`:            Door state, carrying the remaining open ticks when open.
 * - `idle_timer`:      Remaining idle ticks.
 * - `stops`:           Floors still to visit, ordered in the direction of travel.
 * - `status`:          Current state of the machine.
 * - `recalled`:        Set by the building when stopping; the car finishes its stops and parks at floor 0.
 */
#[derive(Debug, Clone)]
pub struct ElevatorUnit {
    id: usize,
    n_floors: usize,
    capacity: usize,
    door_open_ticks: u32,
    idle_ticks: u32,
    current_floor: usize,
    direction: Direction,
    door: DoorState,
    idle_timer: u32,
    stops: Vec<usize>,
    status: ElevatorStatus,
    recalled: bool,
}

impl ElevatorUnit {
    /// Creates a car idle at floor 0.
    pub fn new(id: usize, n_floors: usize, capacity: usize, config: &ElevatorConfig) -> ElevatorUnit {
        ElevatorUnit {
            id,
            n_floors,
            capacity,
            // Door marker in reports has room for a single digit
            door_open_ticks: config.door_open_ticks.clamp(1, 9),
            idle_ticks: config.idle_ticks.max(1),
            current_floor: 0,
            direction: Direction::Stop,
            door: DoorState::Closed,
            idle_timer: config.idle_ticks.max(1),
            stops: Vec::with_capacity(2 * capacity),
            status: ElevatorStatus::Waiting,
            recalled: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn current_floor(&self) -> usize {
        self.current_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn door(&self) -> DoorState {
        self.door
    }

    pub fn is_door_closed(&self) -> bool {
        self.door.is_closed()
    }

    pub fn idle_timer(&self) -> u32 {
        self.idle_timer
    }

    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    pub fn status(&self) -> ElevatorStatus {
        self.status
    }

    pub fn is_recalled(&self) -> bool {
        self.recalled
    }

    pub fn is_taking_requests(&self) -> bool {
        self.status == ElevatorStatus::Waiting && !self.recalled
    }

    /// At the ground floor with the door closed and nothing left to serve.
    pub fn is_parked(&self) -> bool {
        self.current_floor == 0 && self.door.is_closed() && self.stops.is_empty()
    }

    fn top_floor(&self) -> usize {
        self.n_floors - 1
    }

    /// Puts an idle or out of service car back in service, waiting at the current floor
    /// with a full idle timer. Returns false if the car is busy serving stops.
    pub fn start(&mut self) -> bool {
        if self.status == ElevatorStatus::Moving || self.status == ElevatorStatus::StoppedAtFloor {
            return false;
        }

        self.status = ElevatorStatus::Waiting;
        self.direction = Direction::Stop;
        self.door = DoorState::Closed;
        self.idle_timer = self.idle_ticks;
        self.recalled = false;
        debug!("Elevator {} started at floor {}", self.id, self.current_floor);
        true
    }

    /// Stop accepting work, finish the assigned stops and head for floor 0.
    pub fn recall(&mut self) {
        if self.status == ElevatorStatus::OutOfService {
            return;
        }

        self.recalled = true;
        if self.stops.is_empty() && self.current_floor != 0 {
            self.direction = Direction::Down;
            if self.status == ElevatorStatus::Waiting {
                self.status = ElevatorStatus::Moving;
            }
        }
        debug!("Elevator {} recalled at floor {}", self.id, self.current_floor);
    }

    /// Parks the car out of service. Only allowed while parked at the ground floor.
    pub fn take_out_of_service(&mut self) -> bool {
        if self.status == ElevatorStatus::OutOfService {
            return true;
        }
        if !self.is_parked() {
            warn!(
                "Elevator {} cannot be taken out of service at floor {} ({:?})",
                self.id, self.current_floor, self.status
            );
            return false;
        }

        self.status = ElevatorStatus::OutOfService;
        self.direction = Direction::Stop;
        self.idle_timer = self.idle_ticks;
        self.recalled = false;
        true
    }

    /**
     * Hands a batch of requests to an idle car.
     *
     * Every request in the batch must travel in the same direction and be reachable
     * from the current floor in that direction. Pickup and drop-off floors are merged
     * into the stop list, ordered in the direction of travel. The batch is rejected as
     * a whole and the car left untouched when any check fails. An empty batch is a no-op.
     */
    pub fn assign(&mut self, batch: &[Request]) -> Result<(), AssignError> {
        let first = match batch.first() {
            Some(request) => request,
            None => return Ok(()),
        };

        if !self.is_taking_requests() {
            return Err(AssignError::NotTakingRequests(self.id));
        }
        if batch.len() > self.capacity {
            return Err(AssignError::OverCapacity {
                batch: batch.len(),
                capacity: self.capacity,
            });
        }

        let direction = first.direction();
        let mut stops: Vec<usize> = Vec::with_capacity(2 * batch.len());
        for request in batch {
            if request.start_floor() >= self.n_floors || request.end_floor() >= self.n_floors {
                return Err(AssignError::FloorOutOfRange(*request));
            }
            if request.direction() != direction {
                return Err(AssignError::MixedDirections(*request));
            }
            let reachable = match direction {
                Direction::Up => request.start_floor() >= self.current_floor,
                _ => request.start_floor() <= self.current_floor,
            };
            if !reachable {
                return Err(AssignError::WrongDirection {
                    request: *request,
                    direction,
                    floor: self.current_floor,
                });
            }
            stops.push(request.start_floor());
            stops.push(request.end_floor());
        }

        stops.sort_unstable();
        stops.dedup();
        if direction == Direction::Down {
            stops.reverse();
        }

        debug!(
            "Elevator {} assigned {} request(s) at floor {}, stops {:?}",
            self.id,
            batch.len(),
            self.current_floor,
            stops
        );
        self.stops = stops;
        self.direction = direction;
        self.status = ElevatorStatus::Moving;
        self.idle_timer = self.idle_ticks;
        Ok(())
    }

    /// Advances the car by one tick.
    pub fn step(&mut self) {
        match self.status {
            ElevatorStatus::OutOfService => {}
            ElevatorStatus::Waiting => self.step_waiting(),
            ElevatorStatus::StoppedAtFloor => self.step_door(),
            ElevatorStatus::Moving => self.step_moving(),
        }
    }

    fn step_waiting(&mut self) {
        self.idle_timer = self.idle_timer.saturating_sub(1);
        if self.idle_timer > 0 || self.recalled {
            return;
        }

        // Idle long enough: sweep to the opposite terminal floor.
        self.direction = if self.current_floor == 0 {
            Direction::Up
        } else {
            Direction::Down
        };
        self.status = ElevatorStatus::Moving;
        debug!(
            "Elevator {} leaving floor {} {:?}",
            self.id, self.current_floor, self.direction
        );
    }

    fn step_door(&mut self) {
        let remaining = match self.door {
            DoorState::Open(remaining) => remaining.saturating_sub(1),
            DoorState::Closed => 0,
        };
        if remaining > 0 {
            self.door = DoorState::Open(remaining);
            return;
        }

        self.door = DoorState::Closed;
        if self.stops.is_empty() {
            if self.recalled && self.current_floor != 0 {
                self.direction = Direction::Down;
            }
            if self.current_floor == self.target_floor() {
                self.become_idle();
                return;
            }
        }
        self.status = ElevatorStatus::Moving;
    }

    fn step_moving(&mut self) {
        if let Some(index) = self.stops.iter().position(|&floor| floor == self.current_floor) {
            self.stops.remove(index);
            self.door = DoorState::Open(self.door_open_ticks);
            self.status = ElevatorStatus::StoppedAtFloor;
            debug!("Elevator {} opening at floor {}", self.id, self.current_floor);
            return;
        }

        if self.stops.is_empty() {
            if self.recalled {
                self.direction = Direction::Down;
            }
            if self.current_floor == self.target_floor() {
                self.become_idle();
                return;
            }
        }

        match self.direction {
            Direction::Up if self.current_floor < self.top_floor() => self.current_floor += 1,
            Direction::Down if self.current_floor > 0 => self.current_floor -= 1,
            _ => {
                // Nothing left in this direction; drop whatever cannot be reached.
                warn!(
                    "Elevator {} cannot continue {:?} from floor {}, clearing stops {:?}",
                    self.id, self.direction, self.current_floor, self.stops
                );
                self.stops.clear();
                self.become_idle();
            }
        }
    }

    /// Floor a car with an empty stop list is heading for.
    fn target_floor(&self) -> usize {
        if self.recalled {
            return 0;
        }
        match self.direction {
            Direction::Up => self.top_floor(),
            Direction::Down => 0,
            Direction::Stop => self.current_floor,
        }
    }

    fn become_idle(&mut self) {
        self.status = ElevatorStatus::Waiting;
        self.direction = Direction::Stop;
        self.idle_timer = self.idle_ticks;
        debug!("Elevator {} idle at floor {}", self.id, self.current_floor);
    }

    pub fn report(&self) -> ElevatorReport {
        match self.status {
            ElevatorStatus::Waiting => ElevatorReport::Waiting {
                floor: self.current_floor,
                idle_timer: self.idle_timer,
            },
            ElevatorStatus::OutOfService => ElevatorReport::OutOfService {
                floor: self.current_floor,
            },
            ElevatorStatus::Moving | ElevatorStatus::StoppedAtFloor => ElevatorReport::Active {
                floor: self.current_floor,
                direction: self.direction,
                door: self.door,
                stops: self.stops.clone(),
                n_floors: self.n_floors,
            },
        }
    }
}
