/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info, warn};
use std::collections::VecDeque;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{BuildingConfig, ElevatorConfig};
use crate::coordinator::report::BuildingReport;
use crate::elevator::ElevatorUnit;
use crate::shared::{Direction, Request, SystemStatus};

/***************************************/
/*               Errors                */
/***************************************/
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("number of floors should be at least 2, got {0}")]
    TooFewFloors(usize),
    #[error("at least one elevator is required, got {0}")]
    NoElevators(usize),
    #[error("elevator capacity should be at least 1, got {0}")]
    NoCapacity(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("start floor {0} is not valid")]
    StartFloorOutOfRange(i64),
    #[error("end floor {0} is not valid")]
    EndFloorOutOfRange(i64),
    #[error("start floor cannot be the same as the end floor")]
    SameFloor,
    #[error("elevator system is not accepting requests ({0})")]
    NotRunning(SystemStatus),
}

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Dispatcher for a building full of elevators.
 *
 * The `Building` owns the fleet, the two pending request queues and the building wide
 * status. Everything happens on the caller's thread: requests are queued by
 * `add_request` and only handed to cars when the caller advances the simulation with
 * `step`.
 *
 * # Fields
 * - `n_floors`:        Number of floors, at least 2.
 * - `n_elevators`:     Number of cars, at least 1.
 * - `capacity`:        Requests a car accepts in one batch, at least 1.
 * - `elevators`:       The fleet, indexed by car id.
 * - `up_requests`:     Pending upward requests, FIFO.
 * - `down_requests`:   Pending downward requests, FIFO.
 * - `status`:          Building wide status.
 * - `tick`:            Ticks advanced so far.
 */
#[derive(Debug, Clone)]
pub struct Building {
    n_floors: usize,
    n_elevators: usize,
    capacity: usize,
    elevators: Vec<ElevatorUnit>,
    up_requests: VecDeque<Request>,
    down_requests: VecDeque<Request>,
    status: SystemStatus,
    tick: u64,
}

impl Building {
    pub fn new(
        n_floors: usize,
        n_elevators: usize,
        capacity: usize,
    ) -> Result<Building, ConstructionError> {
        Building::with_config(
            &BuildingConfig {
                n_floors,
                n_elevators,
                capacity,
            },
            &ElevatorConfig::default(),
        )
    }

    pub fn with_config(
        config: &BuildingConfig,
        elevator_config: &ElevatorConfig,
    ) -> Result<Building, ConstructionError> {
        if config.n_floors < 2 {
            return Err(ConstructionError::TooFewFloors(config.n_floors));
        }
        if config.n_elevators < 1 {
            return Err(ConstructionError::NoElevators(config.n_elevators));
        }
        if config.capacity < 1 {
            return Err(ConstructionError::NoCapacity(config.capacity));
        }

        let elevators = (0..config.n_elevators)
            .map(|id| ElevatorUnit::new(id, config.n_floors, config.capacity, elevator_config))
            .collect::<Vec<ElevatorUnit>>();

        info!(
            "Building created: {} floors, {} elevators, capacity {}",
            config.n_floors, config.n_elevators, config.capacity
        );

        Ok(Building {
            n_floors: config.n_floors,
            n_elevators: config.n_elevators,
            capacity: config.capacity,
            elevators,
            up_requests: VecDeque::new(),
            down_requests: VecDeque::new(),
            status: SystemStatus::OutOfService,
            tick: 0,
        })
    }

    pub fn n_floors(&self) -> usize {
        self.n_floors
    }

    pub fn n_elevators(&self) -> usize {
        self.n_elevators
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn elevators(&self) -> &[ElevatorUnit] {
        &self.elevators
    }

    pub fn up_requests(&self) -> &VecDeque<Request> {
        &self.up_requests
    }

    pub fn down_requests(&self) -> &VecDeque<Request> {
        &self.down_requests
    }

    pub fn system_status(&self) -> SystemStatus {
        self.status
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Queues a request, returning false (and changing nothing) if it is rejected.
    pub fn add_request(&mut self, start_floor: i64, end_floor: i64) -> bool {
        match self.try_add_request(start_floor, end_floor) {
            Ok(request) => {
                debug!("Request {} queued", request);
                true
            }
            Err(e) => {
                warn!("Request rejected: {}", e);
                false
            }
        }
    }

    /// Like `add_request`, but reports why a request was turned down.
    pub fn try_add_request(
        &mut self,
        start_floor: i64,
        end_floor: i64,
    ) -> Result<Request, RequestError> {
        let request = self.validate_request(start_floor, end_floor)?;

        if self.status != SystemStatus::Running {
            return Err(RequestError::NotRunning(self.status));
        }

        match request.direction() {
            Direction::Up => self.up_requests.push_back(request),
            _ => self.down_requests.push_back(request),
        }
        Ok(request)
    }

    fn validate_request(&self, start_floor: i64, end_floor: i64) -> Result<Request, RequestError> {
        let in_range = |floor: i64| floor >= 0 && floor < self.n_floors as i64;

        if !in_range(start_floor) {
            return Err(RequestError::StartFloorOutOfRange(start_floor));
        }
        if !in_range(end_floor) {
            return Err(RequestError::EndFloorOutOfRange(end_floor));
        }
        if start_floor == end_floor {
            return Err(RequestError::SameFloor);
        }

        Ok(Request::new(start_floor as usize, end_floor as usize))
    }

    /// Puts the building in service. Refused while stopping; a no-op while running.
    pub fn start(&mut self) -> bool {
        match self.status {
            SystemStatus::Stopping => {
                warn!("Elevator system cannot be started while it is stopping");
                false
            }
            SystemStatus::OutOfService => {
                for elevator in self.elevators.iter_mut() {
                    elevator.start();
                }
                self.status = SystemStatus::Running;
                info!("Elevator system running");
                true
            }
            SystemStatus::Running => {
                debug!("Elevator system is already running");
                true
            }
        }
    }

    /// Purges pending requests and sends every car to the ground floor.
    pub fn stop(&mut self) {
        if self.status != SystemStatus::Running {
            debug!("Stop ignored, system is {:?}", self.status);
            return;
        }

        let purged = self.up_requests.len() + self.down_requests.len();
        self.up_requests.clear();
        self.down_requests.clear();
        for elevator in self.elevators.iter_mut() {
            elevator.recall();
        }
        self.status = SystemStatus::Stopping;
        info!("Elevator system stopping, {} pending request(s) purged", purged);
    }

    /// Advances the whole building by one tick.
    pub fn step(&mut self) {
        if self.status == SystemStatus::OutOfService {
            debug!("Elevator system out of service, step ignored");
            return;
        }

        self.tick += 1;

        if self.status == SystemStatus::Running {
            self.distribute_requests();
        }

        for elevator in self.elevators.iter_mut() {
            elevator.step();
        }

        if self.status == SystemStatus::Stopping
            && self.elevators.iter().all(|elevator| elevator.is_parked())
        {
            for elevator in self.elevators.iter_mut() {
                elevator.take_out_of_service();
            }
            self.status = SystemStatus::OutOfService;
            info!("All elevators parked at ground floor, system out of service (tick {})", self.tick);
        }
    }

    // Ground floor cars take up requests, top floor cars take down requests, FIFO
    fn distribute_requests(&mut self) {
        if self.up_requests.is_empty() && self.down_requests.is_empty() {
            return;
        }

        let top_floor = self.n_floors - 1;
        for elevator in self.elevators.iter_mut() {
            if !elevator.is_taking_requests() {
                continue;
            }

            let queue = if elevator.current_floor() == 0 {
                &mut self.up_requests
            } else if elevator.current_floor() == top_floor {
                &mut self.down_requests
            } else {
                continue;
            };
            if queue.is_empty() {
                continue;
            }

            let batch_size = queue.len().min(self.capacity);
            let batch = queue.drain(..batch_size).collect::<Vec<Request>>();
            match elevator.assign(&batch) {
                Ok(()) => debug!(
                    "Tick {}: {} request(s) handed to elevator {}",
                    self.tick,
                    batch_size,
                    elevator.id()
                ),
                Err(e) => {
                    // Put the batch back where it was
                    warn!("Elevator {} refused batch: {}", elevator.id(), e);
                    for request in batch.into_iter().rev() {
                        queue.push_front(request);
                    }
                }
            }
        }
    }

    pub fn status_snapshot(&self) -> BuildingReport {
        BuildingReport {
            n_floors: self.n_floors,
            n_elevators: self.n_elevators,
            capacity: self.capacity,
            tick: self.tick,
            elevator_reports: self.elevators.iter().map(|elevator| elevator.report()).collect(),
            up_requests: self.up_requests.iter().copied().collect(),
            down_requests: self.down_requests.iter().copied().collect(),
            system_status: self.status,
        }
    }
}
