/*
 * Unit tests for coordinator module
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 *  - test_construction_errors
 *  - test_construction
 *  - test_initial_snapshot
 *  - test_running_snapshot_text
 *  - test_requests_sorted_into_queues
 *  - test_invalid_requests_do_not_mutate
 *  - test_requests_refused_when_not_running
 *  - test_one_up_request_trace
 *  - test_over_capacity_goes_to_next_car
 *  - test_running_trace_serves_down_request_from_top
 *  - test_distribution_keeps_fifo_order
 *  - test_down_requests_only_from_top_floor
 *  - test_start_is_idempotent_and_refused_while_stopping
 *  - test_stop_from_idle
 *  - test_stop_mid_sweep
 *  - test_stop_waits_for_assigned_stops
 *  - test_deterministic
 *  - test_invariants_under_random_load
 *  - test_snapshot_json
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod coordinator_tests {
    use crate::coordinator::{Building, ConstructionError, RequestError};
    use crate::shared::{DoorState, ElevatorStatus, Request, SystemStatus};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn setup_building() -> Building {
        let mut building = Building::new(11, 8, 3).unwrap();
        building.start();
        building
    }

    fn reports(building: &Building) -> Vec<String> {
        building
            .status_snapshot()
            .elevator_reports
            .iter()
            .map(|report| report.to_string())
            .collect()
    }

    fn repeat(report: &str, n: usize) -> Vec<String> {
        vec![report.to_string(); n]
    }

    fn queue(requests: &[Request]) -> String {
        requests
            .iter()
            .map(|request| request.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            Building::new(1, 8, 3).unwrap_err(),
            ConstructionError::TooFewFloors(1)
        );
        assert_eq!(
            Building::new(11, 0, 3).unwrap_err(),
            ConstructionError::NoElevators(0)
        );
        assert_eq!(
            Building::new(11, 8, 0).unwrap_err(),
            ConstructionError::NoCapacity(0)
        );
        assert!(Building::new(2, 1, 1).is_ok());
    }

    #[test]
    fn test_construction() {
        // Act
        let building = Building::new(11, 8, 3).unwrap();

        // Assert
        assert_eq!(building.n_floors(), 11);
        assert_eq!(building.n_elevators(), 8);
        assert_eq!(building.capacity(), 3);
        assert_eq!(building.elevators().len(), 8);
        assert_eq!(building.system_status(), SystemStatus::OutOfService);
        assert!(building.up_requests().is_empty());
        assert!(building.down_requests().is_empty());
    }

    #[test]
    fn test_initial_snapshot() {
        // Purpose: Cars start idle at the ground floor and stay frozen until the building starts

        // Arrange
        let mut building = Building::new(4, 2, 1).unwrap();

        // Act
        building.step();

        // Assert
        assert_eq!(building.tick(), 0);
        assert_eq!(building.system_status(), SystemStatus::OutOfService);
        assert_eq!(reports(&building), repeat("Waiting[Floor 0, Time 5]", 2));

        building.start();
        building.step();
        assert_eq!(reports(&building), repeat("Waiting[Floor 0, Time 4]", 2));
    }

    #[test]
    fn test_running_snapshot_text() {
        // Arrange
        let mut building = setup_building();
        let waiting = repeat("Waiting[Floor 0, Time 5]", 8).join(", ");

        // Act & Assert
        let report = building.status_snapshot();
        assert_eq!(report.n_floors, 11);
        assert_eq!(report.n_elevators, 8);
        assert_eq!(report.capacity, 3);
        assert_eq!(report.system_status, SystemStatus::Running);
        assert_eq!(
            report.to_string(),
            format!(
                "BuildingReport:\n\
                 Number of floors: 11, Number of elevators: 8, Elevator capacity: 3, \
                 Up requests: [], Down requests: [], System status: Running\n\
                 Elevator reports: [{}]\n",
                waiting
            )
        );

        building.add_request(2, 3);
        building.add_request(3, 4);
        building.add_request(5, 4);

        // The earlier snapshot is a copy and does not change
        assert!(report.up_requests.is_empty());
        assert_eq!(
            building.status_snapshot().to_string(),
            format!(
                "BuildingReport:\n\
                 Number of floors: 11, Number of elevators: 8, Elevator capacity: 3, \
                 Up requests: [3->4, 4->5], Down requests: [6->5], System status: Running\n\
                 Elevator reports: [{}]\n",
                waiting
            )
        );
    }

    #[test]
    fn test_requests_sorted_into_queues() {
        // Arrange
        let mut building = setup_building();

        // Act
        assert!(building.add_request(2, 3));
        assert!(building.add_request(3, 4));
        assert!(building.add_request(3, 2));
        assert!(building.add_request(0, 2));
        assert!(building.add_request(9, 2));

        // Assert
        let report = building.status_snapshot();
        assert_eq!(queue(&report.up_requests), "3->4, 4->5, 1->3");
        assert_eq!(queue(&report.down_requests), "4->3, 10->3");
    }

    #[test]
    fn test_invalid_requests_do_not_mutate() {
        // Arrange
        let mut building = setup_building();
        building.add_request(1, 5);
        let before = building.status_snapshot();

        // Act & Assert
        assert!(!building.add_request(2, 2));
        assert!(!building.add_request(-1, 8));
        assert!(!building.add_request(13, 8));
        assert!(!building.add_request(2, -1));
        assert!(!building.add_request(8, 12));
        assert!(!building.add_request(11, 3));
        assert!(!building.add_request(3, 11));
        assert_eq!(building.status_snapshot(), before);

        assert_eq!(
            building.try_add_request(2, 2),
            Err(RequestError::SameFloor)
        );
        assert_eq!(
            building.try_add_request(-1, 8),
            Err(RequestError::StartFloorOutOfRange(-1))
        );
        assert_eq!(
            building.try_add_request(8, 12),
            Err(RequestError::EndFloorOutOfRange(12))
        );
        assert_eq!(building.try_add_request(10, 0), Ok(Request::new(10, 0)));
    }

    #[test]
    fn test_requests_refused_when_not_running() {
        // Arrange
        let mut building = Building::new(11, 8, 3).unwrap();

        // Act & Assert: out of service before the first start
        assert_eq!(
            building.try_add_request(2, 9),
            Err(RequestError::NotRunning(SystemStatus::OutOfService))
        );

        building.start();
        building.stop();
        assert!(!building.add_request(2, 9));
        assert!(building.up_requests().is_empty());

        building.step();
        assert_eq!(building.system_status(), SystemStatus::OutOfService);
        assert!(!building.add_request(2, 9));
        assert!(building.up_requests().is_empty());
    }

    #[test]
    fn test_one_up_request_trace() {
        // Purpose: Follow one request from the queue through pickup and the door cycle

        // Arrange
        let mut building = setup_building();

        // Act & Assert
        assert!(building.add_request(2, 3));
        assert_eq!(queue(&building.status_snapshot().up_requests), "3->4");

        building.step();
        assert!(building.up_requests().is_empty());
        let car = &building.elevators()[0];
        assert_eq!(car.current_floor(), 1);
        assert_eq!(car.door(), DoorState::Closed);
        assert_eq!(car.stops(), &[2, 3]);
        let mut expected = vec!["[1|^|C  ]< -- --  2  3 -- -- -- -- -- -- -->".to_string()];
        expected.extend(repeat("Waiting[Floor 0, Time 4]", 7));
        assert_eq!(reports(&building), expected);

        building.step();
        let mut expected = vec!["[2|^|C  ]< -- --  2  3 -- -- -- -- -- -- -->".to_string()];
        expected.extend(repeat("Waiting[Floor 0, Time 3]", 7));
        assert_eq!(reports(&building), expected);

        building.step();
        let mut expected = vec!["[2|^|O 3]< -- -- --  3 -- -- -- -- -- -- -->".to_string()];
        expected.extend(repeat("Waiting[Floor 0, Time 2]", 7));
        assert_eq!(reports(&building), expected);

        building.step();
        let mut expected = vec!["[2|^|O 2]< -- -- --  3 -- -- -- -- -- -- -->".to_string()];
        expected.extend(repeat("Waiting[Floor 0, Time 1]", 7));
        assert_eq!(reports(&building), expected);

        // Idle cars run out of patience and start sweeping up
        building.step();
        let mut expected = vec!["[2|^|O 1]< -- -- --  3 -- -- -- -- -- -- -->".to_string()];
        expected.extend(repeat("[0|^|C  ]< -- -- -- -- -- -- -- -- -- -- -->", 7));
        assert_eq!(reports(&building), expected);

        building.step();
        let mut expected = vec!["[2|^|C  ]< -- -- --  3 -- -- -- -- -- -- -->".to_string()];
        expected.extend(repeat("[1|^|C  ]< -- -- -- -- -- -- -- -- -- -- -->", 7));
        assert_eq!(reports(&building), expected);

        building.step();
        let mut expected = vec!["[3|^|C  ]< -- -- --  3 -- -- -- -- -- -- -->".to_string()];
        expected.extend(repeat("[2|^|C  ]< -- -- -- -- -- -- -- -- -- -- -->", 7));
        assert_eq!(reports(&building), expected);

        building.step();
        assert_eq!(
            reports(&building)[0],
            "[3|^|O 3]< -- -- -- -- -- -- -- -- -- -- -->"
        );
    }

    #[test]
    fn test_over_capacity_goes_to_next_car() {
        // Arrange
        let mut building = setup_building();
        building.add_request(2, 3);
        building.add_request(3, 4);
        building.add_request(4, 5);
        building.add_request(5, 6);
        assert_eq!(
            queue(&building.status_snapshot().up_requests),
            "3->4, 4->5, 5->6, 6->7"
        );

        // Act
        building.step();

        // Assert
        assert!(building.up_requests().is_empty());
        let mut expected = vec![
            "[1|^|C  ]< -- --  2  3  4  5 -- -- -- -- -->".to_string(),
            "[1|^|C  ]< -- -- -- -- --  5  6 -- -- -- -->".to_string(),
        ];
        expected.extend(repeat("Waiting[Floor 0, Time 4]", 6));
        assert_eq!(reports(&building), expected);
    }

    #[test]
    fn test_running_trace_serves_down_request_from_top() {
        // Purpose: A down request waits until a car idles at the top floor

        // Arrange
        let mut building = setup_building();
        building.add_request(2, 3);
        building.add_request(3, 4);
        building.add_request(5, 4);

        // Act & Assert
        building.step();
        assert!(building.up_requests().is_empty());
        assert_eq!(queue(&building.status_snapshot().down_requests), "6->5");
        let mut expected = vec!["[1|^|C  ]< -- --  2  3  4 -- -- -- -- -- -->".to_string()];
        expected.extend(repeat("Waiting[Floor 0, Time 4]", 7));
        assert_eq!(reports(&building), expected);

        for _ in 0..15 {
            building.step();
        }
        assert_eq!(queue(&building.status_snapshot().down_requests), "6->5");
        let mut expected = vec!["[4|^|C  ]< -- -- -- -- -- -- -- -- -- -- -->".to_string()];
        expected.extend(repeat("Waiting[Floor 10, Time 5]", 7));
        assert_eq!(reports(&building), expected);

        building.step();
        assert!(building.down_requests().is_empty());
        let mut expected = vec![
            "[5|^|C  ]< -- -- -- -- -- -- -- -- -- -- -->".to_string(),
            "[9|v|C  ]< -- -- -- --  4  5 -- -- -- -- -->".to_string(),
        ];
        expected.extend(repeat("Waiting[Floor 10, Time 4]", 6));
        assert_eq!(reports(&building), expected);
    }

    #[test]
    fn test_distribution_keeps_fifo_order() {
        // Arrange
        let mut building = Building::new(8, 1, 2).unwrap();
        building.start();
        for (start, end) in [(1, 2), (2, 3), (3, 4), (4, 5), (5, 6)] {
            building.add_request(start, end);
        }

        // Act
        building.step();

        // Assert
        assert_eq!(building.elevators()[0].stops(), &[1, 2, 3]);
        assert_eq!(
            queue(&building.status_snapshot().up_requests),
            "4->5, 5->6, 6->7"
        );
    }

    #[test]
    fn test_down_requests_only_from_top_floor() {
        // Arrange
        let mut building = Building::new(3, 1, 2).unwrap();
        building.start();
        building.add_request(2, 0);

        // Act & Assert: the car at the ground floor never takes it
        for _ in 0..8 {
            building.step();
            assert_eq!(building.down_requests().len(), 1);
        }
        assert_eq!(reports(&building), repeat("Waiting[Floor 2, Time 5]", 1));

        building.step();
        assert!(building.down_requests().is_empty());
        assert_eq!(reports(&building), repeat("[2|v|O 3]<  0 -- -->", 1));
    }

    #[test]
    fn test_start_is_idempotent_and_refused_while_stopping() {
        // Arrange
        let mut building = setup_building();
        building.add_request(1, 4);
        let before = building.status_snapshot();

        // Act & Assert
        assert!(building.start());
        assert_eq!(building.status_snapshot(), before);

        building.stop();
        assert_eq!(building.system_status(), SystemStatus::Stopping);
        assert!(!building.start());
        assert_eq!(building.system_status(), SystemStatus::Stopping);
    }

    #[test]
    fn test_stop_from_idle() {
        // Arrange
        let mut building = setup_building();
        building.add_request(2, 3);
        building.add_request(5, 4);

        // Act
        building.stop();

        // Assert
        assert_eq!(building.system_status(), SystemStatus::Stopping);
        assert!(building.up_requests().is_empty());
        assert!(building.down_requests().is_empty());

        // Stopping is idempotent
        building.stop();
        assert_eq!(building.system_status(), SystemStatus::Stopping);

        building.step();
        assert_eq!(building.system_status(), SystemStatus::OutOfService);
        for car in building.elevators() {
            assert_eq!(car.current_floor(), 0);
            assert!(car.is_door_closed());
            assert_eq!(car.status(), ElevatorStatus::OutOfService);
        }
        assert_eq!(reports(&building), repeat("Out of Service[Floor 0]", 8));

        // Frozen while out of service
        building.step();
        building.stop();
        assert_eq!(reports(&building), repeat("Out of Service[Floor 0]", 8));

        // And back in service
        assert!(building.start());
        assert_eq!(building.system_status(), SystemStatus::Running);
        assert_eq!(reports(&building), repeat("Waiting[Floor 0, Time 5]", 8));
    }

    #[test]
    fn test_stop_mid_sweep() {
        // Arrange
        let mut building = setup_building();
        for _ in 0..7 {
            building.step();
        }

        // Act
        building.stop();

        // Assert
        assert_eq!(
            reports(&building),
            repeat("[2|v|C  ]< -- -- -- -- -- -- -- -- -- -- -->", 8)
        );

        building.step();
        assert_eq!(building.system_status(), SystemStatus::Stopping);
        assert_eq!(
            reports(&building),
            repeat("[1|v|C  ]< -- -- -- -- -- -- -- -- -- -- -->", 8)
        );

        building.step();
        assert_eq!(building.system_status(), SystemStatus::OutOfService);
        assert_eq!(reports(&building), repeat("Out of Service[Floor 0]", 8));
    }

    #[test]
    fn test_stop_waits_for_assigned_stops() {
        // Purpose: Cars finish what they were given before the building goes out of service

        // Arrange
        let mut building = setup_building();
        building.add_request(2, 5);
        building.step();

        // Act
        building.stop();
        let mut guard = 0;
        while building.system_status() == SystemStatus::Stopping && guard < 100 {
            building.step();
            guard += 1;
        }

        // Assert: up to 5 and back down to 0 takes until tick 18
        assert_eq!(building.system_status(), SystemStatus::OutOfService);
        assert_eq!(building.tick(), 18);
        for car in building.elevators() {
            assert!(car.stops().is_empty());
            assert!(car.is_door_closed());
            assert_eq!(car.current_floor(), 0);
        }
    }

    #[test]
    fn test_deterministic() {
        // Arrange
        let mut first = setup_building();
        let mut second = setup_building();

        // Act
        for tick in 0..60i64 {
            let start = tick % 11;
            let end = (tick * 7 + 3) % 11;
            assert_eq!(first.add_request(start, end), second.add_request(start, end));
            first.step();
            second.step();

            // Assert
            assert_eq!(first.status_snapshot(), second.status_snapshot());
        }
    }

    #[test]
    fn test_invariants_under_random_load() {
        // Purpose: Random operations never break the building or car invariants

        // Arrange
        let mut rng = StdRng::seed_from_u64(2432);
        let mut building = Building::new(7, 3, 2).unwrap();
        building.start();

        for _ in 0..2000 {
            // Act
            match rng.random_range(0..20) {
                0 => building.stop(),
                1 => {
                    building.start();
                }
                2..=9 => {
                    let start = rng.random_range(-1..8);
                    let end = rng.random_range(-1..8);
                    let before = building.status_snapshot();
                    if !building.add_request(start, end) {
                        assert_eq!(building.status_snapshot(), before);
                    }
                }
                _ => building.step(),
            }

            // Assert
            if building.system_status() != SystemStatus::Running {
                assert!(building.up_requests().is_empty());
                assert!(building.down_requests().is_empty());
            }
            for request in building.up_requests() {
                assert!(request.start_floor() < request.end_floor());
            }
            for request in building.down_requests() {
                assert!(request.start_floor() > request.end_floor());
            }
            for car in building.elevators() {
                assert!(car.current_floor() < 7);
                assert!(car.stops().len() <= 2 * 2);
                if car.status() == ElevatorStatus::OutOfService {
                    assert!(car.stops().is_empty());
                    assert!(car.is_door_closed());
                }
            }
        }
    }

    #[test]
    fn test_snapshot_json() {
        // Arrange
        let mut building = setup_building();
        building.add_request(2, 3);

        // Act
        let json = serde_json::to_value(building.status_snapshot()).unwrap();

        // Assert
        assert_eq!(json["systemStatus"], "running");
        assert_eq!(json["nFloors"], 11);
        assert_eq!(json["upRequests"][0]["startFloor"], 2);
        assert_eq!(json["elevatorReports"].as_array().unwrap().len(), 8);
    }
}
