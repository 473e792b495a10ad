/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use rand::Rng;
use std::io::BufRead;
use std::time::Duration;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::control::generator::RequestGenerator;
use crate::coordinator::{Building, BuildingReport};
use crate::shared::SystemStatus;

/***************************************/
/*               Enums                 */
/***************************************/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Floors as the user types them, 1-indexed.
    Add { from: i64, to: i64 },
    Random(Option<usize>),
    Step(usize),
    Start,
    Stop,
    Report,
    Json,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs {1} argument(s)")]
    MissingArgument(&'static str, usize),
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

pub const HELP: &str = "\
Commands:
  add <from> <to>   queue a request between two floors (1-indexed)
  random [n]        queue n random requests (default 1 to max)
  step [n]          advance the simulation n ticks (default 1)
  start | continue  put the building in service
  stop | halt       purge requests and send every car to the ground floor
  report            print the building report
  json              print the building report as JSON
  help              print this text
  quit | exit       leave
";

// Upper bound on ticks spent draining the building at the end of a demo run
const DEMO_DRAIN_LIMIT: u64 = 10_000;

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let name = match words.next() {
        Some(word) => word.to_lowercase(),
        None => return Err(CommandError::Empty),
    };
    let args: Vec<&str> = words.collect();

    match name.as_str() {
        "add" | "a" => {
            if args.len() < 2 {
                return Err(CommandError::MissingArgument("add", 2));
            }
            Ok(Command::Add {
                from: parse_number(args[0])?,
                to: parse_number(args[1])?,
            })
        }
        "random" | "r" => match args.first() {
            Some(arg) => Ok(Command::Random(Some(parse_number(arg)?))),
            None => Ok(Command::Random(None)),
        },
        "step" | "s" => match args.first() {
            Some(arg) => Ok(Command::Step(parse_number(arg)?)),
            None => Ok(Command::Step(1)),
        },
        "start" | "continue" | "c" => Ok(Command::Start),
        "stop" | "halt" | "h" => Ok(Command::Stop),
        "report" | "p" => Ok(Command::Report),
        "json" => Ok(Command::Json),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(name)),
    }
}

fn parse_number<T: std::str::FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse::<T>()
        .map_err(|_| CommandError::InvalidNumber(word.to_string()))
}

/// Reads commands line by line until end of input, forwarding the valid ones.
/// A `Quit` is always sent last so the simulation loop can finish.
pub fn read_commands<B: BufRead>(input: B, command_tx: cbc::Sender<Command>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if command_tx.send(command).is_err() {
                    return;
                }
            }
            Err(e) => println!("Invalid command: {}", e),
        }
    }
    let _ = command_tx.send(Command::Quit);
}

/**
 * Text-mode front end for a building.
 *
 * Owns the `Building` and applies commands to it one at a time. In interactive use the
 * commands arrive over a channel from an input thread; with `auto_step` set, the loop
 * also advances the building on its own whenever no command arrives within the period.
 *
 * # Fields
 * - `building`:    The simulated building.
 * - `generator`:   Source of random requests.
 * - `auto_step`:   Period of automatic ticks, `None` for manual stepping.
 */
pub struct Console<R: Rng> {
    building: Building,
    generator: RequestGenerator<R>,
    auto_step: Option<Duration>,
}

impl<R: Rng> Console<R> {
    pub fn new(building: Building, generator: RequestGenerator<R>, auto_step_ms: u64) -> Console<R> {
        let auto_step = if auto_step_ms > 0 {
            Some(Duration::from_millis(auto_step_ms))
        } else {
            None
        };

        Console {
            building,
            generator,
            auto_step,
        }
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn run(mut self, command_rx: cbc::Receiver<Command>) {
        println!("{}", HELP);
        print!("{}", self.building.status_snapshot());

        loop {
            let command = match self.auto_step {
                Some(period) => cbc::select! {
                    recv(command_rx) -> command => match command {
                        Ok(command) => command,
                        Err(_) => break,
                    },
                    default(period) => Command::Step(1),
                },
                None => match command_rx.recv() {
                    Ok(command) => command,
                    Err(_) => break,
                },
            };

            match self.execute(command) {
                Reply::Output(text) => print!("{}", text),
                Reply::Quit => break,
            }
        }
        info!("Console closed at tick {}", self.building.tick());
    }

    pub fn execute(&mut self, command: Command) -> Reply {
        debug!("Executing {:?}", command);
        let output = match command {
            Command::Add { from, to } => match self.building.try_add_request(from.saturating_sub(1), to.saturating_sub(1)) {
                Ok(request) => format!("Request {} added\n{}", request, self.report()),
                Err(e) => format!("Request could not be added: {}\n", e),
            },
            Command::Random(count) => {
                if self.building.system_status() != SystemStatus::Running {
                    "Cannot add random requests. System is not running.\n".to_string()
                } else {
                    let count = count.unwrap_or_else(|| self.generator.next_count());
                    let accepted = self.generator.generate(&mut self.building, count);
                    format!("{} random request(s) added\n{}", accepted, self.report())
                }
            }
            Command::Step(ticks) => {
                for _ in 0..ticks {
                    self.building.step();
                }
                self.report()
            }
            Command::Start => {
                if self.building.start() {
                    format!("Elevator system running\n{}", self.report())
                } else {
                    "Elevator system cannot be started while it is stopping\n".to_string()
                }
            }
            Command::Stop => {
                self.building.stop();
                self.report()
            }
            Command::Report => self.report(),
            Command::Json => match serde_json::to_string_pretty(&self.building.status_snapshot()) {
                Ok(json) => format!("{}\n", json),
                Err(e) => format!("Failed to serialize report: {}\n", e),
            },
            Command::Help => HELP.to_string(),
            Command::Quit => return Reply::Quit,
        };
        Reply::Output(output)
    }

    fn report(&self) -> String {
        self.building.status_snapshot().to_string()
    }

    /**
     * Unattended run: start the building, feed it random requests for `ticks` ticks,
     * then stop it and step until every car is parked out of service.
     */
    pub fn run_demo(&mut self, ticks: u64) -> BuildingReport {
        self.building.start();

        for tick in 0..ticks {
            if tick % 3 == 0 {
                let count = self.generator.next_count();
                self.generator.generate(&mut self.building, count);
            }
            self.building.step();
        }

        self.building.stop();
        let mut drained = 0;
        while self.building.system_status() == SystemStatus::Stopping && drained < DEMO_DRAIN_LIMIT {
            self.building.step();
            drained += 1;
        }
        info!(
            "Demo finished after {} tick(s), {} spent draining",
            self.building.tick(),
            drained
        );

        self.building.status_snapshot()
    }
}
