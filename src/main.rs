/***************************************/
/*        3rd party libraries          */
/***************************************/
use clap::Parser;
use crossbeam_channel as cbc;
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::Builder;

/***************************************/
/*           Local modules             */
/***************************************/
use elevator_sim::config::{self, Config};
use elevator_sim::control::{read_commands, Command, Console, RequestGenerator};
use elevator_sim::unwrap_or_exit;
use elevator_sim::Building;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Tick based simulation of a building full of elevators.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Configuration file, defaults to ./config.toml when present
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Number of floors
    #[clap(long)]
    floors: Option<usize>,

    /// Number of elevators
    #[clap(long)]
    elevators: Option<usize>,

    /// Requests an elevator accepts per batch
    #[clap(long)]
    capacity: Option<usize>,

    /// Seed for the random request generator
    #[clap(long)]
    seed: Option<u64>,

    /// Advance one tick every N milliseconds without input, 0 to disable
    #[clap(long)]
    auto_step_ms: Option<u64>,

    /// Run unattended for N ticks, print the final report and exit
    #[clap(long)]
    demo_ticks: Option<u64>,
}

fn load(args: &Args) -> Config {
    let mut config = match &args.config {
        Some(path) => unwrap_or_exit!(config::load_config(path)),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            unwrap_or_exit!(config::load_config(Path::new(DEFAULT_CONFIG_PATH)))
        }
        None => Config::default(),
    };

    // Command line wins over the file
    if let Some(floors) = args.floors {
        config.building.n_floors = floors;
    }
    if let Some(elevators) = args.elevators {
        config.building.n_elevators = elevators;
    }
    if let Some(capacity) = args.capacity {
        config.building.capacity = capacity;
    }
    if args.seed.is_some() {
        config.console.seed = args.seed;
    }
    if let Some(auto_step_ms) = args.auto_step_ms {
        config.console.auto_step_ms = auto_step_ms;
    }
    config
}

/* Main */
fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let config = load(&args);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let building = unwrap_or_exit!(Building::with_config(&config.building, &config.elevator));
    let generator =
        RequestGenerator::from_seed(config.console.seed, config.console.max_random_requests);
    let mut console = Console::new(building, generator, config.console.auto_step_ms);

    if let Some(ticks) = args.demo_ticks {
        let report = console.run_demo(ticks);
        print!("{}", report);
        return Ok(());
    }

    // Stdin blocks, so it gets its own thread
    let (command_tx, command_rx) = cbc::unbounded::<Command>();
    let input_thread = Builder::new().name("console_input".into());
    input_thread.spawn(move || read_commands(io::stdin().lock(), command_tx))?;

    console.run(command_rx);
    info!("Elevator simulation finished");
    Ok(())
}
