/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub building: BuildingConfig,
    pub elevator: ElevatorConfig,
    pub console: ConsoleConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BuildingConfig {
    pub n_floors: usize,
    pub n_elevators: usize,
    pub capacity: usize,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub door_open_ticks: u32,
    pub idle_ticks: u32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    pub auto_step_ms: u64,
    pub max_random_requests: usize,
    pub seed: Option<u64>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl Default for Config {
    fn default() -> Config {
        Config {
            log_level: "info".to_string(),
            building: BuildingConfig::default(),
            elevator: ElevatorConfig::default(),
            console: ConsoleConfig::default(),
        }
    }
}

impl Default for BuildingConfig {
    fn default() -> BuildingConfig {
        BuildingConfig {
            n_floors: 11,
            n_elevators: 8,
            capacity: 3,
        }
    }
}

impl Default for ElevatorConfig {
    fn default() -> ElevatorConfig {
        ElevatorConfig {
            door_open_ticks: 3,
            idle_ticks: 5,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> ConsoleConfig {
        ConsoleConfig {
            auto_step_ms: 0,
            max_random_requests: 5,
            seed: None,
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&config_str).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn parse_config(config_str: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(config_str)
}

/***************************************/
/*             Unit tests              */
/***************************************/
