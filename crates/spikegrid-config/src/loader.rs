// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SpikegridConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for when no path is given
pub const CONFIG_FILE_NAME: &str = "spikegrid.toml";

/// Find the spikegrid configuration file
///
/// Search order:
/// 1. `SPIKEGRID_CONFIG_PATH` environment variable
/// 2. Current working directory: `./spikegrid.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SPIKEGRID_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SPIKEGRID_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|path| path.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "spikegrid configuration file '{}' not found in any of these locations:\n{}\n\nSet SPIKEGRID_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Validation is a separate step ([`validate_config`](crate::validate_config)).
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikegridConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SpikegridConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPIKEGRID_TICK_DURATION` -> `simulation.tick_duration`
/// - `SPIKEGRID_MAX_NEURONS` -> `simulation.max_neurons`
/// - `SPIKEGRID_NUM_TICKS` -> `simulation.num_ticks`
/// - `SPIKEGRID_NUM_THREADS` -> `simulation.num_threads`
/// - `SPIKEGRID_LOG_LEVEL` -> `logging.level`
///
/// Unparseable values are ignored.
pub fn apply_environment_overrides(config: &mut SpikegridConfig) {
    if let Ok(value) = env::var("SPIKEGRID_TICK_DURATION") {
        if let Ok(tick) = value.parse::<f32>() {
            config.simulation.tick_duration = tick;
        }
    }
    if let Ok(value) = env::var("SPIKEGRID_MAX_NEURONS") {
        if let Ok(neurons) = value.parse::<usize>() {
            config.simulation.max_neurons = neurons;
        }
    }
    if let Ok(value) = env::var("SPIKEGRID_NUM_TICKS") {
        if let Ok(ticks) = value.parse::<u64>() {
            config.simulation.num_ticks = ticks;
        }
    }
    if let Ok(value) = env::var("SPIKEGRID_NUM_THREADS") {
        if let Ok(threads) = value.parse::<usize>() {
            config.simulation.num_threads = threads;
        }
    }
    if let Ok(value) = env::var("SPIKEGRID_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"num_ticks": "500", "seed": "7"}`)
pub fn apply_cli_overrides(config: &mut SpikegridConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("tick_duration") {
        if let Ok(tick) = value.parse::<f32>() {
            config.simulation.tick_duration = tick;
        }
    }
    if let Some(value) = cli_args.get("num_ticks") {
        if let Ok(ticks) = value.parse::<u64>() {
            config.simulation.num_ticks = ticks;
        }
    }
    if let Some(value) = cli_args.get("num_threads") {
        if let Ok(threads) = value.parse::<usize>() {
            config.simulation.num_threads = threads;
        }
    }
    if let Some(value) = cli_args.get("seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.stimulus.seed = Some(seed);
        }
    }
    if let Some(value) = cli_args.get("state_output") {
        config.persistence.state_output = Some(PathBuf::from(value));
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}
