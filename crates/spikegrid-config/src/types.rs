// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `spikegrid.toml`. Every section is optional in the file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikegridConfig {
    pub simulation: SimulationConfig,
    pub stimulus: StimulusConfig,
    pub logging: LoggingConfig,
    pub persistence: PersistenceConfig,
}

/// Network geometry and clock
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds per tick
    pub tick_duration: f32,
    pub max_neurons: usize,
    pub max_synapses_per_neuron: usize,
    pub num_ticks: u64,
    /// Advance-phase worker threads (0 = rayon default)
    pub num_threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_duration: 1e-4,
            max_neurons: 100,
            max_synapses_per_neuron: 1,
            num_ticks: 1000,
            num_threads: 0, // 0 = auto-detect
        }
    }
}

/// Poisson spike-train input
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StimulusConfig {
    pub enabled: bool,
    /// Mean firing rate (Hz)
    pub fr_mean: f32,
    /// Input synapse weight, scaled by `SYNAPSE_STRENGTH_ADJUSTMENT`
    pub weight: f32,
    /// Neurons receiving input (all when absent)
    pub masks: Option<Vec<u32>>,
    pub seed: Option<u64>,
    /// Destination neurons wired with EI instead of EE input synapses
    pub inhibitory_neurons: Vec<u32>,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            fr_mean: 10.0,
            weight: 10.0,
            masks: None,
            seed: None,
            inhibitory_neurons: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for per-run log files (console only when absent)
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Write synapse state here after the run
    pub state_output: Option<PathBuf>,
}
