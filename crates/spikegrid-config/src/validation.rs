// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Catches configurations whose timestep would overflow the synapse delay ring
//! before any synapse is created, along with out-of-range geometry and stimulus
//! settings. All problems are collected and reported together.

use crate::{ConfigError, ConfigResult, SpikegridConfig};
use spikegrid_npu_neural::{compute_total_delay, DelayQueue, DELAY_QUEUE_BYTES};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    InvalidValue { field: String, reason: String },
    DelayExceedsQueue { tick_duration: f32, total_delay: u32 },
    NeuronOutOfRange { field: String, neuron: u32, max_neurons: usize },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
            Self::DelayExceedsQueue {
                tick_duration,
                total_delay,
            } => write!(
                f,
                "simulation.tick_duration = {} gives a synaptic delay of {} ticks, more than the delay queue holds",
                tick_duration, total_delay
            ),
            Self::NeuronOutOfRange {
                field,
                neuron,
                max_neurons,
            } => write!(
                f,
                "{} references neuron {} but simulation.max_neurons is {}",
                field, neuron, max_neurons
            ),
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Positive, finite tick duration whose synaptic delay fits the delay queue
/// - Non-empty network geometry
/// - Stimulus rate and neuron references within the network
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &SpikegridConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_simulation(config, &mut errors);
    validate_stimulus(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_simulation(config: &SpikegridConfig, errors: &mut Vec<ConfigValidationError>) {
    let sim = &config.simulation;

    if !(sim.tick_duration.is_finite() && sim.tick_duration > 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "simulation.tick_duration".to_string(),
            reason: "must be a positive number of seconds".to_string(),
        });
    } else {
        let total_delay = compute_total_delay(sim.tick_duration);
        if DelayQueue::required_bytes(total_delay) > DELAY_QUEUE_BYTES {
            errors.push(ConfigValidationError::DelayExceedsQueue {
                tick_duration: sim.tick_duration,
                total_delay,
            });
        }
    }

    if sim.max_neurons == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "simulation.max_neurons".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    if sim.max_synapses_per_neuron == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "simulation.max_synapses_per_neuron".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
}

fn validate_stimulus(config: &SpikegridConfig, errors: &mut Vec<ConfigValidationError>) {
    let stim = &config.stimulus;
    if !stim.enabled {
        return;
    }

    if !(stim.fr_mean.is_finite() && stim.fr_mean > 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "stimulus.fr_mean".to_string(),
            reason: "must be a positive rate in Hz".to_string(),
        });
    }

    let max_neurons = config.simulation.max_neurons;
    let masks = stim.masks.iter().flatten().map(|&n| ("stimulus.masks", n));
    let inhibitory = stim
        .inhibitory_neurons
        .iter()
        .map(|&n| ("stimulus.inhibitory_neurons", n));
    for (field, neuron) in masks.chain(inhibitory) {
        if neuron as usize >= max_neurons {
            errors.push(ConfigValidationError::NeuronOutOfRange {
                field: field.to_string(),
                neuron,
                max_neurons,
            });
        }
    }
}
