// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikegrid Stimulus
//!
//! External Poisson input. Every input neuron gets one dedicated synapse from
//! [`NeuronId::EXTERNAL`](spikegrid_npu_neural::NeuronId::EXTERNAL); each tick,
//! neurons whose inter-spike interval has elapsed schedule a spike on it and
//! draw the next interval, then all input synapses advance into the shared
//! accumulator through the same transmission path as network synapses.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use spikegrid_npu_runtime::RuntimeError;
use thiserror::Error;

pub mod poisson;

pub use poisson::{PoissonParams, PoissonStimulus};

/// Stimulus errors
#[derive(Error, Debug)]
pub enum StimulusError {
    #[error("Mean firing rate must be positive and finite, got {0} Hz")]
    InvalidRate(f32),

    #[error("Mask references neuron {neuron} but the network has {total_neurons} neurons")]
    MaskOutOfRange { neuron: u32, total_neurons: usize },

    #[error("Expected {expected} neuron types, got {found}")]
    NeuronTypesLength { expected: usize, found: usize },

    #[error("Stimulus used before init or after term")]
    NotInitialized,

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, StimulusError>;
