// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # spikegrid Serialization
//!
//! Save and restore the complete state of a synapse store, including spikes
//! still in flight in the delay queues, so a run can be checkpointed and resumed.
//!
//! ## Format
//! One scalar per line. A header of `max_neurons`, `max_synapses_per_neuron` and
//! the in-use count, then for each in-use synapse its slot id followed by:
//!
//! ```text
//! source_neuron, dest_neuron, weight, psr, synapse_type, in_use,
//! decay, total_delay, delay_queue, delay_index, queue_length, tau
//! ```
//!
//! `synapse_type` is the ordinal (`II=0, IE=1, EI=2, EE=3`), `in_use` is `0|1`,
//! and `delay_queue` is the raw ring bit field. The reader also accepts NUL
//! separators.
//!
//! ## Usage
//! ```ignore
//! use spikegrid_serialization::{save_synapses, load_synapses};
//!
//! save_synapses(&store, "synapses.txt")?;
//! load_synapses(&mut restored, "synapses.txt")?;
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use spikegrid_npu_neural::SynapseError;
use spikegrid_npu_runtime::RuntimeError;
use thiserror::Error;

mod synapse_state;

pub use synapse_state::*;

/// Synapse state I/O errors
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of input while reading {field}")]
    UnexpectedEof { field: &'static str },

    #[error("Cannot parse {field} from {value:?}")]
    Parse { field: &'static str, value: String },

    #[error("Invalid synapse type ordinal {0}")]
    InvalidSynapseType(i32),

    #[error("Invalid delay queue for synapse {synapse}: {source}")]
    InvalidDelayQueue { synapse: u32, source: SynapseError },

    #[error("Synapse slot {synapse} outside store capacity {capacity}")]
    SlotOutOfRange { synapse: u32, capacity: usize },

    #[error(
        "Store shape mismatch: file is {found_neurons}x{found_per_neuron}, store is {expected_neurons}x{expected_per_neuron}"
    )]
    ShapeMismatch {
        found_neurons: usize,
        found_per_neuron: usize,
        expected_neurons: usize,
        expected_per_neuron: usize,
    },

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, SerializationError>;
