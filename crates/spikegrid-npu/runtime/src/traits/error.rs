// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for runtime operations

use core::fmt;

use spikegrid_npu_neural::SynapseError;

#[cfg(feature = "std")]
extern crate std;

/// Runtime errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Capacity exceeded
    CapacityExceeded {
        /// Requested capacity
        requested: usize,
        /// Available capacity
        available: usize,
    },

    /// Every slot in the destination neuron's row is already in use
    RowFull {
        /// Destination neuron
        neuron: u32,
        /// Slots per row
        max_synapses_per_neuron: usize,
    },

    /// Neuron index outside the configured network
    NeuronOutOfRange {
        /// Offending neuron index
        neuron: u32,
        /// Number of neurons in the store
        max_neurons: usize,
    },

    /// Synapse slot outside the store
    SynapseOutOfRange {
        /// Offending slot
        synapse: u32,
        /// Store capacity
        capacity: usize,
    },

    /// Restored synapse state is not consistent
    InvalidRecord(SynapseError),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::CapacityExceeded {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Capacity exceeded: requested {}, available {}",
                    requested, available
                )
            }
            RuntimeError::RowFull {
                neuron,
                max_synapses_per_neuron,
            } => write!(
                f,
                "Neuron {} already has {} incoming synapses",
                neuron, max_synapses_per_neuron
            ),
            RuntimeError::NeuronOutOfRange {
                neuron,
                max_neurons,
            } => write!(
                f,
                "Neuron index {} out of bounds (max neurons: {})",
                neuron, max_neurons
            ),
            RuntimeError::SynapseOutOfRange { synapse, capacity } => write!(
                f,
                "Synapse index {} out of bounds (capacity: {})",
                synapse, capacity
            ),
            RuntimeError::InvalidRecord(err) => write!(f, "Invalid synapse record: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RuntimeError {}

impl From<SynapseError> for RuntimeError {
    fn from(err: SynapseError) -> Self {
        RuntimeError::InvalidRecord(err)
    }
}

/// Result type for runtime operations
pub type Result<T> = core::result::Result<T, RuntimeError>;
