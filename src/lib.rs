// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikegrid
//!
//! Synapse transmission for spiking networks simulated in fixed time steps.
//! A fired source neuron schedules a spike on each outgoing synapse; the spike
//! travels through a circular bit delay queue and, on arrival, adds the
//! synapse weight into its post-synaptic response (PSR), which is delivered
//! into the destination neuron's summation point every tick.
//!
//! ## Crates
//!
//! - [`neural`]: synapse types, the delay queue, PSR arithmetic (no_std)
//! - [`runtime`]: the synapse store trait with std (rayon) and fixed-capacity backends
//! - [`config`]: TOML configuration with environment and CLI overrides
//! - [`observability`]: logging setup and per-crate debug flags
//! - [`serialization`]: line-oriented synapse state files
//! - [`stimulus`]: Poisson input through dedicated input synapses
//!
//! ## Example
//!
//! ```rust
//! use spikegrid::prelude::*;
//!
//! let mut synapses = StdRuntime.create_synapse_storage(2, 1).unwrap();
//! let sums = StdSummationArray::new(2);
//! let tick = 5e-4;
//! synapses
//!     .add_synapse(NeuronId(0), NeuronId(1), NeuronId(1).into(), tick, SynapseType::EE)
//!     .unwrap();
//!
//! synapses.process_tick(&[NeuronId(0)], tick, &sums);
//! synapses.process_tick(&[], tick, &sums);
//! synapses.process_tick(&[], tick, &sums);
//! assert_eq!(sums.get(NeuronId(1)), BASE_STRENGTH);
//! ```

pub use spikegrid_config as config;
pub use spikegrid_npu_neural as neural;
pub use spikegrid_npu_runtime as runtime;
pub use spikegrid_observability as observability;
pub use spikegrid_serialization as serialization;
pub use spikegrid_stimulus as stimulus;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::neural::{
        DelayQueue, NeuronId, NeuronType, SummationMap, SummationPoint, SynapseError, SynapseId,
        SynapseType, BASE_STRENGTH,
    };
    pub use crate::runtime::{
        Runtime, RuntimeError, StdRuntime, StdSummationArray, StdSynapseArray, SynapseStorage,
    };
    pub use crate::serialization::{load_synapses, save_synapses};
    pub use crate::stimulus::{PoissonParams, PoissonStimulus};
}
