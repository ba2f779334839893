// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # spikegrid Synaptic Transmission (Platform-Agnostic)
//!
//! All per-synapse computation in one place:
//! - **Types**: identifiers, synapse/neuron categories, model constants, errors
//! - **Synapse**: circular delay queue, weight/delay policy, PSR step
//! - **Summation**: the atomic accumulator capability handed to the engine
//!
//! Storage (struct-of-arrays, parallel iteration) lives in `spikegrid-npu-runtime`;
//! this crate only knows about a single synapse at a time.
//!
//! ## Target Platforms
//! - Desktop (Linux, macOS, Windows)
//! - Embedded (no_std, fixed-capacity storage)

#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod types;

pub mod synapse;

pub use types::{
    AtomicF32, NeuronId, NeuronType, Result, SummationPoint, SynapseError, SynapseId,
    SynapseType, BASE_STRENGTH, DEFAULT_TAU, DELAY_QUEUE_BYTES, DELAY_QUEUE_LENGTH,
    PHYSICAL_DELAY, SYNAPSE_STRENGTH_ADJUSTMENT,
};

pub use synapse::{
    advance_step, compute_contribution, compute_total_delay, synapse_weight, DelayQueue,
    SummationMap,
};
