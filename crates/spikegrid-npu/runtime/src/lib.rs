// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! # spikegrid Runtime Abstraction
//!
//! Synapse stores and the per-tick transmission engine.
//!
//! This crate provides:
//! - **Traits** (always available): `Runtime`, `SynapseStorage`
//! - **Std Implementation** (behind `std` feature): `Vec`-backed store, rayon-parallel advance
//! - **Embedded Implementation** (behind `embedded` feature): const-generic fixed arrays
//!
//! Both implementations expose the same operations: create, initialize the delay
//! queue, schedule, consume, advance. The backend is chosen at build time.
//!
//! ## Usage
//!
//! ```rust
//! use spikegrid_npu_runtime::{Runtime, StdRuntime, StdSummationArray, SynapseStorage};
//! use spikegrid_npu_neural::{NeuronId, SynapseType};
//!
//! let mut synapses = StdRuntime.create_synapse_storage(2, 1).unwrap();
//! let sums = StdSummationArray::new(2);
//!
//! let id = synapses
//!     .add_synapse(NeuronId(0), NeuronId(1), NeuronId(1).into(), 5e-4, SynapseType::EE)
//!     .unwrap();
//!
//! synapses.process_tick(&[NeuronId(0)], 5e-4, &sums); // tick 0: scheduled
//! synapses.process_tick(&[], 5e-4, &sums); // tick 1
//! synapses.process_tick(&[], 5e-4, &sums); // tick 2: delivered
//! assert_eq!(sums.get(NeuronId(1)), synapses.weight(id));
//! ```

#![no_std]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Traits module (always available)
pub mod traits;

pub use traits::{Result, Runtime, RuntimeError, SynapseRecord, SynapseStorage};

// Standard library implementation (behind "std" feature)
#[cfg(feature = "std")]
pub mod std_impl;

#[cfg(feature = "std")]
pub use std_impl::{
    StdRuntime, SummationArray as StdSummationArray, SynapseArray as StdSynapseArray,
};

// Embedded implementation (behind "embedded" feature)
#[cfg(feature = "embedded")]
pub mod embedded_impl;

#[cfg(feature = "embedded")]
pub use embedded_impl::{EmbeddedRuntime, SynapseArray as EmbeddedSynapseArray};
