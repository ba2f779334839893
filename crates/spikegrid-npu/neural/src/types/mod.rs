// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neural Types Module
//!
//! Core type definitions shared by every synapse backend.

pub mod atomic;
pub mod error;
pub mod ids;
pub mod synapse_types;

pub use atomic::AtomicF32;
pub use error::{Result, SynapseError};
pub use ids::{NeuronId, SummationPoint, SynapseId};
pub use synapse_types::{
    NeuronType, SynapseType, BASE_STRENGTH, DEFAULT_TAU, DELAY_QUEUE_BYTES, DELAY_QUEUE_LENGTH,
    PHYSICAL_DELAY, SYNAPSE_STRENGTH_ADJUSTMENT,
};
