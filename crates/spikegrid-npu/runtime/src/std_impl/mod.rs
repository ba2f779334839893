// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikegrid Runtime - Standard (Desktop/Server)
//!
//! Platform adapter for desktop and server environments with full std library support.
//!
//! ## Features
//! - ✅ Dynamic allocation (`Vec`, `AHashMap` source index)
//! - ✅ Parallel advance phase (Rayon)
//! - ✅ Lock-free shared accumulator
//!
//! ## Architecture
//! Uses the platform-agnostic core (`spikegrid-npu-neural`) for every per-synapse
//! step, providing a struct-of-arrays store over standard library collections.
//!
//! This module is only available when the `std` feature is enabled.

pub mod runtime;
pub mod summation_array;
pub mod synapse_array;

pub use runtime::StdRuntime;
pub use summation_array::SummationArray;
pub use synapse_array::SynapseArray;
