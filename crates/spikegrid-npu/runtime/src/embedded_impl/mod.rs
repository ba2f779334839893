// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikegrid Runtime - Embedded (RTOS, no_std)
//!
//! Platform adapter for embedded systems with no standard library.
//!
//! ## Features
//! - ✅ `no_std` compatible
//! - ✅ Fixed-size arrays (no heap allocation)
//! - ✅ Single-threaded, deterministic advance
//!
//! ## Architecture
//! Uses the platform-agnostic core (`spikegrid-npu-neural`) for every per-synapse
//! step; slot capacity is a const generic fixed at compile time. The caller supplies
//! the accumulator, typically a `[AtomicF32; N]`.
//!
//! This module is only available when the `embedded` feature is enabled.

pub mod runtime;
pub mod synapse_array;

pub use runtime::EmbeddedRuntime;
pub use synapse_array::SynapseArray;
