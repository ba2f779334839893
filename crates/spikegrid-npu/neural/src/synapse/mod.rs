// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synaptic computation module
//!
//! Delay ring, weight/delay policy, the PSR step and the accumulator capability.

pub mod advance;
pub mod contribution;
pub mod delay_queue;
pub mod summation;

pub use advance::advance_step;
pub use contribution::{compute_contribution, compute_total_delay, synapse_weight};
pub use delay_queue::DelayQueue;
pub use summation::SummationMap;
