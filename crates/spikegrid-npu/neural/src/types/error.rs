// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for synapse operations
//!
//! Both variants describe an inconsistent timestep/delay/connectivity setup. Storage
//! backends treat them as fatal; callers that validate ahead of time can use the
//! `try_` forms on [`DelayQueue`](crate::synapse::DelayQueue) directly.

use core::fmt;

#[cfg(feature = "std")]
extern crate std;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynapseError {
    /// The computed delay does not fit the ring
    DelayQueueCapacity {
        total_delay: u32,
        required_bytes: u32,
        available_bytes: u32,
    },

    /// Target slot already holds an undelivered spike
    ScheduleCollision { slot: u32, total_delay: u32 },

    /// Raw queue state read back from storage is not a valid ring
    InvalidDelayQueue { index: u32, length: u32 },
}

impl fmt::Display for SynapseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynapseError::DelayQueueCapacity {
                total_delay,
                required_bytes,
                available_bytes,
            } => write!(
                f,
                "Delay queue capacity exceeded: total delay {} needs {} bytes, ring holds {}",
                total_delay, required_bytes, available_bytes
            ),
            SynapseError::ScheduleCollision { slot, total_delay } => write!(
                f,
                "Spike scheduling collision at slot {} (total delay {}): firing is denser than the delay encoding supports",
                slot, total_delay
            ),
            SynapseError::InvalidDelayQueue { index, length } => {
                write!(f, "Invalid delay queue: index {} with length {}", index, length)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SynapseError {}

pub type Result<T> = core::result::Result<T, SynapseError>;
