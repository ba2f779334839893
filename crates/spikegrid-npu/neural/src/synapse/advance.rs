// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-tick synapse step shared by every storage backend

use super::contribution::compute_contribution;
use super::delay_queue::DelayQueue;

/// Advance one synapse by one tick and return its PSR for this tick
///
/// The PSR carries no memory across ticks: it is reset first, then set from the
/// weight if the ring delivered a spike. Zero-weight synapses take the same path.
/// The caller adds the returned value into the destination accumulator.
#[inline]
pub fn advance_step(queue: &mut DelayQueue, psr: &mut f32, weight: f32) -> f32 {
    *psr = 0.0;
    if queue.consume_current() {
        *psr = compute_contribution(*psr, weight);
    }
    *psr
}
