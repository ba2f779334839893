// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Synaptic weight, delay and contribution policy
//!
//! Pure functions for the non-decaying spiking synapse:
//! - weight is `sign(type) × BASE_STRENGTH`
//! - delay is the same physical delay for every type, converted to ticks
//! - a delivered spike adds the weight to the PSR linearly

use crate::types::{SynapseType, BASE_STRENGTH, PHYSICAL_DELAY};

/// Initial weight for a newly created synapse
///
/// # Example
/// ```
/// use spikegrid_npu_neural::synapse::synapse_weight;
/// use spikegrid_npu_neural::SynapseType;
///
/// assert_eq!(synapse_weight(SynapseType::EE), 10.0e-9);
/// assert_eq!(synapse_weight(SynapseType::IE), -10.0e-9);
/// ```
#[inline]
pub fn synapse_weight(synapse_type: SynapseType) -> f32 {
    synapse_type.sign() * BASE_STRENGTH
}

/// Delay in ticks between a presynaptic spike and its delivery
///
/// `trunc(PHYSICAL_DELAY / tick_duration) + 1`; the `+ 1` guarantees at least one tick
/// of latency even when the tick is longer than the physical delay.
///
/// # Example
/// ```
/// use spikegrid_npu_neural::synapse::compute_total_delay;
///
/// assert_eq!(compute_total_delay(5e-4), 2);
/// assert_eq!(compute_total_delay(1e-3), 1);
/// ```
#[inline]
pub fn compute_total_delay(tick_duration: f32) -> u32 {
    debug_assert!(tick_duration > 0.0);
    // Float-to-int casts saturate; a tiny tick must not wrap back to a short delay
    ((PHYSICAL_DELAY / tick_duration) as u32).saturating_add(1)
}

/// PSR after a spike delivery
///
/// Linear in the weight: there is no decay time constant in this synapse variant.
#[inline]
pub fn compute_contribution(psr: f32, weight: f32) -> f32 {
    psr + weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_delay_saturates_for_tiny_ticks() {
        assert_eq!(compute_total_delay(1e-20), u32::MAX);
        assert_eq!(compute_total_delay(f32::MIN_POSITIVE), u32::MAX);
    }

    #[test]
    fn test_weight_magnitude_is_base_strength() {
        for ty in SynapseType::ALL {
            assert_eq!(synapse_weight(ty).abs(), BASE_STRENGTH);
        }
    }

    #[test]
    fn test_weight_sign_matches_type() {
        for ty in SynapseType::ALL {
            assert_eq!(synapse_weight(ty) > 0.0, ty.is_excitatory());
        }
    }

    #[test]
    fn test_total_delay_rounding() {
        assert_eq!(compute_total_delay(5e-4), 2);
        assert_eq!(compute_total_delay(2.5e-4), 3);
        // Longer tick than the physical delay still gives one tick of latency
        assert_eq!(compute_total_delay(2e-3), 1);
    }

    #[test]
    fn test_contribution_is_linear() {
        assert_eq!(compute_contribution(0.0, 3.0), 3.0);
        assert_eq!(compute_contribution(1.0, -3.0), -2.0);
    }
}
