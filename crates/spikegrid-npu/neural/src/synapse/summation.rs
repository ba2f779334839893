// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Destination accumulator capability
//!
//! The neuron store owns one accumulator per neuron. Synapses only hold a
//! [`SummationPoint`] and are handed the map when they advance, so many synapses
//! may target the same accumulator from different threads in the same tick.

use core::sync::atomic::Ordering;

use crate::types::{AtomicF32, SummationPoint};

/// Shared per-neuron input sums with an atomic add
pub trait SummationMap {
    /// Add `value` into the accumulator at `point`; safe under concurrent callers
    fn accumulate(&self, point: SummationPoint, value: f32);

    /// Current accumulator value
    fn load(&self, point: SummationPoint) -> f32;

    /// Number of accumulators
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Relaxed is enough: tick phases are separated by a join, which orders all adds
// of one tick before anyone reads the sums.
impl SummationMap for [AtomicF32] {
    #[inline]
    fn accumulate(&self, point: SummationPoint, value: f32) {
        self[point.index()].fetch_add(value, Ordering::Relaxed);
    }

    #[inline]
    fn load(&self, point: SummationPoint) -> f32 {
        self[point.index()].load(Ordering::Relaxed)
    }

    #[inline]
    fn len(&self) -> usize {
        <[AtomicF32]>::len(self)
    }
}

impl<const N: usize> SummationMap for [AtomicF32; N] {
    #[inline]
    fn accumulate(&self, point: SummationPoint, value: f32) {
        self.as_slice().accumulate(point, value);
    }

    #[inline]
    fn load(&self, point: SummationPoint) -> f32 {
        self.as_slice().load(point)
    }

    #[inline]
    fn len(&self) -> usize {
        N
    }
}
