// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shared per-neuron accumulator
//!
//! Every synapse delivering into the same summation point adds with
//! [`AtomicF32::fetch_add`], so the advance phase needs no locks.

use core::sync::atomic::Ordering;

use spikegrid_npu_neural::{AtomicF32, NeuronId, SummationMap, SummationPoint};
use std::vec::Vec;

/// One atomic float per neuron
#[derive(Debug, Default)]
pub struct SummationArray {
    points: Vec<AtomicF32>,
}

impl SummationArray {
    /// Accumulator with `len` zeroed points
    pub fn new(len: usize) -> Self {
        Self {
            points: (0..len).map(|_| AtomicF32::new(0.0)).collect(),
        }
    }

    /// Current value for a neuron
    pub fn get(&self, neuron: NeuronId) -> f32 {
        self.points[neuron.index()].load(Ordering::Relaxed)
    }

    /// Zero every point (start of a neuron update cycle)
    pub fn reset(&self) {
        for point in &self.points {
            point.store(0.0, Ordering::Relaxed);
        }
    }

    /// Copy of all values
    pub fn snapshot(&self) -> Vec<f32> {
        self.points
            .iter()
            .map(|point| point.load(Ordering::Relaxed))
            .collect()
    }

    /// Accumulators in neuron order
    pub fn as_slice(&self) -> &[AtomicF32] {
        &self.points
    }

    /// Number of neurons
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for a network with no neurons
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl SummationMap for SummationArray {
    #[inline]
    fn accumulate(&self, point: SummationPoint, value: f32) {
        self.points.as_slice().accumulate(point, value);
    }

    #[inline]
    fn load(&self, point: SummationPoint) -> f32 {
        self.points.as_slice().load(point)
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
