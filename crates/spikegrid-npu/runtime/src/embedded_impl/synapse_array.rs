// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Fixed-size synapse array for embedded systems
//!
//! Uses fixed arrays for predictable memory usage. Fired-source lookups scan
//! the in-use slots instead of keeping an index.

use crate::traits::{Result, RuntimeError, SynapseRecord, SynapseStorage};
use spikegrid_npu_neural::{
    compute_contribution, compute_total_delay, synapse_weight, DelayQueue, NeuronId,
    SummationMap, SummationPoint, SynapseError, SynapseId, SynapseType,
    DEFAULT_TAU,
};

/// Fixed-size synapse array for embedded systems
///
/// All data is inline with a compile-time slot limit `N`.
/// No heap allocations, suitable for `no_std` environments.
pub struct SynapseArray<const N: usize> {
    /// Neurons the store was set up for
    pub max_neurons: usize,

    /// Slots per neuron row
    pub max_synapses_per_neuron: usize,

    /// Slot holds a connected synapse
    pub in_use: [bool; N],

    /// Presynaptic neurons
    pub source_neurons: [NeuronId; N],

    /// Postsynaptic neurons
    pub dest_neurons: [NeuronId; N],

    /// Accumulator slot each synapse delivers into
    pub summation_points: [SummationPoint; N],

    /// Signed strengths
    pub weights: [f32; N],

    /// Postsynaptic responses of the last advanced tick
    pub psrs: [f32; N],

    /// Synapse categories
    pub types: [SynapseType; N],

    /// Unused by this synapse variant
    pub decays: [f32; N],

    /// Delivery latency in ticks
    pub total_delays: [u32; N],

    /// Pending deliveries
    pub delay_queues: [DelayQueue; N],

    /// Unused by this synapse variant
    pub taus: [f32; N],

    /// In-use slots overall
    pub total_synapse_count: usize,
}

impl<const N: usize> SynapseArray<N> {
    /// Create a new fixed-size synapse array with no geometry
    pub const fn new() -> Self {
        Self {
            max_neurons: 0,
            max_synapses_per_neuron: 0,
            in_use: [false; N],
            source_neurons: [NeuronId(0); N],
            dest_neurons: [NeuronId(0); N],
            summation_points: [SummationPoint(0); N],
            weights: [0.0; N],
            psrs: [0.0; N],
            types: [SynapseType::EE; N],
            decays: [0.0; N],
            total_delays: [0; N],
            delay_queues: [DelayQueue::new(); N],
            taus: [DEFAULT_TAU; N],
            total_synapse_count: 0,
        }
    }

    /// Fix the row geometry; every slot returns to unallocated
    pub fn setup(&mut self, max_neurons: usize, max_synapses_per_neuron: usize) -> Result<()> {
        let requested = max_neurons.saturating_mul(max_synapses_per_neuron);
        if requested > N {
            return Err(RuntimeError::CapacityExceeded {
                requested,
                available: N,
            });
        }
        self.max_neurons = max_neurons;
        self.max_synapses_per_neuron = max_synapses_per_neuron;
        self.clear();
        Ok(())
    }

    fn row(&self, neuron: NeuronId) -> core::ops::Range<usize> {
        let start = neuron.index() * self.max_synapses_per_neuron;
        start..start + self.max_synapses_per_neuron
    }
}

impl<const N: usize> Default for SynapseArray<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cold]
#[inline(never)]
fn fatal(id: SynapseId, err: SynapseError) -> ! {
    panic!("synapse {}: {}", id, err)
}

impl<const N: usize> SynapseStorage for SynapseArray<N> {
    fn capacity(&self) -> usize {
        self.max_neurons * self.max_synapses_per_neuron
    }

    fn max_neurons(&self) -> usize {
        self.max_neurons
    }

    fn max_synapses_per_neuron(&self) -> usize {
        self.max_synapses_per_neuron
    }

    fn total_synapse_count(&self) -> usize {
        self.total_synapse_count
    }

    fn synapse_count(&self, neuron: NeuronId) -> usize {
        if neuron.index() >= self.max_neurons {
            return 0;
        }
        self.in_use[self.row(neuron)].iter().filter(|&&used| used).count()
    }

    fn in_use(&self, id: SynapseId) -> bool {
        self.in_use[id.index()]
    }

    fn source_neuron(&self, id: SynapseId) -> NeuronId {
        self.source_neurons[id.index()]
    }

    fn dest_neuron(&self, id: SynapseId) -> NeuronId {
        self.dest_neurons[id.index()]
    }

    fn summation_point(&self, id: SynapseId) -> SummationPoint {
        self.summation_points[id.index()]
    }

    fn weight(&self, id: SynapseId) -> f32 {
        self.weights[id.index()]
    }

    fn set_weight(&mut self, id: SynapseId, weight: f32) {
        self.weights[id.index()] = weight;
    }

    fn psr(&self, id: SynapseId) -> f32 {
        self.psrs[id.index()]
    }

    fn synapse_type(&self, id: SynapseId) -> SynapseType {
        self.types[id.index()]
    }

    fn total_delay(&self, id: SynapseId) -> u32 {
        self.total_delays[id.index()]
    }

    fn delay_queue(&self, id: SynapseId) -> &DelayQueue {
        &self.delay_queues[id.index()]
    }

    fn create_synapse(
        &mut self,
        id: SynapseId,
        source: NeuronId,
        dest: NeuronId,
        summation_point: SummationPoint,
        tick_duration: f32,
        synapse_type: SynapseType,
    ) {
        let idx = id.index();
        debug_assert!(!self.in_use[idx]);
        debug_assert!(tick_duration > 0.0);

        self.in_use[idx] = true;
        self.summation_points[idx] = summation_point;
        self.dest_neurons[idx] = dest;
        self.source_neurons[idx] = source;
        self.weights[idx] = synapse_weight(synapse_type);
        self.types[idx] = synapse_type;
        self.total_delays[idx] = compute_total_delay(tick_duration);
        self.decays[idx] = 0.0;
        self.taus[idx] = DEFAULT_TAU;

        self.initialize_delay_queue(id);
        self.reset_synapse(id, tick_duration);
        self.total_synapse_count += 1;
    }

    fn add_synapse(
        &mut self,
        source: NeuronId,
        dest: NeuronId,
        summation_point: SummationPoint,
        tick_duration: f32,
        synapse_type: SynapseType,
    ) -> Result<SynapseId> {
        if dest.index() >= self.max_neurons {
            return Err(RuntimeError::NeuronOutOfRange {
                neuron: dest.0,
                max_neurons: self.max_neurons,
            });
        }
        let idx = self
            .row(dest)
            .find(|&idx| !self.in_use[idx])
            .ok_or(RuntimeError::RowFull {
                neuron: dest.0,
                max_synapses_per_neuron: self.max_synapses_per_neuron,
            })?;

        let id = SynapseId(idx as u32);
        self.create_synapse(id, source, dest, summation_point, tick_duration, synapse_type);
        Ok(id)
    }

    fn reset_synapse(&mut self, id: SynapseId, _tick_duration: f32) {
        self.psrs[id.index()] = 0.0;
    }

    fn record(&self, id: SynapseId) -> SynapseRecord {
        let idx = id.index();
        SynapseRecord {
            source_neuron: self.source_neurons[idx],
            dest_neuron: self.dest_neurons[idx],
            weight: self.weights[idx],
            psr: self.psrs[idx],
            synapse_type: self.types[idx],
            in_use: self.in_use[idx],
            decay: self.decays[idx],
            total_delay: self.total_delays[idx],
            delay_queue: self.delay_queues[idx],
            tau: self.taus[idx],
        }
    }

    fn restore(
        &mut self,
        id: SynapseId,
        record: SynapseRecord,
        summation_point: SummationPoint,
    ) -> Result<()> {
        let idx = id.index();
        if idx >= self.capacity() {
            return Err(RuntimeError::SynapseOutOfRange {
                synapse: id.0,
                capacity: self.capacity(),
            });
        }
        record.validate(self.max_neurons)?;

        if self.in_use[idx] {
            self.total_synapse_count -= 1;
        }
        self.in_use[idx] = record.in_use;
        self.source_neurons[idx] = record.source_neuron;
        self.dest_neurons[idx] = record.dest_neuron;
        self.summation_points[idx] = summation_point;
        self.weights[idx] = record.weight;
        self.psrs[idx] = record.psr;
        self.types[idx] = record.synapse_type;
        self.decays[idx] = record.decay;
        self.total_delays[idx] = record.total_delay;
        self.delay_queues[idx] = record.delay_queue;
        self.taus[idx] = record.tau;
        if record.in_use {
            self.total_synapse_count += 1;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.in_use = [false; N];
        self.psrs = [0.0; N];
        self.weights = [0.0; N];
        self.delay_queues = [DelayQueue::new(); N];
        self.total_synapse_count = 0;
    }

    fn initialize_delay_queue(&mut self, id: SynapseId) {
        let idx = id.index();
        if let Err(err) = self.delay_queues[idx].try_initialize(self.total_delays[idx]) {
            fatal(id, err);
        }
    }

    fn schedule_spike(&mut self, id: SynapseId) {
        let idx = id.index();
        if let Err(err) = self.delay_queues[idx].try_schedule(self.total_delays[idx]) {
            fatal(id, err);
        }
    }

    fn consume_current(&mut self, id: SynapseId) -> bool {
        self.delay_queues[id.index()].consume_current()
    }

    fn schedule_fired(&mut self, fired: &[NeuronId]) -> usize {
        let mut scheduled = 0;
        for idx in 0..self.capacity() {
            let source = self.source_neurons[idx];
            if self.in_use[idx] && !source.is_external() && fired.contains(&source) {
                self.schedule_spike(SynapseId(idx as u32));
                scheduled += 1;
            }
        }
        scheduled
    }

    fn compute_contribution(&mut self, id: SynapseId, _tick_duration: f32) {
        let idx = id.index();
        self.psrs[idx] = compute_contribution(self.psrs[idx], self.weights[idx]);
    }

    fn advance_synapse<M>(&mut self, id: SynapseId, tick_duration: f32, summation: &M)
    where
        M: SummationMap + ?Sized,
    {
        let idx = id.index();
        self.psrs[idx] = 0.0;
        if self.consume_current(id) {
            self.compute_contribution(id, tick_duration);
        }
        summation.accumulate(self.summation_points[idx], self.psrs[idx]);
    }

    fn advance_all<M>(&mut self, tick_duration: f32, summation: &M)
    where
        M: SummationMap + Sync + ?Sized,
    {
        for idx in 0..self.capacity() {
            if self.in_use[idx] {
                self.advance_synapse(SynapseId(idx as u32), tick_duration, summation);
            }
        }
    }
}
