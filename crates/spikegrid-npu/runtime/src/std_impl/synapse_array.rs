// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Standard synapse array implementation
//!
//! Uses `Vec` columns sized once at setup and an `AHashMap` source index for
//! fired-neuron lookups. The advance phase runs on the rayon pool.

use crate::traits::{Result, RuntimeError, SynapseRecord, SynapseStorage};
use ahash::AHashMap;
use rayon::prelude::*;
use spikegrid_npu_neural::{
    advance_step, compute_contribution, compute_total_delay, synapse_weight, DelayQueue,
    NeuronId, SummationMap, SummationPoint, SynapseError, SynapseId, SynapseType,
    DEFAULT_TAU,
};
use std::vec;
use std::vec::Vec;
use tracing::{debug, error, trace};

/// Dynamic synapse array for desktop/server environments
///
/// Slot `max_synapses_per_neuron × n + k` holds the `k`-th incoming synapse of
/// neuron `n`.
pub struct SynapseArray {
    /// Neurons the store was sized for
    pub max_neurons: usize,

    /// Slots per neuron row
    pub max_synapses_per_neuron: usize,

    /// Slot holds a connected synapse
    pub in_use: Vec<bool>,

    /// Presynaptic neurons
    pub source_neurons: Vec<NeuronId>,

    /// Postsynaptic neurons
    pub dest_neurons: Vec<NeuronId>,

    /// Accumulator slot each synapse delivers into
    pub summation_points: Vec<SummationPoint>,

    /// Signed strengths
    pub weights: Vec<f32>,

    /// Postsynaptic responses of the last advanced tick
    pub psrs: Vec<f32>,

    /// Synapse categories
    pub types: Vec<SynapseType>,

    /// Kept for the persisted record; unused by this synapse variant
    pub decays: Vec<f32>,

    /// Delivery latency in ticks
    pub total_delays: Vec<u32>,

    /// Pending deliveries
    pub delay_queues: Vec<DelayQueue>,

    /// Kept for the persisted record; unused by this synapse variant
    pub taus: Vec<f32>,

    /// In-use slots per neuron row
    pub synapse_counts: Vec<usize>,

    /// In-use slots overall
    pub total_synapse_count: usize,

    /// Source neuron → slots it drives
    pub source_index: AHashMap<u32, Vec<usize>>,
}

impl SynapseArray {
    /// Create a store with every slot unallocated
    pub fn new(max_neurons: usize, max_synapses_per_neuron: usize) -> Self {
        let mut array = Self {
            max_neurons: 0,
            max_synapses_per_neuron: 0,
            in_use: Vec::new(),
            source_neurons: Vec::new(),
            dest_neurons: Vec::new(),
            summation_points: Vec::new(),
            weights: Vec::new(),
            psrs: Vec::new(),
            types: Vec::new(),
            decays: Vec::new(),
            total_delays: Vec::new(),
            delay_queues: Vec::new(),
            taus: Vec::new(),
            synapse_counts: Vec::new(),
            total_synapse_count: 0,
            source_index: AHashMap::new(),
        };
        array.setup(max_neurons, max_synapses_per_neuron);
        array
    }

    /// (Re)allocate every column for `max_neurons × max_synapses_per_neuron` slots
    pub fn setup(&mut self, max_neurons: usize, max_synapses_per_neuron: usize) {
        let capacity = max_neurons * max_synapses_per_neuron;
        self.max_neurons = max_neurons;
        self.max_synapses_per_neuron = max_synapses_per_neuron;
        self.in_use = vec![false; capacity];
        self.source_neurons = vec![NeuronId(0); capacity];
        self.dest_neurons = vec![NeuronId(0); capacity];
        self.summation_points = vec![SummationPoint::default(); capacity];
        self.weights = vec![0.0; capacity];
        self.psrs = vec![0.0; capacity];
        self.types = vec![SynapseType::EE; capacity];
        self.decays = vec![0.0; capacity];
        self.total_delays = vec![0; capacity];
        self.delay_queues = vec![DelayQueue::new(); capacity];
        self.taus = vec![DEFAULT_TAU; capacity];
        self.synapse_counts = vec![0; max_neurons];
        self.total_synapse_count = 0;
        self.source_index = AHashMap::new();

        debug!(
            max_neurons,
            max_synapses_per_neuron, capacity, "allocated synapse store"
        );
    }

    /// Ids of the in-use synapses driven by `source`
    pub fn outgoing(&self, source: NeuronId) -> &[usize] {
        self.source_index
            .get(&source.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn index_source(&mut self, idx: usize) {
        let source = self.source_neurons[idx];
        if !source.is_external() {
            self.source_index.entry(source.0).or_default().push(idx);
        }
    }

    fn unindex_source(&mut self, idx: usize) {
        let source = self.source_neurons[idx].0;
        if let Some(ids) = self.source_index.get_mut(&source) {
            ids.retain(|&i| i != idx);
            if ids.is_empty() {
                self.source_index.remove(&source);
            }
        }
    }

    fn row_of(&self, idx: usize) -> usize {
        idx / self.max_synapses_per_neuron
    }
}

/// Fatal delay-queue condition: log and abort the run
#[cold]
#[inline(never)]
fn fatal(id: SynapseId, err: SynapseError) -> ! {
    error!(synapse = id.0, error = %err, "fatal synapse delay queue error");
    panic!("synapse {}: {}", id, err)
}

impl SynapseStorage for SynapseArray {
    fn capacity(&self) -> usize {
        self.in_use.len()
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
        self.synapse_counts
            .get(neuron.index())
            .copied()
            .unwrap_or(0)
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
        debug_assert!(!self.in_use[idx], "slot {} already in use", idx);
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

        let row = self.row_of(idx);
        self.synapse_counts[row] += 1;
        self.total_synapse_count += 1;
        self.index_source(idx);

        trace!(
            synapse = id.0,
            source = source.0,
            dest = dest.0,
            ?synapse_type,
            total_delay = self.total_delays[idx],
            "created synapse"
        );
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

        let start = dest.index() * self.max_synapses_per_neuron;
        let end = start + self.max_synapses_per_neuron;
        let idx = self.in_use[start..end]
            .iter()
            .position(|&used| !used)
            .map(|offset| start + offset)
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

        let row = self.row_of(idx);
        if self.in_use[idx] {
            self.unindex_source(idx);
            self.synapse_counts[row] -= 1;
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
            self.synapse_counts[row] += 1;
            self.total_synapse_count += 1;
            self.index_source(idx);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.in_use.fill(false);
        self.psrs.fill(0.0);
        self.weights.fill(0.0);
        self.delay_queues.fill(DelayQueue::new());
        self.synapse_counts.fill(0);
        self.total_synapse_count = 0;
        self.source_index.clear();
        debug!(capacity = self.capacity(), "cleared synapse store");
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
        for neuron in fired {
            let Some(ids) = self.source_index.get(&neuron.0) else {
                continue;
            };
            for &idx in ids {
                if let Err(err) = self.delay_queues[idx].try_schedule(self.total_delays[idx]) {
                    fatal(SynapseId(idx as u32), err);
                }
                scheduled += 1;
            }
        }
        trace!(fired = fired.len(), scheduled, "scheduled fired sources");
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

    fn advance_all<M>(&mut self, _tick_duration: f32, summation: &M)
    where
        M: SummationMap + Sync + ?Sized,
    {
        (
            &mut self.delay_queues,
            &mut self.psrs,
            &self.in_use,
            &self.weights,
            &self.summation_points,
        )
            .into_par_iter()
            .filter(|item| *item.2)
            .for_each(|(queue, psr, _, &weight, &point)| {
                let psr = advance_step(queue, psr, weight);
                summation.accumulate(point, psr);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::Ordering;
    use spikegrid_npu_neural::{AtomicF32, BASE_STRENGTH};

    const TICK: f32 = 5e-4; // total_delay = 2

    fn sums(n: usize) -> Vec<AtomicF32> {
        (0..n).map(|_| AtomicF32::new(0.0)).collect()
    }

    #[test]
    fn test_create_synapse_sets_fields() {
        let mut array = SynapseArray::new(4, 2);
        let id = SynapseId(3);
        array.create_synapse(
            id,
            NeuronId(0),
            NeuronId(1),
            SummationPoint(1),
            TICK,
            SynapseType::IE,
        );

        assert!(array.in_use(id));
        assert_eq!(array.weight(id), -BASE_STRENGTH);
        assert_eq!(array.total_delay(id), 2);
        assert_eq!(array.psr(id), 0.0);
        assert!(array.delay_queue(id).is_empty());
        assert_eq!(array.synapse_count(NeuronId(1)), 1);
        assert_eq!(array.total_synapse_count(), 1);
        assert_eq!(array.outgoing(NeuronId(0)), &[3]);
    }

    #[test]
    fn test_add_synapse_fills_destination_row() {
        let mut array = SynapseArray::new(3, 2);
        let a = array
            .add_synapse(NeuronId(0), NeuronId(2), SummationPoint(2), TICK, SynapseType::EE)
            .unwrap();
        let b = array
            .add_synapse(NeuronId(1), NeuronId(2), SummationPoint(2), TICK, SynapseType::EE)
            .unwrap();
        assert_eq!((a, b), (SynapseId(4), SynapseId(5)));

        let full = array.add_synapse(NeuronId(0), NeuronId(2), SummationPoint(2), TICK, SynapseType::EE);
        assert_eq!(
            full,
            Err(RuntimeError::RowFull {
                neuron: 2,
                max_synapses_per_neuron: 2
            })
        );

        let outside = array.add_synapse(NeuronId(0), NeuronId(3), SummationPoint(0), TICK, SynapseType::EE);
        assert!(matches!(outside, Err(RuntimeError::NeuronOutOfRange { .. })));
    }

    #[test]
    fn test_external_sources_are_not_indexed() {
        let mut array = SynapseArray::new(2, 1);
        array
            .add_synapse(NeuronId::EXTERNAL, NeuronId(0), SummationPoint(0), TICK, SynapseType::EE)
            .unwrap();
        assert!(array.source_index.is_empty());
        assert_eq!(array.schedule_fired(&[NeuronId::EXTERNAL]), 0);
    }

    #[test]
    fn test_process_tick_delivers_after_delay() {
        let mut array = SynapseArray::new(2, 1);
        let sums = sums(2);
        let id = array
            .add_synapse(NeuronId(0), NeuronId(1), SummationPoint(1), TICK, SynapseType::EE)
            .unwrap();

        assert_eq!(array.process_tick(&[NeuronId(0)], TICK, sums.as_slice()), 1);
        assert_eq!(sums[1].load(Ordering::Relaxed), 0.0);
        array.process_tick(&[], TICK, sums.as_slice());
        assert_eq!(sums[1].load(Ordering::Relaxed), 0.0);
        array.process_tick(&[], TICK, sums.as_slice());
        assert_eq!(sums[1].load(Ordering::Relaxed), BASE_STRENGTH);
        assert_eq!(array.psr(id), BASE_STRENGTH);

        array.process_tick(&[], TICK, sums.as_slice());
        assert_eq!(array.psr(id), 0.0);
        assert_eq!(sums[1].load(Ordering::Relaxed), BASE_STRENGTH);
    }

    #[test]
    fn test_advance_synapse_matches_advance_all() {
        let mut array = SynapseArray::new(1, 1);
        let sums = sums(1);
        let id = array
            .add_synapse(NeuronId(0), NeuronId(0), SummationPoint(0), TICK, SynapseType::II)
            .unwrap();
        array.schedule_spike(id);
        for _ in 0..3 {
            array.advance_synapse(id, TICK, sums.as_slice());
        }
        assert_eq!(sums[0].load(Ordering::Relaxed), -BASE_STRENGTH);
    }

    #[test]
    fn test_unused_slots_are_skipped() {
        let mut array = SynapseArray::new(2, 1);
        let sums = sums(2);
        array.psrs[0] = 1.0;
        array.advance_all(TICK, sums.as_slice());
        assert_eq!(sums[0].load(Ordering::Relaxed), 0.0);
        assert_eq!(array.psrs[0], 1.0);
    }

    #[test]
    fn test_record_restore_round_trip() {
        let mut array = SynapseArray::new(2, 1);
        let id = array
            .add_synapse(NeuronId(1), NeuronId(0), SummationPoint(0), TICK, SynapseType::EI)
            .unwrap();
        array.schedule_spike(id);
        let record = array.record(id);

        let mut restored = SynapseArray::new(2, 1);
        restored.restore(id, record, SummationPoint(0)).unwrap();
        assert_eq!(restored.record(id), record);
        assert_eq!(restored.total_synapse_count(), 1);
        assert_eq!(restored.outgoing(NeuronId(1)), &[0]);

        let out = restored.restore(SynapseId(9), record, SummationPoint(0));
        assert!(matches!(out, Err(RuntimeError::SynapseOutOfRange { .. })));
    }

    #[test]
    fn test_restore_rejects_oversized_delay() {
        let mut array = SynapseArray::new(1, 1);
        let mut record = SynapseArray::new(1, 1).record(SynapseId(0));
        record.in_use = true;
        record.total_delay = 40;
        let out = array.restore(SynapseId(0), record, SummationPoint(0));
        assert!(matches!(out, Err(RuntimeError::InvalidRecord(_))));
        assert!(!array.in_use(SynapseId(0)));
    }

    #[test]
    fn test_restore_rejects_destination_outside_the_network() {
        let mut array = SynapseArray::new(2, 1);
        let id = array
            .add_synapse(NeuronId(0), NeuronId(1), SummationPoint(1), TICK, SynapseType::EE)
            .unwrap();
        let record = SynapseRecord {
            dest_neuron: NeuronId(50),
            ..array.record(id)
        };
        let out = array.restore(id, record, SummationPoint(50));
        assert_eq!(
            out,
            Err(RuntimeError::NeuronOutOfRange {
                neuron: 50,
                max_neurons: 2
            })
        );
        assert_eq!(array.dest_neuron(id), NeuronId(1));
        assert_eq!(array.summation_point(id), SummationPoint(1));
    }

    #[test]
    fn test_compute_contribution_adds_weight_to_psr() {
        let mut array = SynapseArray::new(1, 1);
        let id = array
            .add_synapse(NeuronId(0), NeuronId(0), SummationPoint(0), TICK, SynapseType::EE)
            .unwrap();
        array.compute_contribution(id, TICK);
        assert_eq!(array.psr(id), BASE_STRENGTH);

        // advance_synapse resets the PSR before a delivery-free tick
        let sums = sums(1);
        array.advance_synapse(id, TICK, sums.as_slice());
        assert_eq!(array.psr(id), 0.0);
        assert_eq!(sums[0].load(Ordering::Relaxed), 0.0);
    }

    #[test]
    fn test_clear_returns_slots_to_unallocated() {
        let mut array = SynapseArray::new(2, 1);
        array
            .add_synapse(NeuronId(0), NeuronId(1), SummationPoint(1), TICK, SynapseType::EE)
            .unwrap();
        array.clear();
        assert_eq!(array.total_synapse_count(), 0);
        assert_eq!(array.synapse_count(NeuronId(1)), 0);
        assert!(array.in_use.iter().all(|&used| !used));
        assert_eq!(array.schedule_fired(&[NeuronId(0)]), 0);
    }

    #[test]
    #[should_panic(expected = "collision")]
    fn test_double_schedule_panics() {
        let mut array = SynapseArray::new(1, 1);
        let id = array
            .add_synapse(NeuronId(0), NeuronId(0), SummationPoint(0), TICK, SynapseType::EE)
            .unwrap();
        array.schedule_spike(id);
        array.schedule_spike(id);
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn test_oversized_delay_panics_at_creation() {
        let mut array = SynapseArray::new(1, 1);
        array
            .add_synapse(NeuronId(0), NeuronId(0), SummationPoint(0), 1e-5, SynapseType::EE)
            .unwrap();
    }
}
