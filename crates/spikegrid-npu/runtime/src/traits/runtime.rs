// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Runtime abstraction traits for synapse storage
//!
//! ## Design Philosophy
//!
//! - **Storage Abstraction**: the store decides layout (Vec, fixed arrays); the
//!   per-synapse algorithms come from `spikegrid-npu-neural`
//! - **Dense ids**: every operation addresses a slot by [`SynapseId`]
//! - **Two-phase ticks**: scheduling takes `&mut self` and completes before the
//!   advance phase starts, so no advance can observe a half-scheduled tick

use crate::traits::error::{Result, RuntimeError};
use spikegrid_npu_neural::{
    DelayQueue, NeuronId, SummationMap, SummationPoint, SynapseError, SynapseId, SynapseType,
    DELAY_QUEUE_BYTES,
};

/// Runtime trait: selects a synapse store implementation
///
/// # Example
///
/// ```ignore
/// pub struct StdRuntime;
///
/// impl Runtime for StdRuntime {
///     type SynapseStorage = StdSynapseArray;
///
///     fn create_synapse_storage(&self, max_neurons: usize, per_neuron: usize) -> Result<Self::SynapseStorage> {
///         Ok(StdSynapseArray::new(max_neurons, per_neuron))
///     }
///
///     fn supports_parallel(&self) -> bool { true }
///     fn memory_limit(&self) -> Option<usize> { None }
/// }
/// ```
pub trait Runtime: Send + Sync {
    /// Synapse storage type
    type SynapseStorage: SynapseStorage;

    /// Allocate a store with `max_neurons × max_synapses_per_neuron` slots
    fn create_synapse_storage(
        &self,
        max_neurons: usize,
        max_synapses_per_neuron: usize,
    ) -> Result<Self::SynapseStorage>;

    /// Platform advances synapses in parallel
    fn supports_parallel(&self) -> bool;

    /// Platform slot limit (None = unlimited)
    fn memory_limit(&self) -> Option<usize>;

    /// Platform name for logging/debugging
    fn platform_name(&self) -> &'static str {
        "Generic Runtime"
    }
}

/// Every persisted per-synapse field, in file order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseRecord {
    /// Presynaptic neuron (`NeuronId::EXTERNAL` for stimulus input)
    pub source_neuron: NeuronId,
    /// Postsynaptic neuron
    pub dest_neuron: NeuronId,
    /// Signed strength
    pub weight: f32,
    /// PSR of the last advanced tick
    pub psr: f32,
    /// Category that fixed the weight sign
    pub synapse_type: SynapseType,
    /// Slot holds a connected synapse
    pub in_use: bool,
    /// Unused by this synapse variant
    pub decay: f32,
    /// Delivery latency in ticks
    pub total_delay: u32,
    /// Pending deliveries and cursor
    pub delay_queue: DelayQueue,
    /// Unused by this synapse variant
    pub tau: f32,
}

impl SynapseRecord {
    /// Check that an in-use record can run in a store of `max_neurons` neurons
    ///
    /// The destination must be a neuron of the store and the delay must fit
    /// strictly inside the ring. Unallocated records are not checked.
    pub fn validate(&self, max_neurons: usize) -> Result<()> {
        if !self.in_use {
            return Ok(());
        }
        if self.dest_neuron.index() >= max_neurons {
            return Err(RuntimeError::NeuronOutOfRange {
                neuron: self.dest_neuron.0,
                max_neurons,
            });
        }
        DelayQueue::new().try_initialize(self.total_delay)?;
        if self.total_delay >= self.delay_queue.length() {
            return Err(RuntimeError::InvalidRecord(SynapseError::DelayQueueCapacity {
                total_delay: self.total_delay,
                required_bytes: DelayQueue::required_bytes(self.total_delay),
                available_bytes: DELAY_QUEUE_BYTES,
            }));
        }
        Ok(())
    }
}

/// Synapse storage trait: struct-of-arrays store plus the transmission operations
///
/// Slot `max_synapses_per_neuron × n + k` is the `k`-th row entry of neuron `n`;
/// [`add_synapse`](Self::add_synapse) allocates in the destination neuron's row.
///
/// # Panics
///
/// The delay-queue operations panic on a capacity violation or a scheduling
/// collision. Both mean the configured timestep, delay and firing pattern are
/// inconsistent; there is no local recovery.
pub trait SynapseStorage: Send + Sync {
    // === Geometry ===

    /// Total number of slots
    fn capacity(&self) -> usize;

    /// Number of neurons the store was sized for
    fn max_neurons(&self) -> usize;

    /// Slots per neuron row
    fn max_synapses_per_neuron(&self) -> usize;

    /// Number of slots currently in use
    fn total_synapse_count(&self) -> usize;

    /// Number of slots in use in a neuron's row
    fn synapse_count(&self, neuron: NeuronId) -> usize;

    // === Per-synapse fields ===

    /// Slot represents a connected synapse
    fn in_use(&self, id: SynapseId) -> bool;

    /// Presynaptic neuron
    fn source_neuron(&self, id: SynapseId) -> NeuronId;

    /// Postsynaptic neuron
    fn dest_neuron(&self, id: SynapseId) -> NeuronId;

    /// Accumulator the synapse delivers into
    fn summation_point(&self, id: SynapseId) -> SummationPoint;

    /// Signed strength
    fn weight(&self, id: SynapseId) -> f32;

    /// Overwrite the strength after creation (external input wiring)
    fn set_weight(&mut self, id: SynapseId, weight: f32);

    /// PSR of the last advanced tick
    fn psr(&self, id: SynapseId) -> f32;

    /// Synapse category
    fn synapse_type(&self, id: SynapseId) -> SynapseType;

    /// Delivery latency in ticks
    fn total_delay(&self, id: SynapseId) -> u32;

    /// Read-only view of the delay ring
    fn delay_queue(&self, id: SynapseId) -> &DelayQueue;

    // === Factory and lifecycle ===

    /// Activate slot `id` as a connected synapse
    ///
    /// Caller guarantees the slot is unused, `tick_duration > 0`. Weight is
    /// `sign(type) × BASE_STRENGTH`; delay is `trunc(PHYSICAL_DELAY / tick_duration) + 1`.
    fn create_synapse(
        &mut self,
        id: SynapseId,
        source: NeuronId,
        dest: NeuronId,
        summation_point: SummationPoint,
        tick_duration: f32,
        synapse_type: SynapseType,
    );

    /// Create a synapse in the first free slot of `dest`'s row
    fn add_synapse(
        &mut self,
        source: NeuronId,
        dest: NeuronId,
        summation_point: SummationPoint,
        tick_duration: f32,
        synapse_type: SynapseType,
    ) -> Result<SynapseId>;

    /// Reset time-varying state (PSR); this variant keeps no decay factor
    fn reset_synapse(&mut self, id: SynapseId, tick_duration: f32);

    /// Snapshot every persisted field of a slot
    fn record(&self, id: SynapseId) -> SynapseRecord;

    /// Overwrite a slot from persisted fields
    fn restore(
        &mut self,
        id: SynapseId,
        record: SynapseRecord,
        summation_point: SummationPoint,
    ) -> Result<()>;

    /// Bulk teardown: every slot returns to unallocated
    fn clear(&mut self);

    // === Delay queue ===

    /// Reset the ring for the slot's `total_delay`
    fn initialize_delay_queue(&mut self, id: SynapseId);

    /// Schedule a delivery `total_delay` ticks from now (source neuron fired)
    fn schedule_spike(&mut self, id: SynapseId);

    /// Drain the current slot and move the cursor; true if a spike arrived
    fn consume_current(&mut self, id: SynapseId) -> bool;

    /// Schedule every outgoing synapse of the fired neurons; returns the count
    fn schedule_fired(&mut self, fired: &[NeuronId]) -> usize;

    // === PSR ===

    /// Add the weight into the PSR (a spike arrived this tick)
    fn compute_contribution(&mut self, id: SynapseId, tick_duration: f32);

    /// Advance one synapse one tick and deliver its PSR into `summation`
    fn advance_synapse<M>(&mut self, id: SynapseId, tick_duration: f32, summation: &M)
    where
        M: SummationMap + ?Sized;

    /// Advance every in-use synapse one tick
    fn advance_all<M>(&mut self, tick_duration: f32, summation: &M)
    where
        M: SummationMap + Sync + ?Sized;

    /// One full tick: schedule the fired sources, then advance everything
    fn process_tick<M>(&mut self, fired: &[NeuronId], tick_duration: f32, summation: &M) -> usize
    where
        M: SummationMap + Sync + ?Sized,
    {
        let scheduled = self.schedule_fired(fired);
        self.advance_all(tick_duration, summation);
        scheduled
    }

    /// Retrograde signaling is not supported by this synapse variant
    fn allow_back_propagation(&self) -> bool {
        false
    }
}
