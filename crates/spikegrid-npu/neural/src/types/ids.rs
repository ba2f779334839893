// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Identity types for neurons, synapses and accumulators

use core::fmt;

/// Neuron index within the simulated network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeuronId(pub u32);

impl NeuronId {
    /// Source marker for synapses driven from outside the network (stimulus input)
    pub const EXTERNAL: NeuronId = NeuronId(u32::MAX);

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub fn is_external(self) -> bool {
        self == Self::EXTERNAL
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_external() {
            write!(f, "Neuron(external)")
        } else {
            write!(f, "Neuron({})", self.0)
        }
    }
}

/// Dense synapse slot index into the store's parallel arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SynapseId(pub u32);

impl SynapseId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SynapseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Synapse({})", self.0)
    }
}

/// Non-owning reference to a destination accumulator
///
/// Resolved against a [`SummationMap`](crate::synapse::SummationMap) at advance time.
/// The accumulator itself belongs to the neuron store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SummationPoint(pub u32);

impl SummationPoint {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<NeuronId> for SummationPoint {
    fn from(neuron: NeuronId) -> Self {
        SummationPoint(neuron.0)
    }
}
