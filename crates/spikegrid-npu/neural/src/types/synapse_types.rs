// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapse type definitions and model constants

/// Width of the delay ring in bytes (one `u32` bit field per synapse)
pub const DELAY_QUEUE_BYTES: u32 = u32::BITS / u8::BITS;

/// Number of schedulable tick slots in every delay ring
pub const DELAY_QUEUE_LENGTH: u32 = DELAY_QUEUE_BYTES * u8::BITS;

/// Base synaptic strength; the sign comes from the synapse type
pub const BASE_STRENGTH: f32 = 10.0e-9;

/// Axonal conduction delay in seconds, identical for every synapse type
pub const PHYSICAL_DELAY: f32 = 5e-4;

/// Decay time constant kept only for state-file compatibility
pub const DEFAULT_TAU: f32 = 3e-3;

/// Scale applied to caller-supplied stimulus weights
pub const SYNAPSE_STRENGTH_ADJUSTMENT: f32 = 1.0e-8;

/// Neuron class as seen by the synapse layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NeuronType {
    #[default]
    Excitatory,
    Inhibitory,
}

/// Synapse category: source class first, destination class second
///
/// Ordinals match the persisted state format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynapseType {
    /// Inhibitory -> inhibitory
    II = 0,
    /// Inhibitory -> excitatory
    IE = 1,
    /// Excitatory -> inhibitory
    EI = 2,
    /// Excitatory -> excitatory
    EE = 3,
}

impl SynapseType {
    pub const ALL: [SynapseType; 4] = [Self::II, Self::IE, Self::EI, Self::EE];

    /// Classify a connection by the classes of its endpoints
    #[inline]
    pub fn from_neuron_types(source: NeuronType, dest: NeuronType) -> Self {
        match (source, dest) {
            (NeuronType::Inhibitory, NeuronType::Inhibitory) => Self::II,
            (NeuronType::Inhibitory, NeuronType::Excitatory) => Self::IE,
            (NeuronType::Excitatory, NeuronType::Inhibitory) => Self::EI,
            (NeuronType::Excitatory, NeuronType::Excitatory) => Self::EE,
        }
    }

    #[inline]
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    #[inline]
    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        match ordinal {
            0 => Some(Self::II),
            1 => Some(Self::IE),
            2 => Some(Self::EI),
            3 => Some(Self::EE),
            _ => None,
        }
    }

    /// Class of the presynaptic neuron
    #[inline]
    pub fn source_type(self) -> NeuronType {
        match self {
            Self::II | Self::IE => NeuronType::Inhibitory,
            Self::EI | Self::EE => NeuronType::Excitatory,
        }
    }

    /// -1.0 for inhibitory-sourced synapses, +1.0 otherwise
    #[inline]
    pub fn sign(self) -> f32 {
        match self.source_type() {
            NeuronType::Inhibitory => -1.0,
            NeuronType::Excitatory => 1.0,
        }
    }

    #[inline]
    pub fn is_excitatory(self) -> bool {
        self.source_type() == NeuronType::Excitatory
    }
}
