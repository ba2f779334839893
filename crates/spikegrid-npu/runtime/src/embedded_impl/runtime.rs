// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Embedded runtime implementation for RTOS and no_std platforms

use super::SynapseArray;
use crate::traits::{Result, Runtime, RuntimeError};

/// Embedded runtime with `N` synapse slots fixed at compile time
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedRuntime<const N: usize = 4096>;

impl<const N: usize> EmbeddedRuntime<N> {
    /// Create a new embedded runtime
    pub const fn new() -> Self {
        Self
    }
}

impl<const N: usize> Runtime for EmbeddedRuntime<N> {
    type SynapseStorage = SynapseArray<N>;

    fn create_synapse_storage(
        &self,
        max_neurons: usize,
        max_synapses_per_neuron: usize,
    ) -> Result<Self::SynapseStorage> {
        let requested = max_neurons.saturating_mul(max_synapses_per_neuron);
        if requested > N {
            return Err(RuntimeError::CapacityExceeded {
                requested,
                available: N,
            });
        }
        let mut storage = SynapseArray::new();
        storage.setup(max_neurons, max_synapses_per_neuron)?;
        Ok(storage)
    }

    fn supports_parallel(&self) -> bool {
        false // Single-threaded (no OS or basic RTOS)
    }

    fn memory_limit(&self) -> Option<usize> {
        Some(N)
    }

    fn platform_name(&self) -> &'static str {
        "Embedded (RTOS/no_std)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SynapseStorage;

    #[test]
    fn test_embedded_runtime_creation() {
        let runtime = EmbeddedRuntime::<64>::new();
        assert_eq!(runtime.platform_name(), "Embedded (RTOS/no_std)");
        assert!(!runtime.supports_parallel());
        assert_eq!(runtime.memory_limit(), Some(64));
    }

    #[test]
    fn test_create_synapse_storage_within_limit() {
        let storage = EmbeddedRuntime::<64>::new()
            .create_synapse_storage(8, 4)
            .unwrap();
        assert_eq!(storage.capacity(), 32);
    }

    #[test]
    fn test_create_synapse_storage_exceeds_limit() {
        let result = EmbeddedRuntime::<64>::new().create_synapse_storage(20, 4);
        assert_eq!(
            result.err(),
            Some(RuntimeError::CapacityExceeded {
                requested: 80,
                available: 64
            })
        );
    }
}
