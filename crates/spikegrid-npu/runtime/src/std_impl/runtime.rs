// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Standard runtime implementation for desktop and server platforms

use super::SynapseArray;
use crate::traits::{Result, Runtime, RuntimeError};
use tracing::info;

/// Desktop/server runtime (Vec storage, rayon advance)
#[derive(Debug, Clone, Copy, Default)]
pub struct StdRuntime;

impl StdRuntime {
    /// Create a new standard runtime
    pub fn new() -> Self {
        Self
    }
}

impl Runtime for StdRuntime {
    type SynapseStorage = SynapseArray;

    fn create_synapse_storage(
        &self,
        max_neurons: usize,
        max_synapses_per_neuron: usize,
    ) -> Result<Self::SynapseStorage> {
        let capacity = max_neurons.checked_mul(max_synapses_per_neuron).ok_or(
            RuntimeError::CapacityExceeded {
                requested: max_neurons,
                available: usize::MAX / max_synapses_per_neuron.max(1),
            },
        )?;
        info!(
            platform = self.platform_name(),
            max_neurons, max_synapses_per_neuron, capacity, "creating synapse storage"
        );
        Ok(SynapseArray::new(max_neurons, max_synapses_per_neuron))
    }

    fn supports_parallel(&self) -> bool {
        true
    }

    fn memory_limit(&self) -> Option<usize> {
        None
    }

    fn platform_name(&self) -> &'static str {
        "Desktop/Server (std)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SynapseStorage;

    #[test]
    fn test_std_runtime_creation() {
        let runtime = StdRuntime::new();
        assert_eq!(runtime.platform_name(), "Desktop/Server (std)");
        assert!(runtime.supports_parallel());
        assert_eq!(runtime.memory_limit(), None);
    }

    #[test]
    fn test_create_synapse_storage() {
        let storage = StdRuntime.create_synapse_storage(10, 3).unwrap();
        assert_eq!(storage.capacity(), 30);
        assert_eq!(storage.total_synapse_count(), 0);
    }

    #[test]
    fn test_create_synapse_storage_overflow() {
        let result = StdRuntime.create_synapse_storage(usize::MAX, 2);
        assert!(matches!(result, Err(RuntimeError::CapacityExceeded { .. })));
    }
}
