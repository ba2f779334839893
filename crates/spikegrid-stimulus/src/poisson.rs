// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Poisson spike trains delivered through per-neuron input synapses

use crate::{Result, StimulusError};
use rand::Rng;
use spikegrid_npu_neural::{
    NeuronId, NeuronType, SummationMap, SynapseId, SynapseType, SYNAPSE_STRENGTH_ADJUSTMENT,
};
use spikegrid_npu_runtime::{Runtime, StdRuntime, StdSynapseArray, SynapseStorage};
use tracing::{debug, info, trace};

/// Stimulus parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PoissonParams {
    /// Mean firing rate in Hz
    pub fr_mean: f32,
    /// Input synapse weight before scaling by `SYNAPSE_STRENGTH_ADJUSTMENT`
    pub weight: f32,
    /// Neurons that receive input; `None` means every neuron
    pub masks: Option<Vec<u32>>,
}

impl Default for PoissonParams {
    fn default() -> Self {
        Self {
            fr_mean: 10.0,
            weight: 10.0,
            masks: None,
        }
    }
}

/// Poisson input generator
///
/// Owns one synapse per neuron in a store of shape `(total_neurons, 1)`, so
/// synapse `n` feeds neuron `n`.
pub struct PoissonStimulus<S: SynapseStorage = StdSynapseArray> {
    total_neurons: usize,
    /// Mean inter-spike interval in ms
    lambda: f64,
    weight: f32,
    masks: Vec<bool>,
    /// Ticks left until each neuron's next input spike
    isi_counters: Vec<i32>,
    tick_duration: f32,
    synapses: Option<S>,
}

impl<S: SynapseStorage> std::fmt::Debug for PoissonStimulus<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoissonStimulus")
            .field("total_neurons", &self.total_neurons)
            .field("lambda_ms", &self.lambda)
            .field("weight", &self.weight)
            .field("initialized", &self.synapses.is_some())
            .finish()
    }
}

impl<S: SynapseStorage> PoissonStimulus<S> {
    /// Validate parameters and set up masks and interval counters
    pub fn new(params: &PoissonParams, total_neurons: usize) -> Result<Self> {
        if !(params.fr_mean.is_finite() && params.fr_mean > 0.0) {
            return Err(StimulusError::InvalidRate(params.fr_mean));
        }

        let masks = match &params.masks {
            None => vec![true; total_neurons],
            Some(indices) => {
                let mut masks = vec![false; total_neurons];
                for &neuron in indices {
                    let slot = masks.get_mut(neuron as usize).ok_or(
                        StimulusError::MaskOutOfRange {
                            neuron,
                            total_neurons,
                        },
                    )?;
                    *slot = true;
                }
                masks
            }
        };

        // Hz -> spikes per ms
        let rate_per_ms = f64::from(params.fr_mean) / 1000.0;

        Ok(Self {
            total_neurons,
            lambda: 1.0 / rate_per_ms,
            weight: params.weight,
            masks,
            isi_counters: vec![0; total_neurons],
            tick_duration: 0.0,
            synapses: None,
        })
    }

    /// Build the input synapses on `runtime`
    ///
    /// Synapse type follows the destination neuron: `EI` into inhibitory
    /// neurons, `EE` otherwise.
    pub fn init_with<R>(
        &mut self,
        runtime: &R,
        neuron_types: &[NeuronType],
        tick_duration: f32,
    ) -> Result<()>
    where
        R: Runtime<SynapseStorage = S>,
    {
        if neuron_types.len() != self.total_neurons {
            return Err(StimulusError::NeuronTypesLength {
                expected: self.total_neurons,
                found: neuron_types.len(),
            });
        }

        let mut synapses = runtime.create_synapse_storage(self.total_neurons, 1)?;
        let weight = self.weight * SYNAPSE_STRENGTH_ADJUSTMENT;
        for (index, neuron_type) in neuron_types.iter().enumerate() {
            let neuron = NeuronId(index as u32);
            let synapse_type = match neuron_type {
                NeuronType::Inhibitory => SynapseType::EI,
                NeuronType::Excitatory => SynapseType::EE,
            };
            let id = SynapseId(index as u32);
            synapses.create_synapse(
                id,
                NeuronId::EXTERNAL,
                neuron,
                neuron.into(),
                tick_duration,
                synapse_type,
            );
            synapses.set_weight(id, weight);
        }

        self.tick_duration = tick_duration;
        self.isi_counters.fill(0);
        self.synapses = Some(synapses);

        info!(
            neurons = self.total_neurons,
            masked = self.masked_count(),
            lambda_ms = self.lambda,
            weight,
            platform = runtime.platform_name(),
            "poisson stimulus initialized"
        );
        Ok(())
    }

    /// Schedule due input spikes, then advance every input synapse one tick
    ///
    /// Interval draws happen in neuron order on the caller's rng, so a seeded
    /// rng reproduces the same spike trains. Returns the spikes scheduled.
    pub fn input_stimulus<M, G>(&mut self, summation: &M, rng: &mut G) -> Result<usize>
    where
        M: SummationMap + Sync + ?Sized,
        G: Rng + ?Sized,
    {
        let synapses = self
            .synapses
            .as_mut()
            .ok_or(StimulusError::NotInitialized)?;

        let mut scheduled = 0;
        for (neuron, counter) in self.isi_counters.iter_mut().enumerate() {
            if !self.masks[neuron] {
                continue;
            }
            *counter -= 1;
            if *counter <= 0 {
                synapses.schedule_spike(SynapseId(neuron as u32));
                *counter = draw_isi_ticks(self.lambda, self.tick_duration, rng);
                scheduled += 1;
            }
        }

        synapses.advance_all(self.tick_duration, summation);
        trace!(scheduled, "stimulus tick");
        Ok(scheduled)
    }

    /// Release the input synapses
    pub fn term(&mut self) {
        if let Some(mut synapses) = self.synapses.take() {
            synapses.clear();
            debug!(neurons = self.total_neurons, "poisson stimulus released");
        }
    }

    /// Input synapse store, if initialized
    pub fn synapses(&self) -> Option<&S> {
        self.synapses.as_ref()
    }

    /// Mutable input synapse store, e.g. for restoring saved state
    pub fn synapses_mut(&mut self) -> Option<&mut S> {
        self.synapses.as_mut()
    }

    pub fn total_neurons(&self) -> usize {
        self.total_neurons
    }

    /// Mean inter-spike interval in ms
    pub fn lambda_ms(&self) -> f64 {
        self.lambda
    }

    pub fn is_masked(&self, neuron: NeuronId) -> bool {
        self.masks.get(neuron.index()).copied().unwrap_or(false)
    }

    pub fn masked_count(&self) -> usize {
        self.masks.iter().filter(|m| **m).count()
    }

    /// Ticks until `neuron`'s next input spike
    pub fn isi_counter(&self, neuron: NeuronId) -> Option<i32> {
        self.isi_counters.get(neuron.index()).copied()
    }
}

impl PoissonStimulus<StdSynapseArray> {
    /// Build the input synapses on the std store
    pub fn init(&mut self, neuron_types: &[NeuronType], tick_duration: f32) -> Result<()> {
        self.init_with(&StdRuntime, neuron_types, tick_duration)
    }
}

/// Draw the next inter-spike interval and convert it to ticks
///
/// Exponential with mean `lambda` ms; short intervals are thinned with
/// acceptance `1 - exp(-isi²/32)` to mimic refractoriness.
fn draw_isi_ticks<G: Rng + ?Sized>(lambda: f64, tick_duration: f32, rng: &mut G) -> i32 {
    let mut isi = exponential(lambda, rng);
    while rng.gen::<f64>() <= (-(isi * isi) / 32.0).exp() {
        isi = exponential(lambda, rng);
    }
    // ms -> s -> ticks, rounded half up
    ((isi / 1000.0) / f64::from(tick_duration) + 0.5) as i32
}

fn exponential<G: Rng + ?Sized>(lambda: f64, rng: &mut G) -> f64 {
    // (0, 1] keeps ln finite
    let u = 1.0 - rng.gen::<f64>();
    -lambda * u.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use spikegrid_npu_runtime::StdSummationArray;

    const TICK: f32 = 5e-4;

    fn stimulus(neurons: usize, masks: Option<Vec<u32>>) -> PoissonStimulus {
        let params = PoissonParams {
            masks,
            ..PoissonParams::default()
        };
        PoissonStimulus::new(&params, neurons).unwrap()
    }

    #[test]
    fn test_rate_conversion() {
        let s = stimulus(4, None);
        assert!((s.lambda_ms() - 100.0).abs() < 1e-9);
        assert_eq!(s.masked_count(), 4);
        assert_eq!(s.isi_counter(NeuronId(3)), Some(0));
    }

    #[test]
    fn test_rejects_bad_params() {
        let params = PoissonParams {
            fr_mean: 0.0,
            ..PoissonParams::default()
        };
        assert!(matches!(
            PoissonStimulus::<StdSynapseArray>::new(&params, 4),
            Err(StimulusError::InvalidRate(_))
        ));

        let params = PoissonParams {
            masks: Some(vec![1, 4]),
            ..PoissonParams::default()
        };
        assert!(matches!(
            PoissonStimulus::<StdSynapseArray>::new(&params, 4),
            Err(StimulusError::MaskOutOfRange { neuron: 4, total_neurons: 4 })
        ));
    }

    #[test]
    fn test_masks_select_neurons() {
        let s = stimulus(4, Some(vec![0, 2]));
        assert!(s.is_masked(NeuronId(0)));
        assert!(!s.is_masked(NeuronId(1)));
        assert!(s.is_masked(NeuronId(2)));
        assert!(!s.is_masked(NeuronId(9)));
        assert_eq!(s.masked_count(), 2);
    }

    #[test]
    fn test_init_builds_one_input_synapse_per_neuron() {
        let mut s = stimulus(3, None);
        let types = [NeuronType::Excitatory, NeuronType::Inhibitory, NeuronType::Excitatory];
        s.init(&types, TICK).unwrap();

        let store = s.synapses().unwrap();
        assert_eq!(store.total_synapse_count(), 3);
        for n in 0..3u32 {
            let id = SynapseId(n);
            assert_eq!(store.source_neuron(id), NeuronId::EXTERNAL);
            assert_eq!(store.dest_neuron(id), NeuronId(n));
            assert_eq!(store.weight(id), 10.0 * SYNAPSE_STRENGTH_ADJUSTMENT);
        }
        assert_eq!(store.synapse_type(SynapseId(1)), SynapseType::EI);
        assert_eq!(store.synapse_type(SynapseId(2)), SynapseType::EE);
    }

    #[test]
    fn test_init_checks_type_count() {
        let mut s = stimulus(3, None);
        assert!(matches!(
            s.init(&[NeuronType::Excitatory], TICK),
            Err(StimulusError::NeuronTypesLength { expected: 3, found: 1 })
        ));
    }

    #[test]
    fn test_tick_before_init_fails() {
        let mut s = stimulus(2, None);
        let sums = StdSummationArray::new(2);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            s.input_stimulus(&sums, &mut rng),
            Err(StimulusError::NotInitialized)
        ));
    }

    #[test]
    fn test_first_tick_fires_every_masked_neuron() {
        let mut s = stimulus(4, Some(vec![1, 3]));
        s.init(&[NeuronType::Excitatory; 4], TICK).unwrap();
        let sums = StdSummationArray::new(4);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(s.input_stimulus(&sums, &mut rng).unwrap(), 2);
        // Delivery lands total_delay ticks after scheduling
        s.input_stimulus(&sums, &mut rng).unwrap();
        sums.reset();
        s.input_stimulus(&sums, &mut rng).unwrap();

        let w = 10.0 * SYNAPSE_STRENGTH_ADJUSTMENT;
        assert_eq!(sums.snapshot(), vec![0.0, w, 0.0, w]);
        assert!(s.isi_counter(NeuronId(1)).unwrap() > 0);
        assert_eq!(s.isi_counter(NeuronId(0)), Some(0));
    }

    #[test]
    fn test_isi_draws_are_refractory_thinned() {
        let mut rng = StdRng::seed_from_u64(42);
        // 1 ms ticks, 100 ms mean: intervals under a tick are very rare after thinning
        let draws: Vec<i32> = (0..2000).map(|_| draw_isi_ticks(100.0, 1e-3, &mut rng)).collect();
        assert!(draws.iter().all(|&t| t >= 0));
        let short = draws.iter().filter(|&&t| t < 1).count();
        assert!(short < 20, "{} short intervals", short);
        let mean = draws.iter().map(|&t| f64::from(t)).sum::<f64>() / draws.len() as f64;
        assert!((80.0..130.0).contains(&mean), "mean {}", mean);
    }

    #[test]
    fn test_term_releases_store() {
        let mut s = stimulus(2, None);
        s.init(&[NeuronType::Excitatory; 2], TICK).unwrap();
        s.term();
        assert!(s.synapses().is_none());
        s.term();
    }
}
