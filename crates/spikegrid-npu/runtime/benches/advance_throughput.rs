// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-tick transmission throughput
//!
//! Measures one full tick (schedule fired sources, advance every synapse) over
//! stores of increasing size. A tenth of the neurons fire on each tick.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spikegrid_npu_neural::{NeuronId, SynapseType};
use spikegrid_npu_runtime::{
    Runtime, StdRuntime, StdSummationArray, StdSynapseArray, SynapseStorage,
};

const TICK: f32 = 1e-4;
const SYNAPSES_PER_NEURON: usize = 4;

fn build_store(neuron_count: usize) -> StdSynapseArray {
    let mut store = StdRuntime
        .create_synapse_storage(neuron_count, SYNAPSES_PER_NEURON)
        .expect("store allocation");
    for dest in 0..neuron_count {
        for k in 0..SYNAPSES_PER_NEURON {
            let source = (dest + k * 7 + 1) % neuron_count;
            let synapse_type = SynapseType::ALL[(dest + k) % SynapseType::ALL.len()];
            store
                .add_synapse(
                    NeuronId(source as u32),
                    NeuronId(dest as u32),
                    NeuronId(dest as u32).into(),
                    TICK,
                    synapse_type,
                )
                .expect("row has room");
        }
    }
    store
}

fn bench_process_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_tick");

    for &neuron_count in &[1_000usize, 10_000, 100_000] {
        let mut store = build_store(neuron_count);
        let sums = StdSummationArray::new(neuron_count);
        let mut tick = 0usize;

        group.throughput(Throughput::Elements(
            (neuron_count * SYNAPSES_PER_NEURON) as u64,
        ));
        group.bench_with_input(
            BenchmarkId::from_parameter(neuron_count),
            &neuron_count,
            |b, &n| {
                b.iter(|| {
                    // Rotate the firing set so no synapse is scheduled twice
                    // inside its delay window
                    let offset = (tick % 10) as u32;
                    let fired: Vec<NeuronId> = (0..n as u32)
                        .filter(|id| id % 10 == offset)
                        .map(NeuronId)
                        .collect();
                    tick += 1;
                    sums.reset();
                    black_box(store.process_tick(&fired, TICK, &sums))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_process_tick);
criterion_main!(benches);
