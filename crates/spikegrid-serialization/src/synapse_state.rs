// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Text persistence for synapse stores

use crate::{Result, SerializationError};
use spikegrid_npu_neural::{DelayQueue, NeuronId, SynapseId, SynapseType};
use spikegrid_npu_runtime::{SynapseRecord, SynapseStorage};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Write the store geometry and every in-use synapse
pub fn write_synapses<S, W>(store: &S, mut writer: W) -> Result<()>
where
    S: SynapseStorage + ?Sized,
    W: Write,
{
    writeln!(writer, "{}", store.max_neurons())?;
    writeln!(writer, "{}", store.max_synapses_per_neuron())?;
    writeln!(writer, "{}", store.total_synapse_count())?;

    let mut written = 0usize;
    for idx in 0..store.capacity() {
        let id = SynapseId(idx as u32);
        if !store.in_use(id) {
            continue;
        }
        writeln!(writer, "{}", id.0)?;
        write_record(&mut writer, &store.record(id))?;
        written += 1;
    }
    writer.flush()?;

    debug!(synapses = written, "wrote synapse state");
    Ok(())
}

fn write_record<W: Write>(writer: &mut W, record: &SynapseRecord) -> Result<()> {
    let (bits, index, length) = record.delay_queue.to_raw_parts();
    writeln!(writer, "{}", record.source_neuron.0)?;
    writeln!(writer, "{}", record.dest_neuron.0)?;
    writeln!(writer, "{}", record.weight)?;
    writeln!(writer, "{}", record.psr)?;
    writeln!(writer, "{}", record.synapse_type.ordinal())?;
    writeln!(writer, "{}", u8::from(record.in_use))?;
    writeln!(writer, "{}", record.decay)?;
    writeln!(writer, "{}", record.total_delay)?;
    writeln!(writer, "{}", bits)?;
    writeln!(writer, "{}", index)?;
    writeln!(writer, "{}", length)?;
    writeln!(writer, "{}", record.tau)?;
    Ok(())
}

/// Replace the store contents with the state read from `reader`
///
/// The file geometry must match the store. Every slot not named in the file
/// ends up unallocated. Summation points are restored as the destination neuron.
/// The whole file is parsed and checked before the store is touched, so on error
/// the store keeps its previous contents. Returns the number of synapses restored.
pub fn read_synapses<S, R>(store: &mut S, mut reader: R) -> Result<usize>
where
    S: SynapseStorage + ?Sized,
    R: Read,
{
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let mut tokens = Tokens::new(&content);

    let found_neurons: usize = tokens.next_field("max_neurons")?;
    let found_per_neuron: usize = tokens.next_field("max_synapses_per_neuron")?;
    if found_neurons != store.max_neurons()
        || found_per_neuron != store.max_synapses_per_neuron()
    {
        return Err(SerializationError::ShapeMismatch {
            found_neurons,
            found_per_neuron,
            expected_neurons: store.max_neurons(),
            expected_per_neuron: store.max_synapses_per_neuron(),
        });
    }
    let count: usize = tokens.next_field("in_use_count")?;

    let mut records = Vec::with_capacity(count.min(store.capacity()));
    for _ in 0..count {
        let synapse: u32 = tokens.next_field("synapse_id")?;
        if synapse as usize >= store.capacity() {
            return Err(SerializationError::SlotOutOfRange {
                synapse,
                capacity: store.capacity(),
            });
        }
        let record = read_record(&mut tokens, synapse)?;
        record.validate(store.max_neurons())?;
        records.push((SynapseId(synapse), record));
    }

    store.clear();
    for (id, record) in records {
        store.restore(id, record, record.dest_neuron.into())?;
    }

    debug!(synapses = count, "read synapse state");
    Ok(count)
}

fn read_record(tokens: &mut Tokens<'_>, synapse: u32) -> Result<SynapseRecord> {
    let source_neuron = NeuronId(tokens.next_field("source_neuron")?);
    let dest_neuron = NeuronId(tokens.next_field("dest_neuron")?);
    let weight = tokens.next_field("weight")?;
    let psr = tokens.next_field("psr")?;
    let ordinal: i32 = tokens.next_field("synapse_type")?;
    let synapse_type =
        SynapseType::from_ordinal(ordinal).ok_or(SerializationError::InvalidSynapseType(ordinal))?;
    let in_use = tokens.next_field::<u8>("in_use")? != 0;
    let decay = tokens.next_field("decay")?;
    let total_delay = tokens.next_field("total_delay")?;
    let bits = tokens.next_field("delay_queue")?;
    let index = tokens.next_field("delay_index")?;
    let length = tokens.next_field("queue_length")?;
    let tau = tokens.next_field("tau")?;

    let delay_queue = DelayQueue::from_raw_parts(bits, index, length)
        .map_err(|source| SerializationError::InvalidDelayQueue { synapse, source })?;

    Ok(SynapseRecord {
        source_neuron,
        dest_neuron,
        weight,
        psr,
        synapse_type,
        in_use,
        decay,
        total_delay,
        delay_queue,
        tau,
    })
}

/// Save the store to a file
pub fn save_synapses<S, P>(store: &S, path: P) -> Result<()>
where
    S: SynapseStorage + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)?;
    write_synapses(store, BufWriter::new(file))?;
    info!(
        path = %path.display(),
        synapses = store.total_synapse_count(),
        "saved synapse state"
    );
    Ok(())
}

/// Load a file written by [`save_synapses`] into the store
pub fn load_synapses<S, P>(store: &mut S, path: P) -> Result<usize>
where
    S: SynapseStorage + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let count = read_synapses(store, File::open(path)?)?;
    info!(path = %path.display(), synapses = count, "loaded synapse state");
    Ok(count)
}

/// Scalars separated by whitespace or NUL
struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = &'a str> + 'a>,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            inner: Box::new(
                content
                    .split(|c: char| c == '\0' || c.is_whitespace())
                    .filter(|token| !token.is_empty()),
            ),
        }
    }

    fn next_field<T: FromStr>(&mut self, field: &'static str) -> Result<T> {
        let token = self
            .inner
            .next()
            .ok_or(SerializationError::UnexpectedEof { field })?;
        token.parse().map_err(|_| SerializationError::Parse {
            field,
            value: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikegrid_npu_neural::SummationPoint;
    use spikegrid_npu_runtime::{Runtime, RuntimeError, StdRuntime, StdSynapseArray};

    const TICK: f32 = 5e-4;

    fn one_synapse_store() -> StdSynapseArray {
        let mut store = StdRuntime.create_synapse_storage(2, 1).unwrap();
        let id = store
            .add_synapse(NeuronId(0), NeuronId(1), SummationPoint(1), TICK, SynapseType::EE)
            .unwrap();
        store.schedule_spike(id);
        store
    }

    #[test]
    fn test_write_layout() {
        let store = one_synapse_store();
        let mut out = Vec::new();
        write_synapses(&store, &mut out).unwrap();

        let lines: Vec<&str> = std::str::from_utf8(&out).unwrap().lines().collect();
        assert_eq!(
            lines,
            vec![
                "2", "1", "1", // header
                "1", // slot
                "0", "1", "0.00000001", "0", "3", "1", // base fields
                "0", "2", "4", "0", "32", "0.003", // delay fields
            ]
        );
    }

    #[test]
    fn test_read_nul_separated() {
        let legacy = "2\n1\n1\n1\n0\x001\x00-0.00000001\x000\x001\x001\x000\x002\x000\x001\x0032\x000.003\x00";
        let mut store = StdRuntime.create_synapse_storage(2, 1).unwrap();

        assert_eq!(read_synapses(&mut store, legacy.as_bytes()).unwrap(), 1);
        let id = SynapseId(1);
        assert_eq!(store.synapse_type(id), SynapseType::IE);
        assert_eq!(store.weight(id), -1e-8);
        assert_eq!(store.delay_queue(id).index(), 1);
        assert_eq!(store.summation_point(id), SummationPoint(1));
    }

    #[test]
    fn test_read_truncated_input() {
        let mut store = StdRuntime.create_synapse_storage(2, 1).unwrap();
        let err = read_synapses(&mut store, "2\n1\n1\n1\n0\n1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SerializationError::UnexpectedEof { field: "weight" }));
    }

    #[test]
    fn test_read_rejects_bad_values() {
        let mut store = StdRuntime.create_synapse_storage(2, 1).unwrap();

        let bad_type = "2 1 1 1 0 1 0 0 7 1 0 2 0 0 32 0.003";
        assert!(matches!(
            read_synapses(&mut store, bad_type.as_bytes()),
            Err(SerializationError::InvalidSynapseType(7))
        ));

        let bad_number = "2 1 1 1 0 1 abc";
        assert!(matches!(
            read_synapses(&mut store, bad_number.as_bytes()),
            Err(SerializationError::Parse { field: "weight", .. })
        ));

        let bad_queue = "2 1 1 1 0 1 0 0 3 1 0 2 0 40 32 0.003";
        assert!(matches!(
            read_synapses(&mut store, bad_queue.as_bytes()),
            Err(SerializationError::InvalidDelayQueue { synapse: 1, .. })
        ));

        let bad_slot = "2 1 1 5 0 1 0 0 3 1 0 2 0 0 32 0.003";
        assert!(matches!(
            read_synapses(&mut store, bad_slot.as_bytes()),
            Err(SerializationError::SlotOutOfRange { synapse: 5, capacity: 2 })
        ));
    }

    #[test]
    fn test_read_rejects_delay_outside_the_ring() {
        let mut store = StdRuntime.create_synapse_storage(2, 1).unwrap();

        // total_delay 10 in a 4-slot ring
        let short_ring = "2 1 1 1 0 1 1e-8 0 3 1 0 10 0 0 4 0.003";
        assert!(matches!(
            read_synapses(&mut store, short_ring.as_bytes()),
            Err(SerializationError::InvalidDelayQueue { synapse: 1, .. })
        ));

        // total_delay 40 does not fit 32 slots
        let long_delay = "2 1 1 1 0 1 1e-8 0 3 1 0 40 0 0 32 0.003";
        assert!(matches!(
            read_synapses(&mut store, long_delay.as_bytes()),
            Err(SerializationError::Runtime(RuntimeError::InvalidRecord(_)))
        ));
        assert_eq!(store.total_synapse_count(), 0);
    }

    #[test]
    fn test_read_rejects_destination_outside_the_network() {
        let mut store = StdRuntime.create_synapse_storage(2, 1).unwrap();
        let far_dest = "2 1 1 1 0 50 1e-8 0 3 1 0 2 0 0 32 0.003";
        assert!(matches!(
            read_synapses(&mut store, far_dest.as_bytes()),
            Err(SerializationError::Runtime(RuntimeError::NeuronOutOfRange {
                neuron: 50,
                max_neurons: 2
            }))
        ));
        assert!(!store.in_use(SynapseId(1)));
    }

    #[test]
    fn test_failed_read_keeps_previous_state() {
        let mut store = StdRuntime.create_synapse_storage(2, 1).unwrap();
        store
            .add_synapse(NeuronId(1), NeuronId(0), SummationPoint(0), TICK, SynapseType::IE)
            .unwrap();
        store
            .add_synapse(NeuronId(0), NeuronId(1), SummationPoint(1), TICK, SynapseType::EE)
            .unwrap();
        store.schedule_spike(SynapseId(1));
        let before: Vec<SynapseRecord> = (0..2).map(|i| store.record(SynapseId(i))).collect();

        // Two records promised, the second cut off after its destination
        let truncated = "2 1 2 0 1 0 -1e-8 0 1 1 0 2 0 0 32 0.003 1 0 1";
        let err = read_synapses(&mut store, truncated.as_bytes()).unwrap_err();
        assert!(matches!(err, SerializationError::UnexpectedEof { field: "weight" }));

        let after: Vec<SynapseRecord> = (0..2).map(|i| store.record(SynapseId(i))).collect();
        assert_eq!(before, after);
        assert_eq!(store.total_synapse_count(), 2);
        assert_eq!(store.outgoing(NeuronId(0)), &[1]);
    }

    #[test]
    fn test_read_shape_mismatch_leaves_store_untouched() {
        let mut store = one_synapse_store();
        let err = read_synapses(&mut store, "3 1 0".as_bytes()).unwrap_err();
        assert!(matches!(err, SerializationError::ShapeMismatch { found_neurons: 3, .. }));
        assert_eq!(store.total_synapse_count(), 1);
    }
}
