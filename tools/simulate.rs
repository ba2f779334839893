// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Drive Poisson input through the synapse engine for a configured run.
//!
//! ```text
//! simulate --config spikegrid.toml --ticks 10000 --seed 7 --output stimulus.state
//! simulate --debug spikegrid-stimulus
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use spikegrid::config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    validate_config, SpikegridConfig,
};
use spikegrid::neural::NeuronType;
use spikegrid::observability::{debug_flags_help, init_logging, parse_debug_flags};
use spikegrid::runtime::StdSummationArray;
use spikegrid::serialization::save_synapses;
use spikegrid::stimulus::{PoissonParams, PoissonStimulus};

#[derive(clap::Parser, Debug)]
#[command(name = "simulate", version, author, long_about = None)]
struct Args {
    /// Configuration file (defaults to spikegrid.toml discovery, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Write the stimulus synapse state here after the run
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for the stimulus random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Tick duration in seconds
    #[arg(long)]
    tick_duration: Option<f32>,

    /// Enable debug logging for a crate (repeatable)
    #[arg(long = "debug", value_name = "CRATE")]
    debug: Vec<String>,

    /// Enable debug logging for every spikegrid crate
    #[arg(long)]
    debug_all: bool,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut cli = HashMap::new();
        if let Some(ticks) = self.ticks {
            cli.insert("num_ticks".to_string(), ticks.to_string());
        }
        if let Some(seed) = self.seed {
            cli.insert("seed".to_string(), seed.to_string());
        }
        if let Some(output) = &self.output {
            cli.insert("state_output".to_string(), output.display().to_string());
        }
        if let Some(tick) = self.tick_duration {
            cli.insert("tick_duration".to_string(), tick.to_string());
        }
        cli
    }
}

fn resolve_config(args: &Args) -> Result<SpikegridConfig> {
    let overrides = args.overrides();
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => find_config_file().ok(),
    };

    let config = match path {
        Some(path) => load_config(Some(path.as_path()), Some(&overrides))
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            let mut config = SpikegridConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, &overrides);
            config
        }
    };

    validate_config(&config).context("Invalid configuration")?;
    Ok(config)
}

fn neuron_types(config: &SpikegridConfig) -> Vec<NeuronType> {
    let mut types = vec![NeuronType::Excitatory; config.simulation.max_neurons];
    for &neuron in &config.stimulus.inhibitory_neurons {
        if let Some(slot) = types.get_mut(neuron as usize) {
            *slot = NeuronType::Inhibitory;
        }
    }
    types
}

fn run(config: &SpikegridConfig) -> Result<()> {
    let sim = &config.simulation;
    if !config.stimulus.enabled {
        warn!("stimulus disabled in configuration; nothing drives the network");
        return Ok(());
    }

    let params = PoissonParams {
        fr_mean: config.stimulus.fr_mean,
        weight: config.stimulus.weight,
        masks: config.stimulus.masks.clone(),
    };
    let mut stimulus: PoissonStimulus = PoissonStimulus::new(&params, sim.max_neurons)?;
    stimulus.init(&neuron_types(config), sim.tick_duration)?;

    let mut rng = match config.stimulus.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sums = StdSummationArray::new(sim.max_neurons);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(sim.num_threads)
        .build()
        .context("Failed to build thread pool")?;

    let started = Instant::now();
    let (scheduled, delivered) = pool.install(|| -> Result<(u64, f64)> {
        let mut scheduled = 0u64;
        let mut delivered = 0f64;
        for _ in 0..sim.num_ticks {
            sums.reset();
            scheduled += stimulus.input_stimulus(&sums, &mut rng)? as u64;
            delivered += sums.snapshot().into_iter().map(f64::from).sum::<f64>();
        }
        Ok((scheduled, delivered))
    })?;
    let elapsed = started.elapsed();

    info!(
        ticks = sim.num_ticks,
        neurons = sim.max_neurons,
        threads = pool.current_num_threads(),
        spikes = scheduled,
        delivered_input = delivered,
        elapsed_ms = elapsed.as_millis() as u64,
        ticks_per_sec = sim.num_ticks as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        "simulation complete"
    );

    if let Some(path) = &config.persistence.state_output {
        if let Some(synapses) = stimulus.synapses() {
            save_synapses(synapses, path)
                .with_context(|| format!("Failed to save state to {}", path.display()))?;
        }
    }

    stimulus.term();
    Ok(())
}

fn main() -> Result<()> {
    let matches = Args::command().after_help(debug_flags_help()).get_matches();
    let args = Args::from_arg_matches(&matches)?;
    let config = resolve_config(&args)?;

    // SPIKEGRID_DEBUG is merged in here
    let mut flags = parse_debug_flags();
    if args.debug_all {
        flags.enable_all();
    }
    for crate_name in &args.debug {
        flags.enable(crate_name);
    }
    let _guard = init_logging(&flags, &config.logging.level, config.logging.log_dir.as_deref())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        tick_duration = config.simulation.tick_duration,
        "spikegrid simulate"
    );
    run(&config)
}
