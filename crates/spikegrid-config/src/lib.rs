// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Run configuration for spikegrid
//!
//! A `spikegrid.toml` file sets the timestep, network geometry, stimulus and
//! logging. Values are layered in this order: built-in defaults, the file,
//! `SPIKEGRID_*` environment variables, then command-line overrides.
//! `validate_config` rejects a timestep whose synaptic delay would not fit the
//! delay ring, so no synapse is ever created with an unschedulable delay.
//!
//! ```rust,no_run
//! use spikegrid_config::{load_config, validate_config};
//!
//! let config = load_config(None, None).expect("config");
//! validate_config(&config).expect("valid config");
//! assert!(config.simulation.tick_duration > 0.0);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "std")]
pub mod loader;

pub mod types;
pub mod validation;

#[cfg(feature = "std")]
pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    CONFIG_FILE_NAME,
};

pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Re-export for convenience
pub use serde;

/// Why a configuration could not be produced
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Discovery found nothing; the message lists where it looked
    #[error("{0}")]
    FileNotFound(String),

    #[error("cannot read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("malformed TOML: {0}")]
    ParseError(String),

    /// One message listing every failed check
    #[error("{0}")]
    ValidationError(String),
}

#[cfg(feature = "std")]
impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = SpikegridConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: SpikegridConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.simulation.max_neurons, config.simulation.max_neurons);
        assert_eq!(parsed.logging.level, "info");
    }
}
