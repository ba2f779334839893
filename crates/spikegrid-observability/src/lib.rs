// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikegrid-observability
//!
//! Logging setup shared by the spikegrid binaries, with per-crate debug flag
//! support. Library crates only emit through `tracing` macros; this crate
//! installs the subscriber.
//!
//! ## Features
//! - `file-logging`: per-run JSON log files with retention cleanup (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use init::*;

/// Known spikegrid crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "spikegrid",
    "spikegrid-npu-neural",
    "spikegrid-npu-runtime",
    "spikegrid-config",
    "spikegrid-serialization",
    "spikegrid-stimulus",
];
