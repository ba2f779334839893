// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug switches
//!
//! A crate named by `--debug-<crate>` or by `SPIKEGRID_DEBUG` logs at `debug`
//! while everything else stays at the base level.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Crates raised to debug level
///
/// ```rust
/// use spikegrid_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-spikegrid-stimulus".to_string()]);
/// assert!(flags.is_enabled("spikegrid-stimulus"));
/// assert_eq!(flags.to_filter_string("info"), "spikegrid_stimulus=debug,info");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Collect `--debug-<crate>` arguments; `--debug-all` enables every known crate
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = Self::default();
        for arg in args {
            match arg.strip_prefix("--debug-") {
                Some("all") => flags.enable_all(),
                Some(crate_name) => flags.enable(crate_name),
                None => {}
            }
        }
        flags
    }

    /// Raise one crate to debug level
    pub fn enable(&mut self, crate_name: &str) {
        let crate_name = crate_name.trim();
        if !crate_name.is_empty() {
            self.crates.insert(crate_name.to_string());
        }
    }

    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.crates.contains(crate_name)
    }

    /// `EnvFilter` directives, e.g. `"spikegrid_npu_runtime=debug,info"`
    ///
    /// Filter targets are module paths, so dashes become underscores.
    pub fn to_filter_string(&self, base_level: &str) -> String {
        self.crates
            .iter()
            .map(|crate_name| format!("{}=debug", crate_name.replace('-', "_")))
            .chain(std::iter::once(base_level.to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Flags from the process arguments plus `SPIKEGRID_DEBUG`
///
/// The variable holds comma-separated crate names, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(value) = env::var("SPIKEGRID_DEBUG") {
        merge_env_flags(&mut flags, &value);
    }
    flags
}

fn merge_env_flags(flags: &mut CrateDebugFlags, value: &str) {
    if value.trim() == "all" {
        flags.enable_all();
    } else {
        value.split(',').for_each(|crate_name| flags.enable(crate_name));
    }
}

/// Help text listing the crates that accept debug switches
pub fn debug_flags_help() -> String {
    format!(
        "Crates accepted by --debug and SPIKEGRID_DEBUG:\n  {}\n\n\
         SPIKEGRID_DEBUG takes comma-separated crate names or `all`, e.g.\n  \
         SPIKEGRID_DEBUG=spikegrid-npu-runtime,spikegrid-stimulus",
        KNOWN_CRATES.join(", ")
    )
}
