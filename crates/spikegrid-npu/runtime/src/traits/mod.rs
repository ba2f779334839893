// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Runtime abstraction traits for synapse storage
//!
//! - Desktop/Server (Vec-based, rayon)
//! - Embedded (fixed arrays, sequential)

pub mod error;
pub mod runtime;

// Re-export key types
pub use error::{Result, RuntimeError};
pub use runtime::{Runtime, SynapseRecord, SynapseStorage};
