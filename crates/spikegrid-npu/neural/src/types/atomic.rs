// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Lock-free `f32` accumulator

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

/// Atomic f32 stored as its bit pattern in an `AtomicU32`
///
/// `fetch_add` is a CAS loop, so concurrent adds from many synapses into one
/// destination never lose an update.
#[repr(transparent)]
pub struct AtomicF32 {
    bits: AtomicU32,
}

impl AtomicF32 {
    pub const fn from_bits(bits: u32) -> Self {
        AtomicF32 {
            bits: AtomicU32::new(bits),
        }
    }

    pub fn new(value: f32) -> Self {
        Self::from_bits(value.to_bits())
    }

    #[inline]
    pub fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.bits.load(order))
    }

    #[inline]
    pub fn store(&self, value: f32, order: Ordering) {
        self.bits.store(value.to_bits(), order);
    }

    /// Add `delta`, returning the previous value
    #[inline]
    pub fn fetch_add(&self, delta: f32, order: Ordering) -> f32 {
        let mut current_bits = self.bits.load(Ordering::Relaxed);
        loop {
            let current = f32::from_bits(current_bits);
            let next = current + delta;
            match self.bits.compare_exchange_weak(
                current_bits,
                next.to_bits(),
                order,
                Ordering::Relaxed,
            ) {
                Ok(_) => return current,
                Err(observed) => current_bits = observed,
            }
        }
    }

    pub fn into_inner(self) -> f32 {
        f32::from_bits(self.bits.into_inner())
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Debug for AtomicF32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicF32")
            .field(&self.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_add_returns_previous() {
        let value = AtomicF32::new(1.5);
        assert_eq!(value.fetch_add(2.0, Ordering::AcqRel), 1.5);
        assert_eq!(value.load(Ordering::Acquire), 3.5);
    }

    #[test]
    fn test_store_and_into_inner() {
        let value = AtomicF32::default();
        value.store(-4.25, Ordering::Release);
        assert_eq!(value.into_inner(), -4.25);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_concurrent_adds_are_not_lost() {
        use std::sync::Arc;
        use std::thread;
        use std::vec::Vec;

        let value = Arc::new(AtomicF32::new(0.0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let value = Arc::clone(&value);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        value.fetch_add(1.0, Ordering::AcqRel);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(value.load(Ordering::Acquire), 8000.0);
    }
}
