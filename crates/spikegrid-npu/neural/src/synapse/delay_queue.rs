// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-synapse circular delay queue
//!
//! One bit per future tick slot, stored in a single `u32`. The cursor moves one
//! slot per simulation tick; a spike scheduled now lands `total_delay` slots ahead
//! of the cursor and is drained when the cursor reaches it.
//!
//! ```text
//!  index ─┐        ┌─ index + total_delay (mod length)
//!         v        v
//!  bits: [0 0 0 0 0 1 0 0 ... 0]   length = 32
//! ```

use crate::types::{Result, SynapseError, DELAY_QUEUE_BYTES, DELAY_QUEUE_LENGTH};

/// Fixed-width ring of pending deliveries
///
/// The raw bit field is not exposed except through [`to_raw_parts`](Self::to_raw_parts)
/// for persistence, so the backing representation can change without touching callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayQueue {
    bits: u32,
    index: u32,
    length: u32,
}

impl DelayQueue {
    /// Empty ring with the cursor at slot zero
    pub const fn new() -> Self {
        Self {
            bits: 0,
            index: 0,
            length: DELAY_QUEUE_LENGTH,
        }
    }

    /// Bytes of ring storage needed to hold `total_delay` ticks
    #[inline]
    pub const fn required_bytes(total_delay: u32) -> u32 {
        total_delay / u8::BITS + 1
    }

    /// Reset the ring for a synapse with the given delay
    ///
    /// Fails when the delay does not fit the ring; nothing is modified in that case.
    pub fn try_initialize(&mut self, total_delay: u32) -> Result<()> {
        let required_bytes = Self::required_bytes(total_delay);
        if required_bytes > DELAY_QUEUE_BYTES {
            return Err(SynapseError::DelayQueueCapacity {
                total_delay,
                required_bytes,
                available_bytes: DELAY_QUEUE_BYTES,
            });
        }
        self.bits = 0;
        self.index = 0;
        self.length = DELAY_QUEUE_LENGTH;
        Ok(())
    }

    /// Mark the slot `total_delay` ticks ahead of the cursor
    ///
    /// Returns the slot that was marked. A slot that already holds an undelivered
    /// spike is a collision and is reported, never overwritten.
    pub fn try_schedule(&mut self, total_delay: u32) -> Result<u32> {
        debug_assert!(total_delay < self.length);
        let slot = (self.index + total_delay) % self.length;
        let mask = 1u32 << slot;
        if self.bits & mask != 0 {
            return Err(SynapseError::ScheduleCollision { slot, total_delay });
        }
        self.bits |= mask;
        Ok(slot)
    }

    /// Drain the slot under the cursor and advance one tick
    ///
    /// Returns true when a spike was waiting in that slot. The bit is cleared so the
    /// slot can be reused after the ring wraps.
    #[inline]
    pub fn consume_current(&mut self) -> bool {
        let mask = 1u32 << self.index;
        let spike = self.bits & mask != 0;
        self.bits &= !mask;
        self.index += 1;
        if self.index >= self.length {
            self.index = 0;
        }
        spike
    }

    /// Current cursor position, always `< length()`
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Number of deliveries still waiting in the ring
    #[inline]
    pub fn pending_count(&self) -> u32 {
        self.bits.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// `(bits, index, length)` in persisted field order
    pub fn to_raw_parts(&self) -> (u32, u32, u32) {
        (self.bits, self.index, self.length)
    }

    /// Rebuild a ring from persisted fields
    ///
    /// Every ring has the fixed length `DELAY_QUEUE_LENGTH`; any other length or a
    /// cursor outside the ring is rejected.
    pub fn from_raw_parts(bits: u32, index: u32, length: u32) -> Result<Self> {
        if length != DELAY_QUEUE_LENGTH || index >= length {
            return Err(SynapseError::InvalidDelayQueue { index, length });
        }
        Ok(Self {
            bits,
            index,
            length,
        })
    }
}

impl Default for DelayQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_resets_state() {
        let mut queue = DelayQueue::new();
        queue.try_initialize(2).unwrap();
        queue.try_schedule(2).unwrap();
        queue.consume_current();

        queue.try_initialize(5).unwrap();
        assert_eq!(queue.to_raw_parts(), (0, 0, DELAY_QUEUE_LENGTH));
    }

    #[test]
    fn test_initialize_rejects_oversized_delay() {
        let mut queue = DelayQueue::new();
        assert!(queue.try_initialize(DELAY_QUEUE_LENGTH - 1).is_ok());
        assert_eq!(
            queue.try_initialize(DELAY_QUEUE_LENGTH),
            Err(SynapseError::DelayQueueCapacity {
                total_delay: DELAY_QUEUE_LENGTH,
                required_bytes: DELAY_QUEUE_BYTES + 1,
                available_bytes: DELAY_QUEUE_BYTES,
            })
        );
    }

    #[test]
    fn test_spike_arrives_after_total_delay_ticks() {
        let mut queue = DelayQueue::new();
        queue.try_initialize(2).unwrap();
        queue.try_schedule(2).unwrap();

        assert!(!queue.consume_current()); // tick 0
        assert!(!queue.consume_current()); // tick 1
        assert!(queue.consume_current()); // tick 2
        assert!(queue.is_empty());
    }

    #[test]
    fn test_schedule_wraps_around_the_ring() {
        let mut queue = DelayQueue::new();
        queue.try_initialize(3).unwrap();
        for _ in 0..30 {
            queue.consume_current();
        }
        assert_eq!(queue.index(), 30);

        let slot = queue.try_schedule(3).unwrap();
        assert_eq!(slot, 1);

        assert!(!queue.consume_current()); // 30
        assert!(!queue.consume_current()); // 31
        assert_eq!(queue.index(), 0);
        assert!(!queue.consume_current()); // 0
        assert!(queue.consume_current()); // 1
    }

    #[test]
    fn test_double_schedule_collides() {
        let mut queue = DelayQueue::new();
        queue.try_initialize(4).unwrap();
        let slot = queue.try_schedule(4).unwrap();
        assert_eq!(
            queue.try_schedule(4),
            Err(SynapseError::ScheduleCollision {
                slot,
                total_delay: 4
            })
        );
        assert_eq!(queue.pending_count(), 1);
    }

    #[test]
    fn test_consecutive_ticks_do_not_collide() {
        let mut queue = DelayQueue::new();
        queue.try_initialize(2).unwrap();
        for _ in 0..100 {
            queue.try_schedule(2).unwrap();
            queue.consume_current();
        }
    }

    #[test]
    fn test_from_raw_parts_validation() {
        assert!(DelayQueue::from_raw_parts(0b100, 3, 32).is_ok());
        assert!(DelayQueue::from_raw_parts(0, 32, 32).is_err());
        assert!(DelayQueue::from_raw_parts(0, 0, 0).is_err());
        assert!(DelayQueue::from_raw_parts(0, 0, 33).is_err());
        assert!(DelayQueue::from_raw_parts(1 << 20, 0, 16).is_err());
        assert!(DelayQueue::from_raw_parts(0, 0, 4).is_err());
        assert!(DelayQueue::from_raw_parts(u32::MAX, 31, 32).is_ok());
    }
}
