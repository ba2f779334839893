// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Property tests for the circular delay queue

use proptest::prelude::*;
use spikegrid_npu_neural::{DelayQueue, SynapseError, DELAY_QUEUE_LENGTH};

fn valid_delay() -> impl Strategy<Value = u32> {
    1..DELAY_QUEUE_LENGTH
}

proptest! {
    #[test]
    fn fresh_queue_never_delivers(total_delay in valid_delay()) {
        let mut queue = DelayQueue::new();
        queue.try_initialize(total_delay).unwrap();
        for _ in 0..DELAY_QUEUE_LENGTH {
            prop_assert!(!queue.consume_current());
        }
        prop_assert_eq!(queue.index(), 0);
    }

    #[test]
    fn delivery_is_exactly_total_delay_ticks_later(
        total_delay in valid_delay(),
        warmup in 0u32..(2 * DELAY_QUEUE_LENGTH),
    ) {
        let mut queue = DelayQueue::new();
        queue.try_initialize(total_delay).unwrap();
        for _ in 0..warmup {
            queue.consume_current();
        }

        queue.try_schedule(total_delay).unwrap();
        for _ in 0..total_delay {
            prop_assert!(!queue.consume_current());
        }
        prop_assert!(queue.consume_current());
    }

    #[test]
    fn delivered_slot_is_cleared(total_delay in valid_delay()) {
        let mut queue = DelayQueue::new();
        queue.try_initialize(total_delay).unwrap();
        queue.try_schedule(total_delay).unwrap();
        for _ in 0..=total_delay {
            queue.consume_current();
        }
        prop_assert!(queue.is_empty());

        // A full lap brings the cursor back over the drained slot
        for _ in 0..DELAY_QUEUE_LENGTH {
            prop_assert!(!queue.consume_current());
        }
    }

    #[test]
    fn scheduling_twice_in_one_tick_collides(
        total_delay in valid_delay(),
        warmup in 0u32..DELAY_QUEUE_LENGTH,
    ) {
        let mut queue = DelayQueue::new();
        queue.try_initialize(total_delay).unwrap();
        for _ in 0..warmup {
            queue.consume_current();
        }
        let slot = queue.try_schedule(total_delay).unwrap();
        prop_assert_eq!(
            queue.try_schedule(total_delay),
            Err(SynapseError::ScheduleCollision { slot, total_delay })
        );
    }

    #[test]
    fn cursor_stays_reduced(total_delay in valid_delay(), ticks in 0u32..500) {
        let mut queue = DelayQueue::new();
        queue.try_initialize(total_delay).unwrap();
        for _ in 0..ticks {
            queue.consume_current();
            prop_assert!(queue.index() < queue.length());
        }
        prop_assert_eq!(queue.index(), ticks % DELAY_QUEUE_LENGTH);
    }
}
