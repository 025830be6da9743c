use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::TimerId;

/// A pending one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTimer {
    pub id: TimerId,
    pub remaining: Duration,
}

impl PendingTimer {
    pub fn tick(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }
}

/// One-shot timers driven by a virtual clock.
///
/// Timers never repeat and cannot be cancelled. [`TimerQueue::advance`]
/// returns fired ids ordered by deadline, ties broken by scheduling order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    pending: Vec<PendingTimer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            remaining: delay,
        });
        id
    }

    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        let mut fired: Vec<(Duration, TimerId)> = Vec::new();
        self.pending.retain_mut(|t| {
            if t.remaining <= dt {
                fired.push((t.remaining, t.id));
                false
            } else {
                t.tick(dt);
                true
            }
        });
        fired.sort();
        fired.into_iter().map(|(_, id)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_once_after_delay() {
        let mut q = TimerQueue::new();
        let id = q.schedule(Duration::from_millis(500));
        assert!(q.advance(Duration::from_millis(499)).is_empty());
        assert_eq!(q.advance(Duration::from_millis(1)), vec![id]);
        assert!(
            q.advance(Duration::from_secs(10)).is_empty(),
            "One-shot timer must not fire twice"
        );
    }

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let mut q = TimerQueue::new();
        let id = q.schedule(Duration::ZERO);
        assert_eq!(q.advance(Duration::ZERO), vec![id]);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut q = TimerQueue::new();
        let a = q.schedule(Duration::from_millis(10));
        let b = q.schedule(Duration::from_millis(10));
        assert!(b > a);
        assert_eq!(q.advance(Duration::from_millis(10)), vec![a, b]);
    }

    #[test]
    fn fired_in_deadline_order() {
        let mut q = TimerQueue::new();
        let late = q.schedule(Duration::from_millis(300));
        let early = q.schedule(Duration::from_millis(100));
        assert_eq!(q.advance(Duration::from_secs(1)), vec![early, late]);
    }

    #[test]
    fn clear_drops_pending() {
        let mut q = TimerQueue::new();
        q.schedule(Duration::from_millis(10));
        q.clear();
        assert!(q.is_empty());
        assert!(q.advance(Duration::from_secs(1)).is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_timer_fires_exactly_once(
                delays in proptest::collection::vec(0u64..2000, 1..20),
                steps in proptest::collection::vec(1u64..300, 1..40)
            ) {
                let mut q = TimerQueue::new();
                let ids: Vec<TimerId> = delays
                    .iter()
                    .map(|&ms| q.schedule(Duration::from_millis(ms)))
                    .collect();
                let mut fired = Vec::new();
                for ms in steps {
                    fired.extend(q.advance(Duration::from_millis(ms)));
                }
                fired.extend(q.advance(Duration::from_secs(10)));

                let mut sorted = fired.clone();
                sorted.sort();
                sorted.dedup();
                prop_assert_eq!(sorted.len(), fired.len(), "A timer fired twice");
                prop_assert_eq!(sorted, ids);
                prop_assert!(q.is_empty());
            }
        }
    }
}
