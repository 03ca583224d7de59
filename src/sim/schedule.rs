//! Cooperative tick scheduler
//!
//! A virtual millisecond clock holding fire-once ticks. Every tick is stamped
//! with the generation current at scheduling time; [`TickScheduler::cancel_all`]
//! bumps the generation so ticks from an earlier run are dropped when they
//! come due instead of touching the new run.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A scheduled tick. Ordered by due time, then scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PendingTick {
    pub due_ms: u64,
    seq: u64,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct TickScheduler {
    now_ms: u64,
    generation: u64,
    next_seq: u64,
    pending: BinaryHeap<Reverse<PendingTick>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a tick `delay_ms` after the current clock
    pub fn schedule(&mut self, delay_ms: u64) -> PendingTick {
        let tick = PendingTick {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
            generation: self.generation,
        };
        self.next_seq += 1;
        self.pending.push(Reverse(tick));
        tick
    }

    /// Invalidate every tick scheduled so far
    pub fn cancel_all(&mut self) {
        self.generation += 1;
    }

    /// Pop the next live tick due at or before `deadline_ms`
    ///
    /// The clock jumps to the tick's due time so follow-up ticks are scheduled
    /// relative to it. Stale ticks are discarded on the way.
    pub fn pop_due(&mut self, deadline_ms: u64) -> Option<PendingTick> {
        while let Some(Reverse(tick)) = self.pending.peek().copied() {
            if tick.due_ms > deadline_ms {
                return None;
            }
            self.pending.pop();
            self.now_ms = self.now_ms.max(tick.due_ms);
            if tick.generation == self.generation {
                return Some(tick);
            }
            log::debug!(
                "Dropping stale tick (generation {} < {})",
                tick.generation,
                self.generation
            );
        }
        None
    }

    /// Pop the next live tick whatever its due time
    pub fn pop_next(&mut self) -> Option<PendingTick> {
        self.pop_due(u64::MAX)
    }

    /// Move the clock forward to `deadline_ms` (never backwards)
    pub fn settle(&mut self, deadline_ms: u64) {
        self.now_ms = self.now_ms.max(deadline_ms);
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if a tick from the current generation is waiting
    pub fn has_live_ticks(&self) -> bool {
        self.pending
            .iter()
            .any(|Reverse(tick)| tick.generation == self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_fire_in_due_order() {
        let mut sched = TickScheduler::new();
        let late = sched.schedule(400);
        let early = sched.schedule(300);
        let tie = sched.schedule(300);

        assert_eq!(sched.pop_due(1000), Some(early));
        assert_eq!(sched.now_ms(), 300);
        assert_eq!(sched.pop_due(1000), Some(tie));
        assert_eq!(sched.pop_due(1000), Some(late));
        assert_eq!(sched.pop_due(1000), None);
    }

    #[test]
    fn test_deadline_holds_back_future_ticks() {
        let mut sched = TickScheduler::new();
        sched.schedule(400);
        assert_eq!(sched.pop_due(399), None);
        sched.settle(399);
        assert_eq!(sched.now_ms(), 399);
        assert!(sched.pop_due(400).is_some());
    }

    #[test]
    fn test_clock_follows_fired_tick() {
        let mut sched = TickScheduler::new();
        sched.schedule(100);
        sched.pop_due(1000);
        let next = sched.schedule(100);
        assert_eq!(next.due_ms, 200);
    }

    #[test]
    fn test_cancel_drops_stale_ticks() {
        let mut sched = TickScheduler::new();
        sched.schedule(0);
        sched.schedule(50);
        sched.cancel_all();
        assert!(!sched.has_live_ticks());

        let fresh = sched.schedule(100);
        assert!(sched.has_live_ticks());
        assert_eq!(sched.pop_next(), Some(fresh));
        assert_eq!(fresh.generation, 1);
        assert_eq!(sched.pop_next(), None);
    }

    #[test]
    fn test_schedule_saturates_at_end_of_clock() {
        let mut sched = TickScheduler::new();
        sched.settle(u64::MAX - 10);
        let tick = sched.schedule(400);
        assert_eq!(tick.due_ms, u64::MAX);
        assert_eq!(sched.pop_due(u64::MAX), Some(tick));
    }

    #[test]
    fn test_settle_never_rewinds() {
        let mut sched = TickScheduler::new();
        sched.settle(500);
        sched.settle(200);
        assert_eq!(sched.now_ms(), 500);
    }
}
