//! Periodic impulse scheduler
//!
//! The session owns one scheduler keyed by block id; blocks know nothing
//! about timers. Attaching a timer callback to each block would make every
//! block own a closure that captures the block, an ownership cycle this
//! layout avoids.

use std::collections::BTreeMap;

use super::board::BlockId;

/// Tracks, per block, the next frame at which it is due for a kick.
/// BTreeMap so due blocks come out in id order, keeping sessions
/// deterministic for a given seed.
#[derive(Debug, Clone, Default)]
pub struct ImpulseScheduler {
    interval: u64,
    next_fire: BTreeMap<BlockId, u64>,
}

impl ImpulseScheduler {
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            next_fire: BTreeMap::new(),
        }
    }

    /// Start scheduling kicks for a block, first one `interval` frames from
    /// `now`.
    pub fn register(&mut self, id: BlockId, now: u64) {
        self.next_fire.insert(id, now + self.interval);
    }

    /// Stop scheduling a block. Idempotent.
    pub fn unregister(&mut self, id: BlockId) {
        self.next_fire.remove(&id);
    }

    pub fn clear(&mut self) {
        self.next_fire.clear();
    }

    /// Blocks due at `now`, rescheduled one interval ahead.
    pub fn due(&mut self, now: u64) -> Vec<BlockId> {
        let mut fired = Vec::new();
        for (&id, fire_at) in self.next_fire.iter_mut() {
            if now >= *fire_at {
                *fire_at = now + self.interval;
                fired.push(id);
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_interval() {
        let mut sched = ImpulseScheduler::new(10);
        sched.register(BlockId(1), 0);

        assert!(sched.due(5).is_empty());
        assert_eq!(sched.due(10), vec![BlockId(1)]);
        // Rescheduled relative to the firing frame.
        assert!(sched.due(15).is_empty());
        assert_eq!(sched.due(21), vec![BlockId(1)]);
    }

    #[test]
    fn test_due_blocks_in_id_order() {
        let mut sched = ImpulseScheduler::new(1);
        sched.register(BlockId(3), 0);
        sched.register(BlockId(1), 0);
        sched.register(BlockId(2), 0);
        assert_eq!(sched.due(5), vec![BlockId(1), BlockId(2), BlockId(3)]);
    }

    #[test]
    fn test_unregister_stops_firing() {
        let mut sched = ImpulseScheduler::new(1);
        sched.register(BlockId(1), 0);
        sched.unregister(BlockId(1));
        sched.unregister(BlockId(1));
        assert!(sched.due(100).is_empty());
    }
}
