//! Item id issuance.
//!
//! Ids are wall-clock milliseconds, bumped forward whenever the clock would
//! repeat or go backwards, so one generator never issues the same id twice.

use crate::model::item::ItemId;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Monotonic id source seeded from the system clock.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next id: `max(now_ms, last + 1)`.
    pub fn next_id(&self) -> ItemId {
        self.next_at(now_epoch_ms())
    }

    /// Raises the floor so later ids are strictly greater than `id`.
    ///
    /// Called after loading a persisted list.
    pub fn observe(&self, id: ItemId) {
        self.last.fetch_max(id.get(), Ordering::AcqRel);
    }

    fn next_at(&self, now_ms: i64) -> ItemId {
        let mut current = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now_ms.max(current.saturating_add(1));
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return ItemId(candidate),
                Err(actual) => current = actual,
            }
        }
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::IdGenerator;
    use crate::model::item::ItemId;
    use std::collections::HashSet;

    #[test]
    fn ids_within_same_millisecond_do_not_collide() {
        let ids = IdGenerator::new();
        let first = ids.next_at(1_000);
        let second = ids.next_at(1_000);
        let third = ids.next_at(1_000);
        assert_eq!(first, ItemId(1_000));
        assert_eq!(second, ItemId(1_001));
        assert_eq!(third, ItemId(1_002));
    }

    #[test]
    fn clock_going_backwards_still_moves_forward() {
        let ids = IdGenerator::new();
        let first = ids.next_at(5_000);
        let second = ids.next_at(4_000);
        assert!(second > first);
    }

    #[test]
    fn observed_id_raises_floor() {
        let ids = IdGenerator::new();
        ids.observe(ItemId(9_000));
        assert_eq!(ids.next_at(10), ItemId(9_001));
    }

    #[test]
    fn burst_of_ids_is_pairwise_distinct() {
        let ids = IdGenerator::new();
        let issued = (0..1_000).map(|_| ids.next_id()).collect::<HashSet<_>>();
        assert_eq!(issued.len(), 1_000);
    }
}
