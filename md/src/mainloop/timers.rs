//! One-shot timer table

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

/// Identifier of a scheduled one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Deadline-ordered one-shot timers
///
/// Keyed by `(deadline, id)`, so timers sharing a deadline fire in the order
/// they were scheduled.
pub(crate) struct Timers<E> {
    entries: BTreeMap<(Instant, TimerId), E>,
    next_id: u64,
}

impl<E> Timers<E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub(crate) fn schedule(&mut self, deadline: Instant, event: E) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.insert((deadline, id), event);
        id
    }

    /// Remove and return the earliest timer whose deadline has passed
    pub(crate) fn pop_due(&mut self, now: Instant) -> Option<(TimerId, E)> {
        let (&(deadline, _), _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.entries.pop_first().map(|((_, id), event)| (id, event))
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.entries.first_key_value().map(|(&(deadline, _), _)| deadline)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pop_due_respects_deadline() {
        let mut timers = Timers::new();
        let now = Instant::now();

        timers.schedule(now + Duration::from_secs(60), "later");
        assert!(timers.pop_due(now).is_none());
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_earliest_deadline_first() {
        let mut timers = Timers::new();
        let now = Instant::now();

        timers.schedule(now + Duration::from_millis(30), "c");
        timers.schedule(now + Duration::from_millis(10), "a");
        timers.schedule(now + Duration::from_millis(20), "b");

        assert_eq!(timers.next_deadline(), Some(now + Duration::from_millis(10)));

        let later = now + Duration::from_secs(1);
        let order: Vec<_> = std::iter::from_fn(|| timers.pop_due(later).map(|(_, e)| e)).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(timers.len(), 0);
    }

    #[test]
    fn test_equal_deadlines_fire_in_schedule_order() {
        let mut timers = Timers::new();
        let deadline = Instant::now();

        let first = timers.schedule(deadline, 1);
        let second = timers.schedule(deadline, 2);
        assert!(first < second);

        assert_eq!(timers.pop_due(deadline), Some((first, 1)));
        assert_eq!(timers.pop_due(deadline), Some((second, 2)));
    }
}
