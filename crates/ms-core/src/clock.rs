//! `Clock<E>` — tick clock with self-rescheduling triggers.
//!
//! A trigger is an event of type `E` registered for an absolute tick.  Each
//! call to [`Clock::tick`] advances time one tick at a time and, after every
//! advance, hands all events that have come due to the caller's handler.
//! The handler returns the next absolute tick at which the same event should
//! fire again, or `None` to drop it.
//!
//! Keeping events as plain data (instead of boxed closures) lets the handler
//! borrow whatever state it needs for the duration of the call, e.g. the
//! environment's motes while the clock itself is mutably borrowed.

use std::collections::BTreeMap;

use crate::{SimClock, Tick};

/// Discrete clock plus a sparse trigger queue (`BTreeMap<Tick, Vec<E>>`).
#[derive(Debug)]
pub struct Clock<E> {
    time:     SimClock,
    triggers: BTreeMap<Tick, Vec<E>>,
    pending:  usize,
}

impl<E> Clock<E> {
    pub fn new(time: SimClock) -> Self {
        Self { time, triggers: BTreeMap::new(), pending: 0 }
    }

    /// The current tick.
    #[inline]
    pub fn now(&self) -> Tick {
        self.time.current_tick
    }

    /// Time conversion helpers for the current tick.
    #[inline]
    pub fn time(&self) -> &SimClock {
        &self.time
    }

    /// Register `event` to fire when the clock reaches `at`.
    ///
    /// Events registered for a tick that has already passed fire on the next
    /// advance.
    pub fn add_trigger(&mut self, at: Tick, event: E) {
        self.triggers.entry(at).or_default().push(event);
        self.pending += 1;
    }

    /// Number of queued trigger events.
    pub fn pending_triggers(&self) -> usize {
        self.pending
    }

    /// Earliest tick with a queued event.
    pub fn next_trigger(&self) -> Option<Tick> {
        self.triggers.keys().next().copied()
    }

    /// Advance `n` ticks, firing due triggers after each single-tick advance.
    ///
    /// Events fire in ascending tick order and, within a tick, in
    /// registration order.  A reschedule time at or before the current tick
    /// is ignored so a badly-written handler cannot loop forever.  Returns
    /// the number of events fired.
    pub fn tick<F>(&mut self, n: u64, mut handler: F) -> usize
    where
        F: FnMut(Tick, &E) -> Option<Tick>,
    {
        let mut fired = 0;
        for _ in 0..n {
            self.time.advance();
            let now = self.time.current_tick;
            while let Some(entry) = self.triggers.first_entry() {
                if *entry.key() > now {
                    break;
                }
                let events = entry.remove();
                self.pending -= events.len();
                for event in events {
                    fired += 1;
                    if let Some(next) = handler(now, &event) {
                        if next > now {
                            self.add_trigger(next, event);
                        }
                    }
                }
            }
        }
        fired
    }

    /// Rewind to tick 0 and drop every queued trigger.
    pub fn reset(&mut self) {
        self.time.reset();
        self.triggers.clear();
        self.pending = 0;
    }

    /// Drop every queued trigger, keeping the current time.
    pub fn clear_triggers(&mut self) {
        self.triggers.clear();
        self.pending = 0;
    }
}
