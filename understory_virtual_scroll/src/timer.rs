// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Manual-clock timer queue.
//!
//! [`TimerQueue`] is a deterministic [`Scheduler`] driven by the host: nothing
//! fires until the host advances the clock with [`TimerQueue::advance_by`] or
//! [`TimerQueue::advance_to`], typically once per frame with the frame's
//! timestamp. That makes throttling reproducible in tests and lets hosts that
//! already own a frame loop avoid a separate timer facility.
//!
//! The queue is a cheap, cloneable handle; clones share the same timers. Give
//! one clone to [`VirtualScroll`](crate::VirtualScroll) and keep another to
//! drive the clock.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::cell::Cell;
//! use core::time::Duration;
//! use std::rc::Rc;
//! use understory_virtual_scroll::{Scheduler, TimerQueue};
//!
//! let mut queue = TimerQueue::new();
//! let fired = Rc::new(Cell::new(false));
//! let flag = fired.clone();
//! queue.schedule(Duration::from_millis(16), Box::new(move || flag.set(true)));
//!
//! assert_eq!(queue.advance_by(Duration::from_millis(10)), 0);
//! assert!(!fired.get());
//! assert_eq!(queue.advance_by(Duration::from_millis(6)), 1);
//! assert!(fired.get());
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::time::Duration;

use crate::host::Scheduler;

/// Handle to a callback scheduled on a [`TimerQueue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Entry {
    id: TimerId,
    deadline: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Inner {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

impl Inner {
    /// Removes and returns the earliest entry due at or before `until`.
    ///
    /// Entries with equal deadlines come out in scheduling order.
    fn pop_due(&mut self, until: Duration) -> Option<Entry> {
        let (slot, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= until)
            .min_by_key(|(_, entry)| (entry.deadline, entry.id))?;
        Some(self.entries.swap_remove(slot))
    }
}

/// A cloneable, manually advanced timer queue.
#[derive(Clone, Default)]
pub struct TimerQueue {
    inner: Rc<RefCell<Inner>>,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TimerQueue")
            .field("now", &inner.now)
            .field("pending", &inner.entries.len())
            .finish_non_exhaustive()
    }
}

impl TimerQueue {
    /// Creates an empty queue with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time on the queue's clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of callbacks that have been scheduled but not yet run or canceled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Earliest deadline among pending callbacks.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|entry| entry.deadline)
            .min()
    }

    /// Advances the clock by `delta`, running every callback that comes due.
    ///
    /// Returns the number of callbacks run.
    pub fn advance_by(&self, delta: Duration) -> usize {
        let target = self.now().saturating_add(delta);
        self.advance_to(target)
    }

    /// Advances the clock to `time`, running every callback that comes due.
    ///
    /// Callbacks run in deadline order, and the clock reads each callback's
    /// deadline while it runs. Callbacks may schedule or cancel timers; newly
    /// scheduled timers that fall due before `time` also run. Moving the clock
    /// backwards is ignored.
    ///
    /// Returns the number of callbacks run.
    pub fn advance_to(&self, time: Duration) -> usize {
        let mut fired = 0;
        loop {
            let due = {
                let mut inner = self.inner.borrow_mut();
                let due = inner.pop_due(time);
                if let Some(entry) = &due {
                    inner.now = inner.now.max(entry.deadline);
                }
                due
            };
            let Some(entry) = due else {
                break;
            };
            // The borrow is released before running user code.
            (entry.callback)();
            fired += 1;
        }
        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.max(time);
        fired
    }

    /// Drops every pending callback without running it.
    pub fn clear(&self) {
        let entries = core::mem::take(&mut self.inner.borrow_mut().entries);
        drop(entries);
    }
}

impl Scheduler for TimerQueue {
    type Handle = TimerId;

    fn schedule(&mut self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        let deadline = inner.now.saturating_add(delay);
        inner.entries.push(Entry {
            id,
            deadline,
            callback,
        });
        id
    }

    fn cancel(&mut self, handle: TimerId) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let slot = inner.entries.iter().position(|entry| entry.id == handle);
            slot.map(|slot| inner.entries.swap_remove(slot))
        };
        drop(removed);
    }
}
