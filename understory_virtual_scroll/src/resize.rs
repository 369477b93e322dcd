// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broadcast resize notifications.
//!
//! [`ResizeNotifier`] is a minimal [`ResizeSource`]: the host calls
//! [`ResizeNotifier::notify`] with the container's new content height from
//! whatever layout pass or platform observer it has, and every current
//! subscriber receives it. Like [`TimerQueue`](crate::TimerQueue) it is a
//! cloneable handle, so the host keeps one clone and hands another to the
//! list.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::host::ResizeSource;

/// Handle to a subscription on a [`ResizeNotifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<S> = Box<dyn FnMut(S)>;

struct Inner<S> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
    /// Ids of listeners taken out of `listeners` for an in-progress `notify`.
    checked_out: Option<Vec<SubscriptionId>>,
    /// Checked-out ids unsubscribed during that `notify`.
    retired: Vec<SubscriptionId>,
    /// Latest height passed to a nested `notify`, delivered once the current
    /// pass finishes.
    queued: Option<S>,
}

impl<S> Default for Inner<S> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
            checked_out: None,
            retired: Vec::new(),
            queued: None,
        }
    }
}

/// A cloneable broadcast source of content-height changes.
pub struct ResizeNotifier<S> {
    inner: Rc<RefCell<Inner<S>>>,
}

impl<S> Clone for ResizeNotifier<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> Default for ResizeNotifier<S> {
    fn default() -> Self {
        Self {
            inner: Rc::default(),
        }
    }
}

impl<S> fmt::Debug for ResizeNotifier<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl<S: Copy> ResizeNotifier<S> {
    /// Creates a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `height` to every current subscriber.
    ///
    /// Listeners subscribed during delivery first hear the next notification.
    /// A listener unsubscribed during delivery is not called again, even for
    /// the notification in progress.
    ///
    /// A call made from inside a listener does not recurse. Its height is
    /// held until the current pass finishes and is then delivered to every
    /// subscriber; if several such calls arrive during one pass, only the
    /// last height is delivered. A listener that notifies on every call never
    /// lets this return.
    pub fn notify(&self, height: S) {
        let mut next = Some(height);
        while let Some(height) = next {
            let Some(mut listeners) = self.check_out(height) else {
                return;
            };
            for (id, listener) in &mut listeners {
                if self.inner.borrow().retired.contains(id) {
                    continue;
                }
                (*listener)(height);
            }
            next = self.check_in(listeners);
        }
    }

    /// Takes the listeners out for a delivery pass, or queues `height` if a
    /// pass is already running.
    fn check_out(&self, height: S) -> Option<Vec<(SubscriptionId, Listener<S>)>> {
        let mut inner = self.inner.borrow_mut();
        if inner.checked_out.is_some() {
            inner.queued = Some(height);
            return None;
        }
        let listeners = core::mem::take(&mut inner.listeners);
        inner.checked_out = Some(listeners.iter().map(|(id, _)| *id).collect());
        Some(listeners)
    }

    /// Returns the listeners after a pass, and any height queued during it.
    fn check_in(&self, mut listeners: Vec<(SubscriptionId, Listener<S>)>) -> Option<S> {
        let mut inner = self.inner.borrow_mut();
        let retired = core::mem::take(&mut inner.retired);
        listeners.retain(|(id, _)| !retired.contains(id));
        // Keep subscription order: existing listeners first, then any added
        // during delivery.
        listeners.append(&mut inner.listeners);
        inner.listeners = listeners;
        inner.checked_out = None;
        inner.queued.take()
    }
}

impl<S> ResizeNotifier<S> {
    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let inner = self.inner.borrow();
        let checked_out = inner.checked_out.as_ref().map_or(0, Vec::len);
        inner.listeners.len() + checked_out - inner.retired.len()
    }
}

impl<S> ResizeSource<S> for ResizeNotifier<S> {
    type Subscription = SubscriptionId;

    fn subscribe(&mut self, callback: Box<dyn FnMut(S)>) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, callback));
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            match inner.listeners.iter().position(|(id, _)| *id == subscription) {
                Some(slot) => Some(inner.listeners.remove(slot)),
                None => {
                    let checked_out = inner
                        .checked_out
                        .as_ref()
                        .is_some_and(|ids| ids.contains(&subscription));
                    if checked_out && !inner.retired.contains(&subscription) {
                        inner.retired.push(subscription);
                    }
                    None
                }
            }
        };
        drop(removed);
    }
}
