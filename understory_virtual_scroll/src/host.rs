// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seams to the host UI runtime.
//!
//! [`VirtualScroll`](crate::VirtualScroll) never talks to a real UI toolkit.
//! Instead the host supplies three small capabilities:
//!
//! - a [`ScrollContainer`]: the scrollable element the list lives in,
//! - a [`Scheduler`]: a cancelable one-shot timer, used to throttle scroll
//!   notifications, and
//! - a [`ResizeSource`]: a subscription that reports the container's content
//!   height whenever it changes.
//!
//! All three are single-threaded. Callbacks handed to a scheduler or resize
//! source are invoked on the same thread that drives the list, and never
//! re-entrantly from within `schedule`/`subscribe` themselves.
//!
//! [`TimerQueue`](crate::TimerQueue) and [`ResizeNotifier`](crate::ResizeNotifier)
//! are ready-made implementations for hosts without their own primitives, and
//! for tests.

use alloc::boxed::Box;
use core::time::Duration;

/// How a container should move to a new scroll offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    /// Jump to the target immediately.
    Instant,
    /// Animate to the target. Completion is not reported back.
    #[default]
    Smooth,
}

/// The scrollable element that hosts a virtual list.
pub trait ScrollContainer<S> {
    /// Current rendered height of the visible area.
    fn client_height(&self) -> S;

    /// Current vertical scroll offset.
    fn scroll_top(&self) -> S;

    /// Requests a scroll to `top`.
    ///
    /// This is fire-and-forget: the container reports the resulting offsets
    /// through its usual scroll notifications.
    fn scroll_to(&mut self, top: S, behavior: ScrollBehavior);
}

/// A one-shot, cancelable timer service.
pub trait Scheduler {
    /// Identifies a scheduled callback.
    type Handle;

    /// Runs `callback` once after `delay`.
    fn schedule(&mut self, delay: Duration, callback: Box<dyn FnOnce()>) -> Self::Handle;

    /// Prevents a scheduled callback from running.
    ///
    /// Canceling a handle whose callback already ran, or was already canceled,
    /// must be a no-op.
    fn cancel(&mut self, handle: Self::Handle);
}

/// A source of content-height change notifications for one observed element.
pub trait ResizeSource<S> {
    /// Identifies a subscription.
    type Subscription;

    /// Calls `callback` with the new content height after each change.
    fn subscribe(&mut self, callback: Box<dyn FnMut(S)>) -> Self::Subscription;

    /// Stops delivering notifications to a subscription.
    ///
    /// Unsubscribing twice must be a no-op.
    fn unsubscribe(&mut self, subscription: Self::Subscription);
}

impl<S, C: ScrollContainer<S> + ?Sized> ScrollContainer<S> for Box<C> {
    fn client_height(&self) -> S {
        (**self).client_height()
    }

    fn scroll_top(&self) -> S {
        (**self).scroll_top()
    }

    fn scroll_to(&mut self, top: S, behavior: ScrollBehavior) {
        (**self).scroll_to(top, behavior);
    }
}
