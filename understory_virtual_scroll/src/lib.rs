// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtual_scroll --heading-base-level=0

//! Understory Virtual Scroll: windowing for long lists of fixed-height rows.
//!
//! A list of ten thousand rows only ever shows a few dozen at a time. This
//! crate works out which rows those are, so a host UI can keep the number of
//! materialized row views bounded no matter how long the list gets.
//!
//! There are two layers:
//!
//! - The [`window`] functions are pure. Given a scroll offset, viewport height,
//!   row height, buffer size, and item count, [`compute_window`] returns the
//!   rows to materialize (the [`VisibleRange`], padded by the buffer), the rows
//!   actually on screen, the `list_offset` to translate the rendered rows by,
//!   and the total content height for the scroll track. [`item_visibility`]
//!   and [`scroll_target`] answer per-row questions.
//! - [`VirtualScroll`] owns the mutable scroll state for one list. It throttles
//!   raw scroll notifications through a [`Scheduler`] (last write wins, at most
//!   one commit per `throttle_delay`), tracks the viewport height through a
//!   [`ResizeSource`], and scrolls a bound [`ScrollContainer`] to a row by id.
//!
//! The crate does not know about any particular UI framework. Hosts are
//! responsible for:
//!
//! - Owning the item data and implementing [`Keyed`] for it.
//! - Implementing [`ScrollContainer`] for their scrollable element, or
//!   wrapping it.
//! - Forwarding the element's scroll notifications to
//!   [`VirtualScroll::handle_scroll`].
//! - Providing timers and resize notifications, either from their runtime or
//!   via the bundled [`TimerQueue`] and [`ResizeNotifier`].
//! - Rendering [`VirtualScroll::visible_items`] inside a track of
//!   [`VirtualScroll::total_height`], translated by
//!   [`VirtualScroll::list_offset`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_virtual_scroll::{WindowParams, compute_window};
//!
//! // 1000 rows of 50px in a 500px viewport, scrolled to row 20.
//! let window = compute_window(&WindowParams {
//!     scroll_top: 1000.0_f64,
//!     container_height: 500.0,
//!     item_height: 50.0,
//!     buffer_size: 5,
//!     item_count: 1000,
//! });
//!
//! // Rows 20..30 are on screen; five more on each side are rendered.
//! assert_eq!(window.viewport.as_range(), 20..30);
//! assert_eq!(window.range.as_range(), 15..35);
//! // Row 15 is drawn at its absolute position.
//! assert_eq!(window.list_offset, 750.0);
//! assert_eq!(window.total_height, 50_000.0);
//! ```
//!
//! Buffer rows are rendered but are not on screen, so
//! [`VirtualScroll::visible_item_ids`] reports only the rows that intersect
//! the viewport.
//!
//! All heights and offsets are in a caller-chosen unit (typically logical
//! pixels). Row heights must be finite and positive; see
//! [`ScrollOptions::try_new`].
//!
//! ## Features
//!
//! - `std` (default): build against the standard library.
//! - `tracing`: emit `tracing` events for scroll commits, resizes, and
//!   attach/detach.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod host;
mod item;
mod options;
mod resize;
mod scalar;
mod timer;
mod virtual_scroll;
pub mod window;

pub use host::{ResizeSource, Scheduler, ScrollBehavior, ScrollContainer};
pub use item::{Keyed, position_of};
pub use options::{DEFAULT_BUFFER_SIZE, DEFAULT_THROTTLE_DELAY, OptionsError, ScrollOptions};
pub use resize::{ResizeNotifier, SubscriptionId};
pub use scalar::Scalar;
pub use timer::{TimerId, TimerQueue};
pub use virtual_scroll::{ScrollEvent, ScrollState, VirtualScroll, VirtualScrollDebugInfo};
pub use window::{
    ItemVisibility, ScrollAlign, VisibleRange, Window, WindowParams, compute_window,
    item_visibility, list_offset, scroll_target, total_height, viewport_range, visible_range,
};
