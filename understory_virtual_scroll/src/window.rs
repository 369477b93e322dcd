// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window calculation for fixed-height rows.
//!
//! Everything in this module is a pure function of its inputs. Given the
//! current scroll offset, viewport height, row height, buffer size, and item
//! count, it answers:
//!
//! - which rows to materialize ([`visible_range`]),
//! - which rows are actually on screen ([`viewport_range`]),
//! - where to translate the materialized rows ([`list_offset`]),
//! - how much of a given row is showing ([`item_visibility`]), and
//! - where to scroll to bring a row into view ([`scroll_target`]).
//!
//! [`compute_window`] bundles the per-frame answers into one [`Window`].
//!
//! All positions are absolute offsets from the top of the content, so row `i`
//! spans `[i * item_height, (i + 1) * item_height)`.

use core::ops::Range;

use hashbrown::HashSet;

use crate::item::Keyed;
use crate::scalar::Scalar;

/// Half-open interval `[start, end)` of row indices.
///
/// Ranges produced by this crate always satisfy `start <= end <= item_count`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VisibleRange {
    /// First index in the range.
    pub start: usize,
    /// One past the last index in the range.
    pub end: usize,
}

impl VisibleRange {
    /// The empty range at index zero.
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    /// Creates a range, collapsing it to empty at `end` if `start > end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        if start > end {
            Self { start: end, end }
        } else {
            Self { start, end }
        }
    }

    /// Number of indices in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range holds no indices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` if `index` lies inside the range.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Returns `true` if every index of `other` lies inside `self`.
    ///
    /// An empty `other` is contained in any range.
    #[must_use]
    pub const fn covers(&self, other: &Self) -> bool {
        other.is_empty() || (self.start <= other.start && other.end <= self.end)
    }

    /// Returns the range as a standard [`Range`].
    #[must_use]
    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Shrinks the range so it fits a slice of length `len`.
    #[must_use]
    pub fn clamp_to(&self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }

    /// Returns the sub-slice of `items` covered by this range.
    ///
    /// Indices beyond `items.len()` are dropped rather than panicking, so a
    /// range computed for a stale item count still yields a valid slice.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.clamp_to(items.len()).as_range()]
    }
}

impl From<VisibleRange> for Range<usize> {
    fn from(range: VisibleRange) -> Self {
        range.as_range()
    }
}

/// Alignment of a row inside the viewport when scrolling to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollAlign {
    /// Align the row's leading edge with the viewport's leading edge.
    #[default]
    Start,
    /// Center the row in the viewport.
    Center,
    /// Align the row's trailing edge with the viewport's trailing edge.
    End,
}

/// How much of a row is inside the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemVisibility<S> {
    /// `true` if any part of the row overlaps the viewport.
    pub is_visible: bool,
    /// Fraction of the row's height inside the viewport, in `[0, 1]`.
    ///
    /// Always zero when `is_visible` is `false`.
    pub visibility_ratio: S,
}

impl<S: Scalar> ItemVisibility<S> {
    /// The result for a row that is off screen or not in the list.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            is_visible: false,
            visibility_ratio: S::zero(),
        }
    }
}

/// Inputs to [`compute_window`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowParams<S> {
    /// Current vertical scroll offset.
    pub scroll_top: S,
    /// Current viewport height.
    pub container_height: S,
    /// Fixed row height; must be finite and positive.
    pub item_height: S,
    /// Rows to render beyond each edge of the viewport.
    pub buffer_size: usize,
    /// Number of rows in the list.
    pub item_count: usize,
}

/// Everything a host needs to render one frame of a virtual list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window<S> {
    /// Rows to materialize, including the buffer.
    pub range: VisibleRange,
    /// Rows that intersect the viewport, excluding the buffer.
    pub viewport: VisibleRange,
    /// Translation to apply to the materialized rows.
    pub list_offset: S,
    /// Height of the full content, for sizing the scroll track.
    pub total_height: S,
    /// Inputs this window was computed from.
    pub params: WindowParams<S>,
}

impl<S: Scalar> Window<S> {
    /// Returns the rows to materialize.
    #[must_use]
    pub fn visible_items<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        self.range.slice(items)
    }

    /// Collects the ids of rows that intersect the viewport.
    ///
    /// Buffer rows are rendered but are not on screen, so they are not
    /// reported here.
    #[must_use]
    pub fn visible_item_ids<T: Keyed>(&self, items: &[T]) -> HashSet<T::Id> {
        self.viewport.slice(items).iter().map(T::id).collect()
    }

    /// Returns how much of row `index` is inside the viewport.
    #[must_use]
    pub fn item_visibility(&self, index: usize) -> ItemVisibility<S> {
        if index >= self.params.item_count {
            return ItemVisibility::hidden();
        }
        item_visibility(
            index,
            self.params.scroll_top,
            self.params.container_height,
            self.params.item_height,
        )
    }
}

/// Computes the full window for one set of inputs.
///
/// Negative or non-finite scroll offsets and container heights are treated
/// as zero.
///
/// ```rust
/// use understory_virtual_scroll::{WindowParams, compute_window};
///
/// let window = compute_window(&WindowParams {
///     scroll_top: 1000.0_f64,
///     container_height: 500.0,
///     item_height: 50.0,
///     buffer_size: 5,
///     item_count: 1000,
/// });
/// assert_eq!(window.viewport.as_range(), 20..30);
/// assert_eq!(window.range.as_range(), 15..35);
/// assert_eq!(window.list_offset, 750.0);
/// ```
#[must_use]
pub fn compute_window<S: Scalar>(params: &WindowParams<S>) -> Window<S> {
    let params = WindowParams {
        scroll_top: params.scroll_top.sanitize(),
        container_height: params.container_height.sanitize(),
        ..*params
    };
    let range = visible_range(
        params.scroll_top,
        params.container_height,
        params.item_height,
        params.buffer_size,
        params.item_count,
    );
    Window {
        range,
        viewport: viewport_range(
            params.scroll_top,
            params.container_height,
            params.item_height,
            params.item_count,
        ),
        list_offset: list_offset(range, params.item_height),
        total_height: total_height(params.item_count, params.item_height),
        params,
    }
}

/// Height of the full content: `item_count * item_height`.
#[must_use]
pub fn total_height<S: Scalar>(item_count: usize, item_height: S) -> S {
    S::from_usize(item_count) * item_height
}

/// Rows intersecting `[scroll_top, scroll_top + container_height)`, without buffer.
///
/// Empty when the list or the viewport is empty, or when the viewport lies
/// entirely past the end of the content.
#[must_use]
pub fn viewport_range<S: Scalar>(
    scroll_top: S,
    container_height: S,
    item_height: S,
    item_count: usize,
) -> VisibleRange {
    if item_count == 0 || container_height <= S::zero() {
        return VisibleRange::EMPTY;
    }
    let start = (scroll_top / item_height).floor_index();
    let end = ((scroll_top + container_height) / item_height).ceil_index();
    VisibleRange::new(start, end.min(item_count))
}

/// Rows to materialize: the viewport rows plus `buffer_size` on each side.
///
/// Returns [`VisibleRange::EMPTY`] when there are no items or the viewport
/// height is not yet known.
#[must_use]
pub fn visible_range<S: Scalar>(
    scroll_top: S,
    container_height: S,
    item_height: S,
    buffer_size: usize,
    item_count: usize,
) -> VisibleRange {
    if item_count == 0 || container_height <= S::zero() {
        return VisibleRange::EMPTY;
    }
    let viewport_start = (scroll_top / item_height).floor_index();
    let viewport_end = ((scroll_top + container_height) / item_height).ceil_index();
    let start = viewport_start.saturating_sub(buffer_size);
    let end = viewport_end.saturating_add(buffer_size).min(item_count);
    VisibleRange::new(start, end)
}

/// Translation that places row `range.start` at its absolute position.
#[must_use]
pub fn list_offset<S: Scalar>(range: VisibleRange, item_height: S) -> S {
    S::from_usize(range.start) * item_height
}

/// Returns how much of row `index` lies inside the viewport.
///
/// A viewport of zero height shows nothing.
#[must_use]
pub fn item_visibility<S: Scalar>(
    index: usize,
    scroll_top: S,
    container_height: S,
    item_height: S,
) -> ItemVisibility<S> {
    if container_height <= S::zero() {
        return ItemVisibility::hidden();
    }
    let item_top = S::from_usize(index) * item_height;
    let item_bottom = item_top + item_height;
    let viewport_top = scroll_top;
    let viewport_bottom = scroll_top + container_height;

    if !(item_bottom > viewport_top && item_top < viewport_bottom) {
        return ItemVisibility::hidden();
    }
    let overlap = item_bottom.min(viewport_bottom) - item_top.max(viewport_top);
    ItemVisibility {
        is_visible: true,
        visibility_ratio: (overlap / item_height).max(S::zero()).min(S::one()),
    }
}

/// Scroll offset that brings row `index` into view with the given alignment.
///
/// The result is clamped to `[0, max(0, total_height - container_height)]`,
/// so it never scrolls past either end of the content.
///
/// ```rust
/// use understory_virtual_scroll::{ScrollAlign, scroll_target};
///
/// // Row 10 centered in a 500px viewport of 50px rows.
/// let top = scroll_target(10, ScrollAlign::Center, 50.0_f64, 500.0, 1000);
/// assert_eq!(top, 275.0);
/// ```
#[must_use]
pub fn scroll_target<S: Scalar>(
    index: usize,
    align: ScrollAlign,
    item_height: S,
    container_height: S,
    item_count: usize,
) -> S {
    let item_top = S::from_usize(index) * item_height;
    let target = match align {
        ScrollAlign::Start => item_top,
        ScrollAlign::Center => item_top - (container_height.half() - item_height.half()),
        ScrollAlign::End => item_top - (container_height - item_height),
    };
    let max_scroll = total_height(item_count, item_height) - container_height;
    target.min(max_scroll).max(S::zero())
}
