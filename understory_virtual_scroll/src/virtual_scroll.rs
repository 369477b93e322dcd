// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`VirtualScroll`] coordinator.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashSet;

use crate::host::{ResizeSource, Scheduler, ScrollBehavior, ScrollContainer};
use crate::item::{Keyed, position_of};
use crate::options::ScrollOptions;
use crate::resize::ResizeNotifier;
use crate::scalar::Scalar;
use crate::timer::TimerQueue;
use crate::window::{
    ItemVisibility, ScrollAlign, VisibleRange, Window, WindowParams, compute_window,
    item_visibility, scroll_target,
};

/// Current scroll offset and viewport height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState<S> {
    /// Committed vertical scroll offset, never negative.
    pub scroll_top: S,
    /// Last known viewport height, never negative. Zero until measured.
    pub container_height: S,
}

/// A raw scroll notification from the container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent<S> {
    /// The container's scroll offset when the notification was raised.
    pub scroll_top: S,
}

impl<S: Scalar> ScrollEvent<S> {
    /// Creates an event carrying `scroll_top`.
    #[must_use]
    pub fn new(scroll_top: S) -> Self {
        Self { scroll_top }
    }

    /// Samples the container's current scroll offset.
    #[must_use]
    pub fn from_container<C: ScrollContainer<S> + ?Sized>(container: &C) -> Self {
        Self::new(container.scroll_top())
    }
}

#[derive(Debug)]
struct Shared<S> {
    state: ScrollState<S>,
    /// Offset observed by the most recent scroll notification, with the
    /// generation of the timer that will commit it.
    pending: Option<(u64, S)>,
    generation: u64,
}

impl<S: Scalar> Shared<S> {
    fn commit(&mut self, generation: u64) {
        let Some((pending_generation, offset)) = self.pending else {
            return;
        };
        // Superseded: a newer timer owns the pending offset.
        if pending_generation != generation {
            return;
        }
        self.pending = None;
        self.state.scroll_top = offset;

        #[cfg(feature = "tracing")]
        tracing::trace!(scroll_top = ?offset, "committed throttled scroll offset");
    }
}

/// Fixed-row-height virtual scroll coordinator.
///
/// `VirtualScroll` owns the scroll state of one list and derives from it which
/// rows to materialize. It is driven by three host capabilities: a
/// [`ScrollContainer`] bound with [`attach`](Self::attach), a [`Scheduler`]
/// used to throttle scroll notifications, and a [`ResizeSource`] that reports
/// viewport height changes.
///
/// The item collection is not stored. Every derived query takes the current
/// items (or their count), so results are always consistent with the data the
/// host is about to render.
///
/// Dropping the coordinator, or calling [`detach`](Self::detach), cancels the
/// pending throttle timer and releases the resize subscription. Callbacks that
/// the host fails to cancel hold only a weak reference and do nothing once the
/// coordinator is gone.
///
/// ## Minimal example
///
/// ```rust
/// use core::time::Duration;
/// use understory_virtual_scroll::{
///     ResizeNotifier, ScrollBehavior, ScrollContainer, ScrollEvent, ScrollOptions, TimerQueue,
///     VirtualScroll,
/// };
///
/// struct Viewport {
///     height: f64,
///     top: f64,
/// }
///
/// impl ScrollContainer<f64> for Viewport {
///     fn client_height(&self) -> f64 {
///         self.height
///     }
///     fn scroll_top(&self) -> f64 {
///         self.top
///     }
///     fn scroll_to(&mut self, top: f64, _behavior: ScrollBehavior) {
///         self.top = top;
///     }
/// }
///
/// let timers = TimerQueue::new();
/// let resize = ResizeNotifier::new();
/// let mut list = VirtualScroll::new(ScrollOptions::new(50.0), timers.clone(), resize.clone());
/// list.attach(Viewport { height: 500.0, top: 0.0 });
///
/// let items: Vec<(u32, &str)> = (0..1000).map(|i| (i, "row")).collect();
///
/// list.handle_scroll(ScrollEvent::new(1000.0));
/// timers.advance_by(Duration::from_millis(16));
///
/// assert_eq!(list.visible_range(items.len()).as_range(), 15..35);
/// assert_eq!(list.list_offset(items.len()), 750.0);
/// assert_eq!(list.visible_items(&items).len(), 20);
/// ```
pub struct VirtualScroll<S, C, T = TimerQueue, R = ResizeNotifier<S>>
where
    T: Scheduler,
    R: ResizeSource<S>,
{
    options: ScrollOptions<S>,
    shared: Rc<RefCell<Shared<S>>>,
    scheduler: T,
    resize: R,
    container: Option<C>,
    timer: Option<T::Handle>,
    subscription: Option<R::Subscription>,
}

impl<S, C, T, R> fmt::Debug for VirtualScroll<S, C, T, R>
where
    S: Scalar,
    T: Scheduler,
    R: ResizeSource<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("VirtualScroll")
            .field("options", &self.options)
            .field("state", &shared.state)
            .field("scroll_pending", &shared.pending.is_some())
            .field("attached", &self.container.is_some())
            .finish_non_exhaustive()
    }
}

impl<S, C, T, R> VirtualScroll<S, C, T, R>
where
    S: Scalar + 'static,
    C: ScrollContainer<S>,
    T: Scheduler,
    R: ResizeSource<S>,
{
    /// Creates a detached coordinator with zeroed scroll state.
    ///
    /// Nothing is rendered until a container is attached and its height is
    /// known.
    #[must_use]
    pub fn new(options: ScrollOptions<S>, scheduler: T, resize: R) -> Self {
        Self {
            options,
            shared: Rc::new(RefCell::new(Shared {
                state: ScrollState {
                    scroll_top: S::zero(),
                    container_height: S::zero(),
                },
                pending: None,
                generation: 0,
            })),
            scheduler,
            resize,
            container: None,
            timer: None,
            subscription: None,
        }
    }

    /// Binds the scroll container and starts observing its size.
    ///
    /// Measures the container synchronously, then subscribes to the resize
    /// source. Any previously attached container is detached first.
    pub fn attach(&mut self, container: C) {
        self.detach();
        self.container = Some(container);
        self.update_container_height();

        let shared = Rc::downgrade(&self.shared);
        let subscription = self.resize.subscribe(Box::new(move |height: S| {
            on_resize(&shared, height);
        }));
        self.subscription = Some(subscription);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            container_height = ?self.container_height(),
            "virtual scroll attached"
        );
    }

    /// Unbinds the container, cancels pending work, and stops observing size.
    ///
    /// A scroll offset still waiting on the throttle timer is discarded. The
    /// committed scroll state is kept. Returns the container that was bound,
    /// if any.
    pub fn detach(&mut self) -> Option<C> {
        if let Some(timer) = self.timer.take() {
            self.scheduler.cancel(timer);
        }
        self.shared.borrow_mut().pending = None;
        if let Some(subscription) = self.subscription.take() {
            self.resize.unsubscribe(subscription);
        }
        let container = self.container.take();

        #[cfg(feature = "tracing")]
        if container.is_some() {
            tracing::debug!("virtual scroll detached");
        }

        container
    }

    /// Returns `true` while a container is bound.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.container.is_some()
    }

    /// The bound container, if any.
    #[must_use]
    pub fn container(&self) -> Option<&C> {
        self.container.as_ref()
    }

    /// Mutable access to the bound container, if any.
    pub fn container_mut(&mut self) -> Option<&mut C> {
        self.container.as_mut()
    }

    /// Records a scroll notification, committing it after the throttle delay.
    ///
    /// A notification arriving while an earlier one is still waiting replaces
    /// it and restarts the delay, so a burst of notifications produces a
    /// single commit carrying the last offset. Negative and non-finite offsets
    /// commit as zero.
    pub fn handle_scroll(&mut self, event: ScrollEvent<S>) {
        if let Some(timer) = self.timer.take() {
            self.scheduler.cancel(timer);
        }

        let offset = event.scroll_top.sanitize();
        let generation = {
            let mut shared = self.shared.borrow_mut();
            shared.generation = shared.generation.wrapping_add(1);
            shared.pending = Some((shared.generation, offset));
            shared.generation
        };

        let shared = Rc::downgrade(&self.shared);
        let timer = self.scheduler.schedule(
            self.options.throttle_delay(),
            Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    shared.borrow_mut().commit(generation);
                }
            }),
        );
        self.timer = Some(timer);

        #[cfg(feature = "tracing")]
        tracing::trace!(scroll_top = ?offset, "scroll offset pending");
    }

    /// Reads the bound container's current height into the scroll state.
    ///
    /// Does nothing when no container is bound.
    pub fn update_container_height(&mut self) {
        if let Some(container) = &self.container {
            let height = container.client_height().sanitize();
            self.shared.borrow_mut().state.container_height = height;
        }
    }

    /// Scrolls the container so the item with `id` is aligned per `align`.
    ///
    /// The target offset is clamped to the scrollable range and issued as a
    /// smooth scroll. Returns the requested offset, or `None` if the id is
    /// not in `items` or no container is bound. The scroll state itself only
    /// changes once the container reports the resulting scroll notifications.
    pub fn scroll_to_item<I: Keyed>(
        &mut self,
        items: &[I],
        id: &I::Id,
        align: ScrollAlign,
    ) -> Option<S> {
        let index = position_of(items, id)?;
        let container = self.container.as_mut()?;
        let container_height = self.shared.borrow().state.container_height;
        let target = scroll_target(
            index,
            align,
            self.options.item_height(),
            container_height,
            items.len(),
        );
        container.scroll_to(target, ScrollBehavior::Smooth);

        #[cfg(feature = "tracing")]
        tracing::debug!(index, ?align, target = ?target, "scroll to item");

        Some(target)
    }

    /// Configuration this coordinator was created with.
    #[must_use]
    pub fn options(&self) -> &ScrollOptions<S> {
        &self.options
    }

    /// Snapshot of the committed scroll state.
    #[must_use]
    pub fn scroll_state(&self) -> ScrollState<S> {
        self.shared.borrow().state
    }

    /// Committed vertical scroll offset.
    #[must_use]
    pub fn scroll_top(&self) -> S {
        self.scroll_state().scroll_top
    }

    /// Last known viewport height.
    #[must_use]
    pub fn container_height(&self) -> S {
        self.scroll_state().container_height
    }

    /// Returns `true` while a scroll notification is waiting on the throttle timer.
    #[must_use]
    pub fn is_scroll_pending(&self) -> bool {
        self.shared.borrow().pending.is_some()
    }

    /// Computes the window for a list of `item_count` rows.
    #[must_use]
    pub fn window(&self, item_count: usize) -> Window<S> {
        let state = self.scroll_state();
        compute_window(&WindowParams {
            scroll_top: state.scroll_top,
            container_height: state.container_height,
            item_height: self.options.item_height(),
            buffer_size: self.options.buffer_size(),
            item_count,
        })
    }

    /// Height of the full content, for sizing the scroll track.
    #[must_use]
    pub fn total_height(&self, item_count: usize) -> S {
        self.window(item_count).total_height
    }

    /// Rows to materialize, including the buffer.
    #[must_use]
    pub fn visible_range(&self, item_count: usize) -> VisibleRange {
        self.window(item_count).range
    }

    /// Translation to apply to the materialized rows.
    #[must_use]
    pub fn list_offset(&self, item_count: usize) -> S {
        self.window(item_count).list_offset
    }

    /// The rows to materialize, in order.
    #[must_use]
    pub fn visible_items<'a, I>(&self, items: &'a [I]) -> &'a [I] {
        self.window(items.len()).visible_items(items)
    }

    /// Ids of the rows that intersect the viewport, excluding buffer rows.
    #[must_use]
    pub fn visible_item_ids<I: Keyed>(&self, items: &[I]) -> HashSet<I::Id> {
        self.window(items.len()).visible_item_ids(items)
    }

    /// How much of the item with `id` is inside the viewport.
    ///
    /// An id that is not in `items` reports as hidden.
    #[must_use]
    pub fn item_visibility<I: Keyed>(&self, items: &[I], id: &I::Id) -> ItemVisibility<S> {
        let Some(index) = position_of(items, id) else {
            return ItemVisibility::hidden();
        };
        let state = self.scroll_state();
        item_visibility(
            index,
            state.scroll_top,
            state.container_height,
            self.options.item_height(),
        )
    }

    /// Snapshot of the coordinator's state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self, item_count: usize) -> VirtualScrollDebugInfo<S> {
        VirtualScrollDebugInfo {
            options: self.options,
            state: self.scroll_state(),
            scroll_pending: self.is_scroll_pending(),
            attached: self.is_attached(),
            window: self.window(item_count),
        }
    }
}

impl<S, C, T, R> Drop for VirtualScroll<S, C, T, R>
where
    T: Scheduler,
    R: ResizeSource<S>,
{
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.scheduler.cancel(timer);
        }
        if let Some(subscription) = self.subscription.take() {
            self.resize.unsubscribe(subscription);
        }
    }
}

fn on_resize<S: Scalar>(shared: &Weak<RefCell<Shared<S>>>, height: S) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let height = height.sanitize();
    shared.borrow_mut().state.container_height = height;

    #[cfg(feature = "tracing")]
    tracing::debug!(container_height = ?height, "container resized");
}

/// Debug snapshot of a [`VirtualScroll`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualScrollDebugInfo<S> {
    /// Configuration.
    pub options: ScrollOptions<S>,
    /// Committed scroll state.
    pub state: ScrollState<S>,
    /// Whether a scroll notification is waiting on the throttle timer.
    pub scroll_pending: bool,
    /// Whether a container is bound.
    pub attached: bool,
    /// Window for the item count the snapshot was taken with.
    pub window: Window<S>,
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use core::time::Duration;

    use super::{ScrollEvent, ScrollState, VirtualScroll};
    use crate::host::{ScrollBehavior, ScrollContainer};
    use crate::options::ScrollOptions;
    use crate::resize::ResizeNotifier;
    use crate::timer::TimerQueue;
    use crate::window::{ScrollAlign, VisibleRange};

    #[derive(Clone, Default)]
    struct FakeContainer {
        height: f64,
        top: f64,
        requests: Rc<RefCell<Vec<(f64, ScrollBehavior)>>>,
    }

    impl ScrollContainer<f64> for FakeContainer {
        fn client_height(&self) -> f64 {
            self.height
        }

        fn scroll_top(&self) -> f64 {
            self.top
        }

        fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
            self.requests.borrow_mut().push((top, behavior));
        }
    }

    type List = VirtualScroll<f64, FakeContainer>;

    fn list() -> (List, TimerQueue, ResizeNotifier<f64>) {
        let timers = TimerQueue::new();
        let resize = ResizeNotifier::new();
        let list = VirtualScroll::new(ScrollOptions::new(50.0), timers.clone(), resize.clone());
        (list, timers, resize)
    }

    fn rows(count: u32) -> Vec<(u32, ())> {
        (0..count).map(|i| (i, ())).collect()
    }

    #[test]
    fn starts_detached_and_empty() {
        let (list, _, _) = list();
        assert!(!list.is_attached());
        assert_eq!(list.scroll_state(), ScrollState::default());
        assert_eq!(list.visible_range(1000), VisibleRange::EMPTY);
        assert_eq!(list.total_height(1000), 50_000.0);
    }

    #[test]
    fn attach_probes_height_and_subscribes() {
        let (mut list, _, resize) = list();
        list.attach(FakeContainer {
            height: 400.0,
            ..FakeContainer::default()
        });
        assert!(list.is_attached());
        assert_eq!(list.container_height(), 400.0);
        assert_eq!(resize.subscriber_count(), 1);

        resize.notify(600.0);
        assert_eq!(list.container_height(), 600.0);
    }

    #[test]
    fn reattach_replaces_subscription() {
        let (mut list, _, resize) = list();
        list.attach(FakeContainer::default());
        list.attach(FakeContainer {
            height: 80.0,
            ..FakeContainer::default()
        });
        assert_eq!(resize.subscriber_count(), 1);
        assert_eq!(list.container_height(), 80.0);
    }

    #[test]
    fn scroll_commits_after_delay() {
        let (mut list, timers, _) = list();
        list.handle_scroll(ScrollEvent::new(120.0));
        assert!(list.is_scroll_pending());
        assert_eq!(list.scroll_top(), 0.0);

        timers.advance_by(Duration::from_millis(15));
        assert_eq!(list.scroll_top(), 0.0);
        timers.advance_by(Duration::from_millis(1));
        assert_eq!(list.scroll_top(), 120.0);
        assert!(!list.is_scroll_pending());
    }

    #[test]
    fn burst_commits_last_offset_once() {
        let (mut list, timers, _) = list();
        for offset in [10.0, 20.0, 30.0, 40.0] {
            list.handle_scroll(ScrollEvent::new(offset));
            timers.advance_by(Duration::from_millis(4));
            assert_eq!(list.scroll_top(), 0.0);
        }
        assert_eq!(timers.pending(), 1);
        timers.advance_by(Duration::from_millis(12));
        assert_eq!(list.scroll_top(), 40.0);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn negative_scroll_offsets_commit_as_zero() {
        let (mut list, timers, _) = list();
        list.handle_scroll(ScrollEvent::new(-35.0));
        timers.advance_by(Duration::from_millis(16));
        assert_eq!(list.scroll_top(), 0.0);
    }

    #[test]
    fn scroll_event_samples_container() {
        let container = FakeContainer {
            top: 275.0,
            ..FakeContainer::default()
        };
        assert_eq!(ScrollEvent::from_container(&container).scroll_top, 275.0);
    }

    #[test]
    fn update_container_height_without_container_is_noop() {
        let (mut list, _, _) = list();
        list.update_container_height();
        assert_eq!(list.container_height(), 0.0);
    }

    #[test]
    fn update_container_height_rereads_container() {
        let (mut list, _, _) = list();
        list.attach(FakeContainer {
            height: 100.0,
            ..FakeContainer::default()
        });
        if let Some(container) = list.container_mut() {
            container.height = 250.0;
        }
        assert_eq!(list.container_height(), 100.0);
        list.update_container_height();
        assert_eq!(list.container_height(), 250.0);
    }

    #[test]
    fn scroll_to_item_issues_smooth_clamped_request() {
        let (mut list, _, _) = list();
        let container = FakeContainer {
            height: 500.0,
            ..FakeContainer::default()
        };
        let requests = container.requests.clone();
        list.attach(container);
        let items = rows(1000);

        assert_eq!(
            list.scroll_to_item(&items, &10, ScrollAlign::Center),
            Some(275.0)
        );
        assert_eq!(
            list.scroll_to_item(&items, &999, ScrollAlign::Start),
            Some(49_500.0)
        );
        assert_eq!(
            *requests.borrow(),
            [
                (275.0, ScrollBehavior::Smooth),
                (49_500.0, ScrollBehavior::Smooth),
            ]
        );
        // Issuing a scroll does not move the committed state by itself.
        assert_eq!(list.scroll_top(), 0.0);
    }

    #[test]
    fn scroll_to_item_degrades_to_noop() {
        let (mut list, _, _) = list();
        let items = rows(10);
        // No container bound.
        assert_eq!(list.scroll_to_item(&items, &3, ScrollAlign::Start), None);

        let container = FakeContainer::default();
        let requests = container.requests.clone();
        list.attach(container);
        // Unknown id.
        assert_eq!(list.scroll_to_item(&items, &42, ScrollAlign::End), None);
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn item_visibility_uses_committed_state() {
        let (mut list, timers, _) = list();
        list.attach(FakeContainer {
            height: 500.0,
            ..FakeContainer::default()
        });
        let items = rows(1000);
        list.handle_scroll(ScrollEvent::new(1035.0));
        timers.advance_by(Duration::from_millis(16));

        let straddling = list.item_visibility(&items, &20);
        assert!(straddling.is_visible);
        assert!((straddling.visibility_ratio - 0.3).abs() < 1e-9);
        assert!(!list.item_visibility(&items, &5).is_visible);
        assert!(!list.item_visibility(&items, &5000).is_visible);
    }

    #[test]
    fn detach_cancels_timer_and_subscription() {
        let (mut list, timers, resize) = list();
        list.attach(FakeContainer {
            height: 300.0,
            ..FakeContainer::default()
        });
        list.handle_scroll(ScrollEvent::new(900.0));

        assert!(list.detach().is_some());
        assert!(!list.is_scroll_pending());
        assert_eq!(timers.pending(), 0);
        assert_eq!(resize.subscriber_count(), 0);

        timers.advance_by(Duration::from_millis(100));
        resize.notify(999.0);
        assert_eq!(list.scroll_top(), 0.0);
        assert_eq!(list.container_height(), 300.0);
        assert!(list.detach().is_none());
    }

    #[test]
    fn drop_releases_host_resources() {
        let (mut list, timers, resize) = list();
        list.attach(FakeContainer::default());
        list.handle_scroll(ScrollEvent::new(50.0));
        drop(list);
        assert_eq!(timers.pending(), 0);
        assert_eq!(resize.subscriber_count(), 0);
        // Nothing left to fire.
        assert_eq!(timers.advance_by(Duration::from_secs(1)), 0);
    }

    #[test]
    fn debug_info_reflects_state() {
        let (mut list, _, _) = list();
        list.attach(FakeContainer {
            height: 500.0,
            ..FakeContainer::default()
        });
        list.handle_scroll(ScrollEvent::new(10.0));
        let info = list.debug_info(1000);
        assert!(info.attached);
        assert!(info.scroll_pending);
        assert_eq!(info.state.container_height, 500.0);
        assert_eq!(info.window.range, VisibleRange::new(0, 15));
        assert_eq!(info.options.buffer_size(), 5);
    }
}
