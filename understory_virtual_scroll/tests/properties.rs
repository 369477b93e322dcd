// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for window calculation and scroll throttling.
//!
//! Heights and offsets are drawn as whole numbers so that the expected values
//! are exact in `f64`.

use std::time::Duration;

use proptest::prelude::*;
use understory_virtual_scroll::{
    ResizeNotifier, ScrollAlign, ScrollBehavior, ScrollContainer, ScrollEvent, ScrollOptions,
    TimerQueue, VirtualScroll, WindowParams, compute_window, item_visibility, scroll_target,
};

struct NullContainer;

impl ScrollContainer<f64> for NullContainer {
    fn client_height(&self) -> f64 {
        0.0
    }

    fn scroll_top(&self) -> f64 {
        0.0
    }

    fn scroll_to(&mut self, _top: f64, _behavior: ScrollBehavior) {}
}

fn to_params(raw: (u32, u32, u32, usize, usize)) -> WindowParams<f64> {
    let (scroll_top, container_height, item_height, buffer_size, item_count) = raw;
    WindowParams {
        scroll_top: f64::from(scroll_top),
        container_height: f64::from(container_height),
        item_height: f64::from(item_height),
        buffer_size,
        item_count,
    }
}

fn params_strategy() -> impl Strategy<Value = WindowParams<f64>> {
    let raw = (
        0_u32..200_000,
        0_u32..2_000,
        1_u32..200,
        0_usize..20,
        0_usize..5_000,
    );
    raw.prop_map(to_params)
}

fn align_strategy() -> impl Strategy<Value = ScrollAlign> {
    prop_oneof![
        Just(ScrollAlign::Start),
        Just(ScrollAlign::Center),
        Just(ScrollAlign::End),
    ]
}

proptest! {
    #[test]
    fn total_height_is_count_times_height(params in params_strategy()) {
        let window = compute_window(&params);
        prop_assert_eq!(window.total_height, params.item_count as f64 * params.item_height);
    }

    #[test]
    fn range_is_ordered_and_bounded(params in params_strategy()) {
        let window = compute_window(&params);
        prop_assert!(window.range.start <= window.range.end);
        prop_assert!(window.range.end <= params.item_count);
        prop_assert!(window.range.len() <= params.item_count);
    }

    #[test]
    fn materialized_range_covers_viewport(params in params_strategy()) {
        let window = compute_window(&params);
        prop_assert!(window.range.covers(&window.viewport));
        // Padding never exceeds the buffer on either side.
        if !window.viewport.is_empty() {
            prop_assert!(window.viewport.start - window.range.start <= params.buffer_size);
            prop_assert!(window.range.end - window.viewport.end <= params.buffer_size);
        }
    }

    #[test]
    fn list_offset_places_first_rendered_row(params in params_strategy()) {
        let window = compute_window(&params);
        prop_assert_eq!(window.list_offset, window.range.start as f64 * params.item_height);
    }

    #[test]
    fn window_is_a_pure_function(params in params_strategy()) {
        prop_assert_eq!(compute_window(&params), compute_window(&params));
    }

    #[test]
    fn viewport_rows_are_visible(params in params_strategy()) {
        let window = compute_window(&params);
        for index in window.viewport.as_range() {
            let visibility = item_visibility(
                index,
                params.scroll_top,
                params.container_height,
                params.item_height,
            );
            prop_assert!(visibility.is_visible, "row {} should be visible", index);
            prop_assert!(visibility.visibility_ratio > 0.0);
            prop_assert!(visibility.visibility_ratio <= 1.0);
        }
    }

    #[test]
    fn rows_outside_viewport_are_hidden(params in params_strategy()) {
        let window = compute_window(&params);
        let before = window.viewport.start.checked_sub(1);
        let after = Some(window.viewport.end).filter(|end| *end < params.item_count);
        for index in [before, after].into_iter().flatten() {
            if window.viewport.is_empty() {
                break;
            }
            let visibility = item_visibility(
                index,
                params.scroll_top,
                params.container_height,
                params.item_height,
            );
            prop_assert!(!visibility.is_visible, "row {} should be hidden", index);
            prop_assert_eq!(visibility.visibility_ratio, 0.0);
        }
    }

    #[test]
    fn scroll_target_stays_in_scrollable_range(
        params in params_strategy(),
        align in align_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(params.item_count > 0);
        let index = pick.index(params.item_count);
        let target = scroll_target(
            index,
            align,
            params.item_height,
            params.container_height,
            params.item_count,
        );
        let total = params.item_count as f64 * params.item_height;
        let max_scroll = (total - params.container_height).max(0.0);
        prop_assert!(target >= 0.0);
        prop_assert!(target <= max_scroll);
    }

    #[test]
    fn burst_within_one_delay_commits_last_offset_once(
        offsets in prop::collection::vec(0_u32..100_000, 1..40),
        delay_ms in 1_u64..100,
    ) {
        let timers = TimerQueue::new();
        let mut list: VirtualScroll<f64, NullContainer> = VirtualScroll::new(
            ScrollOptions::new(20.0).with_throttle_delay(Duration::from_millis(delay_ms)),
            timers.clone(),
            ResizeNotifier::new(),
        );
        for offset in &offsets {
            list.handle_scroll(ScrollEvent::new(f64::from(*offset)));
        }
        prop_assert_eq!(list.scroll_top(), 0.0);
        prop_assert_eq!(timers.pending(), 1);

        let fired = timers.advance_by(Duration::from_millis(delay_ms));
        prop_assert_eq!(fired, 1);
        let last = offsets.last().copied().map(f64::from).unwrap_or_default();
        prop_assert_eq!(list.scroll_top(), last);
        prop_assert!(!list.is_scroll_pending());
    }
}
