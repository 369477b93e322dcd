// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_virtual_scroll::{
    ResizeNotifier, ScrollBehavior, ScrollContainer, ScrollEvent, ScrollOptions, TimerQueue,
    VirtualScroll, WindowParams, compute_window,
};

struct Viewport;

impl ScrollContainer<f64> for Viewport {
    fn client_height(&self) -> f64 {
        800.0
    }

    fn scroll_top(&self) -> f64 {
        0.0
    }

    fn scroll_to(&mut self, _top: f64, _behavior: ScrollBehavior) {}
}

fn bench_compute_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("virtual_scroll/compute_window");

    // The window math is independent of list length; sweep offsets to confirm.
    for item_count in [1_000usize, 100_000, 10_000_000] {
        let total = item_count as f64 * 24.0;
        let offsets: Vec<f64> = (0..256).map(|i| total * f64::from(i) / 256.0).collect();
        group.throughput(Throughput::Elements(offsets.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(item_count),
            &offsets,
            |b, offsets| {
                b.iter(|| {
                    for &scroll_top in offsets {
                        black_box(compute_window(&WindowParams {
                            scroll_top,
                            container_height: 800.0,
                            item_height: 24.0,
                            buffer_size: 5,
                            item_count,
                        }));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_visible_item_ids(c: &mut Criterion) {
    let mut group = c.benchmark_group("virtual_scroll/visible_item_ids");

    for row_height in [8.0_f64, 24.0, 96.0] {
        let items: Vec<(u64, ())> = (0..100_000).map(|i| (i, ())).collect();
        let timers = TimerQueue::new();
        let mut list = VirtualScroll::new(
            ScrollOptions::new(row_height),
            timers.clone(),
            ResizeNotifier::new(),
        );
        list.attach(Viewport);
        list.handle_scroll(ScrollEvent::new(row_height * 50_000.0));
        timers.advance_by(Duration::from_millis(16));

        let visible = list.window(items.len()).viewport.len();
        group.throughput(Throughput::Elements(visible as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(row_height),
            &items,
            |b, items| {
                b.iter(|| black_box(list.visible_item_ids(items)));
            },
        );
    }

    group.finish();
}

fn bench_scroll_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("virtual_scroll/scroll_burst");

    // A fling delivers many notifications per throttle window.
    for burst in [8usize, 64, 512] {
        group.throughput(Throughput::Elements(burst as u64));
        group.bench_with_input(BenchmarkId::from_parameter(burst), &burst, |b, &burst| {
            let timers = TimerQueue::new();
            let mut list: VirtualScroll<f64, Viewport> = VirtualScroll::new(
                ScrollOptions::new(24.0),
                timers.clone(),
                ResizeNotifier::new(),
            );
            b.iter(|| {
                for i in 0..burst {
                    list.handle_scroll(ScrollEvent::new(i as f64 * 3.0));
                }
                timers.advance_by(Duration::from_millis(16));
                black_box(list.scroll_top())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_window,
    bench_visible_item_ids,
    bench_scroll_burst
);
criterion_main!(benches);
