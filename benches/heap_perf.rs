//! Criterion benchmarks for the intrusive heap
//!
//! Compares the owning [`ArenaHeap`] against `std::collections::BinaryHeap`
//! for push/pop throughput, and measures what the intrusive layout is for:
//! cancelling arbitrary pending entries.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench heap_perf
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_intrusive_heap::arena::ArenaHeap;
use rust_intrusive_heap::timer::TimerQueue;
use rust_intrusive_heap::{Heap, RemovableHeap};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

const SIZES: [usize; 3] = [1 << 8, 1 << 12, 1 << 16];

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Lcg { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state >> 33
    }
}

fn priorities(n: usize) -> Vec<u64> {
    let mut rng = Lcg::new(0x5eed);
    (0..n).map(|_| rng.next()).collect()
}

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");
    for &n in &SIZES {
        let input = priorities(n);

        group.bench_with_input(BenchmarkId::new("arena_heap", n), &input, |b, input| {
            b.iter(|| {
                let mut heap = ArenaHeap::with_capacity(input.len());
                for &p in input {
                    heap.push(p, ());
                }
                while let Some(entry) = heap.pop() {
                    black_box(entry);
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("std_binary_heap", n), &input, |b, input| {
            b.iter(|| {
                let mut heap = BinaryHeap::with_capacity(input.len());
                for &p in input {
                    heap.push(Reverse(p));
                }
                while let Some(entry) = heap.pop() {
                    black_box(entry);
                }
            })
        });
    }
    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel_half");
    for &n in &SIZES {
        let input = priorities(n);

        group.bench_with_input(BenchmarkId::new("arena_heap", n), &input, |b, input| {
            b.iter(|| {
                let mut heap = ArenaHeap::with_capacity(input.len());
                let handles: Vec<_> = input
                    .iter()
                    .map(|&p| heap.push_with_handle(p, ()))
                    .collect();
                for handle in handles.iter().step_by(2) {
                    black_box(heap.remove(handle).ok());
                }
            })
        });

        // Without handles the only option is a linear search and rebuild
        group.bench_with_input(BenchmarkId::new("std_binary_heap_retain", n), &input, |b, input| {
            b.iter(|| {
                let mut heap: BinaryHeap<_> = input
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| Reverse((p, i)))
                    .collect();
                heap.retain(|Reverse((_, i))| i % 2 == 1);
                black_box(heap.len());
            })
        });
    }
    group.finish();
}

fn bench_timer_tick(c: &mut Criterion) {
    let base = Instant::now();
    let input = priorities(1 << 12);

    c.bench_function("timer_schedule_cancel_fire", |b| {
        b.iter(|| {
            let mut queue = TimerQueue::with_capacity(input.len());
            let ids: Vec<_> = input
                .iter()
                .map(|&p| queue.schedule(base + Duration::from_micros(p % 1_000_000), p))
                .collect();
            for id in ids.iter().step_by(3) {
                black_box(queue.cancel(id).ok());
            }
            black_box(queue.drain_expired(base + Duration::from_secs(1)).len());
        })
    });
}

criterion_group!(benches, bench_push_pop, bench_cancel, bench_timer_tick);
criterion_main!(benches);
