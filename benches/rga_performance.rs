//! Performance benchmarks for the delta RGA.
//!
//! This module benchmarks:
//! - Sequential appends and deletions through the replica handle
//! - Joining deltas in order and in reverse (detached chain reattachment)
//! - Concurrent editing across replicas followed by delta exchange
//! - Materializing the value and encoding states
//!
//! Run with: cargo bench

use std::sync::Arc;
use std::thread;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use delta_rga::{Anchor, LamportClock, Rga, State, initial, join, mutators, value};

fn letter(i: usize) -> char {
    (b'A' + (i % 26) as u8) as char
}

/// Builds the deltas of `size` sequential appends by one replica.
fn append_deltas(size: usize) -> Vec<State<char>> {
    let clock = LamportClock::new(1);
    let mut state = initial();
    let mut deltas = Vec::with_capacity(size);
    for i in 0..size {
        let delta = mutators::push(&state, &clock, letter(i)).unwrap();
        state = join(&state, &delta).unwrap();
        deltas.push(delta);
    }
    deltas
}

/// Benchmark sequential appends
fn bench_sequential_appends(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_appends");

    for size in [100, 500, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("push_chars", size), size, |b, &size| {
            b.iter(|| {
                let rga = Rga::new(1);
                for i in 0..size {
                    black_box(rga.push(letter(i)).unwrap());
                }
                black_box(rga.text().unwrap())
            });
        });
    }
    group.finish();
}

/// Benchmark typing after a fixed anchor, the cheapest insertion path
fn bench_anchored_insertions(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchored_insertions");

    for size in [100, 1000, 5000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("insert_after", size), size, |b, &size| {
            b.iter(|| {
                let rga = Rga::new(1);
                let mut anchor = Anchor::Head;
                for i in 0..size {
                    let delta = rga.insert_after(anchor, letter(i)).unwrap();
                    anchor = Anchor::Vertex(*delta.added().keys().next().unwrap());
                }
                black_box(rga.total_vertex_count())
            });
        });
    }
    group.finish();
}

/// Benchmark sequential deletions after insertions
fn bench_sequential_deletions(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_deletions");

    for size in [100, 500, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("remove_front", size), size, |b, &size| {
            b.iter_batched(
                || {
                    let rga = Rga::new(1);
                    for i in 0..size {
                        rga.push(letter(i)).unwrap();
                    }
                    rga
                },
                |rga| {
                    for _ in 0..size {
                        black_box(rga.remove_at(0).unwrap());
                    }
                    black_box(rga.text().unwrap())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Benchmark joining a delta stream, in order and backwards
fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");

    for size in [100, 1000].iter() {
        let deltas = append_deltas(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("in_order", size), &deltas, |b, deltas| {
            b.iter(|| {
                let state = deltas
                    .iter()
                    .try_fold(initial(), |acc, d| join(&acc, d))
                    .unwrap();
                black_box(state)
            });
        });

        group.bench_with_input(BenchmarkId::new("reversed", size), &deltas, |b, deltas| {
            b.iter(|| {
                let state = deltas
                    .iter()
                    .rev()
                    .try_fold(initial(), |acc, d| join(&acc, d))
                    .unwrap();
                black_box(state)
            });
        });
    }

    let full = append_deltas(1000)
        .iter()
        .try_fold(initial(), |acc, d| join(&acc, d))
        .unwrap();
    group.bench_function("full_state_with_itself", |b| {
        b.iter(|| black_box(join(&full, &full).unwrap()));
    });

    group.finish();
}

/// Benchmark concurrent editing across replicas, then a full exchange
fn bench_concurrent_replicas(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_replicas");

    for num_replicas in [2, 4, 8].iter() {
        let ops_per_replica = 100;
        let total_ops = num_replicas * ops_per_replica;
        group.throughput(Throughput::Elements(total_ops as u64));
        group.bench_with_input(
            BenchmarkId::new("replicas", num_replicas),
            num_replicas,
            |b, &num_replicas| {
                b.iter(|| {
                    let rgas: Vec<Arc<Rga<char>>> = (1..=num_replicas as u64)
                        .map(|id| Arc::new(Rga::new(id)))
                        .collect();

                    // Every replica edits on its own thread
                    let handles: Vec<_> = rgas
                        .iter()
                        .map(|rga| {
                            let rga = Arc::clone(rga);
                            thread::spawn(move || {
                                (0..ops_per_replica)
                                    .map(|i| rga.push(letter(i)).unwrap())
                                    .collect::<Vec<_>>()
                            })
                        })
                        .collect();
                    let deltas: Vec<Vec<State<char>>> =
                        handles.into_iter().map(|h| h.join().unwrap()).collect();

                    // Exchange every delta with every other replica
                    for (source, batch) in deltas.iter().enumerate() {
                        for (target, rga) in rgas.iter().enumerate() {
                            if source != target {
                                for delta in batch {
                                    rga.apply_remote(delta).unwrap();
                                }
                            }
                        }
                    }

                    let first = rgas[0].state();
                    for rga in &rgas[1..] {
                        assert_eq!(first, rga.state(), "Replicas did not converge");
                    }
                    black_box(first)
                });
            },
        );
    }
    group.finish();
}

/// Benchmark value materialization with tombstones present
fn bench_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("value");

    for size in [100, 1000, 5000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        let rga = Rga::new(1);
        let mut anchor = Anchor::Head;
        for i in 0..*size {
            let delta = rga.insert_after(anchor, letter(i)).unwrap();
            anchor = Anchor::Vertex(*delta.added().keys().next().unwrap());
        }
        // Tombstone every third element
        let state = rga.state();
        let victims: Vec<_> = state.chain().step_by(3).map(|id| id.unwrap()).collect();
        for vertex in victims {
            rga.remove(vertex).unwrap();
        }
        let state = rga.state();

        group.bench_with_input(BenchmarkId::new("materialize", size), &state, |b, state| {
            b.iter(|| black_box(value(state).unwrap()));
        });
    }
    group.finish();
}

/// Benchmark the JSON wire format
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let state = append_deltas(1000)
        .iter()
        .try_fold(initial(), |acc, d| join(&acc, d))
        .unwrap();
    let json = serde_json::to_string(&state).unwrap();

    group.bench_function("encode_state", |b| {
        b.iter(|| black_box(serde_json::to_string(&state).unwrap()));
    });
    group.bench_function("decode_state", |b| {
        b.iter(|| black_box(serde_json::from_str::<State<char>>(&json).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_sequential_appends,
    bench_anchored_insertions,
    bench_sequential_deletions,
    bench_join,
    bench_concurrent_replicas,
    bench_value,
    bench_codec
);

criterion_main!(benches);
