/*!
 * Handoff Queue Benchmarks
 *
 * Uncontended fast paths, blocked-consumer handoff latency and
 * multi-producer throughput
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use handoff_queue::{HandoffQueue, QueueConfig};
use std::sync::Arc;
use std::thread;

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    let queue = HandoffQueue::with_config(QueueConfig::high_throughput());

    group.bench_function("enqueue_try_dequeue", |b| {
        b.iter(|| {
            queue.enqueue(black_box(1u64)).ok();
            black_box(queue.try_dequeue());
        });
    });

    group.bench_function("try_dequeue_empty", |b| {
        b.iter(|| black_box(queue.try_dequeue()));
    });

    group.finish();
}

fn bench_handoff_latency(c: &mut Criterion) {
    c.bench_function("handoff_latency", |b| {
        let queue = Arc::new(HandoffQueue::<u64>::new());

        b.iter(|| {
            let queue_clone = queue.clone();
            let handle = thread::spawn(move || queue_clone.dequeue());

            // Either handed off to the waiter or taken on its fast path
            queue.enqueue(7).ok();
            handle.join().unwrap().ok();
        });
    });
}

fn bench_throughput(c: &mut Criterion) {
    const ITEMS_PER_PRODUCER: usize = 10_000;
    let mut group = c.benchmark_group("throughput");

    for producers in [1usize, 2, 4] {
        group.throughput(Throughput::Elements((producers * ITEMS_PER_PRODUCER) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(producers),
            &producers,
            |b, &producers| {
                b.iter(|| {
                    let queue = Arc::new(HandoffQueue::with_config(QueueConfig::high_throughput()));

                    let consumer = {
                        let queue = queue.clone();
                        thread::spawn(move || {
                            for _ in 0..producers * ITEMS_PER_PRODUCER {
                                black_box(queue.dequeue().ok());
                            }
                        })
                    };

                    let handles: Vec<_> = (0..producers)
                        .map(|_| {
                            let queue = queue.clone();
                            thread::spawn(move || {
                                for i in 0..ITEMS_PER_PRODUCER {
                                    queue.enqueue(i).ok();
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                    consumer.join().unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_uncontended,
    bench_handoff_latency,
    bench_throughput
);

criterion_main!(benches);
