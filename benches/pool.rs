//! Pool allocation benchmarks
//!
//! Benchmarks that simulate node-heavy usage patterns

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fixpool::{GrowingPool, NodeAllocator, PoolBox, PoolConfig};
use std::ptr::NonNull;

/// Allocate, touch, release a single block per iteration
fn bench_block_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_churn");
    group.throughput(Throughput::Elements(1));

    group.bench_function("growing_pool", |b| {
        let pool = GrowingPool::with_config(256, 64, PoolConfig::production()).unwrap();

        b.iter(|| unsafe {
            let block = pool.allocate().unwrap();
            std::ptr::write_bytes(block.as_ptr(), 0x42, 256);
            black_box(block);
            pool.release(block);
        });
    });

    group.bench_function("global_alloc", |b| {
        let layout = std::alloc::Layout::from_size_align(256, 8).unwrap();

        b.iter(|| unsafe {
            let raw = std::alloc::alloc(layout);
            let block = NonNull::new(raw).unwrap();
            std::ptr::write_bytes(block.as_ptr(), 0x42, 256);
            black_box(block);
            std::alloc::dealloc(block.as_ptr(), layout);
        });
    });

    group.finish();
}

/// Build up a working set of nodes, then free it, like a list being
/// filled and cleared
fn bench_node_working_set(c: &mut Criterion) {
    const NODES: usize = 1024;

    let mut group = c.benchmark_group("node_working_set");
    group.throughput(Throughput::Elements(NODES as u64));

    group.bench_function("pool_boxes", |b| {
        let nodes = NodeAllocator::<[u64; 8]>::new(NODES).unwrap();
        let mut held = Vec::with_capacity(NODES);

        b.iter(|| {
            for i in 0..NODES {
                held.push(PoolBox::new_in([i as u64; 8], &nodes).unwrap());
            }
            black_box(held.last());
            held.clear();
        });
    });

    group.bench_function("heap_boxes", |b| {
        let mut held = Vec::with_capacity(NODES);

        b.iter(|| {
            for i in 0..NODES {
                held.push(Box::new([i as u64; 8]));
            }
            black_box(held.last());
            held.clear();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_block_churn, bench_node_working_set);
criterion_main!(benches);
