use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mosaic::{
    BlockPool, DynamicTransferBuffer, NodeId, PoolManager, StaticTransferBuffer, TransferBuffer,
    TransferBufferKey, TransferBufferManager, TransferType,
};

const BUFFER_SIZE: usize = 256;

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

fn benchmark_static_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("StaticTransferBuffer");

    for frame_len in [7usize, 63].iter() {
        group.bench_with_input(BenchmarkId::new("write_frames", frame_len), frame_len, |b, &frame_len| {
            let data = payload(BUFFER_SIZE);
            let mut buf = StaticTransferBuffer::<BUFFER_SIZE>::new();

            b.iter(|| {
                buf.reset();
                for offset in (0..BUFFER_SIZE).step_by(frame_len) {
                    let end = (offset + frame_len).min(BUFFER_SIZE);
                    buf.write(offset, &data[offset..end]);
                }
                black_box(buf.max_write_pos());
            });
        });
    }

    group.bench_function("read_all", |b| {
        let mut buf = StaticTransferBuffer::<BUFFER_SIZE>::new();
        buf.write(0, &payload(BUFFER_SIZE));
        let mut out = [0u8; BUFFER_SIZE];

        b.iter(|| black_box(buf.read(0, &mut out)));
    });

    group.finish();
}

fn benchmark_dynamic_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("DynamicTransferBuffer");

    for frame_len in [7usize, 63].iter() {
        group.bench_with_input(BenchmarkId::new("write_frames", frame_len), frame_len, |b, &frame_len| {
            let data = payload(BUFFER_SIZE);
            let pool = BlockPool::<16>::new();
            let mut buf = DynamicTransferBuffer::new(&pool, BUFFER_SIZE);

            // Each iteration acquires the chain and gives it back
            b.iter(|| {
                buf.reset();
                for offset in (0..BUFFER_SIZE).step_by(frame_len) {
                    let end = (offset + frame_len).min(BUFFER_SIZE);
                    buf.write(offset, &data[offset..end]);
                }
                black_box(buf.num_blocks());
            });
        });
    }

    group.bench_function("read_all", |b| {
        let pool = BlockPool::<16>::new();
        let mut buf = DynamicTransferBuffer::new(&pool, BUFFER_SIZE);
        buf.write(0, &payload(BUFFER_SIZE));
        let mut out = [0u8; BUFFER_SIZE];

        b.iter(|| black_box(buf.read(0, &mut out)));
    });

    group.finish();
}

fn benchmark_manager(c: &mut Criterion) {
    let mut group = c.benchmark_group("TransferBufferManager");
    let data = payload(BUFFER_SIZE);

    let keys: Vec<TransferBufferKey> = (1..=6)
        .filter_map(|node| NodeId::new(node).ok())
        .map(|node| TransferBufferKey::new(node, TransferType::MessageBroadcast))
        .collect();

    group.bench_function("create_fill_remove_static", |b| {
        let pool = BlockPool::<32>::new();
        let mut mgr = TransferBufferManager::<_, BUFFER_SIZE, 2, 4>::new(&pool);

        b.iter(|| {
            if let Ok(mut buf) = mgr.create(keys[0]) {
                buf.write(0, &data);
            }
            mgr.remove(keys[0]);
        });
    });

    // Two statics and four dynamics in flight; removing the statics migrates
    group.bench_function("create_fill_remove_with_migration", |b| {
        let pool_a = BlockPool::<16>::new();
        let pool_b = BlockPool::<16>::new();
        let mut poolmgr = PoolManager::<2>::new();
        poolmgr.add_pool(&pool_a).expect("register pool");
        poolmgr.add_pool(&pool_b).expect("register pool");
        let mut mgr = TransferBufferManager::<_, BUFFER_SIZE, 2, 4>::new(&poolmgr);

        b.iter(|| {
            for key in &keys {
                if let Ok(mut buf) = mgr.create(*key) {
                    buf.write(0, &data);
                }
            }
            for key in &keys {
                mgr.remove(*key);
            }
            black_box(mgr.stats());
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_static_buffer, benchmark_dynamic_buffer, benchmark_manager);
criterion_main!(benches);
