// benches/keystream.rs
//! Raw keystream transform throughput, sequential and random access.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use ctrcrypt::keystream::{derive_iv, CtrKeystream};
use ctrcrypt::{AesFactory, CipherFactory};
use std::hint::black_box;

const MB: usize = 1024 * 1024;

fn keystream() -> CtrKeystream {
    let key = [0x42u8; 32];
    let nonce = [0x24u8; 16];
    let salt = [0x99u8; 16];
    let iv = derive_iv(&AesFactory, &nonce, &salt);
    let cipher = AesFactory.create_cipher(&key, &iv).unwrap();
    CtrKeystream::new(cipher, &nonce, AesFactory.block_len())
}

fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("keystream");
    group.throughput(Throughput::Bytes(MB as u64));

    group.bench_function("sequential_1mib", |b| {
        let mut ks = keystream();
        let mut buf = vec![0u8; MB];
        b.iter(|| {
            ks.transform(0, black_box(&mut buf));
        });
    });

    group.bench_function("chunked_1mib", |b| {
        let mut ks = keystream();
        let mut buf = vec![0u8; MB];
        b.iter(|| {
            let mut position = 0u64;
            for chunk in buf.chunks_mut(1500) {
                ks.transform(position, black_box(chunk));
                position += chunk.len() as u64;
            }
        });
    });

    group.finish();
}

fn bench_random_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("keystream_random");
    // alternating between two distant batches forces a pad recompute on
    // every call — the worst case for the batch cache
    group.bench_function("alternating_batches", |b| {
        let mut ks = keystream();
        let mut buf = [0u8; 64];
        b.iter(|| {
            ks.transform(0, black_box(&mut buf));
            ks.transform(1 << 20, black_box(&mut buf));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_sequential, bench_random_access);
criterion_main!(benches);
