use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use sm4_accel::{supported_backends, Sm4};
use sm4_core::{encrypt_block, expand_key, Sm4Key};

fn bench_key_schedule(c: &mut Criterion) {
    let key = [0x11u8; 16];
    let mut group = c.benchmark_group("key_schedule");
    for backend in supported_backends() {
        group.bench_function(BenchmarkId::from_parameter(backend), |b| {
            b.iter(|| Sm4::new(&key, backend).unwrap());
        });
    }
    group.finish();
}

fn bench_blocks(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);

    let mut group = c.benchmark_group("single_block");
    let round_keys = expand_key(&Sm4Key::from(key));
    let mut block = [0u8; 16];
    rng.fill_bytes(&mut block);
    group.bench_function("sm4_core_encrypt_block", |b| {
        b.iter(|| encrypt_block(&block, &round_keys));
    });
    for backend in supported_backends() {
        let sm4 = Sm4::new(&key, backend).unwrap();
        group.bench_function(BenchmarkId::new("encrypt_block", backend), |b| {
            b.iter(|| sm4.encrypt_block(&block));
        });
    }
    group.finish();
}

fn bench_buffers(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
    let key = [0x5au8; 16];
    let mut data = vec![0u8; 64 * 1024];
    rng.fill_bytes(&mut data);

    let mut group = c.benchmark_group("buffer_64k");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for backend in supported_backends() {
        let sm4 = Sm4::new(&key, backend).unwrap();
        group.bench_function(BenchmarkId::new("encrypt_in_place", backend), |b| {
            let mut buf = data.clone();
            b.iter(|| sm4.encrypt_in_place(&mut buf).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_key_schedule, bench_blocks, bench_buffers);
criterion_main!(benches);
