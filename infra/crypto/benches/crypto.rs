use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jtool_crypto::{aes, base64, des, digest};

fn bench_symmetric(c: &mut Criterion) {
    let mut group = c.benchmark_group("symmetric");

    for (label, size) in [("64B", 64usize), ("4KB", 4 * 1024), ("64KB", 64 * 1024)] {
        let text = "x".repeat(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("aes_encrypt", label), &text, |b, t| {
            b.iter(|| aes::encrypt(t, "bench-password").unwrap());
        });
        group.bench_with_input(BenchmarkId::new("des_encrypt", label), &text, |b, t| {
            b.iter(|| des::encrypt(t).unwrap());
        });

        let sealed = aes::encrypt(&text, "bench-password").unwrap();
        group.bench_with_input(BenchmarkId::new("aes_decrypt", label), &sealed, |b, s| {
            b.iter(|| aes::decrypt(s, "bench-password").unwrap());
        });
    }

    group.finish();
}

fn bench_encodings(c: &mut Criterion) {
    let data = vec![0xA5u8; 16 * 1024];
    let encoded = base64::encode(&data);

    c.bench_function("legacy_base64_encode_16KB", |b| b.iter(|| base64::encode(&data)));
    c.bench_function("legacy_base64_decode_16KB", |b| b.iter(|| base64::decode(&encoded).unwrap()));
    c.bench_function("md5_16KB", |b| b.iter(|| digest::md5_hex_bytes(&data)));
}

criterion_group!(benches, bench_symmetric, bench_encodings);
criterion_main!(benches);
