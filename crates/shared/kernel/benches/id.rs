use criterion::{Criterion, criterion_group, criterion_main};
use jtool_kernel::id::{IdGenerator, to_base36};
use jtool_kernel::safe_nanoid;

fn bench_ids(c: &mut Criterion) {
    let ids = IdGenerator::builder().work_id("01").business_type("10").build().unwrap();

    c.bench_function("sequence_next_id", |b| b.iter(|| ids.next_id()));
    c.bench_function("to_base36_29_digits", |b| {
        b.iter(|| to_base36("10012024013115304512300000042"));
    });
    c.bench_function("safe_nanoid_12", |b| b.iter(|| safe_nanoid!()));
}

criterion_group!(benches, bench_ids);
criterion_main!(benches);
