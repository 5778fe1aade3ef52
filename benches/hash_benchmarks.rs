use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hash_bench::fixtures::FixtureGenerator;
use hash_bench::hash_tools::{openssl_candidate, ring_candidate, rust_crypto_candidate};

fn criterion_benchmark(c: &mut Criterion) {
    let mut generator = FixtureGenerator::with_default_seed().unwrap();
    let data = generator.generate(1024, 1).buffers.remove(0);

    let modules = [rust_crypto_candidate(), openssl_candidate(), ring_candidate()];
    let mut group = c.benchmark_group("digest_1KB");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for function in modules[0].function_names() {
        for module in &modules {
            // ring has no md5
            let Some(digest_fn) = module.function(function) else {
                continue;
            };
            group.bench_with_input(
                BenchmarkId::new(function.as_str(), &module.name),
                &data,
                |b, data| b.iter(|| digest_fn(black_box(data)).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
