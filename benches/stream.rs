use criterion::{criterion_group, criterion_main, Criterion};
use std::time::Duration;
use unipress::{CodecRegistry, Direction, Status, Stream};

fn synthetic_payload(len: usize) -> Vec<u8> {
    (0..len).map(|n| (n % 251) as u8).collect()
}

fn run_stream(registry: &CodecRegistry, name: &str, direction: Direction, data: &[u8]) -> Vec<u8> {
    let codec = registry.resolve(name).expect("codec not registered");
    let mut stream = Stream::new(codec.as_ref(), direction, None).expect("could not build stream");
    let mut out = Vec::new();
    let mut window = vec![0u8; 1 << 16];
    loop {
        let consumed = stream.total_in() as usize;
        let before = stream.total_out();
        let status = stream
            .finish(&data[consumed..], &mut window)
            .expect("stream failed");
        out.extend_from_slice(&window[..(stream.total_out() - before) as usize]);
        if status != Status::Processing {
            return out;
        }
    }
}

fn bench_streams(c: &mut Criterion) {
    let registry = CodecRegistry::with_default_codecs();
    let payload = synthetic_payload(1 << 20);

    let mut group = c.benchmark_group("stream");
    group.bench_function("copy_1M", |b| {
        b.iter(|| {
            let out = run_stream(&registry, "copy", Direction::Compress, &payload);
            std::hint::black_box(out);
        });
    });

    #[cfg(feature = "zstd")]
    {
        let pressed = run_stream(&registry, "zstd", Direction::Compress, &payload);
        group.bench_function("zstd_compress_1M", |b| {
            b.iter(|| {
                let out = run_stream(&registry, "zstd", Direction::Compress, &payload);
                std::hint::black_box(out);
            });
        });
        group.bench_function("zstd_decompress_1M", |b| {
            b.iter(|| {
                let out = run_stream(&registry, "zstd", Direction::Decompress, &pressed);
                std::hint::black_box(out);
            });
        });
    }

    #[cfg(feature = "lz4")]
    group.bench_function("lz4_compress_1M", |b| {
        b.iter(|| {
            let out = run_stream(&registry, "lz4", Direction::Compress, &payload);
            std::hint::black_box(out);
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().warm_up_time(Duration::from_secs(1)).sample_size(10);
    targets = bench_streams
}
criterion_main!(benches);
