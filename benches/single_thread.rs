use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Bencher, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::Runtime;

use csv_stream::{rows, Options};

/// Generates a synthetic CSV with `n` rows and 8 columns of varying width,
/// seeded so runs are comparable across invocations. No external corpus or
/// `INPUT` file is needed, unlike the teacher crate's benchmark.
fn prepare(n: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut out = Vec::new();
    for _ in 0..n {
        for col in 0..8 {
            if col > 0 {
                out.push(b',');
            }
            let len = rng.gen_range(1..16);
            for _ in 0..len {
                out.push(rng.gen_range(b'a'..=b'z'));
            }
        }
        out.push(b'\n');
    }
    out
}

fn csv_stream_rows(b: &mut Bencher, rt: &Runtime, slice: &[u8]) {
    b.to_async(rt).iter(|| async {
        let mut reader = rows(Cursor::new(slice), Options::default()).unwrap();
        while let Some(row) = reader.next().await {
            for cell in row.unwrap() {
                black_box(cell);
            }
        }
    })
}

fn csv_crate(b: &mut Bencher, slice: &[u8]) {
    b.iter(|| {
        let cursor = Cursor::new(slice);
        for row in csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(cursor)
            .into_records()
        {
            for cell in row.unwrap().into_iter() {
                black_box(cell);
            }
        }
    })
}

fn bench_parsers(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("Parsers");
    for i in [1_000, 10_000, 50_000, 100_000] {
        let input = prepare(i);
        group.bench_with_input(BenchmarkId::new("csv_stream::rows", i), &i, |b, _| {
            csv_stream_rows(b, &rt, &input)
        });
        group.bench_with_input(BenchmarkId::new("csv", i), &i, |b, _| csv_crate(b, &input));
    }
    group.finish();
}

criterion_group!(benches, bench_parsers);
criterion_main!(benches);
