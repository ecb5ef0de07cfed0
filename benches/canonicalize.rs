use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use spectra_ingest::app::services::canonicalizer::canonicalize;
use spectra_ingest::{ColumnSelection, IngestEngine, RawPayload};

const POINTS: usize = 100_000;

/// Decreasing wavelength grid with a sprinkling of non-finite flux values
fn decreasing_series() -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = (0..POINTS).map(|i| 1100.0 - i as f64 * 0.005).collect();
    let y: Vec<f64> = (0..POINTS)
        .map(|i| if i % 997 == 0 { f64::NAN } else { (i as f64 * 0.01).sin() })
        .collect();
    (x, y)
}

/// Non-monotonic grid: two interleaved ramps
fn shuffled_series() -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = (0..POINTS)
        .map(|i| if i % 2 == 0 { i as f64 } else { (POINTS - i) as f64 })
        .collect();
    let y: Vec<f64> = (0..POINTS).map(|i| i as f64).collect();
    (x, y)
}

fn bench_canonicalize(c: &mut Criterion) {
    c.bench_function("canonicalize/reverse_100k", |b| {
        b.iter_batched(
            decreasing_series,
            |(x, y)| black_box(canonicalize(x, y)),
            BatchSize::LargeInput,
        )
    });

    c.bench_function("canonicalize/stable_sort_100k", |b| {
        b.iter_batched(
            shuffled_series,
            |(x, y)| black_box(canonicalize(x, y)),
            BatchSize::LargeInput,
        )
    });
}

fn bench_delimited_commit(c: &mut Criterion) {
    let mut text = String::from("wavelength (nm),flux,error\n");
    for i in 0..20_000 {
        text.push_str(&format!("{:.3},{:.6},{:.6}\n", 900.0 - i as f64 * 0.02, i as f64, 0.1));
    }
    let raw = RawPayload::new("bench.csv", text);
    let engine = IngestEngine::new();
    let selection = ColumnSelection::new().with_columns(0, 1);

    c.bench_function("commit/delimited_20k_rows", |b| {
        b.iter(|| black_box(engine.commit(&raw, &selection)))
    });
}

criterion_group!(benches, bench_canonicalize, bench_delimited_commit);
criterion_main!(benches);
