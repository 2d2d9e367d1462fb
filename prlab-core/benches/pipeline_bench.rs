//! Criterion benchmarks for the in-memory pipeline stages.
//!
//! Benchmarks:
//! 1. Outer merge of two multi-year daily series
//! 2. Range filter over the merged table
//! 3. 30-sample rolling PR mean

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prlab_core::data::{filter_range, merge_series, DateRange, JoinMode};
use prlab_core::indicators::pr_rolling_mean;
use prlab_core::{DailyRecord, Metric, MetricSeries};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(metric: Metric, days: usize, skip_every: usize) -> MetricSeries {
    let base = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
    MetricSeries::from_records(
        metric,
        (0..days)
            .filter(|i| i % skip_every != 0)
            .map(|i| DailyRecord {
                date: base + Duration::days(i as i64),
                value: 70.0 + (i as f64 * 0.1).sin() * 5.0,
            }),
    )
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for days in [365usize, 3650] {
        let pr = make_series(Metric::Pr, days, 7);
        let ghi = make_series(Metric::Ghi, days, 11);
        group.bench_with_input(BenchmarkId::from_parameter(days), &days, |b, _| {
            b.iter(|| merge_series(black_box(&pr), black_box(&ghi), JoinMode::Outer))
        });
    }
    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let pr = make_series(Metric::Pr, 3650, 7);
    let ghi = make_series(Metric::Ghi, 3650, 11);
    let table = merge_series(&pr, &ghi, JoinMode::Outer);
    let range = DateRange::parse("2020-01-01", "2024-12-31").unwrap();

    c.bench_function("filter_range_3650", |b| {
        b.iter(|| filter_range(black_box(table.clone()), black_box(&range)))
    });
}

fn bench_rolling(c: &mut Criterion) {
    let pr = make_series(Metric::Pr, 3650, 7);
    let ghi = make_series(Metric::Ghi, 3650, 11);
    let table = merge_series(&pr, &ghi, JoinMode::Outer);

    c.bench_function("pr_rolling_mean_30", |b| {
        b.iter(|| pr_rolling_mean(black_box(&table), 30))
    });
}

criterion_group!(benches, bench_merge, bench_filter, bench_rolling);
criterion_main!(benches);
