use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use moodline::core::message::Sentiment;
use moodline::core::mood::{MoodPoint, MoodTrend};

fn make_series(n: usize) -> Vec<MoodPoint> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| MoodPoint {
            timestamp: start + Duration::hours(i as i64),
            sentiment: if i % 3 == 0 {
                Sentiment::Negative
            } else {
                Sentiment::Positive
            },
            confidence: (i % 100) as f64 / 100.0,
        })
        .collect()
}

fn bench_plot_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("plot_points");
    for &n in &[100usize, 1_000, 10_000] {
        let mut trend = MoodTrend::new();
        trend.replace(make_series(n));

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &trend, |b, trend| {
            b.iter(|| {
                let points = trend.plot_points();
                assert_eq!(points.len(), n);
                points
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plot_points);
criterion_main!(benches);
