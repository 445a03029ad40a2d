use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pu_risk::{
    ClassHistogram, PitmanModel, PopulationModel, PopulationUniquenessEstimator,
    SampleStatistics,
};
use std::hint::black_box;

fn convergent_histogram() -> ClassHistogram {
    ClassHistogram::from_counts([(1, 20), (2, 2), (5, 1), (8, 1), (10, 1)]).unwrap()
}

fn mixed_histogram() -> ClassHistogram {
    ClassHistogram::from_counts([(1, 30), (2, 15), (3, 8), (4, 4), (5, 2), (6, 1)]).unwrap()
}

fn bench_pitman_fit(c: &mut Criterion) {
    let hist = convergent_histogram();
    let stats = SampleStatistics::new(0.1, &hist);

    c.bench_function("pitman_fit", |b| {
        b.iter(|| {
            let model = PitmanModel::new(black_box(&hist), black_box(stats));
            black_box(model.uniqueness_risk())
        })
    });
}

fn bench_selector(c: &mut Criterion) {
    let estimator = PopulationUniquenessEstimator::new();
    let convergent = convergent_histogram();
    let mixed = mixed_histogram();

    let mut group = c.benchmark_group("selector");
    for (name, hist, pi) in
        [("pitman_path", &convergent, 0.1), ("zayatz_path", &mixed, 0.5)]
    {
        group.bench_with_input(BenchmarkId::from_parameter(name), &pi, |b, &pi| {
            b.iter(|| black_box(estimator.estimate(black_box(pi), black_box(hist)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pitman_fit, bench_selector);
criterion_main!(benches);
