#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use haarlearn::{
    ConfigurationSampler, Example, FeatureRegistry, HaarLearner, ImageData, IntegralImageBuffer,
    LearnerConfig, SamplingPolicy, StumpErrorScorer,
};
use std::time::Duration;

const SIDE: u32 = 24;

fn synthetic_image(seed: u32) -> IntegralImageBuffer {
    let pixels: Vec<u8> = (0..SIDE * SIDE)
        .map(|i| ((i * 37 + seed * 101) % 251) as u8)
        .collect();
    IntegralImageBuffer::new(&ImageData::new(&pixels, SIDE, SIDE))
}

fn synthetic_examples(count: u32) -> Vec<Example> {
    (0..count)
        .map(|i| {
            let label = if i % 2 == 0 { 1 } else { -1 };
            Example::new(synthetic_image(i), label, 1.0 / count as f64)
        })
        .collect()
}

fn bench_exhaustive_enumeration(c: &mut Criterion) {
    let registry = FeatureRegistry::with_default_features();
    let feature = registry.get_feature("4q").unwrap();
    let mut sampler = ConfigurationSampler::new(SamplingPolicy::Exhaustive, None, SIDE, SIDE).unwrap();

    c.bench_function("enumerate_4q_24x24", move |b| {
        b.iter(|| sampler.candidates(feature.as_ref()).count())
    });
}

fn bench_random_sampling(c: &mut Criterion) {
    let registry = FeatureRegistry::with_default_features();
    let feature = registry.get_feature("3h").unwrap();
    let mut sampler = ConfigurationSampler::new(SamplingPolicy::BoundedByCount(1000), Some(7), SIDE, SIDE).unwrap();

    c.bench_function("sample_3h_1000", move |b| {
        b.iter(|| sampler.candidates(feature.as_ref()).count())
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let registry = FeatureRegistry::with_default_features();
    let image = synthetic_image(3);
    let candidates: Vec<_> = ["2v", "2h", "3v", "3h", "4q"]
        .iter()
        .map(|code| registry.configure(code, haarlearn::Rectangle::new(2, 4, 12, 12)).unwrap())
        .collect();

    c.bench_function("evaluate_all_types", move |b| {
        b.iter(|| {
            candidates
                .iter()
                .map(|candidate| candidate.evaluate(black_box(&image)))
                .sum::<i64>()
        })
    });
}

fn bench_select_round(c: &mut Criterion) {
    let registry = FeatureRegistry::with_default_features();
    let examples = synthetic_examples(64);

    let mut config = LearnerConfig::new(SIDE, SIDE);
    config.set_sampling_policy(SamplingPolicy::BoundedByCount(500));
    config.set_seed(11);
    let mut learner = HaarLearner::new(&registry, config).unwrap();

    let mut group = c.benchmark_group("select_round");
    // Limit the measurement time and the sample size
    // to make sure the benchmark finishes in a feasible amount of time.
    group.measurement_time(Duration::new(20, 0)).sample_size(20);
    group.bench_function("bounded_500_64_examples", |b| {
        b.iter(|| learner.select(&examples, &StumpErrorScorer).unwrap())
    });
    group.finish();
}

criterion_group!(sampling, bench_exhaustive_enumeration, bench_random_sampling);
criterion_group!(evaluation, bench_evaluate);
criterion_group!(selection, bench_select_round);
criterion_main!(sampling, evaluation, selection);
