// The benchmark suite under criterion. Each benchmark runs the same operation
// as 'regex-compare bench': compile the pattern, then count its matches.
//
// Pairs of benchmark and engine that fail, e.g., the redos benchmark with
// PCRE2 hitting its match limit, are skipped with a note on stderr.

use std::time::Duration;

use {
    criterion::{
        black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
    },
    regex_compare::{bench, fixture, Engine, Fixtures},
};

fn suite(c: &mut Criterion) {
    let fixtures = Fixtures::bundled();
    for b in bench::suite(&fixtures) {
        let mut group = c.benchmark_group(b.name());
        for engine in Engine::ALL {
            if let Err(err) = engine.count_matches(b.pattern(), b.haystack()) {
                eprintln!("skipping {}/{}: {}", b.name(), engine, err);
                continue;
            }
            group.bench_function(engine.name(), |bencher| {
                bencher.iter(|| {
                    engine
                        .count_matches(
                            black_box(b.pattern()),
                            black_box(b.haystack()),
                        )
                        .unwrap()
                })
            });
        }
        group.finish();
    }
}

// How the cost of a search, without compilation, grows with the length of
// the near miss given to ^(a+)+$.
fn redos_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("redos-scaling");
    group.measurement_time(Duration::from_secs(3));
    for engine in [Engine::Backtrack, Engine::Linear] {
        let re = engine.compile(fixture::REDOS).unwrap();
        for len in [8, 12, 16, 18] {
            let input = fixture::redos_input(len);
            group.bench_with_input(
                BenchmarkId::new(engine.name(), len),
                &input,
                |bencher, input| {
                    bencher.iter(|| re.count(black_box(input)).unwrap())
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, suite, redos_scaling);
criterion_main!(benches);
