use std::time::{Duration, Instant};

use regex_compare::{
    bench::{self, Config},
    fixture::{self, Fixtures},
    Engine, ErrorKind, Matcher,
};

/// Returns the fastest of several timings of a single search.
fn fastest(re: &dyn Matcher, haystack: &str) -> anyhow::Result<Duration> {
    let mut best = Duration::MAX;
    for _ in 0..5 {
        let start = Instant::now();
        let count = std::hint::black_box(re.count(haystack)?);
        let elapsed = start.elapsed();
        assert_eq!(0, count);
        best = best.min(elapsed);
    }
    Ok(best)
}

#[test]
fn linear_beats_backtracking_on_redos() -> anyhow::Result<()> {
    let input = fixture::redos_input(16);
    let backtrack = Engine::Backtrack.compile(fixture::REDOS)?;
    let linear = Engine::Linear.compile(fixture::REDOS)?;
    let slow = fastest(&*backtrack, &input)?;
    let fast = fastest(&*linear, &input)?;
    assert!(
        fast * 4 < slow,
        "expected linear ({:?}) to be at least 4x faster than \
         backtracking ({:?})",
        fast,
        slow,
    );
    Ok(())
}

#[test]
fn backtracking_grows_super_linearly() -> anyhow::Result<()> {
    let backtrack = Engine::Backtrack.compile(fixture::REDOS)?;
    let short = fastest(&*backtrack, &fixture::redos_input(12))?;
    let long = fastest(&*backtrack, &fixture::redos_input(16))?;
    // A linear engine would take 4/3 as long. Backtracking takes about 16x.
    assert!(
        short * 4 < long,
        "expected super-linear growth, but 12 took {:?} and 16 took {:?}",
        short,
        long,
    );
    Ok(())
}

#[test]
fn backtracking_gives_up_on_long_redos_input() {
    let input = fixture::redos_input(fixture::REDOS_LEN);
    let err = Engine::Backtrack
        .count_matches(fixture::REDOS, &input)
        .unwrap_err();
    assert_eq!(ErrorKind::Search, err.kind());
    assert_eq!(fixture::REDOS, err.pattern());
    for engine in [Engine::Linear, Engine::Lite, Engine::Hybrid] {
        assert_eq!(Ok(0), engine.count_matches(fixture::REDOS, &input));
    }
}

#[test]
fn driver_measures_the_suite() -> anyhow::Result<()> {
    let fixtures = Fixtures::bundled().redos_len(10);
    let config = Config { warmup: 1, iterations: 2, time: Duration::ZERO };
    for b in bench::suite(&fixtures) {
        for engine in Engine::ALL {
            let m = b.measure(engine, &config)?;
            assert_eq!(2, m.samples.len());
            assert!(m.samples.iter().all(|s| s.ops >= 1));
            let summary = bench::Summary::new(&m.samples);
            assert_eq!(2, summary.len);
            assert!(summary.mean > 0.0);
        }
    }
    Ok(())
}

#[test]
fn driver_reports_errors() {
    let fixtures = Fixtures::bundled();
    let config = Config { warmup: 1, iterations: 1, time: Duration::ZERO };
    let redos = bench::find(&fixtures, "redos").unwrap();
    let err = redos.measure(Engine::Backtrack, &config).unwrap_err();
    assert_eq!(ErrorKind::Search, err.kind());

    let b = bench::Benchmark::new("lookbehind", "(?<=a)b", "ab");
    let err = b.measure(Engine::Linear, &config).unwrap_err();
    assert_eq!(ErrorKind::Syntax, err.kind());
    assert_eq!(1, b.measure(Engine::Backtrack, &config).unwrap().count);
}
