/*!
The benchmark driver.

A [`Benchmark`] pairs a pattern with a haystack. Measuring it with an engine
runs the benchmark's operation, compiling the pattern and counting its
matches, over and over: first for a number of discarded warmup iterations,
then for a number of measurement iterations. Each iteration keeps running the
operation until a minimum amount of wall clock time has passed and records
how many operations completed. The throughput of an iteration is that number
divided by the time it took.

Measurement happens in the current process. Isolating each measurement in
its own process is left to the caller, which can then combine the samples
of every process into one [`Summary`].

Nothing here imposes a time limit on an operation. A benchmark that makes a
backtracking engine run for an exponential amount of time will do exactly
that. The first error reported by an engine aborts the measurement.
*/

use std::time::{Duration, Instant};

use crate::{engine::Engine, error::Error, fixture::Fixtures};

/// Configuration for measuring a benchmark.
#[derive(Clone, Debug)]
pub struct Config {
    /// The number of warmup iterations, whose samples are discarded.
    pub warmup: u32,
    /// The number of measurement iterations.
    pub iterations: u32,
    /// The minimum duration of a single iteration.
    pub time: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config { warmup: 5, iterations: 5, time: Duration::from_secs(1) }
    }
}

/// A pattern and the haystack it searches.
#[derive(Clone, Copy, Debug)]
pub struct Benchmark<'f> {
    name: &'static str,
    pattern: &'f str,
    haystack: &'f str,
}

impl<'f> Benchmark<'f> {
    /// Creates a new benchmark.
    pub fn new(
        name: &'static str,
        pattern: &'f str,
        haystack: &'f str,
    ) -> Benchmark<'f> {
        Benchmark { name, pattern, haystack }
    }

    /// The name of this benchmark.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The pattern searched for.
    pub fn pattern(&self) -> &'f str {
        self.pattern
    }

    /// The haystack searched.
    pub fn haystack(&self) -> &'f str {
        self.haystack
    }

    /// Measures the throughput of this benchmark's operation with the given
    /// engine.
    pub fn measure(
        &self,
        engine: Engine,
        config: &Config,
    ) -> Result<Measurement, Error> {
        log::info!("measuring {} with the {} engine", self.name, engine);
        run(config, || engine.count_matches(self.pattern, self.haystack))
    }
}

/// Returns the standard benchmarks over the given fixtures.
pub fn suite(fixtures: &Fixtures) -> Vec<Benchmark<'_>> {
    use crate::fixture::{REDOS, WHOLE_WORDS_ENDING_WITH_NN};

    vec![
        Benchmark::new(
            "wholeWordsEndingWithNn",
            WHOLE_WORDS_ENDING_WITH_NN,
            fixtures.corpus(),
        ),
        Benchmark::new("redos", REDOS, fixtures.redos_input()),
        Benchmark::new(
            "manyAlternations",
            fixtures.alternation(),
            fixtures.corpus(),
        ),
    ]
}

/// Returns the standard benchmark with the given name, if one exists.
pub fn find<'f>(fixtures: &'f Fixtures, name: &str) -> Option<Benchmark<'f>> {
    suite(fixtures).into_iter().find(|b| b.name() == name)
}

/// The outcome of measuring one benchmark.
#[derive(Clone, Debug)]
pub struct Measurement {
    /// The number of matches reported by every operation.
    pub count: usize,
    /// One sample per measurement iteration.
    pub samples: Vec<Sample>,
}

/// The result of a single iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// The number of operations completed.
    pub ops: u64,
    /// The wall clock time it took to complete them.
    pub elapsed: Duration,
}

impl Sample {
    /// Returns the throughput of this sample in operations per second.
    pub fn throughput(&self) -> f64 {
        self.ops as f64 / self.elapsed.as_secs_f64()
    }
}

/// Runs the given operation for the configured number of warmup and
/// measurement iterations.
///
/// The operation returns the number of matches it found. It is expected to
/// return the same count every time.
pub fn run(
    config: &Config,
    mut op: impl FnMut() -> Result<usize, Error>,
) -> Result<Measurement, Error> {
    // An initial call to learn the expected count. This also makes sure a
    // pattern that fails to compile is reported before any timing begins.
    let count = op()?;
    for i in 0..config.warmup {
        let sample = iteration(config.time, count, &mut op)?;
        log::debug!(
            "warmup iteration {}: {:.3} ops/s",
            i + 1,
            sample.throughput(),
        );
    }
    let mut samples = Vec::with_capacity(config.iterations as usize);
    for i in 0..config.iterations {
        let sample = iteration(config.time, count, &mut op)?;
        log::debug!(
            "measurement iteration {}: {:.3} ops/s",
            i + 1,
            sample.throughput(),
        );
        samples.push(sample);
    }
    Ok(Measurement { count, samples })
}

/// Runs the given operation until at least `time` has elapsed.
///
/// This always runs the operation at least once.
pub fn iteration(
    time: Duration,
    expected: usize,
    mut op: impl FnMut() -> Result<usize, Error>,
) -> Result<Sample, Error> {
    let start = Instant::now();
    let mut ops = 0;
    loop {
        let count = std::hint::black_box(op()?);
        debug_assert_eq!(expected, count, "match count changed");
        ops += 1;
        let elapsed = start.elapsed();
        if elapsed >= time {
            log::trace!("{} ops in {:?}", ops, elapsed);
            return Ok(Sample { ops, elapsed });
        }
    }
}

/// A summary of throughput samples: their mean and the error margin of that
/// mean at 99.9% confidence.
#[derive(Clone, Copy, Debug)]
pub struct Summary {
    /// The number of samples.
    pub len: usize,
    /// The mean throughput, in operations per second.
    pub mean: f64,
    /// Half the width of the 99.9% confidence interval around the mean. This
    /// is NaN when there are fewer than two samples.
    pub error: f64,
}

impl Summary {
    /// Summarizes the given samples.
    pub fn new(samples: &[Sample]) -> Summary {
        let throughputs: Vec<f64> =
            samples.iter().map(|s| s.throughput()).collect();
        let len = throughputs.len();
        if len == 0 {
            return Summary { len, mean: f64::NAN, error: f64::NAN };
        }
        let mean = throughputs.iter().sum::<f64>() / len as f64;
        if len == 1 {
            return Summary { len, mean, error: f64::NAN };
        }
        let variance = throughputs
            .iter()
            .map(|t| (t - mean) * (t - mean))
            .sum::<f64>()
            / (len - 1) as f64;
        let stderr = variance.sqrt() / (len as f64).sqrt();
        Summary { len, mean, error: student_t_999(len - 1) * stderr }
    }
}

/// Returns the two-sided 99.9% critical value of Student's t distribution
/// with the given degrees of freedom.
fn student_t_999(df: usize) -> f64 {
    const TABLE: [f64; 30] = [
        636.619, 31.599, 12.924, 8.610, 6.869, 5.959, 5.408, 5.041, 4.781,
        4.587, 4.437, 4.318, 4.221, 4.140, 4.073, 4.015, 3.965, 3.922, 3.883,
        3.850, 3.819, 3.792, 3.768, 3.745, 3.725, 3.707, 3.690, 3.674, 3.659,
        3.646,
    ];
    match df {
        0 => f64::NAN,
        1..=30 => TABLE[df - 1],
        31..=40 => 3.551,
        41..=60 => 3.460,
        61..=120 => 3.373,
        _ => 3.291,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ops: u64, millis: u64) -> Sample {
        Sample { ops, elapsed: Duration::from_millis(millis) }
    }

    #[test]
    fn summary_of_identical_samples() {
        let summary = Summary::new(&[sample(10, 1000), sample(20, 2000)]);
        assert_eq!(2, summary.len);
        assert_eq!(10.0, summary.mean);
        assert_eq!(0.0, summary.error);
    }

    #[test]
    fn summary_error_margin() {
        // Throughputs of 8, 10 and 12 ops/s: a standard deviation of 2 and a
        // standard error of 2/sqrt(3).
        let samples = [sample(8, 1000), sample(10, 1000), sample(12, 1000)];
        let summary = Summary::new(&samples);
        assert_eq!(10.0, summary.mean);
        let expected = 31.599 * 2.0 / 3f64.sqrt();
        assert!((summary.error - expected).abs() < 1e-9);
    }

    #[test]
    fn summary_of_one_sample() {
        let summary = Summary::new(&[sample(5, 1000)]);
        assert_eq!(5.0, summary.mean);
        assert!(summary.error.is_nan());
    }

    #[test]
    fn run_counts_every_iteration() {
        let config =
            Config { warmup: 2, iterations: 3, time: Duration::ZERO };
        let mut calls = 0;
        let m = run(&config, || {
            calls += 1;
            Ok(7)
        })
        .unwrap();
        assert_eq!(7, m.count);
        assert_eq!(3, m.samples.len());
        assert!(m.samples.iter().all(|s| s.ops == 1));
        // One call up front, then one per iteration.
        assert_eq!(1 + 2 + 3, calls);
    }

    #[test]
    fn suite_names() {
        let fixtures = Fixtures::bundled();
        let names: Vec<&str> =
            suite(&fixtures).iter().map(|b| b.name()).collect();
        assert_eq!(
            vec!["wholeWordsEndingWithNn", "redos", "manyAlternations"],
            names,
        );
        assert!(find(&fixtures, "redos").is_some());
        assert!(find(&fixtures, "nope").is_none());
    }
}
