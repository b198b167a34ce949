use std::{ffi::OsString, path::PathBuf, time::Duration};

use {
    anyhow::Context,
    lexopt::{Arg, Parser},
    regex_compare::{bench, Fixtures},
};

use crate::args::{self, Configurable, Usage};

/// The configuration of the benchmark driver: which benchmarks to run, how
/// to measure them and which fixtures they read.
#[derive(Debug)]
pub struct Config {
    pub benchmarks: Vec<String>,
    pub forks: u32,
    pub warmup: u32,
    pub iterations: u32,
    pub time: Duration,
    pub corpus: Option<PathBuf>,
    pub names: Option<PathBuf>,
    pub redos_len: Option<usize>,
    /// Set in a child process started by the driver. The child measures one
    /// benchmark with one engine and writes its samples to stdout.
    pub worker: bool,
}

impl Default for Config {
    fn default() -> Config {
        let driver = bench::Config::default();
        Config {
            benchmarks: vec![],
            forks: 1,
            warmup: driver.warmup,
            iterations: driver.iterations,
            time: driver.time,
            corpus: None,
            names: None,
            redos_len: None,
            worker: false,
        }
    }
}

impl Config {
    /// Returns the configuration of the in-process driver.
    pub fn driver(&self) -> bench::Config {
        bench::Config {
            warmup: self.warmup,
            iterations: self.iterations,
            time: self.time,
        }
    }

    /// Loads the fixtures read by every benchmark.
    pub fn fixtures(&self) -> anyhow::Result<Fixtures> {
        let fixtures =
            Fixtures::load(self.corpus.as_deref(), self.names.as_deref())
                .context("failed to load fixtures")?;
        Ok(match self.redos_len {
            None => fixtures,
            Some(len) => fixtures.redos_len(len),
        })
    }

    /// Returns the selected benchmarks, or every benchmark if none were
    /// selected. An unknown benchmark name is an error.
    pub fn select<'f>(
        &self,
        fixtures: &'f Fixtures,
    ) -> anyhow::Result<Vec<bench::Benchmark<'f>>> {
        let suite = bench::suite(fixtures);
        if self.benchmarks.is_empty() {
            return Ok(suite);
        }
        let mut selected = vec![];
        for name in self.benchmarks.iter() {
            let b = match suite.iter().find(|b| b.name() == name) {
                Some(b) => *b,
                None => {
                    let names: Vec<&str> =
                        suite.iter().map(|b| b.name()).collect();
                    anyhow::bail!(
                        "unrecognized benchmark '{}' (expected one of: {})",
                        name,
                        names.join(", "),
                    );
                }
            };
            selected.push(b);
        }
        Ok(selected)
    }

    /// Returns the flags a worker process needs to reproduce this
    /// configuration, minus the engine and benchmark to run.
    pub fn worker_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--worker".into(),
            "--warmup".into(),
            self.warmup.to_string().into(),
            "--iterations".into(),
            self.iterations.to_string().into(),
            "--time".into(),
            format!("{}ns", self.time.as_nanos()).into(),
        ];
        if let Some(ref path) = self.corpus {
            args.push("--corpus".into());
            args.push(path.clone().into_os_string());
        }
        if let Some(ref path) = self.names {
            args.push("--names".into());
            args.push(path.clone().into_os_string());
        }
        if let Some(len) = self.redos_len {
            args.push("--redos-len".into());
            args.push(len.to_string().into());
        }
        args
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('b') | Arg::Long("benchmark") => {
                self.benchmarks.push(args::parse(p, "-b/--benchmark")?);
            }
            Arg::Long("forks") => {
                self.forks = args::parse(p, "--forks")?;
            }
            Arg::Long("warmup") => {
                self.warmup = args::parse(p, "--warmup")?;
            }
            Arg::Long("iterations") => {
                self.iterations = args::parse(p, "--iterations")?;
            }
            Arg::Long("time") => {
                let time: String = args::parse(p, "--time")?;
                self.time = parse_duration(&time).context("--time")?;
            }
            Arg::Long("corpus") => {
                self.corpus = Some(PathBuf::from(
                    p.value().context("--corpus needs a value")?,
                ));
            }
            Arg::Long("names") => {
                self.names = Some(PathBuf::from(
                    p.value().context("--names needs a value")?,
                ));
            }
            Arg::Long("redos-len") => {
                self.redos_len = Some(args::parse(p, "--redos-len")?);
            }
            Arg::Long("worker") => {
                self.worker = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-b, --benchmark <name>",
                "Select a benchmark. Can be repeated.",
                r#"
Selects a benchmark to run. This flag may be given multiple times. When it is
not given at all, every benchmark is run.

The benchmarks are:

wholeWordsEndingWithNn: counts matches of \b\w+nn\b in the corpus.

redos: counts matches of ^(a+)+$ in a near miss made of 'a' repeated
--redos-len times followed by '!'. A backtracking engine takes exponential
time here.

manyAlternations: counts matches of an alternation of the first 100 names in
the names list, searched in the corpus.
"#,
            ),
            Usage::new(
                "--forks <number>",
                "The number of processes to measure in (default: 1).",
                r#"
Each benchmark is measured in this many separate processes, one after the
other. The samples of every process are combined into one result. Measuring
in a fresh process keeps one benchmark from affecting the next, e.g., through
the state of the allocator.

When set to 0, every benchmark is measured in this process.
"#,
            ),
            Usage::new(
                "--warmup <number>",
                "The number of warmup iterations (default: 5).",
                r#"
The number of iterations to run before measuring. Their results are thrown
away.
"#,
            ),
            Usage::new(
                "--iterations <number>",
                "The number of measurement iterations (default: 5).",
                r#"
The number of iterations whose throughput is recorded, per process.
"#,
            ),
            Usage::new(
                "--time <duration>",
                "The minimum time of each iteration (default: 1s).",
                r#"
Each iteration runs the benchmark repeatedly until at least this much time has
passed. The duration is a number followed by one of 'ns', 'us', 'ms' or 's'.
A number without a unit is in seconds, e.g., '0.5'.

An iteration always runs the benchmark at least once, no matter how long that
takes. No benchmark is ever interrupted.
"#,
            ),
            Usage::new(
                "--corpus <path>",
                "Search this file instead of the bundled corpus.",
                r#"
Reads the corpus searched by most benchmarks from this file. It must be valid
UTF-8. By default, a short bundled text is used.
"#,
            ),
            Usage::new(
                "--names <path>",
                "Read names from this file instead of the bundled list.",
                r#"
Reads the names list, one name per line, from this file. The first 100 names
form the alternation searched by the manyAlternations benchmark. By default,
a bundled list of 200 first names is used.
"#,
            ),
            Usage::new(
                "--redos-len <number>",
                "The length of the redos benchmark's input (default: 30).",
                r#"
Sets the number of 'a' characters in the near miss searched by the redos
benchmark. Every additional character roughly doubles the time a backtracking
engine needs. At the default length, PCRE2 gives up when it hits its match
limit, which is reported as a failure of that benchmark.
"#,
            ),
        ];
        USAGES
    }
}

/// Parses a duration such as `500ms`, `2s` or `1.5`. A number without a unit
/// is in seconds.
pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let nanos_per_unit: u64 = match unit {
        "ns" => 1,
        "us" => 1_000,
        "ms" => 1_000_000,
        "s" | "" => 1_000_000_000,
        unk => anyhow::bail!("unrecognized duration unit '{}'", unk),
    };
    if let Ok(n) = number.parse::<u64>() {
        let nanos = n
            .checked_mul(nanos_per_unit)
            .with_context(|| format!("duration '{}' is too big", s))?;
        return Ok(Duration::from_nanos(nanos));
    }
    let number: f64 = number
        .parse()
        .with_context(|| format!("invalid duration '{}'", s))?;
    let secs = number * nanos_per_unit as f64 / 1_000_000_000.0;
    anyhow::ensure!(
        secs.is_finite() && secs <= u64::MAX as f64,
        "duration '{}' is too big",
        s,
    );
    Ok(Duration::from_secs_f64(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Duration {
        parse_duration(s).unwrap()
    }

    #[test]
    fn durations() {
        assert_eq!(Duration::from_millis(500), parse("500ms"));
        assert_eq!(Duration::from_secs(2), parse("2s"));
        assert_eq!(Duration::from_secs(3), parse("3"));
        assert_eq!(Duration::from_millis(1500), parse("1.5"));
        assert_eq!(Duration::from_micros(20), parse("20us"));
        assert_eq!(Duration::from_nanos(7), parse("7ns"));
    }

    #[test]
    fn invalid_durations() {
        assert!(parse_duration("5m").is_err());
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("1.2.3s").is_err());
    }
}
