use std::{
    io::{stdout, Write},
    path::Path,
    process::Command,
    time::Duration,
};

use {
    anyhow::Context,
    bstr::ByteSlice,
    lexopt::Parser,
    regex_compare::{
        bench::{Benchmark, Measurement, Sample, Summary},
        fixture, Engine,
    },
};

use crate::{args, util::Grid};

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Measures the throughput of regex engines on a suite of benchmarks.

Every benchmark compiles a pattern and counts its matches in a haystack, over
and over. Each selected benchmark is measured with each selected engine: first
for some warmup iterations whose results are discarded, then for some
measurement iterations. Each iteration lasts at least --time. By default, each
measurement happens in a fresh process.

The results are printed as a table with one row per benchmark and engine. The
score is the mean throughput in operations per second and the error is half
the width of its 99.9% confidence interval. A benchmark that fails, e.g.,
because an engine rejects its pattern or gives up on a search, is reported
after the table. The remaining benchmarks still run.

No benchmark is ever interrupted. A backtracking engine given a long enough
redos input will run for a very long time.

USAGE:
    regex-compare bench [-e <engine> ...] [-b <benchmark> ...]

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut engines = args::engines::Config::only_flags();
    let mut bench = args::bench::Config::default();
    args::configure(p, USAGE, &mut [&mut engines, &mut bench])?;

    if bench.worker {
        return run_worker(&engines, &bench);
    }
    let fixtures = bench.fixtures()?;
    let benchmarks = bench.select(&fixtures)?;
    let engines = engines.get();
    let driver = bench.driver();

    let mut grid =
        Grid::new(&["Benchmark", "Mode", "Cnt", "Score", "Error", "Units"]);
    let mut failures = vec![];
    for b in benchmarks.iter() {
        for &engine in engines.iter() {
            let label = format!("{}:{}", b.name(), engine);
            let result = if bench.forks == 0 {
                b.measure(engine, &driver).map_err(anyhow::Error::from)
            } else {
                fork(&bench, b, engine)
            };
            match result {
                Ok(m) => {
                    log::info!("{}: {} matches", label, m.count);
                    let summary = Summary::new(&m.samples);
                    grid.add(vec![
                        label,
                        "thrpt".to_string(),
                        summary.len.to_string(),
                        format!("{:.3}", summary.mean),
                        format!("± {:.3}", summary.error),
                        "ops/s".to_string(),
                    ]);
                }
                Err(err) => {
                    log::warn!("{} failed", label);
                    grid.add(vec![
                        label.clone(),
                        "thrpt".to_string(),
                        "0".to_string(),
                        "FAILED".to_string(),
                        "".to_string(),
                        "ops/s".to_string(),
                    ]);
                    failures.push((label, err));
                }
            }
        }
    }

    let mut out = stdout();
    grid.print(&mut out)?;
    if !failures.is_empty() {
        writeln!(out, "\nFAILURES:")?;
        for (label, err) in failures.iter() {
            writeln!(out, "    {}: {:#}", label, err)?;
        }
        if let Some(note) = failure_note(&bench, &failures) {
            writeln!(out, "\n{}", note)?;
        }
    }
    Ok(())
}

/// Measures one benchmark with one engine in this process and writes the
/// result to stdout for the parent process to read.
fn run_worker(
    engines: &args::engines::Config,
    bench: &args::bench::Config,
) -> anyhow::Result<()> {
    let engines = engines.get();
    anyhow::ensure!(
        engines.len() == 1 && bench.benchmarks.len() == 1,
        "a worker runs exactly one benchmark with exactly one engine",
    );
    let fixtures = bench.fixtures()?;
    let benchmarks = bench.select(&fixtures)?;
    let m = benchmarks[0].measure(engines[0], &bench.driver())?;

    let mut out = stdout().lock();
    writeln!(out, "count {}", m.count)?;
    for s in m.samples.iter() {
        writeln!(out, "sample {} {}", s.ops, s.elapsed.as_nanos())?;
    }
    out.flush()?;
    Ok(())
}

/// Measures one benchmark with one engine in each of the configured number
/// of child processes, one after the other, and combines their samples.
fn fork(
    bench: &args::bench::Config,
    benchmark: &Benchmark<'_>,
    engine: Engine,
) -> anyhow::Result<Measurement> {
    let exe = std::env::current_exe()
        .context("failed to find the path of this executable")?;
    let mut combined: Option<Measurement> = None;
    for i in 0..bench.forks {
        log::info!(
            "fork {} of {}: measuring {} with the {} engine",
            i + 1,
            bench.forks,
            benchmark.name(),
            engine,
        );
        let out = worker_command(&exe, bench, benchmark, engine)
            .output()
            .with_context(|| format!("failed to run {}", exe.display()))?;
        if !out.status.success() {
            anyhow::bail!("{}", out.stderr.trim().as_bstr());
        }
        let stdout = out
            .stdout
            .to_str()
            .context("worker wrote invalid UTF-8 to stdout")?;
        let m = parse_worker_output(stdout)?;
        combined = Some(match combined {
            None => m,
            Some(mut all) => {
                anyhow::ensure!(
                    all.count == m.count,
                    "match count changed between forks: {} != {}",
                    all.count,
                    m.count,
                );
                all.samples.extend(m.samples);
                all
            }
        });
    }
    combined.context("at least one fork is required")
}

/// Builds the command that runs one benchmark with one engine in a child
/// process.
///
/// The child never logs. Its stderr is only read when it fails, and then it
/// should hold nothing but the error.
fn worker_command(
    exe: &Path,
    bench: &args::bench::Config,
    benchmark: &Benchmark<'_>,
    engine: Engine,
) -> Command {
    let mut cmd = Command::new(exe);
    cmd.arg("bench")
        .arg("-e")
        .arg(engine.name())
        .arg("-b")
        .arg(benchmark.name())
        .args(bench.worker_args())
        .env_remove("RUST_LOG");
    cmd
}

/// Returns a hint for the failures that are expected with the given
/// configuration, if any.
///
/// PCRE2 gives up on the redos benchmark at its default input length by
/// hitting its match limit.
fn failure_note(
    bench: &args::bench::Config,
    failed: &[(String, anyhow::Error)],
) -> Option<String> {
    let redos = failed.iter().any(|(label, _)| label.starts_with("redos:"));
    if !redos || bench.redos_len.is_some() {
        return None;
    }
    Some(format!(
        "note: backtracking engines are expected to give up on the redos \
         benchmark when its input has {} characters before the near miss. \
         Use --redos-len 20 to measure them.",
        fixture::REDOS_LEN,
    ))
}

/// Parses the output of a worker: one `count <matches>` line followed by
/// one `sample <ops> <nanoseconds>` line per measurement iteration.
fn parse_worker_output(output: &str) -> anyhow::Result<Measurement> {
    let mut count = None;
    let mut samples = vec![];
    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields[..] {
            ["count", n] => {
                count = Some(n.parse().context("invalid match count")?);
            }
            ["sample", ops, nanos] => {
                let ops = ops.parse().context("invalid operation count")?;
                let nanos = nanos.parse().context("invalid duration")?;
                let elapsed = Duration::from_nanos(nanos);
                samples.push(Sample { ops, elapsed });
            }
            _ => anyhow::bail!("unrecognized worker output: {:?}", line),
        }
    }
    let count = count.context("worker did not report a match count")?;
    Ok(Measurement { count, samples })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_output() {
        let m = parse_worker_output("count 55\nsample 10 1000\nsample 7 9\n")
            .unwrap();
        assert_eq!(55, m.count);
        assert_eq!(
            vec![
                Sample { ops: 10, elapsed: Duration::from_nanos(1000) },
                Sample { ops: 7, elapsed: Duration::from_nanos(9) },
            ],
            m.samples,
        );
        assert!(parse_worker_output("sample 1 1\n").is_err());
        assert!(parse_worker_output("count 1\nbogus\n").is_err());
    }

    #[test]
    fn worker_never_logs() {
        let bench = args::bench::Config::default();
        let fixtures = regex_compare::Fixtures::bundled();
        let b = regex_compare::bench::find(&fixtures, "redos").unwrap();
        let cmd = worker_command(
            Path::new("regex-compare"),
            &bench,
            &b,
            Engine::Linear,
        );
        let envs: Vec<_> = cmd.get_envs().collect();
        assert_eq!(vec![(std::ffi::OsStr::new("RUST_LOG"), None)], envs);
        let args: Vec<_> = cmd.get_args().take(5).collect();
        assert_eq!(vec!["bench", "-e", "linear", "-b", "redos"], args);
    }

    #[test]
    fn redos_failure_is_explained() {
        let failed = |label: &str| {
            vec![(label.to_string(), anyhow::anyhow!("match limit exceeded"))]
        };
        let mut bench = args::bench::Config::default();
        let note = failure_note(&bench, &failed("redos:backtrack")).unwrap();
        assert!(note.contains("--redos-len"), "{}", note);
        let other = failed("manyAlternations:lite");
        assert_eq!(None, failure_note(&bench, &other));
        bench.redos_len = Some(30);
        assert_eq!(None, failure_note(&bench, &failed("redos:backtrack")));
    }
}
