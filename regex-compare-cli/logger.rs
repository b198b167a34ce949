// Logging for regex-compare goes to stderr and is configured by the RUST_LOG
// environment variable, which holds a single level such as 'debug'.
//
// Benchmark workers run in child processes, and their lines would otherwise
// be indistinguishable from the parent's. So every line carries the ID of
// the process that wrote it.

use std::env;

use log::{LevelFilter, Log};

/// Installs the logger at the level given by RUST_LOG. When RUST_LOG is
/// unset or empty, logging is off.
pub fn init() -> anyhow::Result<()> {
    let filter = level(&env::var("RUST_LOG").unwrap_or_default())?;
    log::set_logger(&Logger)?;
    log::set_max_level(filter);
    Ok(())
}

/// Parses a log level, ignoring case.
fn level(name: &str) -> anyhow::Result<LevelFilter> {
    if name.is_empty() {
        return Ok(LevelFilter::Off);
    }
    name.parse().map_err(|_| {
        anyhow::anyhow!(
            "unrecognized log level '{}' in RUST_LOG \
             (expected one of: off, error, warn, info, debug, trace)",
            name,
        )
    })
}

/// A logger that writes every record to stderr. Filtering is left to the
/// `log` crate's global max level.
#[derive(Debug)]
struct Logger;

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let location = match record.line() {
            Some(line) => format!("{}:{}", record.target(), line),
            None => record.target().to_string(),
        };
        eprintln!(
            "{}|{}|{}: {}",
            record.level(),
            std::process::id(),
            location,
            record.args(),
        );
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(LevelFilter::Off, level("").unwrap());
        assert_eq!(LevelFilter::Off, level("off").unwrap());
        assert_eq!(LevelFilter::Debug, level("debug").unwrap());
        assert_eq!(LevelFilter::Trace, level("TRACE").unwrap());
        let err = level("regex_compare=debug").unwrap_err();
        assert!(err.to_string().contains("RUST_LOG"), "{}", err);
    }
}
