use std::io::{stdout, Write};

use lexopt::{Arg, Parser};

use crate::{
    args::{self, Configurable, Usage},
    util::{self, Table},
};

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Counts the matches of a pattern in a haystack with one engine.

The pattern is compiled once and then searched. Both steps are timed, which
makes this a quick way to try out one benchmark input. For the real thing,
use 'regex-compare bench'.

USAGE:
    regex-compare count <engine> -p <pattern> <haystack-path>
    regex-compare count <engine> -p <pattern> -y <haystack>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let engine = super::next_engine(USAGE, p)?;
    let mut common = args::common::Config::default();
    let mut patterns = args::patterns::Config::default();
    let mut haystack = args::haystack::Config::default();
    let mut count = Config::default();
    args::configure(
        p,
        USAGE,
        &mut [&mut common, &mut patterns, &mut haystack, &mut count],
    )?;

    let pattern = patterns.one()?;
    let mut table = Table::empty();
    table.add("engine", engine);
    let (re, time) = util::timeitr(|| engine.compile(&pattern))?;
    table.add("compile time", time);

    let mut out = stdout();
    haystack.with(|haystack| {
        let (total, time) = util::timeitr(|| {
            let mut total = 0;
            for _ in 0..count.repeat() {
                total = re.count(haystack)?;
            }
            Ok::<_, anyhow::Error>(total)
        })?;
        table.add("search time", time);
        table.add("haystack length", haystack.len());
        if common.table() {
            table.print(&mut out)?;
        }
        if !common.quiet() {
            writeln!(out, "{}", total)?;
        }
        Ok(())
    })
}

#[derive(Debug, Default)]
struct Config {
    repeat: Option<u32>,
}

impl Config {
    fn repeat(&self) -> u32 {
        self.repeat.unwrap_or(1)
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Long("repeat") => {
                let repeat = args::parse(p, "--repeat")?;
                anyhow::ensure!(repeat > 0, "--repeat must be at least 1");
                self.repeat = Some(repeat);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &[Usage] = &[Usage::new(
            "--repeat",
            "Repeat the search this many times.",
            r#"
Repeat the search this many times. By default, this is set to 1, which is also
the smallest value permitted. This is useful
when you want the search time to dominate the runtime of the program, or if the
search is otherwise too short/fast to measure reliably. The count printed is
the count of a single search.
"#,
        )];
        USAGES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Config> {
        let mut p = Parser::from_args(args.iter().copied());
        let mut config = Config::default();
        while let Some(arg) = p.next()? {
            // The lifetime of 'arg' is tied to 'p', so give long flag names a
            // home of their own (same as 'args::configure').
            let long_flag: Option<String> = match arg {
                Arg::Long(name) => Some(name.to_string()),
                _ => None,
            };
            let mut arg = match long_flag {
                Some(ref flag) => Arg::Long(flag),
                None => match arg {
                    Arg::Short(c) => Arg::Short(c),
                    Arg::Long(_) => unreachable!(),
                    Arg::Value(value) => Arg::Value(value),
                },
            };
            anyhow::ensure!(config.configure(&mut p, &mut arg)?, "{:?}", arg);
        }
        Ok(config)
    }

    #[test]
    fn repeat() {
        assert_eq!(1, parse(&[]).unwrap().repeat());
        assert_eq!(3, parse(&["--repeat", "3"]).unwrap().repeat());
        let err = parse(&["--repeat", "0"]).unwrap_err();
        assert_eq!("--repeat must be at least 1", err.to_string());
    }
}
