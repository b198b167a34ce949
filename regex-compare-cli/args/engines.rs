use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
    regex_compare::Engine,
};

use crate::args::{self, Configurable, Usage};

/// A configuration object for selecting any number of engines.
///
/// Like patterns, engines can either be read only from the `-e/--engine`
/// flag, or from positional arguments as well. When no engine is selected,
/// every engine is used.
#[derive(Debug, Default)]
pub struct Config {
    engines: Vec<Engine>,
    positional: bool,
}

impl Config {
    /// Creates a configuration that also treats every positional argument as
    /// an engine name.
    pub fn positional() -> Config {
        Config { positional: true, ..Config::default() }
    }

    /// Creates a configuration that only reads engines from the
    /// `-e/--engine` flag.
    pub fn only_flags() -> Config {
        Config::default()
    }

    /// Returns the selected engines, in the order given and without
    /// duplicates. If none were selected, then every engine is returned.
    pub fn get(&self) -> Vec<Engine> {
        if self.engines.is_empty() {
            return Engine::ALL.to_vec();
        }
        let mut engines = vec![];
        for &engine in self.engines.iter() {
            if !engines.contains(&engine) {
                engines.push(engine);
            }
        }
        engines
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('e') | Arg::Long("engine") => {
                self.engines.push(args::parse(p, "-e/--engine")?);
            }
            Arg::Value(ref mut v) => {
                if !self.positional {
                    return Ok(false);
                }
                let name = std::mem::take(v)
                    .string()
                    .context("engine names must be valid UTF-8")?;
                self.engines.push(name.parse()?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[Usage::new(
            "-e, --engine <engine>",
            "Select an engine. Can be repeated.",
            r#"
Selects an engine to run. This flag may be given multiple times. When it is
not given at all, every engine is run.

The engines are:

backtrack: PCRE2, a backtracking engine with a JIT. Supports lookaround and
backreferences. Worst case search time is exponential.

linear: the 'regex' crate. Search time is always linear in the haystack.
Lookaround and backreferences are rejected.

lite: the 'regex-lite' crate. Like 'linear', but with a single PikeVM and
none of the optimizations.

hybrid: the 'fancy-regex' crate. Backtracks only through the parts of a
pattern that need lookaround or backreferences, and hands the rest to the
'regex' crate.
"#,
        )];
        USAGES
    }
}
