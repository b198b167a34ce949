use std::path::PathBuf;

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
};

use crate::args::{Configurable, Usage};

/// A configuration object for reading a pattern from the command line.
///
/// Patterns are only read from flags, i.e., `-p/--pattern` and
/// `-f/--pattern-file`, since every command that takes a pattern also takes
/// other positional arguments.
#[derive(Debug, Default)]
pub struct Config {
    patterns: Vec<String>,
    fixed_strings: bool,
    combine: bool,
}

impl Config {
    /// Returns all of the pattern strings from this configuration, escaping
    /// and joining them if requested. When joining is requested, then at most
    /// one pattern is returned.
    ///
    /// Note that it is legal for this to return zero patterns!
    pub fn get(&self) -> anyhow::Result<Vec<String>> {
        let mut pats = self.patterns.clone();
        if self.fixed_strings {
            pats = pats.iter().map(|p| regex_syntax::escape(p)).collect();
        }
        if self.combine {
            // This can turn two invalid patterns into one valid one, e.g.,
            // 'ab(cd' and 'ef)gh'. Each engine still validates the result.
            pats = vec![pats.join("|")];
        }
        Ok(pats)
    }

    /// Returns the single pattern in this configuration. If there isn't
    /// exactly one, then an error is returned.
    ///
    /// None of the engines compared by this tool support searching for more
    /// than one pattern at a time. Use --combine-patterns to join several
    /// patterns into one.
    pub fn one(&self) -> anyhow::Result<String> {
        let mut pats = self.get()?;
        anyhow::ensure!(
            pats.len() == 1,
            "exactly one pattern is required, but {} were given \
             (use --combine-patterns to join them)",
            pats.len(),
        );
        // OK because we just checked that there is exactly one.
        Ok(pats.pop().unwrap())
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('p') | Arg::Long("pattern") => {
                let pat = p.value().context("-p/--pattern needs a value")?;
                let pat = pat
                    .string()
                    .context("-p/--pattern must be valid UTF-8")?;
                self.patterns.push(pat);
            }
            Arg::Short('F') | Arg::Long("fixed-strings") => {
                self.fixed_strings = true;
            }
            Arg::Short('f') | Arg::Long("pattern-file") => {
                let path =
                    PathBuf::from(p.value().context("-f/--pattern-file")?);
                let contents =
                    std::fs::read_to_string(&path).with_context(|| {
                        anyhow::anyhow!("failed to read {}", path.display())
                    })?;
                self.patterns.extend(contents.lines().map(|x| x.to_string()));
            }
            Arg::Long("combine-patterns") => {
                self.combine = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-p, --pattern <pattern>",
                "Add a pattern to this command.",
                r#"
This adds a new pattern to the command.

Every engine compared by this tool searches for exactly one pattern. If more
than one pattern is given, whether by this flag or by the -f/--pattern-file
flag, then --combine-patterns is required.

All patterns given must be valid UTF-8.
"#,
            ),
            Usage::new(
                "-f, --pattern-file",
                "Read patterns from the file given.",
                r#"
Reads patterns, one per line, from the file given.

All patterns given must be valid UTF-8.
"#,
            ),
            Usage::new(
                "-F, --fixed-strings",
                "Interpret all patterns literally.",
                r#"
When set, all patterns are interpreted as literal strings. So for example,
special regex meta characters like '+' are matched literally instead of being
given special significance.
"#,
            ),
            Usage::new(
                "--combine-patterns",
                "Combine all patterns into one via an alternation.",
                r#"
This flag combines all patterns given in this command into one by joining
them together via a '|'. For example, a file of names given to
-f/--pattern-file becomes one big alternation of those names, which is a
classic workload where backtracking engines fall behind automata based ones.
"#,
            ),
        ];
        USAGES
    }
}
