use lexopt::{Arg, Parser};

use crate::args::{Configurable, Usage};

/// How much a command prints besides its table of timings.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Detail {
    /// Only the table.
    Quiet,
    /// The command's result.
    #[default]
    Normal,
    /// The command's result and everything it knows about it.
    Verbose,
}

/// Flags that control how much a command prints. The last of -q/--quiet
/// and --verbose wins.
#[derive(Debug, Default)]
pub struct Config {
    detail: Detail,
    no_table: bool,
}

impl Config {
    /// Whether to print the table of timings and sizes.
    pub fn table(&self) -> bool {
        !self.no_table
    }

    /// Whether to omit the command's result.
    pub fn quiet(&self) -> bool {
        self.detail == Detail::Quiet
    }

    /// Whether to add detail beyond the command's result.
    pub fn verbose(&self) -> bool {
        self.detail == Detail::Verbose
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('q') | Arg::Long("quiet") => {
                self.detail = Detail::Quiet;
            }
            Arg::Long("verbose") => {
                self.detail = Detail::Verbose;
            }
            Arg::Long("no-table") => {
                self.no_table = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-q, --quiet",
                "Print only the table.",
                r#"
Omit the result of the command: the count for 'count', the matches for
'captures', the group map for 'groups' and the per-input grids for 'verify'.
The table of timings is still printed unless --no-table is given.
"#,
            ),
            Usage::new(
                "--verbose",
                "List every capture group.",
                r#"
Currently only 'groups' prints more with this flag. It lists every group,
named or not, in the order the pattern declares them.
"#,
            ),
            Usage::new(
                "--no-table",
                "Omit the table of timings.",
                r#"
Most commands print a table with the engine, how long compiling the pattern
took and how long searching took. This flag suppresses that table.
"#,
            ),
        ];
        USAGES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut p = Parser::from_args(args.iter().copied());
        let mut config = Config::default();
        while let Some(arg) = p.next().unwrap() {
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
            assert!(config.configure(&mut p, &mut arg).unwrap());
        }
        config
    }

    #[test]
    fn last_detail_flag_wins() {
        let c = parse(&[]);
        assert!(!c.quiet() && !c.verbose() && c.table());
        let c = parse(&["-q", "--verbose"]);
        assert!(!c.quiet() && c.verbose());
        let c = parse(&["--verbose", "--quiet", "--no-table"]);
        assert!(c.quiet() && !c.verbose() && !c.table());
    }
}
