use std::io::{stdout, Write};

use lexopt::Parser;

use crate::{
    args,
    util::{self, Table},
};

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints the capture groups of a pattern as compiled by one engine.

The named groups are printed as a map from name to index, ordered by name,
e.g., '{id=2, type=1}'. With --verbose, every group is listed afterwards in
the order it is declared, including unnamed groups.

USAGE:
    regex-compare groups <engine> -p <pattern>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let engine = super::next_engine(USAGE, p)?;
    let mut common = args::common::Config::default();
    let mut patterns = args::patterns::Config::default();
    args::configure(p, USAGE, &mut [&mut common, &mut patterns])?;

    let pattern = patterns.one()?;
    let mut table = Table::empty();
    table.add("engine", engine);
    let (re, time) = util::timeitr(|| engine.compile(&pattern))?;
    table.add("compile time", time);
    let groups = re.group_table();
    table.add("capture groups", groups.len());
    table.add("named groups", groups.named_len());

    let mut out = stdout();
    if common.table() {
        table.print(&mut out)?;
    }
    if !common.quiet() {
        writeln!(out, "{}", groups)?;
    }
    if common.verbose() {
        for (index, name) in groups.slots().enumerate().skip(1) {
            match name {
                Some(name) => writeln!(out, "{index}/{name}")?,
                None => writeln!(out, "{index}")?,
            }
        }
    }
    Ok(())
}
