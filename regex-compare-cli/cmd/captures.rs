use std::io::{stdout, Write};

use {bstr::ByteSlice, lexopt::Parser};

use crate::{
    args,
    util::{self, Table},
};

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Prints every match of a pattern in a haystack along with its capture groups.

Each match is printed on its own line as a list of groups. Each group shows
its index, its name if it has one and either its span and the text it
matched, or NONE if it did not participate in the match.

USAGE:
    regex-compare captures <engine> -p <pattern> <haystack-path>
    regex-compare captures <engine> -p <pattern> -y <haystack>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let engine = super::next_engine(USAGE, p)?;
    let mut common = args::common::Config::default();
    let mut patterns = args::patterns::Config::default();
    let mut haystack = args::haystack::Config::default();
    args::configure(
        p,
        USAGE,
        &mut [&mut common, &mut patterns, &mut haystack],
    )?;

    let pattern = patterns.one()?;
    let mut table = Table::empty();
    table.add("engine", engine);
    let (re, time) = util::timeitr(|| engine.compile(&pattern))?;
    table.add("compile time", time);
    table.add("capture groups", re.group_table().len());

    let mut out = stdout();
    haystack.with(|haystack| {
        let (matches, time) = util::timeitr(|| {
            re.captures_iter(haystack).collect::<Result<Vec<_>, _>>()
        })?;
        table.add("search time", time);
        table.add("total matches", matches.len());
        if common.table() {
            table.print(&mut out)?;
        }
        if common.quiet() {
            return Ok(());
        }
        let groups = re.group_table();
        for caps in matches.iter() {
            write!(out, "{{ ")?;
            for (index, m) in caps.iter().enumerate() {
                if index > 0 {
                    write!(out, ", ")?;
                }
                match groups.name(index) {
                    Some(name) => write!(out, "{index}/{name}: ")?,
                    None => write!(out, "{index}: ")?,
                }
                match m {
                    None => write!(out, "NONE")?,
                    Some(m) => {
                        let string = m.as_str().as_bytes().escape_bytes();
                        write!(out, "{}..{}/{}", m.start(), m.end(), string)?;
                    }
                }
            }
            write!(out, " }}\n")?;
        }
        Ok(())
    })
}
