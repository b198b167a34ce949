mod bench;
mod captures;
mod count;
mod groups;
mod verify;

const USAGE: &'static str = "\
A tool for comparing a backtracking regex engine with linear time ones.

USAGE:
    regex-compare <command> ...

COMMANDS:
    bench     Measure the throughput of every engine on a benchmark suite.
    captures  Print every match and its capture groups.
    count     Count the matches of a pattern in a haystack.
    groups    Print the capture groups of a pattern.
    verify    Check that several ways of extracting an id agree.

ENGINES:
    backtrack  PCRE2, a backtracking engine.
    hybrid     fancy-regex, a backtracking VM on top of regex.
    linear     regex, a linear time engine.
    lite       regex-lite, a small linear time engine.
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "bench" => bench::run(p),
        "captures" => captures::run(p),
        "count" => count::run(p),
        "groups" => groups::run(p),
        "verify" => verify::run(p),
        unk => anyhow::bail!("unrecognized command '{unk}'"),
    }
}

/// Parses the next argument as the name of the engine a command runs with.
fn next_engine(
    usage: &str,
    p: &mut lexopt::Parser,
) -> anyhow::Result<regex_compare::Engine> {
    let name = crate::args::next_as_command(usage, p)?;
    Ok(name.parse()?)
}
