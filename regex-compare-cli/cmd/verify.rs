use std::{
    io::{stdout, Write},
    path::PathBuf,
};

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
    regex_compare::extract::{self, IdCheck, Strategy},
};

use crate::{
    args::{self, Configurable, Usage},
    util::Grid,
};

pub fn run(p: &mut Parser) -> anyhow::Result<()> {
    const USAGE: &'static str = "\
Checks that several ways of extracting a labeled id agree with one another.

An id such as the '123' in 'Tax Id: 123' can be extracted by reading a
numbered capture group, by asserting the label in a lookbehind or by reading
a named capture group. For every engine given (or every engine, if none are
given), each of these strategies the engine supports is run on every input,
and they must all extract the same id at the same position.

Afterwards, a document is scanned for every labeled id by reading its capture
groups once by index and once by name. Both scans must agree.

The first disagreement is reported as an error.

USAGE:
    regex-compare verify [<engine> ...]
    regex-compare verify [<engine> ...] -y <input> ...

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = args::common::Config::default();
    let mut engines = args::engines::Config::positional();
    let mut verify = Config::default();
    args::configure(p, USAGE, &mut [&mut common, &mut engines, &mut verify])?;

    let inputs = verify.inputs();
    let document = verify.document()?;
    let mut ids = Grid::new(&["engine", "strategies", "input", "id"]);
    let mut scans = Grid::new(&["engine", "label", "id", "span"]);
    for engine in engines.get() {
        let check = IdCheck::new(engine, &verify.label)?;
        let strategies: Vec<&str> =
            check.strategies().map(|s| s.name()).collect();
        for strategy in Strategy::ALL {
            if !check.strategies().any(|s| s == strategy) {
                log::info!(
                    "{} engine does not support the {} strategy",
                    engine,
                    strategy,
                );
            }
        }
        for input in inputs.iter() {
            let id = check.check(input)?;
            ids.add(vec![
                engine.to_string(),
                strategies.join(","),
                format!("{:?}", input),
                id.map_or("-".to_string(), |m| m.as_str().to_string()),
            ]);
        }

        let re = engine.compile(extract::SCAN)?;
        let by_index = extract::scan_by_index(&*re, &document)?;
        let by_name = extract::scan_by_name(&*re, &document)?;
        anyhow::ensure!(
            by_index == by_name,
            "{} engine: scanning by index found {:?} but scanning by name \
             found {:?}",
            engine,
            by_index,
            by_name,
        );
        let again = engine.compile(extract::SCAN)?;
        anyhow::ensure!(
            re.group_table() == again.group_table(),
            "{} engine: group table changed between compilations: {} != {}",
            engine,
            re.group_table(),
            again.group_table(),
        );
        for result in re.captures_iter(&document) {
            let caps = result?;
            let (label, id) = match (caps.name("type"), caps.name("id")) {
                (Some(label), Some(id)) => (label, id),
                _ => continue,
            };
            scans.add(vec![
                engine.to_string(),
                label.as_str().to_string(),
                id.as_str().to_string(),
                format!("{}..{}", label.start(), id.end()),
            ]);
        }
        log::debug!("{} engine scan groups: {}", engine, re.group_table());
    }

    let mut out = stdout();
    if !common.quiet() {
        ids.print(&mut out)?;
        writeln!(out, "")?;
        scans.print(&mut out)?;
        writeln!(out, "")?;
    }
    writeln!(
        out,
        "all strategies agree on {} inputs with {} engines",
        inputs.len(),
        engines.get().len(),
    )?;
    Ok(())
}

#[derive(Debug)]
struct Config {
    label: String,
    inputs: Vec<String>,
    document: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            label: extract::LABEL.to_string(),
            inputs: vec![],
            document: None,
        }
    }
}

impl Config {
    fn inputs(&self) -> Vec<String> {
        if !self.inputs.is_empty() {
            return self.inputs.clone();
        }
        extract::SAMPLES.iter().map(|s| s.to_string()).collect()
    }

    fn document(&self) -> anyhow::Result<String> {
        let path = match self.document {
            None => return Ok(extract::DOCUMENT.to_string()),
            Some(ref path) => path,
        };
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('y') | Arg::Long("input") => {
                let input = p.value().context("-y/--input needs a value")?;
                let input =
                    input.string().context("-y/--input must be valid UTF-8")?;
                self.inputs.push(input);
            }
            Arg::Long("label") => {
                let label = p.value().context("--label needs a value")?;
                self.label =
                    label.string().context("--label must be valid UTF-8")?;
            }
            Arg::Long("document") => {
                self.document = Some(PathBuf::from(
                    p.value().context("--document needs a value")?,
                ));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[
            Usage::new(
                "-y, --input <input>",
                "Extract an id from this input. Can be repeated.",
                r#"
Adds an input to extract an id from. This flag may be given multiple times.
When it is not given at all, a built in set of inputs is used, e.g.,
'Id: 123', 'ID: 123', 'Id: unknown' and 'OtherId: 123'.
"#,
            ),
            Usage::new(
                "--label <label>",
                "The label that precedes an id (default: Id).",
                r#"
Sets the label that must precede an id. It is matched literally and case
insensitively, and must begin at a word boundary. Any number of colons and
spaces may separate it from the id.
"#,
            ),
            Usage::new(
                "--document <path>",
                "Scan this file for labeled ids.",
                r#"
Reads the document scanned for labeled ids from this file. By default, a short
built in document with three labeled ids is used.
"#,
            ),
        ];
        USAGES
    }
}
