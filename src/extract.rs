/*!
Extraction of labeled numeric ids, e.g., the `123` in `Tax Id: 123`.

The same id can be pulled out of a string in several ways, each leaning on a
different regex feature:

* [`Strategy::Positional`] reads the first numbered capture group.
* [`Strategy::Lookbehind`] asserts the label in a lookbehind, so that the
overall match is the id itself.
* [`Strategy::Named`] reads a capture group named `id`.

All three must agree on every input. [`IdCheck`] runs every strategy that an
engine supports and reports any disagreement as an error with kind
[`ErrorKind::Mismatch`](crate::ErrorKind::Mismatch).

The label is matched case insensitively and must start at a word boundary,
so that searching for `Id` does not find the `Id` in `OtherId`. Between the
label and the id, any mix of colons and spaces is permitted.
*/

use std::fmt;

use crate::{
    engine::{Captures, Engine, Match, Matcher},
    error::{Error, ErrorKind},
};

/// The label searched for by default.
pub const LABEL: &str = "Id";

/// The maximum number of separator characters between a label and its id
/// that the lookbehind strategy accepts.
pub const MAX_GAP: usize = 10;

/// Finds every `<label> Id: <id>` pair, where the label is a single word.
pub const SCAN: &str = r"(?i)(?<type>\w+ *Id)[: ]*?(?<id>\d+)";

/// Inputs covering the ways an id can follow its label, and some near
/// misses.
pub const SAMPLES: &[&str] = &[
    "Id: 123",
    "Id: 1",
    "Id: .",
    "Id: unknown",
    "Id  123",
    "ID: 123",
    "Id:123",
    "OtherId: 123",
];

/// A short document with three labeled ids, for use with [`SCAN`].
pub const DOCUMENT: &str = "\
Some text. Tax Id: 123. Some text.
Some text, Court Id: 456, Stats Id: 789.
";

/// A way of extracting an id from the match of a pattern.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Strategy {
    /// `(?i)\bId[: ]*?(\d+)`, reading group 1.
    Positional,
    /// `\d+` preceded by `\bId` and at most [`MAX_GAP`] separators, reading
    /// the overall match.
    Lookbehind,
    /// `(?i)\bId[: ]*?(?<id>\d+)`, reading the group named `id`.
    Named,
}

impl Strategy {
    /// Every strategy.
    pub const ALL: [Strategy; 3] =
        [Strategy::Positional, Strategy::Lookbehind, Strategy::Named];

    /// Returns the name of this strategy.
    pub fn name(&self) -> &'static str {
        match *self {
            Strategy::Positional => "positional",
            Strategy::Lookbehind => "lookbehind",
            Strategy::Named => "named",
        }
    }

    /// Returns the pattern this strategy uses to find an id following the
    /// given label.
    pub fn pattern(&self, label: &str) -> String {
        let label = regex::escape(label);
        match *self {
            Strategy::Positional => format!(r"(?i)\b{label}[: ]*?(\d+)"),
            Strategy::Named => format!(r"(?i)\b{label}[: ]*?(?<id>\d+)"),
            Strategy::Lookbehind => lookbehind(&label, MAX_GAP),
        }
    }

    /// Reads the id out of a match of this strategy's pattern.
    fn read<'h>(&self, caps: &Captures<'h>) -> Option<Match<'h>> {
        match *self {
            Strategy::Positional => caps.get(1),
            Strategy::Lookbehind => Some(caps.get_match()),
            Strategy::Named => caps.name("id"),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Builds the lookbehind pattern for an already escaped label.
///
/// Both backtracking engines only accept lookbehinds of a fixed length, so
/// the bounded gap `[: ]{0,max_gap}` is unrolled into one lookbehind per gap
/// length.
fn lookbehind(label: &str, max_gap: usize) -> String {
    let alternates: Vec<String> = (0..=max_gap)
        .map(|gap| match gap {
            0 => format!(r"(?<=\b{label})"),
            1 => format!(r"(?<=\b{label}[: ])"),
            n => format!(r"(?<=\b{label}[: ]{{{n}}})"),
        })
        .collect();
    format!(r"(?i)(?:{})\d+", alternates.join("|"))
}

/// A compiled strategy for one engine.
#[derive(Debug)]
pub struct Extractor {
    strategy: Strategy,
    matcher: Box<dyn Matcher>,
}

impl Extractor {
    /// Compiles the given strategy for the given label with the given engine.
    pub fn new(
        engine: Engine,
        strategy: Strategy,
        label: &str,
    ) -> Result<Extractor, Error> {
        let matcher = engine.compile(&strategy.pattern(label))?;
        Ok(Extractor { strategy, matcher })
    }

    /// Returns the strategy used by this extractor.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the compiled pattern used by this extractor.
    pub fn matcher(&self) -> &dyn Matcher {
        &*self.matcher
    }

    /// Returns the first id in the input, or `None` if there isn't one.
    pub fn extract<'h>(
        &'h self,
        input: &'h str,
    ) -> Result<Option<Match<'h>>, Error> {
        let caps = match self.matcher.captures(input)? {
            None => return Ok(None),
            Some(caps) => caps,
        };
        Ok(self.strategy.read(&caps))
    }
}

/// Runs every extraction strategy an engine supports and checks that they
/// agree.
#[derive(Debug)]
pub struct IdCheck {
    engine: Engine,
    extractors: Vec<Extractor>,
    unsupported: Vec<Error>,
}

impl IdCheck {
    /// Compiles every strategy for the given label with the given engine.
    ///
    /// A strategy whose pattern the engine rejects as unsupported syntax is
    /// skipped and recorded in [`IdCheck::unsupported`]. The linear time
    /// engines, for example, reject lookbehind. Any other error is returned.
    pub fn new(engine: Engine, label: &str) -> Result<IdCheck, Error> {
        let mut extractors = vec![];
        let mut unsupported = vec![];
        for strategy in Strategy::ALL {
            match Extractor::new(engine, strategy, label) {
                Ok(extractor) => extractors.push(extractor),
                Err(err) if err.kind() == ErrorKind::Syntax => {
                    log::debug!(
                        "{} strategy is unsupported by the {} engine: {}",
                        strategy,
                        engine,
                        err.message(),
                    );
                    unsupported.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(IdCheck { engine, extractors, unsupported })
    }

    /// Returns the engine used by this check.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Returns the strategies this check runs.
    pub fn strategies(&self) -> impl Iterator<Item = Strategy> + '_ {
        self.extractors.iter().map(|e| e.strategy())
    }

    /// Returns the compile errors of every strategy this engine does not
    /// support.
    pub fn unsupported(&self) -> &[Error] {
        &self.unsupported
    }

    /// Extracts the id from the input with every supported strategy.
    ///
    /// If all strategies agree, then their common result is returned. The
    /// spans must agree too, not just the substrings. Otherwise, an error
    /// with kind [`ErrorKind::Mismatch`] names the input and the two
    /// disagreeing results.
    pub fn check<'h>(
        &'h self,
        input: &'h str,
    ) -> Result<Option<Match<'h>>, Error> {
        let mut first: Option<(Strategy, Option<Match<'h>>)> = None;
        for extractor in self.extractors.iter() {
            let got = extractor.extract(input)?;
            log::trace!(
                "{}/{} extracted {:?} from {:?}",
                self.engine,
                extractor.strategy(),
                got,
                input,
            );
            let (expected_strategy, expected) = match first {
                None => {
                    first = Some((extractor.strategy(), got));
                    continue;
                }
                Some(first) => first,
            };
            if expected != got {
                let msg = format!(
                    "on input {:?}, {} strategy found {} \
                     but {} strategy found {}",
                    input,
                    expected_strategy,
                    describe(expected),
                    extractor.strategy(),
                    describe(got),
                );
                return Err(Error::mismatch(
                    self.engine,
                    extractor.matcher().pattern(),
                    msg,
                ));
            }
        }
        Ok(first.and_then(|(_, m)| m))
    }
}

fn describe(m: Option<Match<'_>>) -> String {
    match m {
        None => "nothing".to_string(),
        Some(m) => format!("{:?} at {}..{}", m.as_str(), m.start(), m.end()),
    }
}

/// A labeled id found by scanning a document, e.g., `("Tax Id", "123")`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdEntry {
    /// The label, including its trailing `Id`.
    pub label: String,
    /// The id itself.
    pub id: String,
}

impl IdEntry {
    fn new(label: Match<'_>, id: Match<'_>) -> IdEntry {
        IdEntry {
            label: label.as_str().to_string(),
            id: id.as_str().to_string(),
        }
    }
}

/// Returns every labeled id in the document, in the order they appear, by
/// reading groups 1 and 2 of [`SCAN`].
pub fn scan_by_index(
    matcher: &dyn Matcher,
    text: &str,
) -> Result<Vec<IdEntry>, Error> {
    let mut entries = vec![];
    for result in matcher.captures_iter(text) {
        let caps = result?;
        if let (Some(label), Some(id)) = (caps.get(1), caps.get(2)) {
            entries.push(IdEntry::new(label, id));
        }
    }
    Ok(entries)
}

/// Returns every labeled id in the document, in the order they appear, by
/// reading the groups named `type` and `id` of [`SCAN`].
pub fn scan_by_name(
    matcher: &dyn Matcher,
    text: &str,
) -> Result<Vec<IdEntry>, Error> {
    let mut entries = vec![];
    for result in matcher.captures_iter(text) {
        let caps = result?;
        let (label, id) = (caps.name("type"), caps.name("id"));
        if let (Some(label), Some(id)) = (label, id) {
            entries.push(IdEntry::new(label, id));
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookbehind_is_unrolled() {
        let pat = Strategy::Lookbehind.pattern("Id");
        assert!(pat.starts_with(r"(?i)(?:(?<=\bId)|(?<=\bId[: ])|"));
        assert!(pat.ends_with(r"|(?<=\bId[: ]{10}))\d+"));
        assert_eq!(MAX_GAP + 1, pat.matches("(?<=").count());
    }

    #[test]
    fn disagreement_is_an_error() {
        let engine = Engine::Linear;
        let extractor = |strategy: Strategy, pattern: &str| Extractor {
            strategy,
            matcher: engine.compile(pattern).unwrap(),
        };
        let check = IdCheck {
            engine,
            extractors: vec![
                extractor(Strategy::Positional, r"(\d+)"),
                extractor(Strategy::Named, r"(?<id>\d)"),
            ],
            unsupported: vec![],
        };
        let id = check.check("Id 7").unwrap().map(|m| m.as_str());
        assert_eq!(Some("7"), id);
        let err = check.check("Id 123").unwrap_err();
        assert_eq!(ErrorKind::Mismatch, err.kind());
        assert_eq!(r"(?<id>\d)", err.pattern());
        assert_eq!(
            "linear engine strategies disagree: on input \"Id 123\", \
             positional strategy found \"123\" at 3..6 \
             but named strategy found \"1\" at 3..4",
            err.to_string(),
        );
    }

    #[test]
    fn labels_are_escaped() {
        let pat = Strategy::Positional.pattern("a.b");
        assert_eq!(r"(?i)\ba\.b[: ]*?(\d+)", pat);
    }
}
