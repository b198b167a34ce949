/*!
Inputs for the benchmarks.

Fixtures are loaded once, before any measurement begins, and are never
modified afterwards. Every benchmark and every engine reads the same
fixtures.

A small corpus and name list are bundled with this crate so that the
benchmarks can run without any setup. Larger inputs can be loaded from disk
instead, e.g., a complete novel from Project Gutenberg.
*/

use std::{io, path::Path};

/// Finds whole words ending in `nn`.
pub const WHOLE_WORDS_ENDING_WITH_NN: &str = r"\b\w+nn\b";

/// The textbook catastrophic backtracking pattern. Nested quantifiers over
/// the same character give a backtracking engine an exponential number of
/// ways to fail on a near miss.
///
/// See: <https://owasp.org/www-community/attacks/Regular_expression_Denial_of_Service_-_ReDoS>
pub const REDOS: &str = "^(a+)+$";

/// The default number of `a` characters in the near miss for [`REDOS`].
pub const REDOS_LEN: usize = 30;

/// The number of names joined into the alternation benchmark.
pub const ALTERNATION_LEN: usize = 100;

const BUNDLED_CORPUS: &str = include_str!("../data/sample.txt");
const BUNDLED_NAMES: &str = include_str!("../data/first-names.txt");

/// The inputs shared by every benchmark.
#[derive(Clone, Debug)]
pub struct Fixtures {
    corpus: String,
    names: Vec<String>,
    alternation: String,
    redos_input: String,
}

impl Fixtures {
    /// Returns the fixtures bundled with this crate.
    pub fn bundled() -> Fixtures {
        Fixtures::new(BUNDLED_CORPUS.to_string(), parse_names(BUNDLED_NAMES))
    }

    /// Loads fixtures from the given paths. When a path is absent, the
    /// corresponding bundled fixture is used.
    ///
    /// The names file contains one name per line. Both `\n` and `\r\n` line
    /// terminators are accepted.
    pub fn load(
        corpus: Option<&Path>,
        names: Option<&Path>,
    ) -> io::Result<Fixtures> {
        let corpus = match corpus {
            None => BUNDLED_CORPUS.to_string(),
            Some(path) => {
                log::debug!("reading corpus from {}", path.display());
                std::fs::read_to_string(path)?
            }
        };
        let names = match names {
            None => parse_names(BUNDLED_NAMES),
            Some(path) => {
                log::debug!("reading names from {}", path.display());
                parse_names(&std::fs::read_to_string(path)?)
            }
        };
        Ok(Fixtures::new(corpus, names))
    }

    fn new(corpus: String, names: Vec<String>) -> Fixtures {
        let alternation = alternation(&names, ALTERNATION_LEN);
        let redos_input = redos_input(REDOS_LEN);
        log::debug!(
            "loaded fixtures: {} byte corpus, {} names",
            corpus.len(),
            names.len(),
        );
        Fixtures { corpus, names, alternation, redos_input }
    }

    /// Replaces the near miss input for [`REDOS`] with one containing `len`
    /// repetitions of `a`.
    pub fn redos_len(self, len: usize) -> Fixtures {
        Fixtures { redos_input: redos_input(len), ..self }
    }

    /// The plain text corpus searched by most benchmarks.
    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    /// Every name read from the names list.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// An alternation of the first [`ALTERNATION_LEN`] names, e.g.,
    /// `(Aaron|Abigail|...)`.
    pub fn alternation(&self) -> &str {
        &self.alternation
    }

    /// The near miss input for [`REDOS`].
    pub fn redos_input(&self) -> &str {
        &self.redos_input
    }
}

/// Returns `len` repetitions of `a` followed by `!`. This is a near miss for
/// [`REDOS`]: it matches right up until the last character.
pub fn redos_input(len: usize) -> String {
    let mut input = "a".repeat(len);
    input.push('!');
    input
}

/// Joins at most `limit` names into a single capturing alternation. Every
/// name is escaped, so it always matches literally.
pub fn alternation<S: AsRef<str>>(names: &[S], limit: usize) -> String {
    let escaped: Vec<String> = names
        .iter()
        .take(limit)
        .map(|name| regex::escape(name.as_ref()))
        .collect();
    format!("({})", escaped.join("|"))
}

/// Splits a names list into its non-empty lines.
pub fn parse_names(data: &str) -> Vec<String> {
    data.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_accept_crlf() {
        let names = parse_names("Aaron\r\nAbigail\r\n\r\nAdam\r\n");
        assert_eq!(vec!["Aaron", "Abigail", "Adam"], names);
    }

    #[test]
    fn alternation_is_limited() {
        let names = ["a", "b.c", "d"];
        assert_eq!(r"(a|b\.c)", alternation(&names, 2));
        assert_eq!(r"(a|b\.c|d)", alternation(&names, 10));
    }

    #[test]
    fn redos_near_miss() {
        assert_eq!("aaa!", redos_input(3));
    }

    #[test]
    fn bundled() {
        let fixtures = Fixtures::bundled();
        assert!(fixtures.names().len() >= ALTERNATION_LEN);
        assert!(fixtures.alternation().starts_with("(Aaron|Abigail|"));
        assert_eq!(REDOS_LEN + 1, fixtures.redos_input().len());
        assert_eq!("aaaa!", fixtures.redos_len(4).redos_input());
    }
}
