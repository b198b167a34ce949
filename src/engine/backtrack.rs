use std::sync::Arc;

use pcre2::bytes::{CaptureLocations, Regex, RegexBuilder};

use crate::{
    engine::{Captures, CapturesIter, Engine, Matcher},
    error::Error,
    groups::GroupTable,
};

/// A matcher backed by PCRE2.
pub(crate) struct Backtrack {
    re: Regex,
    pattern: String,
    groups: Arc<GroupTable>,
}

impl Backtrack {
    pub(crate) fn new(pattern: &str) -> Result<Backtrack, Error> {
        // The other engines exclusively use Unicode-aware character classes,
        // so we enable UCP to make \w, \d, \s and \b behave the same way.
        let re = RegexBuilder::new()
            .utf(true)
            .ucp(true)
            .jit_if_available(true)
            .build(pattern)
            .map_err(|err| Error::syntax(Engine::Backtrack, pattern, err))?;
        let groups = Arc::new(GroupTable::new(
            re.capture_names().iter().map(|name| name.as_deref()),
        ));
        Ok(Backtrack { re, pattern: pattern.to_string(), groups })
    }

    fn search_error(&self, err: pcre2::Error) -> Error {
        Error::search(Engine::Backtrack, &self.pattern, err)
    }
}

impl std::fmt::Debug for Backtrack {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Backtrack")
            .field("pattern", &self.pattern)
            .field("groups", &self.groups)
            .finish()
    }
}

impl Matcher for Backtrack {
    fn engine(&self) -> Engine {
        Engine::Backtrack
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn group_table(&self) -> &Arc<GroupTable> {
        &self.groups
    }

    fn count(&self, haystack: &str) -> Result<usize, Error> {
        let mut cursor = Cursor::default();
        let mut count = 0;
        while cursor.at <= haystack.len() {
            let m = match self.re.find_at(haystack.as_bytes(), cursor.at) {
                Err(err) => return Err(self.search_error(err)),
                Ok(None) => break,
                Ok(Some(m)) => m,
            };
            if cursor.accept(haystack, m.start(), m.end()) {
                count += 1;
            }
        }
        Ok(count)
    }

    fn captures_iter<'a>(&'a self, haystack: &'a str) -> CapturesIter<'a> {
        Box::new(CapturesMatches {
            matcher: self,
            haystack,
            locs: self.re.capture_locations(),
            cursor: Cursor::default(),
            done: false,
        })
    }
}

/// The position of an iterative search.
///
/// PCRE2's own iterators step over an empty match by one byte, which can
/// land inside a multi-byte character. This steps by one character instead,
/// and never reports an empty match that ends where the previous match
/// ended.
#[derive(Debug, Default)]
struct Cursor {
    at: usize,
    last_end: Option<usize>,
}

impl Cursor {
    /// Moves past the match at `start..end` and returns whether it should
    /// be reported.
    fn accept(&mut self, haystack: &str, start: usize, end: usize) -> bool {
        if start == end && self.last_end == Some(end) {
            self.at = end
                + haystack[end..].chars().next().map_or(1, char::len_utf8);
            return false;
        }
        self.at = end;
        self.last_end = Some(end);
        true
    }
}

struct CapturesMatches<'a> {
    matcher: &'a Backtrack,
    haystack: &'a str,
    locs: CaptureLocations,
    cursor: Cursor,
    done: bool,
}

impl<'a> Iterator for CapturesMatches<'a> {
    type Item = Result<Captures<'a>, Error>;

    fn next(&mut self) -> Option<Result<Captures<'a>, Error>> {
        while !self.done && self.cursor.at <= self.haystack.len() {
            let result = self.matcher.re.captures_read_at(
                &mut self.locs,
                self.haystack.as_bytes(),
                self.cursor.at,
            );
            let m = match result {
                Err(err) => {
                    self.done = true;
                    return Some(Err(self.matcher.search_error(err)));
                }
                Ok(None) => break,
                Ok(Some(m)) => m,
            };
            if !self.cursor.accept(self.haystack, m.start(), m.end()) {
                continue;
            }
            let spans =
                (0..self.locs.len()).map(|i| self.locs.get(i)).collect();
            let groups = Arc::clone(&self.matcher.groups);
            return Some(Ok(Captures::new(self.haystack, spans, groups)));
        }
        self.done = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_step_over_characters() {
        let re = Backtrack::new("").unwrap();
        assert_eq!(2, re.count("é").unwrap());
        assert_eq!(5, re.count("aüb€").unwrap());

        let re = Backtrack::new("a*").unwrap();
        let spans: Vec<(usize, usize)> = re
            .captures_iter("üaü")
            .map(|caps| caps.unwrap().get_match())
            .map(|m| (m.start(), m.end()))
            .collect();
        assert_eq!(vec![(0, 0), (2, 3), (5, 5)], spans);
    }
}
