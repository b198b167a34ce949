use std::sync::Arc;

use fancy_regex::Regex;

use crate::{
    engine::{Captures, CapturesIter, Engine, Matcher},
    error::Error,
    groups::GroupTable,
};

/// A matcher backed by the `fancy-regex` crate.
///
/// Patterns without lookaround or backreferences are handed to the `regex`
/// crate in their entirety, so this engine only backtracks through the parts
/// of a pattern that need it. Its default backtrack limit is kept and
/// surfaces as a search error.
#[derive(Debug)]
pub(crate) struct Hybrid {
    re: Regex,
    groups: Arc<GroupTable>,
}

impl Hybrid {
    pub(crate) fn new(pattern: &str) -> Result<Hybrid, Error> {
        let re = Regex::new(pattern)
            .map_err(|err| Error::syntax(Engine::Hybrid, pattern, err))?;
        let groups = Arc::new(GroupTable::new(re.capture_names()));
        Ok(Hybrid { re, groups })
    }

    fn search_error(&self, err: fancy_regex::Error) -> Error {
        Error::search(Engine::Hybrid, self.re.as_str(), err)
    }
}

impl Matcher for Hybrid {
    fn engine(&self) -> Engine {
        Engine::Hybrid
    }

    fn pattern(&self) -> &str {
        self.re.as_str()
    }

    fn group_table(&self) -> &Arc<GroupTable> {
        &self.groups
    }

    fn count(&self, haystack: &str) -> Result<usize, Error> {
        let mut count = 0;
        for result in self.re.find_iter(haystack) {
            result.map_err(|err| self.search_error(err))?;
            count += 1;
        }
        Ok(count)
    }

    fn captures_iter<'a>(&'a self, haystack: &'a str) -> CapturesIter<'a> {
        let it = self.re.captures_iter(haystack).map(move |result| {
            let caps = result.map_err(|err| self.search_error(err))?;
            let spans = (0..caps.len())
                .map(|i| caps.get(i).map(|m| (m.start(), m.end())))
                .collect();
            Ok(Captures::new(haystack, spans, Arc::clone(&self.groups)))
        });
        Box::new(it)
    }
}
