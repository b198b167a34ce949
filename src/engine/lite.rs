use std::sync::Arc;

use regex_lite::Regex;

use crate::{
    engine::{Captures, CapturesIter, Engine, Matcher},
    error::Error,
    groups::GroupTable,
};

/// A matcher backed by the `regex-lite` crate.
///
/// Note that `regex-lite` only treats ASCII as word characters for `\w` and
/// `\b`, and only ASCII digits for `\d`.
#[derive(Debug)]
pub(crate) struct Lite {
    re: Regex,
    groups: Arc<GroupTable>,
}

impl Lite {
    pub(crate) fn new(pattern: &str) -> Result<Lite, Error> {
        let re = Regex::new(pattern)
            .map_err(|err| Error::syntax(Engine::Lite, pattern, err))?;
        let groups = Arc::new(GroupTable::new(re.capture_names()));
        Ok(Lite { re, groups })
    }
}

impl Matcher for Lite {
    fn engine(&self) -> Engine {
        Engine::Lite
    }

    fn pattern(&self) -> &str {
        self.re.as_str()
    }

    fn group_table(&self) -> &Arc<GroupTable> {
        &self.groups
    }

    fn count(&self, haystack: &str) -> Result<usize, Error> {
        Ok(self.re.find_iter(haystack).count())
    }

    fn captures_iter<'a>(&'a self, haystack: &'a str) -> CapturesIter<'a> {
        let it = self.re.captures_iter(haystack).map(move |caps| {
            let spans = (0..caps.len())
                .map(|i| caps.get(i).map(|m| (m.start(), m.end())))
                .collect();
            Ok(Captures::new(haystack, spans, Arc::clone(&self.groups)))
        });
        Box::new(it)
    }
}
