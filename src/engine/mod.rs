/*!
The engine abstraction: a small capability interface over several regex
engines.

An [`Engine`] is a cheap selector. Compiling a pattern with it produces a
[`Matcher`], which owns the engine specific compiled program and exposes the
only operations the rest of this crate needs: counting matches, iterating over
matches with their capture groups and reporting the named capture groups of
the pattern. Callers never see an engine specific type.

Every engine reports leftmost-first, non-overlapping matches when scanning a
haystack from left to right. An empty match never causes the search to stall:
the next search always begins at least one character after an empty match.
*/

use std::{fmt, str::FromStr, sync::Arc};

use crate::{error::Error, groups::GroupTable};

mod backtrack;
mod hybrid;
mod linear;
mod lite;

/// The regex engines that can be compared.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Engine {
    /// PCRE2, a classic backtracking engine (with a JIT when available).
    ///
    /// It supports arbitrary lookaround, backreferences and named groups.
    /// Its worst case search time is exponential in the length of the
    /// haystack. No time limit is imposed on it here, although PCRE2's own
    /// match limit still applies and surfaces as a search error.
    Backtrack,
    /// The `regex` crate, a linear time engine built on finite automata.
    ///
    /// Search time is always `O(m * n)`. In exchange, backreferences and
    /// lookaround are rejected at compile time.
    Linear,
    /// The `regex-lite` crate, a linear time engine with a single PikeVM and
    /// none of the `regex` crate's optimizations.
    Lite,
    /// The `fancy-regex` crate. A backtracking VM that hands every sub-pattern
    /// without lookaround or backreferences to the `regex` crate.
    Hybrid,
}

impl Engine {
    /// Every engine, in the order they are reported.
    pub const ALL: [Engine; 4] =
        [Engine::Backtrack, Engine::Linear, Engine::Lite, Engine::Hybrid];

    /// Returns the name of this engine as accepted by its `FromStr` impl.
    pub fn name(&self) -> &'static str {
        match *self {
            Engine::Backtrack => "backtrack",
            Engine::Linear => "linear",
            Engine::Lite => "lite",
            Engine::Hybrid => "hybrid",
        }
    }

    /// Returns true when this engine guarantees a search time linear in the
    /// length of the haystack.
    pub fn is_linear(&self) -> bool {
        matches!(*self, Engine::Linear | Engine::Lite)
    }

    /// Compiles the given pattern with this engine.
    ///
    /// If the pattern is invalid, or uses a feature this engine does not
    /// support, then an error with kind [`ErrorKind::Syntax`] is returned.
    ///
    /// [`ErrorKind::Syntax`]: crate::ErrorKind::Syntax
    pub fn compile(&self, pattern: &str) -> Result<Box<dyn Matcher>, Error> {
        log::debug!("compiling '{}' with the {} engine", pattern, self);
        let matcher: Box<dyn Matcher> = match *self {
            Engine::Backtrack => Box::new(backtrack::Backtrack::new(pattern)?),
            Engine::Linear => Box::new(linear::Linear::new(pattern)?),
            Engine::Lite => Box::new(lite::Lite::new(pattern)?),
            Engine::Hybrid => Box::new(hybrid::Hybrid::new(pattern)?),
        };
        Ok(matcher)
    }

    /// Compiles the given pattern and counts its matches in the haystack.
    ///
    /// This is the unit of work measured by the benchmarks. Compilation is
    /// part of it on purpose: it is what a caller handed a pattern string and
    /// a haystack has to do.
    pub fn count_matches(
        &self,
        pattern: &str,
        haystack: &str,
    ) -> Result<usize, Error> {
        self.compile(pattern)?.count(haystack)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Engine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Engine, UnknownEngine> {
        Engine::ALL
            .into_iter()
            .find(|engine| engine.name() == s)
            .ok_or_else(|| UnknownEngine(s.to_string()))
    }
}

/// The error returned when parsing an unrecognized engine name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownEngine(String);

impl std::error::Error for UnknownEngine {}

impl fmt::Display for UnknownEngine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = Engine::ALL.iter().map(|e| e.name()).collect();
        write!(
            f,
            "unrecognized engine '{}' (expected one of: {})",
            self.0,
            names.join(", "),
        )
    }
}

/// A compiled pattern for one engine.
///
/// A matcher is immutable once built. It may be used to search any number of
/// haystacks, and each iterator it returns starts a fresh search.
pub trait Matcher: fmt::Debug {
    /// The engine that compiled this matcher.
    fn engine(&self) -> Engine;

    /// The pattern this matcher was compiled from.
    fn pattern(&self) -> &str;

    /// The capture groups of the pattern.
    fn group_table(&self) -> &Arc<GroupTable>;

    /// Counts every non-overlapping match in the haystack.
    fn count(&self, haystack: &str) -> Result<usize, Error>;

    /// Returns an iterator over every non-overlapping match in the haystack,
    /// along with the spans of all capture groups in each match.
    ///
    /// Iteration stops at the first error, which is yielded as the final
    /// item.
    fn captures_iter<'a>(&'a self, haystack: &'a str) -> CapturesIter<'a>;

    /// Returns the leftmost-first match in the haystack, if one exists.
    fn captures<'a>(
        &'a self,
        haystack: &'a str,
    ) -> Result<Option<Captures<'a>>, Error> {
        self.captures_iter(haystack).next().transpose()
    }
}

/// An iterator over matches and their capture groups.
pub type CapturesIter<'a> =
    Box<dyn Iterator<Item = Result<Captures<'a>, Error>> + 'a>;

/// A single match of a pattern, or of one of its capture groups.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Match<'h> {
    haystack: &'h str,
    start: usize,
    end: usize,
}

impl<'h> Match<'h> {
    /// Returns the byte offset at which this match begins.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the byte offset immediately after this match.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the byte range of this match.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Returns true when this match is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the matched substring.
    pub fn as_str(&self) -> &'h str {
        &self.haystack[self.range()]
    }
}

impl<'h> fmt::Debug for Match<'h> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Match")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("string", &self.as_str())
            .finish()
    }
}

/// The capture groups of a single match.
///
/// Every engine's own captures type is translated into this representation,
/// so that callers can compare results across engines. Group `0` always
/// corresponds to the overall match.
#[derive(Clone, Debug)]
pub struct Captures<'h> {
    haystack: &'h str,
    spans: Vec<Option<(usize, usize)>>,
    groups: Arc<GroupTable>,
}

impl<'h> Captures<'h> {
    /// Builds a set of captures from one span per capture group, in group
    /// index order. A group that did not participate in the match has no
    /// span.
    ///
    /// # Panics
    ///
    /// Panics when there is no span for the overall match.
    pub(crate) fn new(
        haystack: &'h str,
        spans: Vec<Option<(usize, usize)>>,
        groups: Arc<GroupTable>,
    ) -> Captures<'h> {
        assert!(
            matches!(spans.first(), Some(Some(_))),
            "the overall match must always be present",
        );
        Captures { haystack, spans, groups }
    }

    /// Returns the overall match.
    pub fn get_match(&self) -> Match<'h> {
        // OK because the constructor guarantees that group 0 is present.
        self.get(0).unwrap()
    }

    /// Returns the match of the group at the given index, or `None` when the
    /// group does not exist or did not participate in the match.
    pub fn get(&self, index: usize) -> Option<Match<'h>> {
        let (start, end) = self.spans.get(index).copied().flatten()?;
        Some(Match { haystack: self.haystack, start, end })
    }

    /// Returns the match of the group with the given name, or `None` when no
    /// such group exists or it did not participate in the match.
    pub fn name(&self, name: &str) -> Option<Match<'h>> {
        self.get(self.groups.index(name)?)
    }

    /// Returns the number of groups in this match, including the overall
    /// match.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns an iterator over every group in index order.
    pub fn iter<'c>(
        &'c self,
    ) -> impl Iterator<Item = Option<Match<'h>>> + 'c {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Returns the capture group table of the pattern that produced this
    /// match.
    pub fn group_table(&self) -> &GroupTable {
        &self.groups
    }
}
