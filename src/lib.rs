/*!
A harness for comparing regex engines on the same patterns and inputs.

Two families of engines are compared: backtracking engines, which support
lookaround and backreferences but whose worst case search time is exponential,
and linear time engines built on finite automata, which reject those features
in exchange for a search time that is always proportional to the length of
the haystack.

This crate provides:

* An [`Engine`] selector and a [`Matcher`] interface that hides each engine's
own types behind a common set of operations: counting matches, iterating over
matches with their capture groups and reporting the pattern's named groups.
* [`Fixtures`], the inputs shared by every benchmark.
* A benchmark driver in [`bench`] that measures throughput over warmup and
measurement iterations and summarizes the samples.
* The id extraction checks in [`extract`], which verify that several ways of
writing the same extraction agree with one another.

# Example

```
use regex_compare::Engine;

let hay = "Tax Id: 123, Court Id: 456";
for engine in Engine::ALL {
    assert_eq!(2, engine.count_matches(r"\d+", hay).unwrap());
}
```

# Errors

Every fallible operation returns an [`Error`]. Its [`ErrorKind`] says whether
a pattern failed to compile, a search failed or two extraction strategies
disagreed.
*/

#![deny(missing_docs)]

pub use crate::{
    engine::{Captures, CapturesIter, Engine, Match, Matcher, UnknownEngine},
    error::{Error, ErrorKind},
    fixture::Fixtures,
    groups::GroupTable,
};

pub mod bench;
mod engine;
mod error;
pub mod extract;
pub mod fixture;
mod groups;
