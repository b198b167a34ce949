use crate::engine::Engine;

/// An error that can occur while compiling a pattern, executing a search or
/// cross-checking the results of several extraction strategies.
///
/// Every error records the engine that produced it and the pattern that was
/// involved, so that a failed benchmark or test can be reported with its full
/// context. The message is whatever the underlying engine reported. Two
/// engines rejecting the same pattern produce errors of the same kind that
/// differ only in their message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    engine: Engine,
    pattern: String,
    msg: String,
}

/// The kind of an error.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The pattern could not be compiled by the engine. This includes
    /// syntax that the engine does not support, e.g., backreferences or
    /// lookaround in a linear time engine.
    Syntax,
    /// The search itself failed. This occurs when a backtracking engine
    /// exhausts one of its own internal limits.
    Search,
    /// Two extraction strategies disagreed on the same input.
    Mismatch,
}

impl Error {
    pub(crate) fn syntax(
        engine: Engine,
        pattern: &str,
        err: impl std::fmt::Display,
    ) -> Error {
        Error::new(ErrorKind::Syntax, engine, pattern, err.to_string())
    }

    pub(crate) fn search(
        engine: Engine,
        pattern: &str,
        err: impl std::fmt::Display,
    ) -> Error {
        Error::new(ErrorKind::Search, engine, pattern, err.to_string())
    }

    pub(crate) fn mismatch(
        engine: Engine,
        pattern: &str,
        msg: String,
    ) -> Error {
        Error::new(ErrorKind::Mismatch, engine, pattern, msg)
    }

    fn new(
        kind: ErrorKind,
        engine: Engine,
        pattern: &str,
        msg: String,
    ) -> Error {
        Error { kind, engine, pattern: pattern.to_string(), msg }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the engine that reported this error.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Returns the pattern that was being compiled or searched with.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the message reported by the engine.
    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            ErrorKind::Syntax => write!(
                f,
                "{} engine failed to compile '{}': {}",
                self.engine, self.pattern, self.msg,
            ),
            ErrorKind::Search => write!(
                f,
                "{} engine failed to search with '{}': {}",
                self.engine, self.pattern, self.msg,
            ),
            ErrorKind::Mismatch => write!(
                f,
                "{} engine strategies disagree: {}",
                self.engine, self.msg,
            ),
        }
    }
}
