//! Error types for the arbor parsing engine.
//!
//! Match failures are *not* errors: a parser that does not match reports
//! `false` to its caller and contributes to furthest-error tracking, and
//! that signal never leaves the engine as a Rust error. The types here
//! cover the fatal conditions — an ill-formed grammar, a grammar/input
//! mode mismatch, a broken engine invariant — which abort the parse and
//! surface to the caller with the offending parser's display name.
//!
//! # Example
//!
//! ```
//! use arbor_error::{EngineError, InputMode};
//!
//! fn describe(err: &EngineError) -> String {
//!     match err {
//!         EngineError::WrongInputMode { expected, parser } => {
//!             format!("{parser} needs {expected} input")
//!         }
//!         other => other.to_string(),
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod budget;
mod context;

pub use budget::{BudgetTracker, ParseBudget};
pub use context::FailureContext;

use std::fmt;
use thiserror::Error;

/// Result type for fatal engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Which kind of input a parse is running over.
///
/// Exactly one mode is active per parse. Character primitives against a
/// token input (or vice versa) are a grammar programming error, not a
/// match failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A character sequence.
    Chars,
    /// An ordered sequence of opaque tokens.
    Tokens,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Chars => write!(f, "character"),
            InputMode::Tokens => write!(f, "token"),
        }
    }
}

/// A single well-formedness finding over a parser graph.
///
/// Produced by the static analysis that runs before the first parse of a
/// grammar. Any flaw refuses the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarFlaw {
    /// A cycle along edges that can match before consuming input, with no
    /// left-recursion handler on the cycle.
    LeftRecursion {
        /// Display names of the parsers on the cycle, in visit order.
        cycle: Vec<String>,
    },
    /// An unbounded repetition whose body can succeed without consuming
    /// input, which would loop forever.
    NullableRepetition {
        /// Display name of the offending repetition.
        repeat: String,
    },
}

impl fmt::Display for GrammarFlaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarFlaw::LeftRecursion { cycle } => {
                write!(f, "unprotected left recursion through: {}", cycle.join(" -> "))
            }
            GrammarFlaw::NullableRepetition { repeat } => {
                write!(f, "unbounded repetition over a nullable parser: {repeat}")
            }
        }
    }
}

/// Fatal error conditions raised by the arbor engine.
///
/// Every variant is surfaced; there are no silent fallbacks. Ordinary
/// match failures propagate as `false` returns and never appear here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The well-formedness analysis found flaws; parsing is refused.
    #[error("grammar is ill-formed: {}", .flaws.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("; "))]
    GrammarIllFormed {
        /// The individual findings, each naming the parsers involved.
        flaws: Vec<GrammarFlaw>,
    },

    /// A primitive was run against the wrong input mode.
    #[error("parser {parser} requires {expected} input")]
    WrongInputMode {
        /// The mode the primitive needs.
        expected: InputMode,
        /// Display name of the offending parser.
        parser: String,
    },

    /// Replaying a cached memo delta produced invalid state.
    #[error("memoizer inconsistency: {detail}")]
    MemoizerInconsistency {
        /// What the replay validation observed.
        detail: String,
    },

    /// An engine invariant was broken (non-advancing success, mismatched
    /// journal length, unresolved recursion bridge).
    #[error("internal invariant violated: {detail}")]
    InternalInvariant {
        /// Which invariant, and where.
        detail: String,
    },

    /// The recursion-depth budget was exhausted.
    #[error("parse exceeded maximum recursion depth of {limit}")]
    DepthExceeded {
        /// The configured depth limit.
        limit: usize,
    },
}
