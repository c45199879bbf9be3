//! Core parsing engine for arbor.
//!
//! A context-sensitive PEG parser combinator engine: parsers are
//! immutable graph nodes run against an explicit, transactional
//! [`ParseState`]. Ordered choice backtracks vertically under the
//! single-parse rule; every user-visible mutation goes through a
//! reversible side-effect journal so backtracking restores state
//! exactly; sub-parse outcomes can be memoized in bounded LRU tables;
//! and a static well-formedness analysis rejects grammars that would
//! not terminate (unprotected left recursion, unbounded repetition of
//! zero-width matches) before any parse runs.

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::return_self_not_must_use,
    clippy::uninlined_format_args
)]

/// Construction factories, one per combinator.
pub mod dsl;
/// Parser engine components.
pub mod engine;

pub use engine::combinators::{
    AnyElem, BuildCtx, BuildFn, CharLit, CharPred, CharRange, Choice, Collect, FoldBranch, Lazy,
    LeftFold, Lookahead, Named, Not, Optional, Repeat, RightFold, Sequence, Text, TokenKindIs,
    TokenPred,
};
pub use engine::driver::{ParseOptions, ParseOutcome, parse};
pub use engine::effects::{EffectRef, SideEffect, StateCells, Value, downcast, value};
pub use engine::grammar::Grammar;
pub use engine::input::{CharInput, Input, Token, TokenInput, TokenRef};
pub use engine::journal::Journal;
pub use engine::memo::{DEFAULT_MEMO_CAPACITY, LruMemoizer, Memo, MemoEntry};
pub use engine::parser::{Parser, ParserRef, parser_id, run};
pub use engine::state::{ParseState, Snapshot};
pub use engine::wellformed::{NullableEnv, analyze};

pub use arbor_error::{
    BudgetTracker, EngineError, EngineResult, FailureContext, GrammarFlaw, InputMode, ParseBudget,
};
pub use arbor_position::{LineIndex, Span};
