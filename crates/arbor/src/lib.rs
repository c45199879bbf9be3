//! arbor — a context-sensitive PEG parser combinator engine.
//!
//! Grammars are graphs of immutable parser nodes built through the
//! factories in [`dsl`]; a parse threads an explicit, transactional
//! [`ParseState`] through the graph. The engine guarantees the
//! single-parse rule (a parser at one position and context yields one
//! deterministic result), undoes all side effects on backtracking
//! through a reversible journal, memoizes sub-parses in bounded LRU
//! tables on request, and statically rejects grammars that would not
//! terminate.
//!
//! # Example
//!
//! ```ignore
//! use arbor::dsl::{char_range, many1, push, rule};
//! use arbor::{Input, ParseOptions, parse, value};
//!
//! let digits = rule("number", push(many1(char_range('0', '9')), |ctx| {
//!     value(ctx.text().unwrap_or_default().parse::<i64>().unwrap_or(0))
//! }));
//! let outcome = parse(&digits, Input::from_text("42"), ParseOptions::new())?;
//! assert!(outcome.is_success());
//! # Ok::<(), arbor::EngineError>(())
//! ```

#![deny(unsafe_code)]
#![deny(unreachable_pub)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub use arbor_core::dsl;

pub use arbor_core::{
    AnyElem, BuildCtx, BuildFn, CharInput, CharLit, CharPred, CharRange, Choice, Collect,
    DEFAULT_MEMO_CAPACITY, EffectRef, FoldBranch, Grammar, Input, Journal, Lazy, LeftFold,
    Lookahead, LruMemoizer, Memo, MemoEntry, Named, Not, Optional, ParseOptions, ParseOutcome,
    ParseState, Parser, ParserRef, Repeat, RightFold, Sequence, SideEffect, Snapshot, StateCells,
    Text, Token, TokenInput, TokenKindIs, TokenPred, TokenRef, Value, downcast, parse, parser_id,
    run, value,
};

pub use arbor_error::{
    BudgetTracker, EngineError, EngineResult, FailureContext, GrammarFlaw, InputMode, ParseBudget,
};
pub use arbor_position::{LineIndex, Span};
