//! Construction factories, one per combinator.
//!
//! These are thin wrappers over the combinator constructors so grammars
//! read declaratively. Anything fancier (operator overloading, rule
//! macros) belongs to a surface layer outside the engine.

use crate::engine::combinators::fold::{FoldBranch, LeftFold, RightFold};
use crate::engine::combinators::lazy::Lazy;
use crate::engine::combinators::lookahead::{Lookahead, Not};
use crate::engine::combinators::option::Optional;
use crate::engine::combinators::primitives::{
    AnyElem, CharLit, CharPred, CharRange, Named, Text, TokenKindIs, TokenPred,
};
use crate::engine::combinators::push::{BuildCtx, Collect};
use crate::engine::combinators::repeat::Repeat;
use crate::engine::combinators::seq::Sequence;
use crate::engine::combinators::choice::Choice;
use crate::engine::effects::Value;
use crate::engine::input::Token;
use crate::engine::memo::Memo;
use crate::engine::parser::ParserRef;
use std::sync::Arc;

/// Any single element (char or token) except EOF.
pub fn any() -> ParserRef {
    AnyElem::new()
}

/// One specific char.
pub fn ch(c: char) -> ParserRef {
    CharLit::new(c)
}

/// One char in `lo..=hi`.
pub fn char_range(lo: char, hi: char) -> ParserRef {
    CharRange::new(lo, hi)
}

/// One char satisfying `pred`; `name` is what diagnostics print.
pub fn char_pred(
    name: impl Into<String>,
    pred: impl Fn(char) -> bool + Send + Sync + 'static,
) -> ParserRef {
    CharPred::new(name, pred)
}

/// An exact string of chars.
pub fn text(s: impl Into<String>) -> ParserRef {
    Text::new(s)
}

/// One token with kind tag `kind`.
pub fn token_kind(kind: u32) -> ParserRef {
    TokenKindIs::new(kind)
}

/// One token satisfying `pred`; `name` is what diagnostics print.
pub fn token_pred(
    name: impl Into<String>,
    pred: impl Fn(&dyn Token) -> bool + Send + Sync + 'static,
) -> ParserRef {
    TokenPred::new(name, pred)
}

/// All of `children`, in order.
pub fn seq(children: Vec<ParserRef>) -> ParserRef {
    Sequence::new(children)
}

/// The first of `children` that matches.
pub fn choice(children: Vec<ParserRef>) -> ParserRef {
    Choice::new(children)
}

/// `body` repeated greedily between `min` and `max` times; `None` is
/// unbounded.
pub fn repeat(body: ParserRef, min: usize, max: Option<usize>) -> ParserRef {
    Repeat::new(body, min, max)
}

/// `body` zero or more times.
pub fn many0(body: ParserRef) -> ParserRef {
    Repeat::new(body, 0, None)
}

/// `body` one or more times.
pub fn many1(body: ParserRef) -> ParserRef {
    Repeat::new(body, 1, None)
}

/// `body`, or nothing.
pub fn opt(body: ParserRef) -> ParserRef {
    Optional::new(body)
}

/// Zero-width check that `body` matches here.
pub fn ahead(body: ParserRef) -> ParserRef {
    Lookahead::new(body)
}

/// Zero-width check that `body` does not match here.
pub fn not_ahead(body: ParserRef) -> ParserRef {
    Not::new(body)
}

/// Name `inner` for diagnostics and rule-level tracing.
pub fn rule(name: impl Into<String>, inner: ParserRef) -> ParserRef {
    Named::new(name, inner)
}

/// A named forward reference; bind it through
/// [`Grammar::define`](crate::Grammar::define).
pub fn forward(name: impl Into<String>) -> Arc<Lazy> {
    Lazy::forward(name)
}

/// Replace the frame `inner` pushes with one value built by `build`.
pub fn push(
    inner: ParserRef,
    build: impl Fn(&BuildCtx<'_>) -> Value + Send + Sync + 'static,
) -> ParserRef {
    Collect::new(inner, build)
}

/// Like [`push`], also consuming the `lookback` values below the frame.
pub fn push_lookback(
    inner: ParserRef,
    lookback: usize,
    build: impl Fn(&BuildCtx<'_>) -> Value + Send + Sync + 'static,
) -> ParserRef {
    Collect::with_lookback(inner, lookback, build)
}

/// Pair an operator parser with a fold callback.
pub fn branch(
    operator: ParserRef,
    build: impl Fn(&BuildCtx<'_>) -> Value + Send + Sync + 'static,
) -> FoldBranch {
    FoldBranch::new(operator, build)
}

/// Left-associative fold of `operand` under `branches`.
pub fn left_fold(operand: ParserRef, branches: Vec<FoldBranch>) -> ParserRef {
    LeftFold::new(operand, branches)
}

/// Right-associative fold of `operand` under `branches`.
pub fn right_fold(operand: ParserRef, branches: Vec<FoldBranch>) -> ParserRef {
    RightFold::new(operand, branches)
}

/// Memoize `inner` with the default table capacity.
pub fn memo(inner: ParserRef) -> ParserRef {
    Memo::new(inner)
}

/// Memoize `inner` with an explicit table capacity.
pub fn memo_with_capacity(inner: ParserRef, capacity: usize) -> ParserRef {
    Memo::with_capacity(inner, capacity)
}
