//! The combinator library: concrete parser nodes.

/// Ordered choice.
pub mod choice;
/// Associative operator folds.
pub mod fold;
/// Forward references and recursion bridges.
pub mod lazy;
/// Positive and negative lookahead.
pub mod lookahead;
/// Optional match.
pub mod option;
/// Leaf parsers over chars and tokens.
pub mod primitives;
/// Frame capture and build callbacks.
pub mod push;
/// Greedy repetition.
pub mod repeat;
/// Sequencing.
pub mod seq;

pub use choice::Choice;
pub use fold::{FoldBranch, LeftFold, RightFold};
pub use lazy::Lazy;
pub use lookahead::{Lookahead, Not};
pub use option::Optional;
pub use primitives::{
    AnyElem, CharLit, CharPred, CharPredFn, CharRange, Named, Text, TokenKindIs, TokenPred,
    TokenPredFn,
};
pub use push::{BuildCtx, BuildFn, Collect};
pub use repeat::Repeat;
pub use seq::Sequence;
