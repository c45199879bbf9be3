//! Parser engine components.

/// The combinator library: concrete parser nodes.
pub mod combinators;
/// The top-level parse driver and its options.
pub mod driver;
/// Reversible side effects on the AST stack and context.
pub mod effects;
/// Grammar registration and freezing.
pub mod grammar;
/// Character and token input sources.
pub mod input;
/// The append-only side-effect journal.
pub mod journal;
/// Memoization of sub-parse outcomes.
pub mod memo;
/// The parser contract and executor.
pub mod parser;
/// The mutable parse state.
pub mod state;
/// Static well-formedness analysis.
pub mod wellformed;
