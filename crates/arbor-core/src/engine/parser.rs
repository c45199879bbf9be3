//! The parser contract and the execution discipline around it.
//!
//! Combinators implement [`Parser::do_parse`]; callers never invoke it
//! directly. Every invocation goes through [`run`], which owns the
//! pre/post discipline once for all parser kinds: snapshot before,
//! commit on success, rollback plus furthest-error recording on failure,
//! and budget accounting around the whole call.

use super::state::ParseState;
use super::wellformed::NullableEnv;
use arbor_error::{EngineError, EngineResult};
use std::sync::Arc;
use tracing::trace;

/// Shared handle to an immutable parser node.
pub type ParserRef = Arc<dyn Parser>;

/// A node in the parser graph.
///
/// Parsers are built once, before any parse, and never mutated afterward;
/// the same graph may serve any number of concurrent parses, each with
/// its own [`ParseState`].
pub trait Parser: Send + Sync {
    /// Attempt to match at the current position.
    ///
    /// On `Ok(true)` the implementation has consumed input (position at or
    /// beyond its entry value) and logged any side effects. On `Ok(false)`
    /// the caller's [`run`] wrapper restores all transactional state, so
    /// implementations are free to fail mid-way. Fatal conditions are
    /// `Err` and abort the parse.
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool>;

    /// All sub-parsers this node references, for graph walks.
    fn children(&self) -> Vec<ParserRef>;

    /// A short name for the combinator kind, used in diagnostics.
    fn kind_name(&self) -> &'static str;

    /// Optional display name assigned by the grammar author.
    fn rule_name(&self) -> Option<&str> {
        None
    }

    /// Whether this parser is a furthest-error leaf: a node that matches
    /// input directly rather than by running sub-parsers.
    fn is_leaf(&self) -> bool {
        false
    }

    /// Whether this parser can succeed without consuming input, given the
    /// set of parsers already known nullable. Used by the well-formedness
    /// fixpoint; user-defined parsers that are nullable must override.
    fn nullable(&self, env: &NullableEnv) -> bool {
        let _ = env;
        false
    }

    /// The sub-parsers this node may invoke before consuming any input.
    /// The default is conservative: all children.
    fn left_children(&self, env: &NullableEnv) -> Vec<ParserRef> {
        let _ = env;
        self.children()
    }

    /// Whether this node implements its own left-recursion handling. A
    /// left-edge cycle is only legal when every node on it says so.
    fn handles_left_recursion(&self) -> bool {
        false
    }

    /// Whether this node is an unbounded repetition over a body that can
    /// succeed without consuming input. Such a node would loop forever,
    /// so the well-formedness analysis rejects it.
    fn nullable_repetition(&self, env: &NullableEnv) -> bool {
        let _ = env;
        false
    }

    /// The name diagnostics print: the rule name if one was assigned,
    /// otherwise the combinator kind.
    fn display_name(&self) -> String {
        self.rule_name().map_or_else(|| self.kind_name().to_string(), str::to_string)
    }
}

/// Identity of a parser node, for graph walks and memo keys.
pub fn parser_id(parser: &ParserRef) -> usize {
    Arc::as_ptr(parser).cast::<()>() as usize
}

/// Execute `parser` against `state` under the engine discipline.
///
/// Guarantees the single-parse rule: after `run` returns `Ok`, the state
/// is either strictly advanced with all effects retained, or restored to
/// exactly its pre-call value (furthest-error bookkeeping excepted).
pub fn run(parser: &ParserRef, state: &mut ParseState) -> EngineResult<bool> {
    if state.tracker.depth_would_exceed(state.budget()) {
        return Err(EngineError::DepthExceeded { limit: state.budget().max_depth });
    }
    state.tracker.enter_depth();
    let result = run_guarded(parser, state);
    state.tracker.exit_depth();
    result
}

fn run_guarded(parser: &ParserRef, state: &mut ParseState) -> EngineResult<bool> {
    let snapshot = state.snapshot();
    let matched = parser.do_parse(state)?;
    if matched {
        if state.pos() < snapshot.pos() {
            return Err(EngineError::InternalInvariant {
                detail: format!(
                    "parser {} succeeded but moved the position backwards ({} -> {})",
                    parser.display_name(),
                    snapshot.pos(),
                    state.pos()
                ),
            });
        }
        if let Some(rule) = parser.rule_name() {
            trace!(rule, start = snapshot.pos(), end = state.pos(), "matched");
        }
        state.commit(snapshot);
        Ok(true)
    } else {
        state.rollback(&snapshot)?;
        if parser.is_leaf() {
            state.record_error(parser, snapshot.pos());
        }
        if let Some(rule) = parser.rule_name() {
            trace!(rule, pos = snapshot.pos(), "no match");
        }
        Ok(false)
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;

    /// A named leaf that never matches; handy for exercising error paths.
    #[derive(Debug)]
    pub(crate) struct Probe {
        name: String,
    }

    impl Parser for Probe {
        fn do_parse(&self, _state: &mut ParseState) -> EngineResult<bool> {
            Ok(false)
        }
        fn children(&self) -> Vec<ParserRef> {
            Vec::new()
        }
        fn kind_name(&self) -> &'static str {
            "probe"
        }
        fn rule_name(&self) -> Option<&str> {
            Some(&self.name)
        }
        fn is_leaf(&self) -> bool {
            true
        }
    }

    /// Build a probe leaf with the given rule name.
    pub(crate) fn probe(name: &str) -> ParserRef {
        Arc::new(Probe { name: name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::tests_support::probe;
    use super::*;
    use crate::engine::effects::value;
    use crate::engine::input::Input;
    use arbor_error::ParseBudget;
    use arbor_tdd_support::{must, must_err};

    struct ConsumeOne;

    impl Parser for ConsumeOne {
        fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
            if state.pos() < state.input().len() {
                state.push_value(value(state.pos()));
                state.advance(1);
                Ok(true)
            } else {
                Ok(false)
            }
        }
        fn children(&self) -> Vec<ParserRef> {
            Vec::new()
        }
        fn kind_name(&self) -> &'static str {
            "consume_one"
        }
        fn is_leaf(&self) -> bool {
            true
        }
    }

    struct MovesBackwards;

    impl Parser for MovesBackwards {
        fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
            state.set_pos(state.pos().saturating_sub(1));
            Ok(true)
        }
        fn children(&self) -> Vec<ParserRef> {
            Vec::new()
        }
        fn kind_name(&self) -> &'static str {
            "moves_backwards"
        }
    }

    fn state(text: &str) -> ParseState {
        ParseState::new(Input::from_text(text), ParseBudget::default())
    }

    #[test]
    fn success_commits_position_and_effects() {
        let parser: ParserRef = Arc::new(ConsumeOne);
        let mut st = state("ab");
        assert!(must(run(&parser, &mut st)));
        assert_eq!(st.pos(), 1);
        assert_eq!(st.ast_stack().len(), 1);
    }

    #[test]
    fn failure_restores_state_and_records_leaf() {
        let parser = probe("digit");
        let mut st = state("ab");
        st.advance(1);
        assert!(!must(run(&parser, &mut st)));
        assert_eq!(st.pos(), 1);
        assert_eq!(st.furthest_error_pos(), Some(1));
        assert_eq!(st.furthest_error_causes().len(), 1);
    }

    #[test]
    fn backwards_success_is_invariant_violation() {
        let parser: ParserRef = Arc::new(MovesBackwards);
        let mut st = state("ab");
        st.advance(2);
        let err = must_err(run(&parser, &mut st));
        assert!(matches!(err, EngineError::InternalInvariant { .. }));
    }

    #[test]
    fn depth_budget_is_enforced() {
        let parser: ParserRef = Arc::new(ConsumeOne);
        let mut st = ParseState::new(Input::from_text("ab"), ParseBudget { max_depth: 0 });
        let err = must_err(run(&parser, &mut st));
        assert_eq!(err, EngineError::DepthExceeded { limit: 0 });
    }

    #[test]
    fn run_twice_from_same_position_is_deterministic() {
        let parser: ParserRef = Arc::new(ConsumeOne);
        let mut st = state("a");
        assert!(must(run(&parser, &mut st)));
        let end = st.pos();

        let mut again = state("a");
        assert!(must(run(&parser, &mut again)));
        assert_eq!(again.pos(), end);
    }
}
