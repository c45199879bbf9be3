//! Ordered choice: try children in order, commit to the first success.

use crate::engine::parser::{Parser, ParserRef, run};
use crate::engine::state::ParseState;
use crate::engine::wellformed::NullableEnv;
use arbor_error::EngineResult;
use std::sync::Arc;

/// Tries its children in order and returns on the first success. A
/// committed alternative is never revisited: if a later sibling of the
/// choice fails, the choice as a whole fails rather than retrying the
/// next alternative (vertical, not lateral, backtracking).
pub struct Choice {
    children: Vec<ParserRef>,
}

impl Choice {
    /// Build an ordered choice over `children`.
    pub fn new(children: Vec<ParserRef>) -> ParserRef {
        Arc::new(Self { children })
    }
}

impl Parser for Choice {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        for child in &self.children {
            if run(child, state)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn children(&self) -> Vec<ParserRef> {
        self.children.clone()
    }

    fn kind_name(&self) -> &'static str {
        "choice"
    }

    fn nullable(&self, env: &NullableEnv) -> bool {
        self.children.iter().any(|c| env.is_nullable(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::combinators::primitives::{CharLit, Text};
    use crate::engine::combinators::seq::Sequence;
    use crate::engine::input::Input;
    use arbor_error::ParseBudget;
    use arbor_tdd_support::must;

    fn state(text: &str) -> ParseState {
        ParseState::new(Input::from_text(text), ParseBudget::default())
    }

    #[test]
    fn first_match_wins() {
        let p = Choice::new(vec![CharLit::new('a'), CharLit::new('b')]);
        let mut st = state("b");
        assert!(must(run(&p, &mut st)));
        assert_eq!(st.pos(), 1);
    }

    #[test]
    fn all_fail_means_fail() {
        let p = Choice::new(vec![CharLit::new('a'), CharLit::new('b')]);
        let mut st = state("c");
        assert!(!must(run(&p, &mut st)));
        assert_eq!(st.pos(), 0);
        // Both alternatives failed at position 0.
        assert_eq!(st.furthest_error_causes().len(), 2);
    }

    #[test]
    fn prefix_capture_never_revisits_a_success() {
        // choice("a", "aa") then "b": the short alternative matches and
        // is committed, so "aab" cannot parse.
        let capture = Sequence::new(vec![
            Choice::new(vec![Text::new("a"), Text::new("aa")]),
            Text::new("b"),
        ]);
        let mut st = state("aab");
        assert!(!must(run(&capture, &mut st)));

        // Longest-first ordering succeeds.
        let ordered = Sequence::new(vec![
            Choice::new(vec![Text::new("aa"), Text::new("a")]),
            Text::new("b"),
        ]);
        let mut st = state("aab");
        assert!(must(run(&ordered, &mut st)));
        assert_eq!(st.pos(), 3);
    }
}
