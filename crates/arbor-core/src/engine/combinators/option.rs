//! Optional match.

use crate::engine::parser::{Parser, ParserRef, run};
use crate::engine::state::ParseState;
use crate::engine::wellformed::NullableEnv;
use arbor_error::EngineResult;
use std::sync::Arc;

/// Runs its body and succeeds either way; a failed body leaves the state
/// untouched.
pub struct Optional {
    body: ParserRef,
}

impl Optional {
    /// Build an optional wrapper around `body`.
    pub fn new(body: ParserRef) -> ParserRef {
        Arc::new(Self { body })
    }
}

impl Parser for Optional {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        run(&self.body, state)?;
        Ok(true)
    }

    fn children(&self) -> Vec<ParserRef> {
        vec![self.body.clone()]
    }

    fn kind_name(&self) -> &'static str {
        "optional"
    }

    fn nullable(&self, _env: &NullableEnv) -> bool {
        true
    }

    fn left_children(&self, _env: &NullableEnv) -> Vec<ParserRef> {
        vec![self.body.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::combinators::primitives::CharLit;
    use crate::engine::input::Input;
    use arbor_error::ParseBudget;
    use arbor_tdd_support::must;

    fn state(text: &str) -> ParseState {
        ParseState::new(Input::from_text(text), ParseBudget::default())
    }

    #[test]
    fn present_body_consumes() {
        let p = Optional::new(CharLit::new('a'));
        let mut st = state("a");
        assert!(must(run(&p, &mut st)));
        assert_eq!(st.pos(), 1);
    }

    #[test]
    fn absent_body_still_succeeds() {
        let p = Optional::new(CharLit::new('a'));
        let mut st = state("b");
        assert!(must(run(&p, &mut st)));
        assert_eq!(st.pos(), 0);
    }
}
