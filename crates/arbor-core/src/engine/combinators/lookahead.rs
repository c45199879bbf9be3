//! Zero-width lookahead, positive and negative.

use crate::engine::parser::{Parser, ParserRef, run};
use crate::engine::state::ParseState;
use crate::engine::wellformed::NullableEnv;
use arbor_error::EngineResult;
use std::sync::Arc;

/// Positive lookahead: probes its body and restores the state whether or
/// not it matched; succeeds iff the body matched. Never consumes input or
/// retains effects.
pub struct Lookahead {
    body: ParserRef,
}

impl Lookahead {
    /// Build a positive lookahead over `body`.
    pub fn new(body: ParserRef) -> ParserRef {
        Arc::new(Self { body })
    }
}

impl Parser for Lookahead {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let snapshot = state.snapshot();
        let matched = run(&self.body, state)?;
        if matched {
            state.rollback(&snapshot)?;
        }
        Ok(matched)
    }

    fn children(&self) -> Vec<ParserRef> {
        vec![self.body.clone()]
    }

    fn kind_name(&self) -> &'static str {
        "lookahead"
    }

    fn nullable(&self, _env: &NullableEnv) -> bool {
        true
    }

    fn left_children(&self, _env: &NullableEnv) -> Vec<ParserRef> {
        vec![self.body.clone()]
    }
}

/// Negative lookahead: probes its body and restores the state; succeeds
/// iff the body did *not* match.
pub struct Not {
    body: ParserRef,
}

impl Not {
    /// Build a negative lookahead over `body`.
    pub fn new(body: ParserRef) -> ParserRef {
        Arc::new(Self { body })
    }
}

impl Parser for Not {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let snapshot = state.snapshot();
        let matched = run(&self.body, state)?;
        if matched {
            state.rollback(&snapshot)?;
        }
        Ok(!matched)
    }

    fn children(&self) -> Vec<ParserRef> {
        vec![self.body.clone()]
    }

    fn kind_name(&self) -> &'static str {
        "negative_lookahead"
    }

    fn nullable(&self, _env: &NullableEnv) -> bool {
        true
    }

    fn left_children(&self, _env: &NullableEnv) -> Vec<ParserRef> {
        vec![self.body.clone()]
    }
}
