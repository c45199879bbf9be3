//! Sequencing: run children in order, all must match.

use crate::engine::parser::{Parser, ParserRef, run};
use crate::engine::state::ParseState;
use crate::engine::wellformed::NullableEnv;
use arbor_error::EngineResult;
use std::sync::Arc;

/// Runs its children in order; succeeds iff all succeed. Any child
/// failure fails the whole sequence and the executor restores the state.
pub struct Sequence {
    children: Vec<ParserRef>,
}

impl Sequence {
    /// Build a sequence over `children`.
    pub fn new(children: Vec<ParserRef>) -> ParserRef {
        Arc::new(Self { children })
    }
}

impl Parser for Sequence {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        for child in &self.children {
            if !run(child, state)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn children(&self) -> Vec<ParserRef> {
        self.children.clone()
    }

    fn kind_name(&self) -> &'static str {
        "sequence"
    }

    fn nullable(&self, env: &NullableEnv) -> bool {
        self.children.iter().all(|c| env.is_nullable(c))
    }

    fn left_children(&self, env: &NullableEnv) -> Vec<ParserRef> {
        // Children up to and including the first that must consume input.
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child.clone());
            if !env.is_nullable(child) {
                break;
            }
        }
        out
    }
}
