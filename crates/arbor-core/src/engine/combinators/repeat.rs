//! Greedy repetition.

use crate::engine::parser::{Parser, ParserRef, run};
use crate::engine::state::ParseState;
use crate::engine::wellformed::NullableEnv;
use arbor_error::EngineResult;
use std::sync::Arc;

/// Runs its body repeatedly until it fails or `max` is reached, committing
/// each successful iteration. Succeeds iff at least `min` iterations
/// matched. Greedy: the repetition never gives back an iteration to help
/// a following sibling (PEG semantics).
pub struct Repeat {
    body: ParserRef,
    min: usize,
    max: Option<usize>,
}

impl Repeat {
    /// Build a repetition of `body` between `min` and `max` times;
    /// `max: None` means unbounded.
    pub fn new(body: ParserRef, min: usize, max: Option<usize>) -> ParserRef {
        Arc::new(Self { body, min, max })
    }
}

impl Parser for Repeat {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let mut count = 0;
        loop {
            if let Some(max) = self.max {
                if count >= max {
                    break;
                }
            }
            let before = state.pos();
            if !run(&self.body, state)? {
                break;
            }
            count += 1;
            if state.pos() == before {
                // A zero-width match would repeat forever.
                break;
            }
        }
        Ok(count >= self.min)
    }

    fn children(&self) -> Vec<ParserRef> {
        vec![self.body.clone()]
    }

    fn kind_name(&self) -> &'static str {
        "repeat"
    }

    fn nullable(&self, env: &NullableEnv) -> bool {
        self.min == 0 || env.is_nullable(&self.body)
    }

    fn left_children(&self, _env: &NullableEnv) -> Vec<ParserRef> {
        vec![self.body.clone()]
    }

    fn nullable_repetition(&self, env: &NullableEnv) -> bool {
        self.max.is_none() && env.is_nullable(&self.body)
    }
}
