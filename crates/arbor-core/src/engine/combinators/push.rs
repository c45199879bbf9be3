//! Frame capture and build callbacks.
//!
//! A collect node runs its inner parser and then hands the *frame* — the
//! values the inner parse pushed onto the AST stack — to a user callback,
//! replacing the frame with the single value the callback builds. The
//! replacement is a journaled effect, so backtracking past it restores
//! the original frame. A lookback variant additionally consumes values
//! that were already on the stack below the frame, which is how operator
//! folds thread their left operand through.

use crate::engine::effects::{ReplaceFrame, Value, downcast};
use crate::engine::input::Input;
use crate::engine::parser::{Parser, ParserRef, run};
use crate::engine::state::ParseState;
use crate::engine::wellformed::NullableEnv;
use arbor_error::{EngineError, EngineResult};
use arbor_position::Span;
use std::sync::Arc;

/// What a build callback sees: the matched span, the consumed values
/// (lookback values first, then the frame in push order), and the input.
pub struct BuildCtx<'a> {
    /// Input span the sub-parse covered.
    pub span: Span,
    /// The values being consumed, oldest first.
    pub items: &'a [Value],
    /// The input, for extracting matched text.
    pub input: &'a Input,
}

impl BuildCtx<'_> {
    /// Matched text, in character mode.
    pub fn text(&self) -> Option<String> {
        self.input.slice(self.span)
    }

    /// Borrow item `i` back as its concrete type.
    pub fn item<T: 'static>(&self, i: usize) -> Option<&T> {
        self.items.get(i).and_then(downcast)
    }
}

/// User callback that builds one value from a frame.
pub type BuildFn = Arc<dyn Fn(&BuildCtx<'_>) -> Value + Send + Sync>;

/// Replaces the AST frame of a successful sub-parse with one built value.
pub struct Collect {
    inner: ParserRef,
    lookback: usize,
    build: BuildFn,
}

impl Collect {
    /// Build a collect node over `inner`.
    pub fn new(
        inner: ParserRef,
        build: impl Fn(&BuildCtx<'_>) -> Value + Send + Sync + 'static,
    ) -> ParserRef {
        Arc::new(Self { inner, lookback: 0, build: Arc::new(build) })
    }

    /// Build a collect node that also consumes the `lookback` values
    /// immediately below the frame.
    pub fn with_lookback(
        inner: ParserRef,
        lookback: usize,
        build: impl Fn(&BuildCtx<'_>) -> Value + Send + Sync + 'static,
    ) -> ParserRef {
        Arc::new(Self { inner, lookback, build: Arc::new(build) })
    }
}

impl Parser for Collect {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let start_pos = state.pos();
        let frame_start = state.stack_len();
        if !run(&self.inner, state)? {
            return Ok(false);
        }
        if frame_start < self.lookback {
            return Err(EngineError::InternalInvariant {
                detail: format!(
                    "collect needs a lookback of {} but only {} values are below the frame",
                    self.lookback, frame_start
                ),
            });
        }
        let span = Span::new(start_pos, state.pos());
        let built = {
            let (input, stack) = state.input_and_stack();
            let items = &stack[frame_start - self.lookback..];
            (self.build)(&BuildCtx { span, items, input })
        };
        let count = state.stack_len() - frame_start + self.lookback;
        state.apply_effect(ReplaceFrame::new(count, built));
        Ok(true)
    }

    fn children(&self) -> Vec<ParserRef> {
        vec![self.inner.clone()]
    }

    fn kind_name(&self) -> &'static str {
        "collect"
    }

    fn nullable(&self, env: &NullableEnv) -> bool {
        env.is_nullable(&self.inner)
    }

    fn left_children(&self, _env: &NullableEnv) -> Vec<ParserRef> {
        vec![self.inner.clone()]
    }
}
