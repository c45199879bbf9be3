//! The top-level parse driver.
//!
//! Builds a [`ParseState`] over an input, runs the root parser under the
//! executor discipline, and folds the result into a [`ParseOutcome`]:
//! success with the final AST stack, or failure with furthest-error
//! diagnostics. Match failures never surface as Rust errors; everything
//! in `Err` is fatal.

use super::effects::Value;
use super::grammar::Grammar;
use super::input::Input;
use super::memo::LruMemoizer;
use super::parser::{ParserRef, parser_id, run};
use super::state::ParseState;
use arbor_error::{EngineResult, FailureContext, ParseBudget};
use std::fmt;
use tracing::debug;

/// Configuration for one driver invocation.
///
/// ```
/// use arbor_core::ParseOptions;
///
/// let options = ParseOptions::new().require_full_match(false);
/// ```
pub struct ParseOptions {
    require_full_match: bool,
    well_formed_check: bool,
    budget: ParseBudget,
    initial_ctx: Option<Value>,
    memoizers: Vec<(usize, LruMemoizer)>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            require_full_match: true,
            well_formed_check: true,
            budget: ParseBudget::default(),
            initial_ctx: None,
            memoizers: Vec::new(),
        }
    }
}

impl ParseOptions {
    /// Options with the defaults: full match required, well-formedness
    /// checked on the first parse of the grammar, default budget, no
    /// context, no explicit memoizers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a successful root that stops short of the end of input
    /// fails the parse. Default `true`.
    pub fn require_full_match(mut self, yes: bool) -> Self {
        self.require_full_match = yes;
        self
    }

    /// Whether to run (or reuse) the well-formedness analysis before
    /// parsing. Default `true`.
    pub fn well_formed_check(mut self, yes: bool) -> Self {
        self.well_formed_check = yes;
        self
    }

    /// Recursion budget for this parse.
    pub fn budget(mut self, budget: ParseBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Context value the parse starts with.
    pub fn initial_ctx(mut self, ctx: Value) -> Self {
        self.initial_ctx = Some(ctx);
        self
    }

    /// Bind an explicit memoizer to a memo node. Unbound memo nodes
    /// install a default-capacity table on first use.
    pub fn memoizer(mut self, node: &ParserRef, memoizer: LruMemoizer) -> Self {
        self.memoizers.push((parser_id(node), memoizer));
        self
    }
}

/// What a driver invocation produced.
pub enum ParseOutcome {
    /// The root matched (and covered the whole input, if required).
    Success {
        /// Position after the root parser.
        end_pos: usize,
        /// The final AST stack, oldest value first.
        ast: Vec<Value>,
    },
    /// The root failed, or stopped short with `require_full_match`.
    Failure {
        /// Furthest position at which a leaf parser failed.
        furthest_pos: Option<usize>,
        /// The parsers that failed there.
        causes: Vec<ParserRef>,
    },
}

impl ParseOutcome {
    /// Whether the parse succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, ParseOutcome::Success { .. })
    }

    /// End position of a success.
    pub fn end_pos(&self) -> Option<usize> {
        match self {
            ParseOutcome::Success { end_pos, .. } => Some(*end_pos),
            ParseOutcome::Failure { .. } => None,
        }
    }

    /// The final AST stack of a success; empty for failures.
    pub fn ast(&self) -> &[Value] {
        match self {
            ParseOutcome::Success { ast, .. } => ast,
            ParseOutcome::Failure { .. } => &[],
        }
    }

    /// Furthest failure position of a failure.
    pub fn furthest_pos(&self) -> Option<usize> {
        match self {
            ParseOutcome::Success { .. } => None,
            ParseOutcome::Failure { furthest_pos, .. } => *furthest_pos,
        }
    }

    /// Display names of the furthest-failure causes.
    pub fn cause_names(&self) -> Vec<String> {
        match self {
            ParseOutcome::Success { .. } => Vec::new(),
            ParseOutcome::Failure { causes, .. } => {
                causes.iter().map(|p| p.display_name()).collect()
            }
        }
    }

    /// Locate a failure in its source for rendering. `None` for
    /// successes.
    pub fn failure_context(&self, source: &str) -> Option<FailureContext> {
        match self {
            ParseOutcome::Success { .. } => None,
            ParseOutcome::Failure { furthest_pos, .. } => Some(FailureContext::locate(
                furthest_pos.unwrap_or(0),
                self.cause_names(),
                source,
            )),
        }
    }
}

impl fmt::Debug for ParseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseOutcome::Success { end_pos, ast } => f
                .debug_struct("Success")
                .field("end_pos", end_pos)
                .field("ast_len", &ast.len())
                .finish(),
            ParseOutcome::Failure { furthest_pos, causes: _ } => f
                .debug_struct("Failure")
                .field("furthest_pos", furthest_pos)
                .field("causes", &self.cause_names())
                .finish(),
        }
    }
}

/// Parse a prefix of `input` with `root` under a throwaway grammar.
/// Grammars with forward references (or a cached well-formedness verdict)
/// should go through [`Grammar::parse`].
pub fn parse(root: &ParserRef, input: Input, options: ParseOptions) -> EngineResult<ParseOutcome> {
    Grammar::new().parse(root, input, options)
}

pub(crate) fn parse_with(
    grammar: &Grammar,
    root: &ParserRef,
    input: Input,
    options: ParseOptions,
) -> EngineResult<ParseOutcome> {
    if options.well_formed_check {
        grammar.ensure_well_formed(root)?;
    }

    let mut state = ParseState::new(input, options.budget);
    state.set_initial_ctx(options.initial_ctx);
    for (id, memoizer) in options.memoizers {
        state.bind_memoizer(id, memoizer);
    }

    debug!(input_len = state.input().len(), root = %root.display_name(), "parse start");
    let matched = run(root, &mut state)?;
    let end_pos = state.pos();
    let full = end_pos == state.input().len();

    if matched && (full || !options.require_full_match) {
        debug!(end_pos, ast_len = state.ast_stack().len(), "parse succeeded");
        return Ok(ParseOutcome::Success { end_pos, ast: state.into_ast_stack() });
    }

    let furthest_pos = match (matched, state.furthest_error_pos()) {
        (true, Some(furthest)) => Some(furthest.max(end_pos)),
        (true, None) => Some(end_pos),
        (false, furthest) => furthest,
    };
    let causes = state.furthest_error_causes().to_vec();
    debug!(?furthest_pos, causes = causes.len(), "parse failed");
    Ok(ParseOutcome::Failure { furthest_pos, causes })
}
