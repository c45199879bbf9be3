//! Mutable parse state threaded through every parser invocation.
//!
//! One `ParseState` exists per driver invocation. It bundles the input,
//! the current position, the side-effect journal, the AST stack, the user
//! context slot, furthest-error bookkeeping, and the per-parse memo
//! tables. The state is an explicit value passed down the call tree; it is
//! never shared across threads.
//!
//! Transactionality: a caller that takes a snapshot, runs arbitrary
//! parsers, and rolls back observes no change to position, journal, AST
//! stack, or context. Furthest-error fields are deliberately exempt: they
//! persist across rollback to feed diagnostics.

use super::effects::{EffectRef, PushValue, StateCells, SwapContext, Value};
use super::input::Input;
use super::journal::Journal;
use super::memo::LruMemoizer;
use super::parser::ParserRef;
use arbor_error::{BudgetTracker, EngineResult, ParseBudget};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A point-in-time capture of the transactional parts of the state.
///
/// Snapshots are cheap: position, journal length, and a clone of the
/// context handle.
#[derive(Clone)]
pub struct Snapshot {
    pos: usize,
    journal_len: usize,
    ctx: Option<Value>,
}

impl Snapshot {
    /// Position at capture time.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Journal length at capture time.
    pub fn journal_len(&self) -> usize {
        self.journal_len
    }
}

/// The mutable bundle a parse threads through every `do_parse` call.
pub struct ParseState {
    input: Input,
    pos: usize,
    journal: Journal,
    cells: StateCells,
    furthest_error_pos: Option<usize>,
    furthest_error_causes: Vec<ParserRef>,
    budget: ParseBudget,
    pub(crate) tracker: BudgetTracker,
    memo_tables: FxHashMap<usize, LruMemoizer>,
}

impl ParseState {
    /// Create a fresh state over `input` with the given budget.
    pub fn new(input: Input, budget: ParseBudget) -> Self {
        Self {
            input,
            pos: 0,
            journal: Journal::new(),
            cells: StateCells::default(),
            furthest_error_pos: None,
            furthest_error_causes: Vec::new(),
            budget,
            tracker: BudgetTracker::new(),
            memo_tables: FxHashMap::default(),
        }
    }

    /// The input this parse runs over.
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Current position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move to an absolute position.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Advance the position by `n` elements.
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// The configured budget.
    pub fn budget(&self) -> &ParseBudget {
        &self.budget
    }

    /// The AST stack as pushed so far.
    pub fn ast_stack(&self) -> &[Value] {
        &self.cells.ast_stack
    }

    /// Current AST stack depth.
    pub fn stack_len(&self) -> usize {
        self.cells.ast_stack.len()
    }

    /// Input and AST stack together, for build callbacks that need both.
    pub fn input_and_stack(&self) -> (&Input, &[Value]) {
        (&self.input, &self.cells.ast_stack)
    }

    /// The user-context value, if any.
    pub fn ctx(&self) -> Option<&Value> {
        self.cells.ctx.as_ref()
    }

    /// Swap the user context transactionally. The swap is journaled, so
    /// backtracking past this point restores the previous context.
    pub fn swap_ctx(&mut self, new: Option<Value>) {
        self.apply_effect(SwapContext::new(new));
    }

    /// Install the context a parse starts with. Not journaled: nothing
    /// can backtrack past the first position.
    pub(crate) fn set_initial_ctx(&mut self, ctx: Option<Value>) {
        self.cells.ctx = ctx;
    }

    /// Push a value onto the AST stack through the journal.
    pub fn push_value(&mut self, value: Value) {
        self.apply_effect(PushValue::new(value));
    }

    /// Apply an effect and log it.
    pub fn apply_effect(&mut self, effect: EffectRef) {
        effect.apply(&mut self.cells);
        self.journal.push(effect);
    }

    /// Log an effect that the caller has already applied.
    pub fn log(&mut self, effect: EffectRef) {
        self.journal.push(effect);
    }

    /// Current journal length, for memo delta harvesting.
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    /// Clone the journal tail logged at or after `mark`.
    pub fn journal_tail(&self, mark: usize) -> Vec<EffectRef> {
        self.journal.tail_since(mark)
    }

    /// Re-apply a memoized delta through the journal.
    pub fn replay(&mut self, delta: &[EffectRef]) -> EngineResult<()> {
        self.journal.replay(delta, &mut self.cells)
    }

    /// Capture the transactional parts of the state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            journal_len: self.journal.len(),
            ctx: self.cells.ctx.clone(),
        }
    }

    /// Keep everything done since `snapshot`. Applied effects stay logged.
    pub fn commit(&mut self, snapshot: Snapshot) {
        // Effects are logged as they are applied, so there is nothing to
        // flush. The handle is consumed to end the transaction.
        let _ = snapshot;
    }

    /// Undo everything done since `snapshot`: unapply the journal suffix
    /// in reverse, restore position and context. Furthest-error fields
    /// are left untouched.
    pub fn rollback(&mut self, snapshot: &Snapshot) -> EngineResult<()> {
        self.journal.rollback_to(snapshot.journal_len, &mut self.cells)?;
        self.pos = snapshot.pos;
        self.cells.ctx = snapshot.ctx.clone();
        Ok(())
    }

    /// Record a leaf-level match failure at `pos`.
    ///
    /// Furthest-error tracking is monotonic: a failure beyond the current
    /// furthest position resets the cause set; a failure at the same
    /// position joins it; anything earlier is ignored.
    pub fn record_error(&mut self, parser: &ParserRef, pos: usize) {
        match self.furthest_error_pos {
            Some(furthest) if pos < furthest => {}
            Some(furthest) if pos == furthest => {
                if !self.furthest_error_causes.iter().any(|p| Arc::ptr_eq(p, parser)) {
                    self.furthest_error_causes.push(parser.clone());
                }
            }
            _ => {
                self.furthest_error_pos = Some(pos);
                self.furthest_error_causes.clear();
                self.furthest_error_causes.push(parser.clone());
            }
        }
    }

    /// Furthest position at which a leaf parser failed, if any.
    pub fn furthest_error_pos(&self) -> Option<usize> {
        self.furthest_error_pos
    }

    /// The parsers that failed at the furthest position.
    pub fn furthest_error_causes(&self) -> &[ParserRef] {
        &self.furthest_error_causes
    }

    /// Seed an explicit memoizer for the memo node with identity `id`.
    pub(crate) fn bind_memoizer(&mut self, id: usize, memoizer: LruMemoizer) {
        self.memo_tables.insert(id, memoizer);
    }

    /// Temporarily detach the memo table for `id`, creating it on first
    /// use. The caller must hand it back with [`ParseState::restore_memo_table`].
    pub(crate) fn take_memo_table(
        &mut self,
        id: usize,
        default: impl FnOnce() -> LruMemoizer,
    ) -> LruMemoizer {
        self.memo_tables.remove(&id).unwrap_or_else(default)
    }

    /// Reattach a memo table detached with [`ParseState::take_memo_table`].
    pub(crate) fn restore_memo_table(&mut self, id: usize, table: LruMemoizer) {
        self.memo_tables.insert(id, table);
    }

    /// Consume the state, yielding the final AST stack.
    pub fn into_ast_stack(self) -> Vec<Value> {
        self.cells.ast_stack
    }
}
