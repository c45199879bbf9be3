//! Append-only log of applied side effects.
//!
//! The journal is the engine's transaction mechanism: every reversible
//! mutation is logged here after being applied, and backtracking undoes a
//! suffix of the log in reverse order. Between snapshots the journal only
//! grows; rollback to a snapshot unapplies and discards everything after
//! it.

use super::effects::{EffectRef, StateCells};
use arbor_error::{EngineError, EngineResult};

/// Ordered sequence of already-applied side effects.
#[derive(Default)]
pub struct Journal {
    entries: Vec<EffectRef>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of logged effects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Log an effect that has already been applied.
    pub fn push(&mut self, effect: EffectRef) {
        self.entries.push(effect);
    }

    /// Undo every effect logged after `mark`, newest first, and discard
    /// them. A journal shorter than `mark` means a snapshot from another
    /// lifetime was used.
    pub fn rollback_to(&mut self, mark: usize, cells: &mut StateCells) -> EngineResult<()> {
        if mark > self.entries.len() {
            return Err(EngineError::InternalInvariant {
                detail: format!(
                    "rollback to journal mark {} but only {} entries are logged",
                    mark,
                    self.entries.len()
                ),
            });
        }
        for effect in self.entries.drain(mark..).rev() {
            effect.unapply(cells);
        }
        Ok(())
    }

    /// Clone the effects logged at or after `mark`, oldest first. This is
    /// the delta a memoizer stores for replay.
    pub fn tail_since(&self, mark: usize) -> Vec<EffectRef> {
        self.entries.get(mark..).map(<[EffectRef]>::to_vec).unwrap_or_default()
    }

    /// Re-apply a stored delta, logging each effect. Validates in debug
    /// builds that every effect has the stack depth it needs.
    pub fn replay(&mut self, delta: &[EffectRef], cells: &mut StateCells) -> EngineResult<()> {
        for effect in delta {
            if cfg!(debug_assertions) && cells.ast_stack.len() < effect.min_stack_depth() {
                return Err(EngineError::MemoizerInconsistency {
                    detail: format!(
                        "replaying {:?} needs stack depth {} but found {}",
                        effect,
                        effect.min_stack_depth(),
                        cells.ast_stack.len()
                    ),
                });
            }
            effect.apply(cells);
            self.entries.push(effect.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::effects::{PushValue, ReplaceFrame, downcast, value};
    use arbor_tdd_support::{must, must_err};

    fn stack_of(cells: &StateCells) -> Vec<i64> {
        cells.ast_stack.iter().filter_map(|v| downcast::<i64>(v).copied()).collect()
    }

    fn log_push(journal: &mut Journal, cells: &mut StateCells, n: i64) {
        let effect = PushValue::new(value(n));
        effect.apply(cells);
        journal.push(effect);
    }

    #[test]
    fn rollback_undoes_suffix_in_reverse() {
        let mut journal = Journal::new();
        let mut cells = StateCells::default();
        log_push(&mut journal, &mut cells, 1);
        let mark = journal.len();
        log_push(&mut journal, &mut cells, 2);
        let replace = ReplaceFrame::new(2, value(12i64));
        replace.apply(&mut cells);
        journal.push(replace);
        assert_eq!(stack_of(&cells), vec![12]);

        must(journal.rollback_to(mark, &mut cells));
        assert_eq!(stack_of(&cells), vec![1]);
        assert_eq!(journal.len(), mark);
    }

    #[test]
    fn rollback_to_current_length_is_noop() {
        let mut journal = Journal::new();
        let mut cells = StateCells::default();
        log_push(&mut journal, &mut cells, 1);
        must(journal.rollback_to(1, &mut cells));
        assert_eq!(stack_of(&cells), vec![1]);
    }

    #[test]
    fn rollback_past_end_is_invariant_violation() {
        let mut journal = Journal::new();
        let mut cells = StateCells::default();
        let err = must_err(journal.rollback_to(3, &mut cells));
        assert!(matches!(err, EngineError::InternalInvariant { .. }));
    }

    #[test]
    fn replay_reapplies_and_logs() {
        let mut journal = Journal::new();
        let mut cells = StateCells::default();
        log_push(&mut journal, &mut cells, 7);
        let delta = journal.tail_since(0);

        let mut other_journal = Journal::new();
        let mut other_cells = StateCells::default();
        must(other_journal.replay(&delta, &mut other_cells));
        assert_eq!(stack_of(&other_cells), vec![7]);
        assert_eq!(other_journal.len(), 1);
    }

    #[test]
    fn replay_with_starved_stack_is_inconsistency() {
        let delta = vec![ReplaceFrame::new(2, value(0i64))];
        let mut journal = Journal::new();
        let mut cells = StateCells::default();
        if cfg!(debug_assertions) {
            let err = must_err(journal.replay(&delta, &mut cells));
            assert!(matches!(err, EngineError::MemoizerInconsistency { .. }));
        }
    }
}
