//! Memoization of sub-parse outcomes.
//!
//! A memoizer caches what a parser did at a given position (and user
//! context): the end position on success, or a recorded failure, plus the
//! side-effect delta to re-apply on a hit. The concrete store is a
//! fixed-size LRU ring; `memoize` overwrites the oldest slot and `get`
//! scans newest to oldest. A cache hit must be indistinguishable from
//! re-running the parser, modulo the furthest-error side channel.
//!
//! Memoizers are strictly per-parse: tables live on the
//! [`ParseState`](crate::engine::state::ParseState) and die with it.

use super::effects::{EffectRef, Value};
use super::parser::{Parser, ParserRef, parser_id, run};
use super::state::ParseState;
use super::wellformed::NullableEnv;
use arbor_error::EngineResult;
use rustc_hash::FxHasher;
use std::fmt::Write as _;
use std::hash::Hasher;
use std::rc::Rc;
use std::sync::Arc;

/// Default slot count for a memo node with no explicit binding.
pub const DEFAULT_MEMO_CAPACITY: usize = 64;

/// One cached sub-parse outcome.
pub struct MemoEntry {
    parser: Option<ParserRef>,
    start_pos: usize,
    end_pos: Option<usize>,
    delta: Vec<EffectRef>,
    ctx: Option<Value>,
}

impl MemoEntry {
    /// Record an outcome. `end_pos: None` is a recorded failure;
    /// `parser` is set only when the owning memoizer keys on parser
    /// identity.
    pub fn new(
        parser: Option<ParserRef>,
        start_pos: usize,
        end_pos: Option<usize>,
        delta: Vec<EffectRef>,
        ctx: Option<Value>,
    ) -> Self {
        Self { parser, start_pos, end_pos, delta, ctx }
    }

    /// Whether this entry records a success. A zero-length success is
    /// still a success; only a recorded failure answers `false`.
    pub fn succeeded(&self) -> bool {
        self.end_pos.is_some()
    }

    /// Position at which the cached parse began.
    pub fn start_pos(&self) -> usize {
        self.start_pos
    }

    /// End position of the cached success, or `None` for a failure.
    pub fn end_pos(&self) -> Option<usize> {
        self.end_pos
    }

    /// The side effects to re-apply on a hit, oldest first.
    pub fn delta(&self) -> &[EffectRef] {
        &self.delta
    }

    fn matches(&self, parser: &ParserRef, pos: usize, ctx: Option<&Value>, by_parser: bool) -> bool {
        if self.start_pos != pos || !ctx_eq(self.ctx.as_ref(), ctx) {
            return false;
        }
        if by_parser {
            self.parser.as_ref().is_some_and(|p| Arc::ptr_eq(p, parser))
        } else {
            true
        }
    }
}

fn ctx_eq(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

/// Fixed-size LRU ring of memo entries.
///
/// Slots are keyed by a hash folding `(position, context identity)` and,
/// when `match_parser` is set, the parser identity. An unused slot keeps
/// hash `0` and terminates lookup scans; key hashes are forced nonzero so
/// the sentinel is unambiguous.
pub struct LruMemoizer {
    slots: Vec<Option<MemoEntry>>,
    hashes: Vec<u64>,
    head: usize,
    match_parser: bool,
}

impl LruMemoizer {
    /// Create a ring with `capacity` slots. Keys include parser identity
    /// iff `match_parser` (needed when one memoizer serves several
    /// parsers).
    pub fn new(capacity: usize, match_parser: bool) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            hashes: vec![0; capacity],
            head: 0,
            match_parser,
        }
    }

    /// Slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Whether keys include parser identity.
    pub fn match_parser(&self) -> bool {
        self.match_parser
    }

    fn key_hash(&self, parser: &ParserRef, pos: usize, ctx: Option<&Value>) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_usize(pos);
        hasher.write_usize(ctx.map_or(0, |c| Rc::as_ptr(c).cast::<()>() as usize));
        if self.match_parser {
            hasher.write_usize(parser_id(parser));
        }
        hasher.finish().max(1)
    }

    /// Look up the outcome for `parser` at `pos` under `ctx`. Scans
    /// newest to oldest; an empty slot ends the scan.
    pub fn get(&self, parser: &ParserRef, pos: usize, ctx: Option<&Value>) -> Option<&MemoEntry> {
        let hash = self.key_hash(parser, pos, ctx);
        let n = self.slots.len();
        for age in 0..n {
            let slot = (self.head + n - 1 - age) % n;
            if self.hashes[slot] == 0 {
                break;
            }
            if self.hashes[slot] != hash {
                continue;
            }
            if let Some(entry) = &self.slots[slot] {
                if entry.matches(parser, pos, ctx, self.match_parser) {
                    return Some(entry);
                }
            }
        }
        None
    }

    /// Store an outcome, overwriting the oldest slot.
    pub fn memoize(&mut self, parser: &ParserRef, entry: MemoEntry) {
        let hash = self.key_hash(parser, entry.start_pos, entry.ctx.as_ref());
        self.hashes[self.head] = hash;
        self.slots[self.head] = Some(entry);
        self.head = (self.head + 1) % self.slots.len();
    }

    /// Occupied entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &MemoEntry> {
        let n = self.slots.len();
        (0..n).filter_map(move |age| self.slots[(self.head + n - 1 - age) % n].as_ref())
    }

    /// Human-readable listing of the cached entries, newest first.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries().enumerate() {
            let outcome = match entry.end_pos {
                Some(end) => format!("success {}..{}", entry.start_pos, end),
                None => format!("failure at {}", entry.start_pos),
            };
            let name = entry
                .parser
                .as_ref()
                .map_or_else(|| "<keyed by position>".to_string(), |p| p.display_name());
            let _ = writeln!(out, "[{i}] {name}: {outcome} ({} effects)", entry.delta.len());
        }
        out
    }
}

/// Wrapper parser that consults a memoizer around a delegate.
///
/// On a success hit the cached delta is re-applied through the journal
/// and the position jumps to the cached end; on a failure hit the wrapper
/// fails without running the delegate. On a miss the delegate runs under
/// the normal discipline and its journal tail is harvested as the delta.
pub struct Memo {
    inner: ParserRef,
    capacity: usize,
}

impl Memo {
    /// Memoize `inner` with the default table capacity.
    pub fn new(inner: ParserRef) -> ParserRef {
        Self::with_capacity(inner, DEFAULT_MEMO_CAPACITY)
    }

    /// Memoize `inner` with an explicit table capacity.
    pub fn with_capacity(inner: ParserRef, capacity: usize) -> ParserRef {
        Arc::new(Self { inner, capacity })
    }

    fn identity(&self) -> usize {
        std::ptr::from_ref(self).cast::<()>() as usize
    }
}

impl Parser for Memo {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let id = self.identity();
        let mut table =
            state.take_memo_table(id, || LruMemoizer::new(self.capacity, false));

        let hit = table
            .get(&self.inner, state.pos(), state.ctx())
            .map(|entry| (entry.end_pos(), entry.delta().to_vec()));

        let result = match hit {
            Some((Some(end), delta)) => state.replay(&delta).map(|()| {
                state.set_pos(end);
                true
            }),
            Some((None, _)) => Ok(false),
            None => {
                let start = state.pos();
                let mark = state.journal_len();
                let ctx = state.ctx().cloned();
                match run(&self.inner, state) {
                    Ok(matched) => {
                        let delta = if matched { state.journal_tail(mark) } else { Vec::new() };
                        let end = matched.then(|| state.pos());
                        let keyed = table.match_parser().then(|| self.inner.clone());
                        table.memoize(&self.inner, MemoEntry::new(keyed, start, end, delta, ctx));
                        Ok(matched)
                    }
                    Err(err) => Err(err),
                }
            }
        };

        state.restore_memo_table(id, table);
        result
    }

    fn children(&self) -> Vec<ParserRef> {
        vec![self.inner.clone()]
    }

    fn kind_name(&self) -> &'static str {
        "memo"
    }

    fn nullable(&self, env: &NullableEnv) -> bool {
        env.is_nullable(&self.inner)
    }

    fn left_children(&self, _env: &NullableEnv) -> Vec<ParserRef> {
        vec![self.inner.clone()]
    }
}
