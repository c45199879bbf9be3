//! Leaf parsers: single-element matches against the input.
//!
//! Leaves are the furthest-error reporting points: when one fails, the
//! executor records it against the position it failed at. Character
//! primitives require character input and token primitives require token
//! input; the wrong mode is a grammar programming error, not a match
//! failure.

use crate::engine::input::{CharInput, Token, TokenInput};
use crate::engine::parser::{Parser, ParserRef, run};
use crate::engine::state::ParseState;
use crate::engine::wellformed::NullableEnv;
use arbor_error::{EngineError, EngineResult, InputMode};
use std::sync::Arc;

/// Predicate over a single char.
pub type CharPredFn = Arc<dyn Fn(char) -> bool + Send + Sync>;

/// Predicate over a single token.
pub type TokenPredFn = Arc<dyn Fn(&dyn Token) -> bool + Send + Sync>;

fn chars_view<'a>(state: &'a ParseState, parser: &dyn Parser) -> EngineResult<&'a CharInput> {
    state.input().as_chars().ok_or_else(|| EngineError::WrongInputMode {
        expected: InputMode::Chars,
        parser: parser.display_name(),
    })
}

fn tokens_view<'a>(state: &'a ParseState, parser: &dyn Parser) -> EngineResult<&'a TokenInput> {
    state.input().as_tokens().ok_or_else(|| EngineError::WrongInputMode {
        expected: InputMode::Tokens,
        parser: parser.display_name(),
    })
}

/// Matches any single element (char or token) except EOF.
pub struct AnyElem;

impl AnyElem {
    /// Build an any-element leaf.
    pub fn new() -> ParserRef {
        Arc::new(Self)
    }
}

impl Parser for AnyElem {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        if state.pos() < state.input().len() {
            state.advance(1);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn children(&self) -> Vec<ParserRef> {
        Vec::new()
    }

    fn kind_name(&self) -> &'static str {
        "any"
    }

    fn is_leaf(&self) -> bool {
        true
    }
}

/// Matches one specific char.
pub struct CharLit {
    ch: char,
}

impl CharLit {
    /// Build a literal-char leaf.
    pub fn new(ch: char) -> ParserRef {
        Arc::new(Self { ch })
    }
}

impl Parser for CharLit {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let matched = { chars_view(state, self)?.get(state.pos()) == Some(self.ch) };
        if matched {
            state.advance(1);
        }
        Ok(matched)
    }

    fn children(&self) -> Vec<ParserRef> {
        Vec::new()
    }

    fn kind_name(&self) -> &'static str {
        "char"
    }

    fn is_leaf(&self) -> bool {
        true
    }

    fn display_name(&self) -> String {
        format!("'{}'", self.ch)
    }
}

/// Matches one char in an inclusive range.
pub struct CharRange {
    lo: char,
    hi: char,
}

impl CharRange {
    /// Build a char-range leaf over `lo..=hi`.
    pub fn new(lo: char, hi: char) -> ParserRef {
        Arc::new(Self { lo, hi })
    }
}

impl Parser for CharRange {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let matched = {
            chars_view(state, self)?
                .get(state.pos())
                .is_some_and(|c| c >= self.lo && c <= self.hi)
        };
        if matched {
            state.advance(1);
        }
        Ok(matched)
    }

    fn children(&self) -> Vec<ParserRef> {
        Vec::new()
    }

    fn kind_name(&self) -> &'static str {
        "char_range"
    }

    fn is_leaf(&self) -> bool {
        true
    }

    fn display_name(&self) -> String {
        format!("['{}'-'{}']", self.lo, self.hi)
    }
}

/// Matches one char satisfying a named predicate.
pub struct CharPred {
    name: String,
    pred: CharPredFn,
}

impl CharPred {
    /// Build a predicate leaf. The name is what diagnostics print.
    pub fn new(name: impl Into<String>, pred: impl Fn(char) -> bool + Send + Sync + 'static) -> ParserRef {
        Arc::new(Self { name: name.into(), pred: Arc::new(pred) })
    }
}

impl Parser for CharPred {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let matched =
            { chars_view(state, self)?.get(state.pos()).is_some_and(|c| (self.pred)(c)) };
        if matched {
            state.advance(1);
        }
        Ok(matched)
    }

    fn children(&self) -> Vec<ParserRef> {
        Vec::new()
    }

    fn kind_name(&self) -> &'static str {
        "char_pred"
    }

    fn rule_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn is_leaf(&self) -> bool {
        true
    }
}

/// Matches an exact sequence of chars, advancing by its length.
pub struct Text {
    text: String,
    chars: Vec<char>,
}

impl Text {
    /// Build a string-literal leaf.
    pub fn new(text: impl Into<String>) -> ParserRef {
        let text = text.into();
        let chars = text.chars().collect();
        Arc::new(Self { text, chars })
    }
}

impl Parser for Text {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let matched = {
            let input = chars_view(state, self)?;
            self.chars.iter().enumerate().all(|(i, c)| input.get(state.pos() + i) == Some(*c))
        };
        if matched {
            state.advance(self.chars.len());
        }
        Ok(matched)
    }

    fn children(&self) -> Vec<ParserRef> {
        Vec::new()
    }

    fn kind_name(&self) -> &'static str {
        "text"
    }

    fn is_leaf(&self) -> bool {
        true
    }

    fn nullable(&self, _env: &NullableEnv) -> bool {
        self.chars.is_empty()
    }

    fn display_name(&self) -> String {
        format!("\"{}\"", self.text)
    }
}

/// Matches one token with the given kind tag.
pub struct TokenKindIs {
    kind: u32,
}

impl TokenKindIs {
    /// Build a token-kind leaf.
    pub fn new(kind: u32) -> ParserRef {
        Arc::new(Self { kind })
    }
}

impl Parser for TokenKindIs {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let matched = {
            tokens_view(state, self)?.get(state.pos()).is_some_and(|t| t.kind() == self.kind)
        };
        if matched {
            state.advance(1);
        }
        Ok(matched)
    }

    fn children(&self) -> Vec<ParserRef> {
        Vec::new()
    }

    fn kind_name(&self) -> &'static str {
        "token_kind"
    }

    fn is_leaf(&self) -> bool {
        true
    }

    fn display_name(&self) -> String {
        format!("token({})", self.kind)
    }
}

/// Matches one token satisfying a named predicate.
pub struct TokenPred {
    name: String,
    pred: TokenPredFn,
}

impl TokenPred {
    /// Build a token-predicate leaf. The name is what diagnostics print.
    pub fn new(
        name: impl Into<String>,
        pred: impl Fn(&dyn Token) -> bool + Send + Sync + 'static,
    ) -> ParserRef {
        Arc::new(Self { name: name.into(), pred: Arc::new(pred) })
    }
}

impl Parser for TokenPred {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let matched = {
            tokens_view(state, self)?.get(state.pos()).is_some_and(|t| (self.pred)(t.as_ref()))
        };
        if matched {
            state.advance(1);
        }
        Ok(matched)
    }

    fn children(&self) -> Vec<ParserRef> {
        Vec::new()
    }

    fn kind_name(&self) -> &'static str {
        "token_pred"
    }

    fn rule_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn is_leaf(&self) -> bool {
        true
    }
}

/// A transparent naming wrapper: delegates matching, leafness, and graph
/// structure to its inner parser while giving it a display name for
/// diagnostics and rule-level tracing.
pub struct Named {
    name: String,
    inner: ParserRef,
}

impl Named {
    /// Wrap `inner` under `name`.
    pub fn new(name: impl Into<String>, inner: ParserRef) -> ParserRef {
        Arc::new(Self { name: name.into(), inner })
    }
}

impl Parser for Named {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        if self.inner.is_leaf() {
            // Share one executor frame with a leaf so the failure is
            // recorded against this name, not the anonymous inner.
            self.inner.do_parse(state)
        } else {
            run(&self.inner, state)
        }
    }

    fn children(&self) -> Vec<ParserRef> {
        vec![self.inner.clone()]
    }

    fn kind_name(&self) -> &'static str {
        "rule"
    }

    fn rule_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn is_leaf(&self) -> bool {
        self.inner.is_leaf()
    }

    fn nullable(&self, env: &NullableEnv) -> bool {
        env.is_nullable(&self.inner)
    }

    fn left_children(&self, _env: &NullableEnv) -> Vec<ParserRef> {
        vec![self.inner.clone()]
    }
}
