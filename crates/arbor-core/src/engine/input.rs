//! Input sources for a parse.
//!
//! An input is either a character sequence or an ordered sequence of
//! opaque tokens; exactly one mode is active per parse. Positions are
//! element indices (chars or tokens), `0` is the start, and `len()` is the
//! terminal valid position. Reads past the end answer with an EOF
//! sentinel: `0` for characters, `None` for tokens.

use arbor_error::InputMode;
use arbor_position::Span;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque token as seen by the engine.
///
/// Tokens carry a `kind` tag comparable by value, optional flags queried
/// by user predicates, and a downcast hook so build callbacks can recover
/// the concrete token type.
pub trait Token: fmt::Debug + Send + Sync {
    /// The token's kind tag.
    fn kind(&self) -> u32;

    /// Whether whitespace followed this token in the original source.
    fn trailing_whitespace(&self) -> bool {
        false
    }

    /// Downcast hook for user predicates and build callbacks.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a token.
pub type TokenRef = Arc<dyn Token>;

/// A character input: the original text plus a char-indexed view.
#[derive(Debug, Clone)]
pub struct CharInput {
    text: String,
    chars: Vec<char>,
}

impl CharInput {
    /// Build a char input from source text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = text.chars().collect();
        Self { text, chars }
    }

    /// Number of chars in the input.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The char at `i` as a code point, or `0` at and past the end.
    pub fn char_at(&self, i: usize) -> u32 {
        self.chars.get(i).map_or(0, |c| *c as u32)
    }

    /// The char at `i`, or `None` at and past the end.
    pub fn get(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    /// The chars covered by `span`, collected into a `String`. Spans past
    /// the end are clamped.
    pub fn slice(&self, span: Span) -> String {
        let end = span.end.min(self.chars.len());
        let start = span.start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// The original source text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A token input: an ordered sequence of opaque tokens.
#[derive(Debug, Clone)]
pub struct TokenInput {
    tokens: Vec<TokenRef>,
}

impl TokenInput {
    /// Build a token input from a materialized token sequence.
    pub fn new(tokens: Vec<TokenRef>) -> Self {
        Self { tokens }
    }

    /// Number of tokens in the input.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The token at `i`, or `None` at and past the end.
    pub fn get(&self, i: usize) -> Option<&TokenRef> {
        self.tokens.get(i)
    }
}

/// The input a parse runs over, in exactly one of the two modes.
#[derive(Debug, Clone)]
pub enum Input {
    /// Character mode.
    Chars(CharInput),
    /// Token mode.
    Tokens(TokenInput),
}

impl Input {
    /// Build a character input from source text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Input::Chars(CharInput::new(text))
    }

    /// Build a token input from a token sequence.
    pub fn from_tokens(tokens: Vec<TokenRef>) -> Self {
        Input::Tokens(TokenInput::new(tokens))
    }

    /// Number of elements (chars or tokens).
    pub fn len(&self) -> usize {
        match self {
            Input::Chars(c) => c.len(),
            Input::Tokens(t) => t.len(),
        }
    }

    /// Whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The active input mode.
    pub fn mode(&self) -> InputMode {
        match self {
            Input::Chars(_) => InputMode::Chars,
            Input::Tokens(_) => InputMode::Tokens,
        }
    }

    /// The char view, if character mode is active.
    pub fn as_chars(&self) -> Option<&CharInput> {
        match self {
            Input::Chars(c) => Some(c),
            Input::Tokens(_) => None,
        }
    }

    /// The token view, if token mode is active.
    pub fn as_tokens(&self) -> Option<&TokenInput> {
        match self {
            Input::Chars(_) => None,
            Input::Tokens(t) => Some(t),
        }
    }

    /// Matched text for `span` in character mode.
    pub fn slice(&self, span: Span) -> Option<String> {
        self.as_chars().map(|c| c.slice(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestToken(u32);

    impl Token for TestToken {
        fn kind(&self) -> u32 {
            self.0
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn char_input_eof_sentinel_is_zero() {
        let input = CharInput::new("ab");
        assert_eq!(input.char_at(0), 'a' as u32);
        assert_eq!(input.char_at(2), 0);
        assert_eq!(input.char_at(100), 0);
        assert_eq!(input.get(2), None);
    }

    #[test]
    fn char_input_counts_chars_not_bytes() {
        let input = CharInput::new("aé☃");
        assert_eq!(input.len(), 3);
        assert_eq!(input.get(2), Some('☃'));
        assert_eq!(input.slice(Span::new(1, 3)), "é☃");
    }

    #[test]
    fn slice_clamps_past_end() {
        let input = CharInput::new("abc");
        assert_eq!(input.slice(Span::new(1, 10)), "bc");
    }

    #[test]
    fn token_input_eof_is_none() {
        let tokens: Vec<TokenRef> = vec![Arc::new(TestToken(7))];
        let input = TokenInput::new(tokens);
        assert_eq!(input.len(), 1);
        assert_eq!(input.get(0).map(|t| t.kind()), Some(7));
        assert!(input.get(1).is_none());
    }

    #[test]
    fn mode_accessors() {
        let chars = Input::from_text("x");
        assert!(chars.as_chars().is_some());
        assert!(chars.as_tokens().is_none());
        assert_eq!(chars.mode(), InputMode::Chars);

        let tokens = Input::from_tokens(vec![]);
        assert!(tokens.as_tokens().is_some());
        assert!(tokens.as_chars().is_none());
        assert_eq!(tokens.mode(), InputMode::Tokens);
    }
}
