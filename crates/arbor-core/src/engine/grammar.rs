//! Grammar registration and freezing.
//!
//! A [`Grammar`] anchors the parsers of one language: it owns the strong
//! references that recursion bridges point at, and it caches the
//! well-formedness verdict so the analysis runs once per grammar rather
//! than once per parse.

use super::combinators::lazy::Lazy;
use super::driver::{ParseOptions, ParseOutcome, parse_with};
use super::input::Input;
use super::parser::ParserRef;
use super::wellformed;
use arbor_error::{EngineError, EngineResult};
use std::sync::{Arc, OnceLock};

/// The registry a grammar's parsers live in.
#[derive(Default)]
pub struct Grammar {
    anchors: Vec<ParserRef>,
    verdict: OnceLock<EngineResult<()>>,
}

impl Grammar {
    /// Create an empty grammar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a named forward reference for a rule defined later (or
    /// recursively).
    pub fn forward(&mut self, name: impl Into<String>) -> Arc<Lazy> {
        let bridge = Lazy::forward(name);
        self.anchors.push(bridge.clone());
        bridge
    }

    /// Bind a forward reference to its body. The grammar keeps the body
    /// alive; the bridge itself only holds a non-owning handle.
    pub fn define(&mut self, bridge: &Arc<Lazy>, body: ParserRef) -> EngineResult<()> {
        bridge.bind(&body)?;
        self.anchors.push(body);
        Ok(())
    }

    /// Register a parser so the well-formedness analysis covers it even
    /// when it is not reachable from the parse root.
    pub fn register(&mut self, parser: ParserRef) -> ParserRef {
        self.anchors.push(parser.clone());
        parser
    }

    /// Run the well-formedness analysis over everything registered plus
    /// `root`, caching the verdict. Subsequent calls reuse the cache.
    pub fn ensure_well_formed(&self, root: &ParserRef) -> EngineResult<()> {
        self.verdict
            .get_or_init(|| {
                let mut roots = self.anchors.clone();
                roots.push(root.clone());
                let flaws = wellformed::analyze(&roots);
                if flaws.is_empty() {
                    Ok(())
                } else {
                    Err(EngineError::GrammarIllFormed { flaws })
                }
            })
            .clone()
    }

    /// Parse a prefix of `input` with `root`, under `options`.
    pub fn parse(
        &self,
        root: &ParserRef,
        input: Input,
        options: ParseOptions,
    ) -> EngineResult<ParseOutcome> {
        parse_with(self, root, input, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::combinators::choice::Choice;
    use crate::engine::combinators::primitives::CharLit;
    use arbor_tdd_support::{must, must_err};

    #[test]
    fn ill_formed_grammar_is_refused_and_cached() {
        let mut grammar = Grammar::new();
        let bridge = grammar.forward("a");
        let rule: ParserRef = bridge.clone();
        let body = Choice::new(vec![rule.clone(), CharLit::new('x')]);
        must(grammar.define(&bridge, body));

        let err = must_err(grammar.ensure_well_formed(&rule));
        assert!(matches!(err, EngineError::GrammarIllFormed { .. }));
        // Cached verdict: same answer again.
        let again = must_err(grammar.ensure_well_formed(&rule));
        assert_eq!(err, again);
    }

    #[test]
    fn well_formed_grammar_passes_once() {
        let mut grammar = Grammar::new();
        let root = grammar.register(CharLit::new('x'));
        must(grammar.ensure_well_formed(&root));
        must(grammar.ensure_well_formed(&root));
    }
}
