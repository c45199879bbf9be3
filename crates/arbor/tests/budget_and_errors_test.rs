//! Fatal error surfacing through the driver: budgets, input-mode
//! mismatches, and unbound recursion bridges.

use arbor::dsl::{ch, choice, forward, seq, token_kind};
use arbor::{
    EngineError, Grammar, Input, InputMode, ParseBudget, ParseOptions, ParserRef, parse,
};
use arbor_tdd_support::{must, must_err};

#[test]
fn deep_recursion_exhausts_the_budget() {
    // a := 'x' a / 'x' needs one nesting level per char.
    let mut grammar = Grammar::new();
    let bridge = grammar.forward("a");
    let a: ParserRef = bridge.clone();
    must(grammar.define(&bridge, choice(vec![seq(vec![ch('x'), a.clone()]), ch('x')])));

    let deep = "x".repeat(600);
    let err = must_err(grammar.parse(
        &a,
        Input::from_text(deep.as_str()),
        ParseOptions::new().budget(ParseBudget { max_depth: 64 }),
    ));
    assert_eq!(err, EngineError::DepthExceeded { limit: 64 });

    // The same input parses under an adequate budget.
    let outcome = must(grammar.parse(
        &a,
        Input::from_text(deep.as_str()),
        ParseOptions::new().budget(ParseBudget { max_depth: 10_000 }),
    ));
    assert!(outcome.is_success());
}

#[test]
fn char_grammar_against_token_input_is_fatal() {
    let grammar = ch('a');
    let err = must_err(parse(&grammar, Input::from_tokens(vec![]), ParseOptions::new()));
    assert!(matches!(err, EngineError::WrongInputMode { expected: InputMode::Chars, .. }));
}

#[test]
fn token_grammar_against_char_input_is_fatal() {
    let grammar = token_kind(1);
    let err = must_err(parse(&grammar, Input::from_text("a"), ParseOptions::new()));
    assert!(matches!(err, EngineError::WrongInputMode { expected: InputMode::Tokens, .. }));
}

#[test]
fn unbound_forward_reference_is_fatal() {
    let bridge = forward("orphan");
    let root: ParserRef = bridge;
    let err = must_err(parse(&root, Input::from_text("x"), ParseOptions::new()));
    assert!(matches!(err, EngineError::InternalInvariant { .. }));
}

#[test]
fn error_text_names_the_offending_parser() {
    let grammar = ch('a');
    let err = must_err(parse(&grammar, Input::from_tokens(vec![]), ParseOptions::new()));
    assert!(err.to_string().contains("'a'"), "error was: {err}");
}
