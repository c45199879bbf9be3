//! Property tests for the engine's core guarantees: determinism,
//! transactionality on failure, greedy repetition, prefix capture, and
//! furthest-error bounds.

mod common;

use arbor::dsl::{ch, choice, many0, seq, text};
use arbor::{Input, ParseBudget, ParseOptions, ParseState, parse, run};
use arbor_tdd_support::must;
use common::{arith_grammar, expr_of};
use proptest::prelude::*;

proptest! {
    #[test]
    fn parsing_twice_is_deterministic(input in "[0-9+x]{0,12}") {
        let first = must(parse(
            &arith_grammar(),
            Input::from_text(input.as_str()),
            ParseOptions::new().require_full_match(false),
        ));
        let second = must(parse(
            &arith_grammar(),
            Input::from_text(input.as_str()),
            ParseOptions::new().require_full_match(false),
        ));
        prop_assert_eq!(first.is_success(), second.is_success());
        prop_assert_eq!(first.end_pos(), second.end_pos());
        prop_assert_eq!(first.furthest_pos(), second.furthest_pos());
        if first.is_success() {
            prop_assert_eq!(expr_of(&first), expr_of(&second));
        }
    }

    #[test]
    fn failure_restores_the_state_exactly(input in "[ab]{0,10}") {
        // A grammar that consumes input and then always fails.
        let doomed = seq(vec![many0(choice(vec![ch('a'), ch('b')])), text("zz")]);
        let mut state = ParseState::new(Input::from_text(input.as_str()), ParseBudget::default());
        let pos_before = state.pos();
        let journal_before = state.journal_len();
        let stack_before = state.stack_len();

        let matched = must(run(&doomed, &mut state));
        prop_assert!(!matched);
        prop_assert_eq!(state.pos(), pos_before);
        prop_assert_eq!(state.journal_len(), journal_before);
        prop_assert_eq!(state.stack_len(), stack_before);
    }

    #[test]
    fn greedy_repetition_starves_its_sibling(count in 0usize..24) {
        let input = "a".repeat(count);
        let grammar = seq(vec![many0(ch('a')), ch('a')]);
        let outcome = must(parse(
            &grammar,
            Input::from_text(input.as_str()),
            ParseOptions::new().require_full_match(false),
        ));
        prop_assert!(!outcome.is_success());
    }

    #[test]
    fn prefix_capture_depends_on_alternative_order(tail in "[ab]{0,6}") {
        let input = format!("aab{tail}");
        let short_first = seq(vec![choice(vec![text("a"), text("aa")]), text("b")]);
        let long_first = seq(vec![choice(vec![text("aa"), text("a")]), text("b")]);
        let options = || ParseOptions::new().require_full_match(false);

        let short = must(parse(&short_first, Input::from_text(input.as_str()), options()));
        let long = must(parse(&long_first, Input::from_text(input.as_str()), options()));
        prop_assert!(!short.is_success());
        prop_assert!(long.is_success());
    }

    #[test]
    fn furthest_error_is_within_the_input(input in "[0-9+x]{0,12}") {
        let outcome = must(parse(
            &arith_grammar(),
            Input::from_text(input.as_str()),
            ParseOptions::new(),
        ));
        if let Some(furthest) = outcome.furthest_pos() {
            prop_assert!(furthest <= input.chars().count());
        }
    }
}
