//! Shared grammar fixtures for the integration suite.
#![allow(dead_code)]

use arbor::dsl::{branch, ch, char_range, left_fold, many1, push, rule, seq};
use arbor::{BuildCtx, ParseOutcome, ParserRef, Value, downcast, value};
use arbor_tdd_support::must_some;

/// Arithmetic expression tree for the `E := T ('+' T)*` grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Num(i64),
    Add(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn num(n: i64) -> Expr {
        Expr::Num(n)
    }

    pub fn add(left: Expr, right: Expr) -> Expr {
        Expr::Add(Box::new(left), Box::new(right))
    }
}

fn expr_at(ctx: &BuildCtx<'_>, i: usize) -> Expr {
    ctx.item::<Expr>(i).cloned().unwrap_or(Expr::Num(0))
}

/// `T := digit+`, pushed as `Expr::Num`.
pub fn term() -> ParserRef {
    let digit = rule("digit", char_range('0', '9'));
    push(many1(digit), |ctx| {
        let text = ctx.text().unwrap_or_default();
        value(Expr::Num(text.parse().unwrap_or(0)))
    })
}

/// `E := T ('+' T)*`, folded left into `Expr::Add`.
pub fn arith_grammar() -> ParserRef {
    let operand = term();
    let plus_term = seq(vec![ch('+'), term()]);
    left_fold(
        operand,
        vec![branch(plus_term, |ctx| {
            value(Expr::add(expr_at(ctx, 0), expr_at(ctx, 1)))
        })],
    )
}

/// The single `Expr` a successful parse leaves on the stack.
pub fn expr_of(outcome: &ParseOutcome) -> Expr {
    assert_eq!(outcome.ast().len(), 1, "expected exactly one value on the stack");
    let top: &Value = must_some(outcome.ast().first());
    must_some(downcast::<Expr>(top)).clone()
}
