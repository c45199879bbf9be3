//! Associative operator folds.
//!
//! A fold parses an operand and then grows it through an ordered list of
//! branches, each pairing an operator/suffix parser with a build
//! callback. The callback sees the AST frame accumulated since the fold
//! began — the current left value plus whatever the branch pushed — and
//! its result becomes the new left value. The left variant iterates, the
//! right variant recurses for the right-hand side before folding, which
//! is what makes the trees lean the other way.

use super::push::{BuildCtx, BuildFn};
use crate::engine::effects::ReplaceFrame;
use crate::engine::parser::{Parser, ParserRef, run};
use crate::engine::state::ParseState;
use crate::engine::wellformed::NullableEnv;
use arbor_error::EngineResult;
use arbor_position::Span;
use std::sync::Arc;

/// One fold branch: an operator/suffix parser and the callback that folds
/// the frame once the branch matches.
pub struct FoldBranch {
    /// Parses the operator and, for left folds, the right operand.
    pub operator: ParserRef,
    /// Folds the accumulated frame into the new left value.
    pub build: BuildFn,
}

impl FoldBranch {
    /// Pair an operator parser with its build callback.
    pub fn new(
        operator: ParserRef,
        build: impl Fn(&BuildCtx<'_>) -> crate::engine::effects::Value + Send + Sync + 'static,
    ) -> Self {
        Self { operator, build: Arc::new(build) }
    }
}

fn fold_frame(
    state: &mut ParseState,
    frame_start: usize,
    start_pos: usize,
    build: &BuildFn,
) {
    let span = Span::new(start_pos, state.pos());
    let built = {
        let (input, stack) = state.input_and_stack();
        build(&BuildCtx { span, items: &stack[frame_start..], input })
    };
    let count = state.stack_len() - frame_start;
    state.apply_effect(ReplaceFrame::new(count, built));
}

fn fold_children(operand: &ParserRef, branches: &[FoldBranch]) -> Vec<ParserRef> {
    std::iter::once(operand.clone())
        .chain(branches.iter().map(|b| b.operator.clone()))
        .collect()
}

fn fold_left_children(
    operand: &ParserRef,
    branches: &[FoldBranch],
    env: &NullableEnv,
) -> Vec<ParserRef> {
    if env.is_nullable(operand) {
        fold_children(operand, branches)
    } else {
        vec![operand.clone()]
    }
}

/// Left-associative fold: `a ∘ b ∘ c` folds as `(a ∘ b) ∘ c`.
///
/// Each loop round tries the branches in order; the first that matches
/// folds the frame and the loop continues. The fold succeeds once the
/// operand has matched, however many rounds follow.
pub struct LeftFold {
    operand: ParserRef,
    branches: Vec<FoldBranch>,
}

impl LeftFold {
    /// Build a left fold of `operand` under `branches`.
    pub fn new(operand: ParserRef, branches: Vec<FoldBranch>) -> ParserRef {
        Arc::new(Self { operand, branches })
    }
}

impl Parser for LeftFold {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let start_pos = state.pos();
        let frame_start = state.stack_len();
        if !run(&self.operand, state)? {
            return Ok(false);
        }
        'grow: loop {
            for branch in &self.branches {
                if run(&branch.operator, state)? {
                    fold_frame(state, frame_start, start_pos, &branch.build);
                    continue 'grow;
                }
            }
            break;
        }
        Ok(true)
    }

    fn children(&self) -> Vec<ParserRef> {
        fold_children(&self.operand, &self.branches)
    }

    fn kind_name(&self) -> &'static str {
        "left_fold"
    }

    fn nullable(&self, env: &NullableEnv) -> bool {
        env.is_nullable(&self.operand)
    }

    fn left_children(&self, env: &NullableEnv) -> Vec<ParserRef> {
        fold_left_children(&self.operand, &self.branches, env)
    }
}

/// Right-associative fold: `a ∘ b ∘ c` folds as `a ∘ (b ∘ c)`.
///
/// After the operand, the first branch whose operator matches recurses
/// into the whole fold for the right-hand side, then folds. A branch
/// whose right-hand side fails is rolled back to just after the operand
/// and the next branch is tried; with no branch left the bare operand
/// stands.
pub struct RightFold {
    operand: ParserRef,
    branches: Vec<FoldBranch>,
}

impl RightFold {
    /// Build a right fold of `operand` under `branches`.
    pub fn new(operand: ParserRef, branches: Vec<FoldBranch>) -> ParserRef {
        Arc::new(Self { operand, branches })
    }

    fn parse_level(&self, state: &mut ParseState) -> EngineResult<bool> {
        let start_pos = state.pos();
        let frame_start = state.stack_len();
        if !run(&self.operand, state)? {
            return Ok(false);
        }
        let after_operand = state.snapshot();
        for branch in &self.branches {
            if run(&branch.operator, state)? {
                if self.parse_level(state)? {
                    fold_frame(state, frame_start, start_pos, &branch.build);
                    return Ok(true);
                }
                state.rollback(&after_operand)?;
            }
        }
        Ok(true)
    }
}

impl Parser for RightFold {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        self.parse_level(state)
    }

    fn children(&self) -> Vec<ParserRef> {
        fold_children(&self.operand, &self.branches)
    }

    fn kind_name(&self) -> &'static str {
        "right_fold"
    }

    fn nullable(&self, env: &NullableEnv) -> bool {
        env.is_nullable(&self.operand)
    }

    fn left_children(&self, env: &NullableEnv) -> Vec<ParserRef> {
        fold_left_children(&self.operand, &self.branches, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::combinators::primitives::{CharLit, CharRange};
    use crate::engine::combinators::push::Collect;
    use crate::engine::combinators::seq::Sequence;
    use crate::engine::effects::{downcast, value};
    use crate::engine::input::Input;
    use arbor_error::ParseBudget;
    use arbor_tdd_support::{must, must_some};

    #[derive(Debug, Clone, PartialEq)]
    enum Expr {
        Num(i64),
        Sub(Box<Expr>, Box<Expr>),
        Pow(Box<Expr>, Box<Expr>),
    }

    fn state(text: &str) -> ParseState {
        ParseState::new(Input::from_text(text), ParseBudget::default())
    }

    fn digit() -> ParserRef {
        Collect::new(CharRange::new('0', '9'), |ctx| {
            value(Expr::Num(ctx.text().unwrap_or_default().parse().unwrap_or(0)))
        })
    }

    fn frame_pair(ctx: &BuildCtx<'_>) -> (Expr, Expr) {
        let left = ctx.item::<Expr>(0).cloned().unwrap_or(Expr::Num(0));
        let right = ctx.item::<Expr>(1).cloned().unwrap_or(Expr::Num(0));
        (left, right)
    }

    fn top_expr(state: &ParseState) -> Expr {
        let top = must_some(state.ast_stack().last());
        must_some(downcast::<Expr>(top)).clone()
    }

    #[test]
    fn left_fold_leans_left() {
        let minus = Sequence::new(vec![CharLit::new('-'), digit()]);
        let sub = LeftFold::new(
            digit(),
            vec![FoldBranch::new(minus, |ctx| {
                let (l, r) = frame_pair(ctx);
                value(Expr::Sub(Box::new(l), Box::new(r)))
            })],
        );
        let mut st = state("7-2-1");
        assert!(must(run(&sub, &mut st)));
        assert_eq!(st.pos(), 5);
        // (7 - 2) - 1
        assert_eq!(
            top_expr(&st),
            Expr::Sub(
                Box::new(Expr::Sub(Box::new(Expr::Num(7)), Box::new(Expr::Num(2)))),
                Box::new(Expr::Num(1)),
            )
        );
    }

    #[test]
    fn right_fold_leans_right() {
        let pow = RightFold::new(
            digit(),
            vec![FoldBranch::new(CharLit::new('^'), |ctx| {
                let (l, r) = frame_pair(ctx);
                value(Expr::Pow(Box::new(l), Box::new(r)))
            })],
        );
        let mut st = state("2^3^4");
        assert!(must(run(&pow, &mut st)));
        assert_eq!(st.pos(), 5);
        // 2 ^ (3 ^ 4)
        assert_eq!(
            top_expr(&st),
            Expr::Pow(
                Box::new(Expr::Num(2)),
                Box::new(Expr::Pow(Box::new(Expr::Num(3)), Box::new(Expr::Num(4)))),
            )
        );
    }

    #[test]
    fn bare_operand_stands_alone() {
        let sub = LeftFold::new(
            digit(),
            vec![FoldBranch::new(Sequence::new(vec![CharLit::new('-'), digit()]), |ctx| {
                let (l, r) = frame_pair(ctx);
                value(Expr::Sub(Box::new(l), Box::new(r)))
            })],
        );
        let mut st = state("5");
        assert!(must(run(&sub, &mut st)));
        assert_eq!(top_expr(&st), Expr::Num(5));
    }

    #[test]
    fn dangling_operator_is_not_consumed() {
        let sub = LeftFold::new(
            digit(),
            vec![FoldBranch::new(Sequence::new(vec![CharLit::new('-'), digit()]), |ctx| {
                let (l, r) = frame_pair(ctx);
                value(Expr::Sub(Box::new(l), Box::new(r)))
            })],
        );
        let mut st = state("5-");
        assert!(must(run(&sub, &mut st)));
        assert_eq!(st.pos(), 1);
        assert_eq!(top_expr(&st), Expr::Num(5));
    }

    #[test]
    fn right_fold_dangling_rhs_keeps_the_operand() {
        let pow = RightFold::new(
            digit(),
            vec![FoldBranch::new(CharLit::new('^'), |ctx| {
                let (l, r) = frame_pair(ctx);
                value(Expr::Pow(Box::new(l), Box::new(r)))
            })],
        );
        let mut st = state("2^");
        assert!(must(run(&pow, &mut st)));
        assert_eq!(st.pos(), 1);
        assert_eq!(top_expr(&st), Expr::Num(2));
    }
}
