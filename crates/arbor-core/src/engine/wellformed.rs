//! Static well-formedness analysis of the parser graph.
//!
//! Runs once per grammar, before any parse. Three passes over the graph,
//! all keyed by node identity:
//!
//! 1. A monotonic fixpoint computes the *nullable* set: parsers that can
//!    succeed while consuming zero input.
//! 2. A depth-first walk over the *left-edge* graph (edges to sub-parsers
//!    a node may invoke before consuming input) finds cycles: unprotected
//!    left recursion would recurse forever at parse time.
//! 3. Unbounded repetitions over nullable bodies are flagged: greedy
//!    repetition of a zero-width match never terminates.

use super::parser::{Parser, ParserRef, parser_id};
use arbor_error::GrammarFlaw;
use rustc_hash::{FxHashMap, FxHashSet};

/// The set of parsers currently known to be nullable, consulted by each
/// node's own nullability equation.
#[derive(Default)]
pub struct NullableEnv {
    nullable: FxHashSet<usize>,
}

impl NullableEnv {
    /// Whether `parser` is known nullable.
    pub fn is_nullable(&self, parser: &ParserRef) -> bool {
        self.nullable.contains(&parser_id(parser))
    }
}

/// Analyze the graph reachable from `roots` and report every flaw found.
pub fn analyze(roots: &[ParserRef]) -> Vec<GrammarFlaw> {
    let nodes = collect_nodes(roots);
    let env = nullable_fixpoint(&nodes);
    let mut flaws = detect_left_recursion(&nodes, &env);
    flaws.extend(detect_nullable_repetition(&nodes, &env));
    flaws
}

fn collect_nodes(roots: &[ParserRef]) -> Vec<ParserRef> {
    let mut seen = FxHashSet::default();
    let mut queue: Vec<ParserRef> = roots.to_vec();
    let mut nodes = Vec::new();
    while let Some(node) = queue.pop() {
        if seen.insert(parser_id(&node)) {
            queue.extend(node.children());
            nodes.push(node);
        }
    }
    nodes
}

fn nullable_fixpoint(nodes: &[ParserRef]) -> NullableEnv {
    let mut env = NullableEnv::default();
    loop {
        let mut changed = false;
        for node in nodes {
            let id = parser_id(node);
            if !env.nullable.contains(&id) && node.nullable(&env) {
                env.nullable.insert(id);
                changed = true;
            }
        }
        if !changed {
            return env;
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Color {
    Grey,
    Black,
}

fn detect_left_recursion(nodes: &[ParserRef], env: &NullableEnv) -> Vec<GrammarFlaw> {
    let mut colors: FxHashMap<usize, Color> = FxHashMap::default();
    let mut stack: Vec<ParserRef> = Vec::new();
    let mut flaws = Vec::new();
    for node in nodes {
        visit(node, env, &mut colors, &mut stack, &mut flaws);
    }
    flaws
}

fn visit(
    node: &ParserRef,
    env: &NullableEnv,
    colors: &mut FxHashMap<usize, Color>,
    stack: &mut Vec<ParserRef>,
    flaws: &mut Vec<GrammarFlaw>,
) {
    let id = parser_id(node);
    match colors.get(&id) {
        Some(Color::Black) => return,
        Some(Color::Grey) => {
            // Back edge: the cycle is the stack suffix from this node on.
            let from = stack.iter().position(|p| parser_id(p) == id).unwrap_or(0);
            let cycle = &stack[from..];
            if !cycle.iter().all(|p| p.handles_left_recursion()) {
                let mut names: Vec<String> = cycle.iter().map(|p| p.display_name()).collect();
                names.push(node.display_name());
                flaws.push(GrammarFlaw::LeftRecursion { cycle: names });
            }
            return;
        }
        None => {}
    }
    colors.insert(id, Color::Grey);
    stack.push(node.clone());
    for child in node.left_children(env) {
        visit(&child, env, colors, stack, flaws);
    }
    stack.pop();
    colors.insert(id, Color::Black);
}

fn detect_nullable_repetition(nodes: &[ParserRef], env: &NullableEnv) -> Vec<GrammarFlaw> {
    nodes
        .iter()
        .filter(|node| node.nullable_repetition(env))
        .map(|node| GrammarFlaw::NullableRepetition { repeat: node.display_name() })
        .collect()
}
