//! Forward references and recursion.
//!
//! The parser graph is a DAG except through `Lazy` bridges: a bridge is
//! declared first, referenced wherever the rule is needed, and bound to
//! its target exactly once. The slot holds a non-owning handle, so a
//! grammar that loops back through the bridge does not leak; the strong
//! reference to every bound target lives in the
//! [`Grammar`](crate::engine::grammar::Grammar) registry.

use crate::engine::parser::{Parser, ParserRef, run};
use crate::engine::state::ParseState;
use crate::engine::wellformed::NullableEnv;
use arbor_error::{EngineError, EngineResult};
use std::sync::{Arc, OnceLock, Weak};

/// A forward-declared parser slot, the only legal bridge for cycles.
pub struct Lazy {
    name: Option<String>,
    slot: OnceLock<Weak<dyn Parser>>,
}

impl Lazy {
    /// Declare a named forward reference.
    pub fn forward(name: impl Into<String>) -> Arc<Lazy> {
        Arc::new(Self { name: Some(name.into()), slot: OnceLock::new() })
    }

    /// Declare an anonymous forward reference.
    pub fn anonymous() -> Arc<Lazy> {
        Arc::new(Self { name: None, slot: OnceLock::new() })
    }

    /// Bind the bridge to its target. One-shot: a second bind is an
    /// invariant violation. The caller keeps the strong reference.
    pub(crate) fn bind(&self, target: &ParserRef) -> EngineResult<()> {
        self.slot.set(Arc::downgrade(target)).map_err(|_| EngineError::InternalInvariant {
            detail: format!("recursion bridge {} bound twice", self.display_name()),
        })
    }

    /// The resolved target. Using an unbound bridge, or one whose target
    /// was dropped, is an invariant violation.
    pub fn target(&self) -> EngineResult<ParserRef> {
        let weak = self.slot.get().ok_or_else(|| EngineError::InternalInvariant {
            detail: format!("recursion bridge {} used before it was bound", self.display_name()),
        })?;
        weak.upgrade().ok_or_else(|| EngineError::InternalInvariant {
            detail: format!("recursion bridge {} outlived its target", self.display_name()),
        })
    }

    fn resolved(&self) -> Option<ParserRef> {
        self.slot.get().and_then(Weak::upgrade)
    }
}

impl Parser for Lazy {
    fn do_parse(&self, state: &mut ParseState) -> EngineResult<bool> {
        let target = self.target()?;
        run(&target, state)
    }

    fn children(&self) -> Vec<ParserRef> {
        self.resolved().into_iter().collect()
    }

    fn kind_name(&self) -> &'static str {
        "lazy"
    }

    fn rule_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn nullable(&self, env: &NullableEnv) -> bool {
        self.resolved().is_some_and(|t| env.is_nullable(&t))
    }
}
