//! Rule traits.
//!
//! A rule implements [`LintRule`] for its metadata and [`FragmentLintRule`]
//! for its behavior. The linter stores rules as `dyn ErasedRule`, which every
//! `FragmentLintRule` implements, and drives one [`RuleSession`] per rule per
//! script so per-script state never outlives a traversal.

use crate::context::{Emitter, ScriptContext};
use tsql_syntax::{Node, NodeClass, NodeKind};

/// Node kinds a rule wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interest {
    Kind(NodeKind),
    /// Every kind belonging to the class
    Class(NodeClass),
}

impl Interest {
    #[must_use]
    pub fn matches(self, kind: NodeKind) -> bool {
        match self {
            Self::Kind(wanted) => wanted == kind,
            Self::Class(class) => kind.is_a(class),
        }
    }
}

/// Base trait for all lint rules
pub trait LintRule: Send + Sync {
    /// Unique identifier used in configuration files (e.g., `"missing-nolock"`)
    fn name(&self) -> &'static str;

    /// Human-readable description of what the rule checks
    fn description(&self) -> &'static str;

    /// Node kinds and classes the rule is dispatched on
    fn interests(&self) -> &'static [Interest];
}

/// A rule evaluated during a single pre-order walk of a script.
#[allow(unused_variables)]
pub trait FragmentLintRule: LintRule {
    /// Scratch state, created fresh for every script.
    type State: Default + Send + 'static;

    /// Called once per script before the walk starts.
    fn start(&self, cx: &ScriptContext<'_>, state: &mut Self::State) {}

    /// Called for every node matching one of [`LintRule::interests`].
    fn visit(
        &self,
        node: Node<'_>,
        cx: &ScriptContext<'_>,
        state: &mut Self::State,
        emitter: &mut Emitter<'_>,
    );
}

/// Per-script evaluation of one rule.
pub trait RuleSession {
    fn visit(&mut self, node: Node<'_>, cx: &ScriptContext<'_>, emitter: &mut Emitter<'_>);
}

/// Object-safe form of [`FragmentLintRule`].
pub trait ErasedRule: LintRule {
    fn session<'r>(&'r self, cx: &ScriptContext<'_>) -> Box<dyn RuleSession + 'r>;
}

struct Session<'r, R: FragmentLintRule> {
    rule: &'r R,
    state: R::State,
}

impl<R: FragmentLintRule> RuleSession for Session<'_, R> {
    fn visit(&mut self, node: Node<'_>, cx: &ScriptContext<'_>, emitter: &mut Emitter<'_>) {
        self.rule.visit(node, cx, &mut self.state, emitter);
    }
}

impl<R: FragmentLintRule> ErasedRule for R {
    fn session<'r>(&'r self, cx: &ScriptContext<'_>) -> Box<dyn RuleSession + 'r> {
        let mut state = R::State::default();
        self.start(cx, &mut state);
        Box::new(Session { rule: self, state })
    }
}
