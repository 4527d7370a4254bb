//! The heuristic abstraction and rule-set composition.
//!
//! A heuristic is a named, prioritized predicate over a [`NodeSnapshot`] that
//! yields zero or one weighted role guess. Library rules are plain [`Rule`]
//! values backed by function pointers; anything else can implement
//! [`Heuristic`] directly and join a [`RuleSet`].

use thiserror::Error;

use crate::{HeuristicResult, NodeSnapshot};

/// A rule predicate failed on a node.
#[derive(Debug, Clone, Error)]
#[error("rule {rule} failed: {reason}")]
pub struct RuleError {
    /// Identifier of the failing rule.
    pub rule: String,
    /// Human-readable reason.
    pub reason: String,
}

impl RuleError {
    /// Create a failure for `rule`.
    #[must_use]
    pub fn new(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of matching one rule against one node.
pub type RuleOutcome = Result<Option<HeuristicResult>, RuleError>;

/// A pattern-matching rule over node snapshots.
///
/// Implementations must be free of side effects. Failures, including panics,
/// are contained by the evaluation engine.
pub trait Heuristic: Send + Sync {
    /// Globally unique rule identifier.
    fn id(&self) -> &str;

    /// Static specificity weight, 0-100.
    fn priority(&self) -> u8;

    /// Match the rule against `node`.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError`] when the rule cannot judge the node.
    fn match_node(&self, node: &NodeSnapshot) -> RuleOutcome;
}

/// Predicate signature of a library rule.
pub type MatchFn = fn(&NodeSnapshot) -> Option<HeuristicResult>;

/// A static, infallible library rule.
#[derive(Clone, Copy)]
pub struct Rule {
    id: &'static str,
    priority: u8,
    matcher: MatchFn,
}

impl Rule {
    /// Declare a rule.
    #[must_use]
    pub const fn new(id: &'static str, priority: u8, matcher: MatchFn) -> Self {
        Self {
            id,
            priority,
            matcher,
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl Heuristic for Rule {
    fn id(&self) -> &str {
        self.id
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn match_node(&self, node: &NodeSnapshot) -> RuleOutcome {
        Ok((self.matcher)(node))
    }
}

/// An ordered sequence of heuristics.
///
/// Order is significant: it is the final tie-break when two results share
/// confidence and priority.
#[derive(Default, Clone)]
pub struct RuleSet<'a> {
    rules: Vec<&'a dyn Heuristic>,
}

impl<'a> RuleSet<'a> {
    /// Create an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append every rule of a group, preserving its order.
    #[must_use]
    pub fn with_group(mut self, group: &'a [Rule]) -> Self {
        self.extend_group(group);
        self
    }

    /// Append a single heuristic.
    #[must_use]
    pub fn with_rule(mut self, rule: &'a dyn Heuristic) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append every rule of a group in place.
    pub fn extend_group(&mut self, group: &'a [Rule]) {
        self.rules
            .extend(group.iter().map(|rule| rule as &'a dyn Heuristic));
    }

    /// Iterate the rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &'a dyn Heuristic> + '_ {
        self.rules.iter().copied()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rules.iter().map(|r| r.id())).finish()
    }
}

/// Concatenate rule groups in order. No deduplication is performed.
#[must_use]
pub fn compose_heuristics<'a>(groups: &[&'a [Rule]]) -> RuleSet<'a> {
    groups
        .iter()
        .copied()
        .fold(RuleSet::new(), RuleSet::with_group)
}
