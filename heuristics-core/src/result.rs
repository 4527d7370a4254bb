//! Match results produced by heuristics and ranked by the engine.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Free-form metadata attached to a match.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Output of a single rule match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicResult {
    /// Stable taxonomy key, e.g. `section.hero`.
    pub pattern_id: String,
    /// Target role identifier, namespaced (`w:`, `woo:`, `structure:`, ...).
    pub widget: String,
    /// Self-reported certainty in `[0, 1]`.
    pub confidence: f32,
    /// Optional match metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl HeuristicResult {
    /// Create a result without metadata.
    #[must_use]
    pub fn new(pattern_id: impl Into<String>, widget: impl Into<String>, confidence: f32) -> Self {
        Self {
            pattern_id: pattern_id.into(),
            widget: widget.into(),
            confidence,
            meta: None,
        }
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_meta(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.meta
            .get_or_insert_with(Meta::new)
            .insert(key.into(), value.into());
        self
    }
}

/// A [`HeuristicResult`] annotated with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedResult {
    /// The rule match.
    #[serde(flatten)]
    pub result: HeuristicResult,
    /// Identifier of the producing rule.
    pub heuristic_id: String,
    /// Static priority of the producing rule (0-100).
    pub priority: u8,
}

impl EvaluatedResult {
    /// Annotate a match with its rule identity.
    #[must_use]
    pub fn new(result: HeuristicResult, heuristic_id: impl Into<String>, priority: u8) -> Self {
        Self {
            result,
            heuristic_id: heuristic_id.into(),
            priority,
        }
    }

    /// Pattern id of the underlying match.
    #[must_use]
    pub fn pattern_id(&self) -> &str {
        &self.result.pattern_id
    }

    /// Widget id of the underlying match.
    #[must_use]
    pub fn widget(&self) -> &str {
        &self.result.widget
    }

    /// Confidence of the underlying match.
    #[must_use]
    pub const fn confidence(&self) -> f32 {
        self.result.confidence
    }

    /// Metadata value for `key`, if any.
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&serde_json::Value> {
        self.result.meta.as_ref().and_then(|m| m.get(key))
    }

    /// Ranking order: confidence descending, then priority descending.
    ///
    /// Equal results compare as `Equal`, so a stable sort keeps rule order.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .confidence()
            .total_cmp(&self.confidence())
            .then_with(|| other.priority.cmp(&self.priority))
    }
}
