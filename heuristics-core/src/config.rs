//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::engine::DEFAULT_MIN_CONFIDENCE;
use crate::{HeuristicsError, HeuristicsResult};

/// Top-two confidence gap under which a node counts as ambiguous.
pub const DEFAULT_AMBIGUITY_DELTA: f32 = 0.05;

/// Candidates sent to the arbiter per ambiguous node.
pub const DEFAULT_MAX_ARBITER_CANDIDATES: usize = 3;

/// Classification pipeline settings.
///
/// Missing fields take their defaults, so partial JSON files are fine:
///
/// ```
/// use heuristics_core::HeuristicsConfig;
///
/// let config = HeuristicsConfig::from_json(r#"{"min_confidence": 0.5}"#).unwrap();
/// assert!(config.optimize);
/// assert_eq!(config.max_arbiter_candidates, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Matches below this confidence are dropped.
    pub min_confidence: f32,
    /// Top-two gap under which the arbiter is consulted.
    pub ambiguity_delta: f32,
    /// Candidates offered to the arbiter.
    pub max_arbiter_candidates: usize,
    /// Collapse redundant containers before classifying.
    pub optimize: bool,
    /// Report nodes that no rule matched.
    pub include_unmatched: bool,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            ambiguity_delta: DEFAULT_AMBIGUITY_DELTA,
            max_arbiter_candidates: DEFAULT_MAX_ARBITER_CANDIDATES,
            optimize: true,
            include_unmatched: true,
        }
    }
}

impl HeuristicsConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or out-of-range values.
    pub fn from_json(json: &str) -> HeuristicsResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the confidence threshold.
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Set the ambiguity gap.
    #[must_use]
    pub fn with_ambiguity_delta(mut self, delta: f32) -> Self {
        self.ambiguity_delta = delta;
        self
    }

    /// Enable or disable the optimizer pass.
    #[must_use]
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`HeuristicsError::InvalidConfig`] if a confidence value lies
    /// outside `[0, 1]` or the candidate cap is zero.
    pub fn validate(&self) -> HeuristicsResult<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(HeuristicsError::InvalidConfig(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.ambiguity_delta) {
            return Err(HeuristicsError::InvalidConfig(format!(
                "ambiguity_delta must be within [0, 1], got {}",
                self.ambiguity_delta
            )));
        }
        if self.max_arbiter_candidates == 0 {
            return Err(HeuristicsError::InvalidConfig(
                "max_arbiter_candidates must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
