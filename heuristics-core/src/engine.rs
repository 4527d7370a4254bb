//! Evaluation engine: runs a rule set against one node and ranks the matches.

use std::panic::{self, AssertUnwindSafe};

use crate::heuristic::{Heuristic, RuleSet};
use crate::{EvaluatedResult, HeuristicResult, NodeSnapshot};

/// Confidence below which matches are dropped.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.3;

/// Evaluate every rule of `rules` against `node`, once each, in order.
///
/// Matches below `min_confidence` are dropped. A rule that returns an error,
/// panics, or reports a confidence outside `[0, 1]` (NaN included) loses its
/// vote for this node only; evaluation carries on with the
/// next rule. The result is ordered by confidence, then priority (both
/// descending), then rule order. An empty list means no role was recognized.
#[must_use]
pub fn evaluate(
    node: &NodeSnapshot,
    rules: &RuleSet<'_>,
    min_confidence: f32,
) -> Vec<EvaluatedResult> {
    let mut results = Vec::new();

    for rule in rules.iter() {
        let Some(result) = run_rule(rule, node) else {
            continue;
        };
        if !(0.0..=1.0).contains(&result.confidence) {
            tracing::warn!(
                node_id = %node.id,
                rule = rule.id(),
                confidence = result.confidence,
                "rule reported confidence outside [0, 1]"
            );
            continue;
        }
        if result.confidence < min_confidence {
            continue;
        }
        results.push(EvaluatedResult::new(result, rule.id(), rule.priority()));
    }

    // Stable sort: full ties keep rule order.
    results.sort_by(EvaluatedResult::rank_cmp);

    tracing::debug!(
        node_id = %node.id,
        candidates = results.len(),
        top = results.first().map_or("none", EvaluatedResult::widget),
        "evaluated node"
    );

    results
}

fn run_rule(rule: &dyn Heuristic, node: &NodeSnapshot) -> Option<HeuristicResult> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.match_node(node))) {
        Ok(Ok(result)) => result,
        Ok(Err(error)) => {
            tracing::warn!(node_id = %node.id, %error, "rule evaluation failed");
            None
        }
        Err(_) => {
            tracing::warn!(
                node_id = %node.id,
                rule = rule.id(),
                "rule panicked during evaluation"
            );
            None
        }
    }
}

/// Whether the two best candidates are too close to trust automatically.
///
/// Fewer than two candidates are never ambiguous.
#[must_use]
pub fn is_ambiguous(candidates: &[EvaluatedResult], delta: f32) -> bool {
    match candidates {
        [first, second, ..] => (first.confidence() - second.confidence()).abs() < delta,
        _ => false,
    }
}
