//! Generic typography rules. Builder-specific text widgets live in
//! [`super::widgets`].

use super::util::{font_size_max, line_count};
use crate::heuristic::Rule;
use crate::{HeuristicResult, NodeKind, NodeSnapshot};

/// Typography group, in evaluation order.
pub const TYPOGRAPHY_RULES: &[Rule] = &[
    Rule::new("typography.heading-generic", 80, heading_generic),
    Rule::new("typography.paragraph-generic", 60, paragraph_generic),
];

fn heading_generic(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if node.kind != NodeKind::Text || !node.has_text {
        return None;
    }
    if font_size_max(node) < 20.0 || line_count(node) > 3 {
        return None;
    }

    Some(HeuristicResult::new("typography.heading", "w:heading", 0.85))
}

fn paragraph_generic(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if node.kind != NodeKind::Text || !node.has_text {
        return None;
    }
    let size_max = font_size_max(node);
    let size_min = node.text.font_size_min.unwrap_or(size_max);
    if size_max > 22.0 || size_min < 10.0 || line_count(node) < 2 {
        return None;
    }

    Some(HeuristicResult::new("typography.paragraph", "w:text", 0.8))
}
