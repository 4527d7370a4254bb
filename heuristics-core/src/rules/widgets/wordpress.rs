//! Rules for core WordPress widgets.
//!
//! Most of these are link lists, so detection is approximate and the
//! confidences stay low.

use crate::heuristic::Rule;
use crate::{AxisDirection, HeuristicResult, NodeSnapshot};

/// WordPress core group, in evaluation order.
pub const WORDPRESS_CORE_RULES: &[Rule] = &[
    Rule::new("widget.wp.search", 70, search),
    Rule::new("widget.wp.recent-posts", 60, recent_posts),
    Rule::new("widget.wp.categories", 60, categories),
];

fn search(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || !node.is_auto_layout() {
        return None;
    }
    if !(1..=3).contains(&node.child_count) || !node.has_text {
        return None;
    }
    if node.height < 40.0 || node.height > 120.0 {
        return None;
    }

    Some(HeuristicResult::new("widget.wp.search", "wp:search", 0.65))
}

fn is_vertical_text_list(node: &NodeSnapshot) -> bool {
    node.is_frame_like()
        && node.direction() == AxisDirection::Vertical
        && node.has_text
        && node.child_count >= 3
}

fn recent_posts(node: &NodeSnapshot) -> Option<HeuristicResult> {
    is_vertical_text_list(node)
        .then(|| HeuristicResult::new("widget.wp.recent-posts", "wp:recent-posts", 0.6))
}

fn categories(node: &NodeSnapshot) -> Option<HeuristicResult> {
    is_vertical_text_list(node)
        .then(|| HeuristicResult::new("widget.wp.categories", "wp:categories", 0.55))
}
