//! Navigation rules: header bars and footers.

use crate::heuristic::Rule;
use crate::{HeuristicResult, NodeSnapshot};

/// Navigation group, in evaluation order.
pub const NAVIGATION_RULES: &[Rule] = &[
    Rule::new("navigation.header-navbar", 75, header_navbar),
    Rule::new("navigation.footer-main", 70, footer_main),
];

fn header_navbar(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || node.height > 200.0 || node.width < 900.0 {
        return None;
    }
    // Headers sit at the top of the page.
    if node.y > 80.0 {
        return None;
    }
    if !node.has_text && !node.has_child_image {
        return None;
    }

    Some(HeuristicResult::new(
        "navigation.header-navbar",
        "structure:header-navbar",
        0.8,
    ))
}

fn footer_main(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || node.width < 900.0 || node.height < 160.0 {
        return None;
    }
    if !node.has_text {
        return None;
    }

    Some(HeuristicResult::new(
        "navigation.footer-main",
        "structure:footer-main",
        0.72,
    ))
}
