//! Rules for Elementor Pro widgets: forms, post grids, sliders.

use crate::heuristic::Rule;
use crate::rules::util::children_within_spread;
use crate::{HeuristicResult, NodeSnapshot};

/// Elementor Pro group, in evaluation order.
pub const ELEMENTOR_PRO_RULES: &[Rule] = &[
    Rule::new("widget.elementor-pro.form", 88, form),
    Rule::new("widget.elementor-pro.posts", 86, posts),
    Rule::new("widget.elementor-pro.slides", 80, slides),
];

fn form(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || !node.is_auto_layout() || !node.has_text {
        return None;
    }
    if node.height < 200.0 || node.child_count < 3 {
        return None;
    }

    Some(HeuristicResult::new(
        "widget.elementor-pro.form",
        "e:form",
        0.78,
    ))
}

fn posts(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || node.child_count < 3 {
        return None;
    }
    if !children_within_spread(node, 32.0) {
        return None;
    }

    Some(
        HeuristicResult::new("widget.elementor-pro.posts", "e:posts", 0.8)
            .with_meta("layout", "cards-grid-or-columns"),
    )
}

fn slides(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || !node.has_child_image || !node.has_text {
        return None;
    }
    if node.width < 600.0 || node.height < 300.0 {
        return None;
    }

    Some(HeuristicResult::new(
        "widget.elementor-pro.slides",
        "e:slides",
        0.75,
    ))
}
