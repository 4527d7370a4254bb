//! Layout rules: column rows and grids.

use super::util::{are_widths_roughly_equal, children_within_spread, COLUMN_WIDTH_TOLERANCE};
use crate::heuristic::Rule;
use crate::{AxisDirection, HeuristicResult, NodeSnapshot};

/// Layout group, in evaluation order.
pub const LAYOUT_RULES: &[Rule] = &[
    Rule::new("layout.columns", 70, columns),
    Rule::new("layout.grid", 68, grid),
];

fn columns(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || !node.is_auto_layout() {
        return None;
    }
    if node.direction() != AxisDirection::Horizontal || node.child_count < 2 {
        return None;
    }
    if !are_widths_roughly_equal(&node.children_widths, COLUMN_WIDTH_TOLERANCE) {
        return None;
    }

    let pattern_id = match node.child_count {
        2 => "layout.columns2",
        3 => "layout.columns3",
        4 => "layout.columns4",
        _ => "layout.columnsN",
    };

    Some(
        HeuristicResult::new(pattern_id, "structure:columns", 0.8)
            .with_meta("columns", node.child_count),
    )
}

fn grid(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || node.child_count < 3 {
        return None;
    }
    if !children_within_spread(node, 24.0) {
        return None;
    }

    Some(HeuristicResult::new("layout.grid", "structure:grid", 0.77))
}
