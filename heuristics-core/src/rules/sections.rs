//! Section rules: hero, call to action and generic full-width bands.

use super::util::font_size_max;
use crate::heuristic::Rule;
use crate::{HeuristicResult, NodeSnapshot};

/// Section group, in evaluation order.
pub const SECTION_RULES: &[Rule] = &[
    Rule::new("section.hero", 85, hero),
    Rule::new("section.cta", 80, cta),
    Rule::new("section.generic", 60, generic),
];

fn hero(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || node.width < 900.0 || node.height < 380.0 {
        return None;
    }
    if !node.has_text || !(node.has_background || node.has_child_image) {
        return None;
    }
    if font_size_max(node) < 32.0 {
        return None;
    }

    Some(HeuristicResult::new(
        "section.hero",
        "structure:section-hero",
        0.86,
    ))
}

fn cta(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || !node.has_text {
        return None;
    }
    if node.height < 140.0 || node.height > 520.0 {
        return None;
    }
    if !node.has_background && !node.has_border {
        return None;
    }
    if font_size_max(node) < 20.0 {
        return None;
    }

    Some(HeuristicResult::new(
        "section.cta",
        "structure:section-cta",
        0.8,
    ))
}

fn generic(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || node.width < 900.0 || node.height < 180.0 {
        return None;
    }

    Some(HeuristicResult::new(
        "section.generic",
        "structure:section",
        0.75,
    ))
}
