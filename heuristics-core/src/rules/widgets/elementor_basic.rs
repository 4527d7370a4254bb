//! Rules for the free Elementor widget set.

use crate::heuristic::Rule;
use crate::rules::util::{font_size_max, line_count};
use crate::{AxisDirection, HeuristicResult, NodeKind, NodeSnapshot};

/// Elementor basic group, in evaluation order.
pub const ELEMENTOR_BASIC_RULES: &[Rule] = &[
    Rule::new("widget.elementor.heading", 90, heading),
    Rule::new("widget.elementor.text-editor", 85, text_editor),
    Rule::new("widget.elementor.image", 80, image),
    Rule::new("widget.elementor.button", 90, button),
    Rule::new("widget.elementor.icon", 70, icon),
    Rule::new("widget.elementor.icon-box", 78, icon_box),
    Rule::new("widget.elementor.image-box", 78, image_box),
    Rule::new("widget.elementor.divider", 65, divider),
    Rule::new("widget.elementor.spacer", 50, spacer),
];

fn heading(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if node.kind != NodeKind::Text || !node.has_text {
        return None;
    }
    let size_max = font_size_max(node);
    if size_max < 22.0 || line_count(node) > 3 {
        return None;
    }
    if !node.text.bold_dominant.unwrap_or(false) {
        return None;
    }

    let level = if size_max >= 32.0 { "h1-h2" } else { "h3" };
    Some(
        HeuristicResult::new("widget.elementor.heading", "w:heading", 0.9)
            .with_meta("levelGuess", level),
    )
}

fn text_editor(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if node.kind != NodeKind::Text || !node.has_text {
        return None;
    }
    if font_size_max(node) > 22.0 || line_count(node) < 2 {
        return None;
    }

    Some(HeuristicResult::new(
        "widget.elementor.text-editor",
        "w:text-editor",
        0.85,
    ))
}

fn image(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if node.kind.is_geometric_shape() && node.has_image_fill {
        return Some(HeuristicResult::new(
            "widget.elementor.image",
            "w:image",
            0.88,
        ));
    }
    if node.is_frame_like() && node.has_child_image && !node.has_text {
        return Some(HeuristicResult::new(
            "widget.elementor.image",
            "w:image",
            0.8,
        ));
    }
    None
}

fn button(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || !node.is_auto_layout() {
        return None;
    }
    if !node.has_background || !node.has_text {
        return None;
    }
    if node.height < 28.0 || node.height > 72.0 || node.width < 80.0 {
        return None;
    }
    if node.padding().horizontal_mean() < 10.0 {
        return None;
    }

    Some(HeuristicResult::new(
        "widget.elementor.button",
        "w:button",
        0.9,
    ))
}

fn icon(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !matches!(
        node.kind,
        NodeKind::Ellipse | NodeKind::Vector | NodeKind::Instance
    ) {
        return None;
    }
    if node.width > 128.0 || node.height > 128.0 {
        return None;
    }

    Some(HeuristicResult::new("widget.elementor.icon", "w:icon", 0.78))
}

/// Vertical auto-layout stack of 2-4 children mixing a graphic and text.
fn is_media_text_stack(node: &NodeSnapshot) -> bool {
    node.is_frame_like()
        && node.direction() == AxisDirection::Vertical
        && node.has_text
        && node.has_child_image
        && (2..=4).contains(&node.child_count)
}

fn icon_box(node: &NodeSnapshot) -> Option<HeuristicResult> {
    is_media_text_stack(node).then(|| {
        HeuristicResult::new("widget.elementor.icon-box", "w:icon-box", 0.8)
    })
}

fn image_box(node: &NodeSnapshot) -> Option<HeuristicResult> {
    is_media_text_stack(node).then(|| {
        HeuristicResult::new("widget.elementor.image-box", "w:image-box", 0.8)
    })
}

fn divider(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if node.height > 4.0 && node.width < 200.0 {
        return None;
    }
    if !node.has_border && !node.has_background {
        return None;
    }

    Some(HeuristicResult::new(
        "widget.elementor.divider",
        "w:divider",
        0.7,
    ))
}

fn spacer(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || node.child_count != 0 {
        return None;
    }
    if !node.has_background && !node.has_border {
        return None;
    }
    if !(8.0..=80.0).contains(&node.height) || node.width < 16.0 {
        return None;
    }

    Some(HeuristicResult::new(
        "widget.elementor.spacer",
        "w:spacer",
        0.65,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AutoLayout, Padding, TextStats};

    fn text(size: f32, lines: u32, bold: bool) -> NodeSnapshot {
        NodeSnapshot::new("t", "Text", NodeKind::Text).with_text(TextStats {
            font_size_max: Some(size),
            font_size_min: Some(size),
            line_count: Some(lines),
            bold_dominant: Some(bold),
        })
    }

    #[test]
    fn test_heading_level_guess() {
        let big = heading(&text(40.0, 1, true)).expect("should match");
        assert_eq!(big.meta.as_ref().map(|m| m["levelGuess"].clone()), Some("h1-h2".into()));

        let small = heading(&text(24.0, 2, true)).expect("should match");
        assert_eq!(small.meta.as_ref().map(|m| m["levelGuess"].clone()), Some("h3".into()));

        assert!(heading(&text(40.0, 1, false)).is_none());
    }

    #[test]
    fn test_text_editor_needs_multiple_lines() {
        assert!(text_editor(&text(16.0, 5, false)).is_some());
        assert!(text_editor(&text(16.0, 1, false)).is_none());
    }

    #[test]
    fn test_button_shape() {
        let mut node = NodeSnapshot::new("b", "CTA", NodeKind::Frame)
            .with_bounds(0.0, 0.0, 160.0, 48.0)
            .with_auto_layout(AutoLayout::new(AxisDirection::Horizontal).with_padding(Padding {
                left: 24.0,
                right: 24.0,
                top: 12.0,
                bottom: 12.0,
            }))
            .with_text(TextStats::default());
        node.has_background = true;
        assert!(button(&node).is_some());

        node.layout = Some(AutoLayout::new(AxisDirection::Horizontal));
        assert!(button(&node).is_none(), "unpadded label is not a button");
    }

    #[test]
    fn test_icon_size_limit() {
        let small =
            NodeSnapshot::new("i", "Icon", NodeKind::Vector).with_bounds(0.0, 0.0, 24.0, 24.0);
        assert!(icon(&small).is_some());
        let big = small.clone().with_bounds(0.0, 0.0, 400.0, 400.0);
        assert!(icon(&big).is_none());
    }

    #[test]
    fn test_spacer_and_divider() {
        let mut line =
            NodeSnapshot::new("d", "Rule", NodeKind::Rectangle).with_bounds(0.0, 0.0, 800.0, 1.0);
        line.has_background = true;
        assert!(divider(&line).is_some());
        assert!(spacer(&line).is_none(), "spacers are frames");

        let mut gap =
            NodeSnapshot::new("s", "Gap", NodeKind::Frame).with_bounds(0.0, 0.0, 400.0, 40.0);
        gap.has_background = true;
        assert!(spacer(&gap).is_some());
    }
}
