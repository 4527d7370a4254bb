//! Media rules.

use crate::heuristic::Rule;
use crate::{HeuristicResult, NodeSnapshot};

/// Media group, in evaluation order.
pub const MEDIA_RULES: &[Rule] = &[Rule::new("media.image-single", 65, image_single)];

fn image_single(node: &NodeSnapshot) -> Option<HeuristicResult> {
    let frame_like = node.is_frame_like();

    if (node.kind.is_geometric_shape() || frame_like) && node.has_image_fill {
        // A frame with content over an image fill is a background, not an image.
        if frame_like && (node.has_text || node.child_count > 0) {
            return None;
        }
        return Some(
            HeuristicResult::new("media.image.fill", "structure:image", 0.85)
                .with_meta("imageId", node.id.clone()),
        );
    }

    if frame_like && node.has_child_image && !node.has_text && node.child_count == 1 {
        return Some(
            HeuristicResult::new("media.image.child", "structure:image", 0.8)
                .with_meta("source", "child"),
        );
    }

    None
}
