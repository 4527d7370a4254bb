//! Rules for WooCommerce storefront and product widgets.

use crate::heuristic::Rule;
use crate::rules::util::children_within_spread;
use crate::{HeuristicResult, NodeSnapshot};

/// WooCommerce group, in evaluation order.
pub const WOOCOMMERCE_RULES: &[Rule] = &[
    Rule::new("widget.woo.product-grid", 85, product_grid),
    Rule::new("widget.woo.single-product-summary", 82, single_product_summary),
    Rule::new("widget.woo.cart-like", 70, cart_like),
];

fn product_grid(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || node.child_count < 3 {
        return None;
    }
    if !node.has_child_image || !node.has_text {
        return None;
    }
    if !children_within_spread(node, 40.0) {
        return None;
    }

    Some(HeuristicResult::new(
        "widget.woo.product-grid",
        "woo:products-grid",
        0.82,
    ))
}

fn single_product_summary(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || !node.has_text {
        return None;
    }
    if node.width < 260.0 || node.height < 240.0 {
        return None;
    }

    Some(HeuristicResult::new(
        "widget.woo.single-product-summary",
        "woo:single-product-summary",
        0.78,
    ))
}

fn cart_like(node: &NodeSnapshot) -> Option<HeuristicResult> {
    if !node.is_frame_like() || !node.has_text {
        return None;
    }
    if node.width < 600.0 || node.height < 200.0 {
        return None;
    }

    Some(HeuristicResult::new("widget.woo.cart", "woo:cart", 0.7))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeKind, TextStats};

    #[test]
    fn test_product_grid_needs_images_and_text() {
        let mut node = NodeSnapshot::new("g", "Shop", NodeKind::Frame)
            .with_text(TextStats::default())
            .with_children_widths(vec![280.0, 300.0, 290.0]);
        assert!(product_grid(&node).is_none());

        node.has_child_image = true;
        assert_eq!(
            product_grid(&node).map(|r| r.widget),
            Some("woo:products-grid".to_string())
        );
    }

    #[test]
    fn test_cart_is_wider_than_summary() {
        let node = NodeSnapshot::new("c", "Cart", NodeKind::Frame)
            .with_bounds(0.0, 0.0, 400.0, 480.0)
            .with_text(TextStats::default());
        assert!(single_product_summary(&node).is_some());
        assert!(cart_like(&node).is_none());
    }
}
