//! Shared predicates for rule authors.

use crate::NodeSnapshot;

/// Spread tolerance for "same width" columns.
pub const COLUMN_WIDTH_TOLERANCE: f32 = 12.0;

/// Difference between the widest and narrowest width, `None` when empty.
#[must_use]
pub fn width_spread(widths: &[f32]) -> Option<f32> {
    let (min, max) = widths
        .iter()
        .fold(None, |acc: Option<(f32, f32)>, &w| match acc {
            None => Some((w, w)),
            Some((min, max)) => Some((min.min(w), max.max(w))),
        })?;
    Some(max - min)
}

/// Whether at least two widths exist and they differ by at most `tolerance`.
#[must_use]
pub fn are_widths_roughly_equal(widths: &[f32], tolerance: f32) -> bool {
    widths.len() >= 2 && width_spread(widths).is_some_and(|spread| spread <= tolerance)
}

/// Whether the children widths are non-empty and spread by at most `tolerance`.
#[must_use]
pub fn children_within_spread(node: &NodeSnapshot, tolerance: f32) -> bool {
    width_spread(&node.children_widths).is_some_and(|spread| spread <= tolerance)
}

/// Largest font size, zero when unknown.
#[must_use]
pub fn font_size_max(node: &NodeSnapshot) -> f32 {
    node.text.font_size_max.unwrap_or(0.0)
}

/// Estimated line count, one when unknown.
#[must_use]
pub fn line_count(node: &NodeSnapshot) -> u32 {
    node.text.line_count.unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_spread() {
        assert_eq!(width_spread(&[]), None);
        assert_eq!(width_spread(&[100.0]), Some(0.0));
        assert_eq!(width_spread(&[100.0, 112.0, 104.0]), Some(12.0));
    }

    #[test]
    fn test_roughly_equal_needs_two_widths() {
        assert!(!are_widths_roughly_equal(&[100.0], COLUMN_WIDTH_TOLERANCE));
        assert!(are_widths_roughly_equal(&[100.0, 112.0], COLUMN_WIDTH_TOLERANCE));
        assert!(!are_widths_roughly_equal(&[100.0, 113.0], COLUMN_WIDTH_TOLERANCE));
    }
}
