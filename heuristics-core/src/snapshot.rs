//! Node snapshots - the read-only input of every heuristic.
//!
//! A [`NodeSnapshot`] is an immutable view of one design node plus the
//! aggregates the rules need (children widths, text statistics, background
//! and border flags). Rules only ever see `&NodeSnapshot`.

use serde::{Deserialize, Serialize};

/// The kind of a design node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// Generic frame, optionally with auto-layout.
    Frame,
    /// Top-level page section.
    Section,
    /// Reusable component definition.
    Component,
    /// Instance of a component.
    Instance,
    /// Plain grouping of children without layout.
    Group,
    /// Text run.
    Text,
    /// Rectangle shape.
    Rectangle,
    /// Ellipse shape.
    Ellipse,
    /// Free vector path.
    Vector,
    /// Star shape.
    Star,
    /// Line shape.
    Line,
    /// Regular polygon.
    Polygon,
    /// Boolean combination of shapes.
    BooleanOperation,
    /// Any node type this crate does not model.
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Whether the node behaves like a layout container for classification.
    ///
    /// Groups are deliberately excluded: they carry no layout semantics.
    #[must_use]
    pub const fn is_frame_like(self) -> bool {
        matches!(
            self,
            Self::Frame | Self::Section | Self::Component | Self::Instance
        )
    }

    /// Whether the node can be collapsed by the structure optimizer.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Frame | Self::Group)
    }

    /// Whether the node is a vector-ish shape that reads as an image or icon.
    #[must_use]
    pub const fn is_vector_graphic(self) -> bool {
        matches!(
            self,
            Self::Vector | Self::Ellipse | Self::Polygon | Self::Star | Self::BooleanOperation
        )
    }

    /// Whether the node is a geometric shape that may carry an image fill.
    #[must_use]
    pub const fn is_geometric_shape(self) -> bool {
        matches!(self, Self::Rectangle | Self::Ellipse)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Frame => "FRAME",
            Self::Section => "SECTION",
            Self::Component => "COMPONENT",
            Self::Instance => "INSTANCE",
            Self::Group => "GROUP",
            Self::Text => "TEXT",
            Self::Rectangle => "RECTANGLE",
            Self::Ellipse => "ELLIPSE",
            Self::Vector => "VECTOR",
            Self::Star => "STAR",
            Self::Line => "LINE",
            Self::Polygon => "POLYGON",
            Self::BooleanOperation => "BOOLEAN_OPERATION",
            Self::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// Main axis of an auto-layout container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisDirection {
    /// Children flow left to right.
    Horizontal,
    /// Children flow top to bottom.
    Vertical,
    /// No auto-layout.
    #[default]
    None,
}

/// Inner padding of a container in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    /// Left padding.
    pub left: f32,
    /// Right padding.
    pub right: f32,
    /// Top padding.
    pub top: f32,
    /// Bottom padding.
    pub bottom: f32,
}

impl Padding {
    /// Same padding on every side.
    #[must_use]
    pub const fn uniform(value: f32) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }

    /// Whether every side is zero (or negative).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.left <= 0.0 && self.right <= 0.0 && self.top <= 0.0 && self.bottom <= 0.0
    }

    /// Mean of the left and right padding.
    #[must_use]
    pub fn horizontal_mean(&self) -> f32 {
        (self.left + self.right) / 2.0
    }
}

/// Auto-layout settings of a frame-like node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoLayout {
    /// Main axis.
    pub direction: AxisDirection,
    /// Gap between consecutive children.
    #[serde(default)]
    pub item_spacing: f32,
    /// Inner padding.
    #[serde(default)]
    pub padding: Padding,
}

impl AutoLayout {
    /// Auto-layout along `direction` with no gap and no padding.
    #[must_use]
    pub const fn new(direction: AxisDirection) -> Self {
        Self {
            direction,
            item_spacing: 0.0,
            padding: Padding::uniform(0.0),
        }
    }

    /// Set the gap between children.
    #[must_use]
    pub fn with_spacing(mut self, item_spacing: f32) -> Self {
        self.item_spacing = item_spacing;
        self
    }

    /// Set the inner padding.
    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }
}

/// Text aggregates, present only when the node carries text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextStats {
    /// Largest font size found.
    #[serde(default)]
    pub font_size_max: Option<f32>,
    /// Smallest font size found.
    #[serde(default)]
    pub font_size_min: Option<f32>,
    /// Estimated number of rendered lines.
    #[serde(default)]
    pub line_count: Option<u32>,
    /// Whether bold weight dominates the text.
    #[serde(default)]
    pub bold_dominant: Option<bool>,
}

/// Immutable view of one design node used for classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Source node identifier.
    pub id: String,
    /// Layer name.
    pub name: String,
    /// Node kind.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// X position relative to the parent.
    pub x: f32,
    /// Y position relative to the parent.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Whether the node is visible.
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    /// Auto-layout settings, `None` for absolutely positioned content.
    #[serde(default)]
    pub layout: Option<AutoLayout>,
    /// Whether a solid background fill is present.
    #[serde(default)]
    pub has_background: bool,
    /// Opacity of the solid background fill.
    #[serde(default)]
    pub background_opacity: f32,
    /// Whether a stroke is present.
    #[serde(default)]
    pub has_border: bool,
    /// Corner radius in pixels.
    #[serde(default)]
    pub border_radius: f32,
    /// Whether a visible drop shadow is present.
    #[serde(default)]
    pub has_shadow: bool,
    /// Whether the node is or directly contains text.
    #[serde(default)]
    pub has_text: bool,
    /// Text aggregates.
    #[serde(default)]
    pub text: TextStats,
    /// Whether the node itself is filled with an image.
    #[serde(default)]
    pub has_image_fill: bool,
    /// Whether a child holds an image or a relevant vector icon.
    #[serde(default)]
    pub has_child_image: bool,
    /// Number of direct children.
    #[serde(default)]
    pub child_count: usize,
    /// Kinds of the direct children.
    #[serde(default)]
    pub children_types: Vec<NodeKind>,
    /// Widths of the direct children.
    #[serde(default)]
    pub children_widths: Vec<f32>,
    /// Heights of the direct children.
    #[serde(default)]
    pub children_heights: Vec<f32>,
}

const fn default_visible() -> bool {
    true
}

impl NodeSnapshot {
    /// Create a snapshot with zeroed geometry and no content flags.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            is_visible: true,
            layout: None,
            has_background: false,
            background_opacity: 0.0,
            has_border: false,
            border_radius: 0.0,
            has_shadow: false,
            has_text: false,
            text: TextStats::default(),
            has_image_fill: false,
            has_child_image: false,
            child_count: 0,
            children_types: Vec::new(),
            children_widths: Vec::new(),
            children_heights: Vec::new(),
        }
    }

    /// Set position and size.
    #[must_use]
    pub fn with_bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Enable auto-layout.
    #[must_use]
    pub fn with_auto_layout(mut self, layout: AutoLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Mark the node as carrying text with the given aggregates.
    #[must_use]
    pub fn with_text(mut self, text: TextStats) -> Self {
        self.has_text = true;
        self.text = text;
        self
    }

    /// Set the direct children widths; also sets the child count.
    #[must_use]
    pub fn with_children_widths(mut self, widths: Vec<f32>) -> Self {
        self.child_count = widths.len();
        self.children_widths = widths;
        self
    }

    /// Whether the node uses auto-layout.
    #[must_use]
    pub const fn is_auto_layout(&self) -> bool {
        self.layout.is_some()
    }

    /// Auto-layout direction, [`AxisDirection::None`] without auto-layout.
    #[must_use]
    pub fn direction(&self) -> AxisDirection {
        self.layout.map_or(AxisDirection::None, |l| l.direction)
    }

    /// Inner padding, zero without auto-layout.
    #[must_use]
    pub fn padding(&self) -> Padding {
        self.layout.map(|l| l.padding).unwrap_or_default()
    }

    /// Gap between children, zero without auto-layout.
    #[must_use]
    pub fn item_spacing(&self) -> f32 {
        self.layout.map_or(0.0, |l| l.item_spacing)
    }

    /// Whether the node kind is frame-like.
    #[must_use]
    pub const fn is_frame_like(&self) -> bool {
        self.kind.is_frame_like()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_design_tool_type() {
        let json = serde_json::to_string(&NodeKind::BooleanOperation).expect("serialize");
        assert_eq!(json, "\"BOOLEAN_OPERATION\"");

        let kind: NodeKind = serde_json::from_str("\"SLICE\"").expect("deserialize");
        assert_eq!(kind, NodeKind::Other);
    }

    #[test]
    fn test_frame_like_excludes_group() {
        assert!(NodeKind::Instance.is_frame_like());
        assert!(!NodeKind::Group.is_frame_like());
        assert!(NodeKind::Group.is_container());
        assert!(!NodeKind::Section.is_container());
    }

    #[test]
    fn test_layout_accessors_without_auto_layout() {
        let node = NodeSnapshot::new("1", "Box", NodeKind::Frame);
        assert!(!node.is_auto_layout());
        assert_eq!(node.direction(), AxisDirection::None);
        assert!(node.padding().is_zero());
        assert!(node.item_spacing().abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_minimal_snapshot() {
        let json = r#"{
            "id": "12:4",
            "name": "Title",
            "type": "TEXT",
            "x": 0, "y": 0, "width": 300, "height": 40,
            "has_text": true,
            "text": { "font_size_max": 36, "line_count": 1, "bold_dominant": true }
        }"#;

        let node: NodeSnapshot = serde_json::from_str(json).expect("should parse");
        assert_eq!(node.kind, NodeKind::Text);
        assert!(node.is_visible);
        assert_eq!(node.text.line_count, Some(1));
        assert_eq!(node.text.bold_dominant, Some(true));
    }
}
