//! Arena-backed mutable scene tree.
//!
//! Nodes live in a flat table and refer to each other by [`NodeId`]. Children
//! are owned (ordered) relations, the parent link is a plain back-reference
//! used for reattachment. Removed nodes stay in the table, flagged, so stale
//! ids fail with [`HeuristicsError::Detached`] instead of aliasing new nodes.
//!
//! Coordinates follow the design tool: children of a FRAME are relative to
//! the frame, children of a GROUP are relative to the group's own parent.

use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};

use crate::{
    AutoLayout, AxisDirection, HeuristicsError, HeuristicsResult, NodeKind, NodeSnapshot, Padding,
    TextStats,
};

/// Font weight from which text counts as bold.
const BOLD_WEIGHT: u16 = 600;

/// Index of a node in a [`SceneTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a fill or stroke paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintKind {
    /// Solid color.
    Solid,
    /// Image fill.
    Image,
    /// Linear gradient.
    GradientLinear,
    /// Radial gradient.
    GradientRadial,
    /// Any other paint.
    #[serde(other)]
    Other,
}

/// A fill or stroke paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    /// Paint kind.
    #[serde(rename = "type")]
    pub kind: PaintKind,
    /// Whether the paint is visible.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Paint opacity.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

impl Paint {
    /// A visible, opaque solid paint.
    #[must_use]
    pub const fn solid() -> Self {
        Self {
            kind: PaintKind::Solid,
            visible: true,
            opacity: 1.0,
        }
    }

    /// A visible image paint.
    #[must_use]
    pub const fn image() -> Self {
        Self {
            kind: PaintKind::Image,
            visible: true,
            opacity: 1.0,
        }
    }
}

/// Kind of a visual effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    /// Outer shadow.
    DropShadow,
    /// Inner shadow.
    InnerShadow,
    /// Blur of the layer itself.
    LayerBlur,
    /// Blur of what is behind the layer.
    BackgroundBlur,
    /// Any other effect.
    #[serde(other)]
    Other,
}

/// A visual effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Effect kind.
    #[serde(rename = "type")]
    pub kind: EffectKind,
    /// Whether the effect is visible.
    #[serde(default = "default_true")]
    pub visible: bool,
}

const fn default_true() -> bool {
    true
}

const fn default_opacity() -> f32 {
    1.0
}

/// Node type as written by the serializer.
///
/// Types outside [`NodeKind`] classify as [`NodeKind::Other`] but keep their
/// name, so a loaded document serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NodeType {
    kind: NodeKind,
    unknown: Option<String>,
}

impl NodeType {
    /// Node kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The type name as written by the serializer.
    #[must_use]
    pub fn name(&self) -> String {
        self.unknown
            .clone()
            .unwrap_or_else(|| self.kind.to_string())
    }
}

impl From<NodeKind> for NodeType {
    fn from(kind: NodeKind) -> Self {
        Self {
            kind,
            unknown: None,
        }
    }
}

impl From<String> for NodeType {
    fn from(name: String) -> Self {
        let parsed: Result<NodeKind, serde::de::value::Error> =
            NodeKind::deserialize(name.as_str().into_deserializer());
        match parsed {
            Ok(NodeKind::Other) | Err(_) => Self {
                kind: NodeKind::Other,
                unknown: Some(name),
            },
            Ok(kind) => kind.into(),
        }
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        match node_type.unknown {
            Some(name) => name,
            None => node_type.kind.to_string(),
        }
    }
}

/// Properties of one node as emitted by the design-tool serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProps {
    /// Source node identifier.
    pub id: String,
    /// Layer name.
    #[serde(default)]
    pub name: String,
    /// Node type.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// X position relative to the parent.
    #[serde(default)]
    pub x: f32,
    /// Y position relative to the parent.
    #[serde(default)]
    pub y: f32,
    /// Width.
    #[serde(default)]
    pub width: f32,
    /// Height.
    #[serde(default)]
    pub height: f32,
    /// Visibility.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Locked nodes are never collapsed.
    #[serde(default)]
    pub locked: bool,
    /// Fill paints.
    #[serde(default)]
    pub fills: Vec<Paint>,
    /// Stroke paints.
    #[serde(default)]
    pub strokes: Vec<Paint>,
    /// Stroke weight.
    #[serde(default)]
    pub stroke_weight: f32,
    /// Effects.
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// Corner radius.
    #[serde(default)]
    pub corner_radius: f32,
    /// Whether content is clipped to the bounds.
    #[serde(default)]
    pub clips_content: bool,
    /// Auto-layout axis, `NONE` for absolute positioning.
    #[serde(default)]
    pub layout_mode: AxisDirection,
    /// Left padding.
    #[serde(default)]
    pub padding_left: f32,
    /// Right padding.
    #[serde(default)]
    pub padding_right: f32,
    /// Top padding.
    #[serde(default)]
    pub padding_top: f32,
    /// Bottom padding.
    #[serde(default)]
    pub padding_bottom: f32,
    /// Gap between children.
    #[serde(default)]
    pub item_spacing: f32,
    /// Text content of TEXT nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    /// Font size of TEXT nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// Font weight of TEXT nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
}

impl NodeProps {
    /// Properties with zeroed geometry and no paints.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: kind.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            visible: true,
            locked: false,
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: 0.0,
            effects: Vec::new(),
            corner_radius: 0.0,
            clips_content: false,
            layout_mode: AxisDirection::None,
            padding_left: 0.0,
            padding_right: 0.0,
            padding_top: 0.0,
            padding_bottom: 0.0,
            item_spacing: 0.0,
            characters: None,
            font_size: None,
            font_weight: None,
        }
    }

    /// Node kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.node_type.kind()
    }

    /// Auto-layout settings, `None` for absolute positioning.
    #[must_use]
    pub fn auto_layout(&self) -> Option<AutoLayout> {
        (self.layout_mode != AxisDirection::None).then(|| {
            AutoLayout::new(self.layout_mode)
                .with_spacing(self.item_spacing)
                .with_padding(Padding {
                    left: self.padding_left,
                    right: self.padding_right,
                    top: self.padding_top,
                    bottom: self.padding_bottom,
                })
        })
    }

    /// Whether any fill is visible.
    #[must_use]
    pub fn has_visible_fill(&self) -> bool {
        self.fills.iter().any(|p| p.visible)
    }

    /// Whether a visible stroke with positive weight is drawn.
    #[must_use]
    pub fn has_visible_stroke(&self) -> bool {
        self.stroke_weight > 0.0 && self.strokes.iter().any(|p| p.visible)
    }

    /// Whether any effect is visible.
    #[must_use]
    pub fn has_visible_effect(&self) -> bool {
        self.effects.iter().any(|e| e.visible)
    }

    /// Whether rounded corners clip the content.
    #[must_use]
    pub fn clips_rounded_corners(&self) -> bool {
        self.corner_radius > 0.0 && self.clips_content
    }

    fn has_image_fill(&self) -> bool {
        self.fills
            .iter()
            .any(|p| p.visible && p.kind == PaintKind::Image)
    }

    /// Rough rendered line count of a TEXT node.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn estimated_lines(&self) -> Option<u32> {
        let size = self.font_size.filter(|s| *s > 0.0)?;
        Some((self.height / size).round().max(0.0) as u32)
    }

    fn is_bold(&self) -> bool {
        self.font_weight.is_some_and(|w| w >= BOLD_WEIGHT)
    }
}

/// Nested node document, the serializer's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    /// Node properties.
    #[serde(flatten)]
    pub props: NodeProps,
    /// Ordered children.
    #[serde(default)]
    pub children: Vec<SerializedNode>,
}

impl SerializedNode {
    /// A node without children.
    #[must_use]
    pub const fn leaf(props: NodeProps) -> Self {
        Self {
            props,
            children: Vec::new(),
        }
    }

    /// A node with the given children.
    #[must_use]
    pub const fn with_children(props: NodeProps, children: Vec<Self>) -> Self {
        Self { props, children }
    }
}

/// A node stored in the arena.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Node properties.
    pub props: NodeProps,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    removed: bool,
}

impl TreeNode {
    /// Ordered children.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent back-reference.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// A mutable scene tree with a single root.
#[derive(Debug, Clone)]
pub struct SceneTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl SceneTree {
    /// Build the arena from a nested document.
    #[must_use]
    pub fn from_document(document: SerializedNode) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.push(document, None);
        tree
    }

    fn push(&mut self, document: SerializedNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            props: document.props,
            children: Vec::with_capacity(document.children.len()),
            parent,
            removed: false,
        });
        for child in document.children {
            let child_id = self.push(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    /// Parse a nested JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match [`SerializedNode`].
    pub fn from_json(json: &str) -> HeuristicsResult<Self> {
        let document: SerializedNode = serde_json::from_str(json)?;
        Ok(Self::from_document(document))
    }

    /// Rebuild the nested document from the current root.
    #[must_use]
    pub fn to_document(&self) -> SerializedNode {
        self.document_at(self.root)
    }

    fn document_at(&self, id: NodeId) -> SerializedNode {
        let node = &self.nodes[id.0];
        SerializedNode {
            props: node.props.clone(),
            children: node
                .children
                .iter()
                .map(|&child| self.document_at(child))
                .collect(),
        }
    }

    /// Serialize the current tree to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> HeuristicsResult<String> {
        serde_json::to_string(&self.to_document()).map_err(HeuristicsError::Serialization)
    }

    /// Current root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Get a live node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0).filter(|n| !n.removed)
    }

    /// Get a live node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id.0).filter(|n| !n.removed)
    }

    /// Get a live node or fail.
    ///
    /// # Errors
    ///
    /// Returns [`HeuristicsError::NodeNotFound`] for unknown ids and
    /// [`HeuristicsError::Detached`] for removed nodes.
    pub fn node(&self, id: NodeId) -> HeuristicsResult<&TreeNode> {
        let node = self
            .nodes
            .get(id.0)
            .ok_or_else(|| HeuristicsError::NodeNotFound(id.to_string()))?;
        if node.removed {
            return Err(HeuristicsError::Detached(format!(
                "{} ({}) was removed",
                node.props.name, node.props.id
            )));
        }
        Ok(node)
    }

    /// Children of a live node, empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(TreeNode::children).unwrap_or_default()
    }

    /// Parent of a live node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(TreeNode::parent)
    }

    /// Find a live node by its source id.
    #[must_use]
    pub fn find(&self, source_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| !n.removed && n.props.id == source_id)
            .map(NodeId)
    }

    /// Live nodes reachable from `id`, in pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Number of nodes reachable from the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descendants(self.root).len()
    }

    /// Whether the tree has no live nodes. A tree always keeps its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.get(self.root).is_none()
    }

    /// Detach `id` from its parent and return its former position.
    ///
    /// # Errors
    ///
    /// Returns [`HeuristicsError::Detached`] if the node is removed or has no
    /// parent.
    pub fn detach(&mut self, id: NodeId) -> HeuristicsResult<usize> {
        let parent = self.node(id)?.parent.ok_or_else(|| {
            HeuristicsError::Detached(format!("{id} has no parent"))
        })?;
        let siblings = &mut self.nodes[parent.0].children;
        let index = siblings
            .iter()
            .position(|&c| c == id)
            .ok_or_else(|| HeuristicsError::Detached(format!("{id} missing from {parent}")))?;
        siblings.remove(index);
        self.nodes[id.0].parent = None;
        Ok(index)
    }

    /// Insert a parentless node as child of `parent` at `index` (clamped).
    ///
    /// # Errors
    ///
    /// Returns [`HeuristicsError::Detached`] if either node is removed, or the
    /// child is still attached somewhere or is the root.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> HeuristicsResult<()> {
        self.node(parent)?;
        if self.node(child)?.parent.is_some() || child == self.root {
            return Err(HeuristicsError::Detached(format!(
                "{child} is still attached"
            )));
        }
        let siblings = &mut self.nodes[parent.0].children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Remove a node, which must already be detached, with its subtree.
    ///
    /// # Errors
    ///
    /// Returns [`HeuristicsError::Detached`] if the node is removed, still
    /// attached, or is the root.
    pub fn remove(&mut self, id: NodeId) -> HeuristicsResult<()> {
        if self.node(id)?.parent.is_some() || id == self.root {
            return Err(HeuristicsError::Detached(format!(
                "{id} must be detached before removal"
            )));
        }
        for node in self.descendants(id) {
            self.nodes[node.0].removed = true;
        }
        Ok(())
    }

    /// Remove a container and put its only child (if any) in its place.
    ///
    /// The child keeps its rendered position: when a FRAME is removed its
    /// child is offset by the frame's coordinates, a GROUP's child already
    /// shares the group's coordinate space. When the container is the root,
    /// the child becomes the new root. Preconditions are checked before
    /// anything is mutated.
    ///
    /// # Errors
    ///
    /// Returns [`HeuristicsError::Detached`] if the node is removed, is neither
    /// attached nor the root, has more than one child, or is a childless root.
    pub fn splice_out(&mut self, id: NodeId) -> HeuristicsResult<Option<NodeId>> {
        let node = self.node(id)?;
        let is_root = id == self.root;
        if node.parent.is_none() && !is_root {
            return Err(HeuristicsError::Detached(format!(
                "{} ({}) is not in the tree",
                node.props.name, node.props.id
            )));
        }
        let child = match node.children.as_slice() {
            [] if is_root => {
                return Err(HeuristicsError::Detached(
                    "a childless root cannot be removed".to_string(),
                ));
            }
            [] => None,
            [only] => Some(*only),
            many => {
                return Err(HeuristicsError::Detached(format!(
                    "{id} has {} children",
                    many.len()
                )));
            }
        };
        let slot = match node.parent {
            Some(parent) => {
                let index = self.nodes[parent.0]
                    .children
                    .iter()
                    .position(|&c| c == id)
                    .ok_or_else(|| {
                        HeuristicsError::Detached(format!("{id} missing from {parent}"))
                    })?;
                Some((parent, index))
            }
            None => None,
        };
        let (dx, dy) = match node.props.kind() {
            NodeKind::Group => (0.0, 0.0),
            _ => (node.props.x, node.props.y),
        };

        if let Some(child) = child {
            self.nodes[id.0].children.clear();
            let props = &mut self.nodes[child.0].props;
            props.x += dx;
            props.y += dy;
            self.nodes[child.0].parent = slot.map(|(parent, _)| parent);
        }

        match (slot, child) {
            (Some((parent, index)), Some(child)) => self.nodes[parent.0].children[index] = child,
            (Some((parent, index)), None) => {
                self.nodes[parent.0].children.remove(index);
            }
            // Root with one child: the child takes over.
            (None, Some(child)) => self.root = child,
            (None, None) => {}
        }
        self.nodes[id.0].parent = None;
        self.nodes[id.0].removed = true;

        tracing::trace!(removed = %id, promoted = ?child, "spliced node out");
        Ok(child)
    }

    /// Derive the rule-facing snapshot of a live node.
    ///
    /// Frame-like nodes aggregate their direct children (counts, geometry,
    /// text metrics) and peek one level deeper for images. TEXT nodes carry
    /// their own font metrics, shapes report image fills.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is unknown or removed.
    pub fn snapshot(&self, id: NodeId) -> HeuristicsResult<NodeSnapshot> {
        let node = self.node(id)?;
        let props = &node.props;

        let mut snapshot = NodeSnapshot::new(props.id.clone(), props.name.clone(), props.kind())
            .with_bounds(props.x, props.y, props.width, props.height);
        snapshot.is_visible = props.visible;

        match props.kind() {
            kind if kind.is_frame_like() => self.aggregate_children(node, &mut snapshot),
            NodeKind::Text => {
                snapshot.has_text = true;
                snapshot.text = TextStats {
                    font_size_max: props.font_size,
                    font_size_min: props.font_size,
                    line_count: props.estimated_lines().map(|lines| lines.max(1)),
                    bold_dominant: props.font_weight.map(|_| props.is_bold()),
                };
            }
            kind if kind.is_geometric_shape() => {
                snapshot.has_image_fill = props.has_image_fill();
            }
            _ => {}
        }

        Ok(snapshot)
    }

    fn aggregate_children(&self, node: &TreeNode, snapshot: &mut NodeSnapshot) {
        let props = &node.props;
        snapshot.layout = props.auto_layout();

        if let Some(solid) = props
            .fills
            .iter()
            .find(|p| p.visible && p.kind == PaintKind::Solid)
        {
            snapshot.has_background = true;
            snapshot.background_opacity = solid.opacity;
        }
        snapshot.has_image_fill = props.has_image_fill();
        snapshot.has_border = props.strokes.iter().any(|p| p.visible);
        snapshot.border_radius = props.corner_radius;
        snapshot.has_shadow = props
            .effects
            .iter()
            .any(|e| e.visible && e.kind == EffectKind::DropShadow);

        let mut sizes: Option<(f32, f32)> = None;
        let mut lines = 0_u32;
        let (mut texts, mut bold) = (0_usize, 0_usize);

        for &child_id in &node.children {
            let child = &self.nodes[child_id.0].props;
            snapshot.children_types.push(child.kind());
            snapshot.children_widths.push(child.width);
            snapshot.children_heights.push(child.height);

            match child.kind() {
                kind if kind.is_vector_graphic() => snapshot.has_child_image = true,
                NodeKind::Rectangle | NodeKind::Ellipse if child.has_image_fill() => {
                    snapshot.has_child_image = true;
                }
                NodeKind::Text => {
                    snapshot.has_text = true;
                    texts += 1;
                    if child.is_bold() {
                        bold += 1;
                    }
                    if let Some(size) = child.font_size {
                        sizes = Some(sizes.map_or((size, size), |(max, min)| {
                            (max.max(size), min.min(size))
                        }));
                    }
                    lines += child.estimated_lines().unwrap_or(0);
                }
                NodeKind::Frame | NodeKind::Instance | NodeKind::Group => {
                    if self.has_image_below(child_id) {
                        snapshot.has_child_image = true;
                    }
                }
                _ => {}
            }
        }
        snapshot.child_count = node.children.len();

        if snapshot.has_text {
            snapshot.text = TextStats {
                font_size_max: sizes.map(|(max, _)| max),
                font_size_min: sizes.map(|(_, min)| min),
                line_count: Some(lines.max(1)),
                bold_dominant: Some(bold * 2 > texts),
            };
        }
    }

    fn has_image_below(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.iter().any(|&grandchild| {
            let props = &self.nodes[grandchild.0].props;
            props.kind().is_vector_graphic() || props.has_image_fill()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(id: &str, children: Vec<SerializedNode>) -> SerializedNode {
        let mut props = NodeProps::new(id, id, NodeKind::Frame);
        props.width = 100.0;
        props.height = 100.0;
        SerializedNode::with_children(props, children)
    }

    fn text(id: &str, size: f32, height: f32, weight: u16) -> SerializedNode {
        let mut props = NodeProps::new(id, id, NodeKind::Text);
        props.font_size = Some(size);
        props.height = height;
        props.width = 200.0;
        props.font_weight = Some(weight);
        props.characters = Some("Lorem ipsum".to_string());
        SerializedNode::leaf(props)
    }

    fn sample() -> SceneTree {
        SceneTree::from_document(frame(
            "root",
            vec![
                frame("a", vec![text("a1", 16.0, 48.0, 400)]),
                frame("b", vec![]),
                text("c", 32.0, 40.0, 700),
            ],
        ))
    }

    #[test]
    fn test_document_round_trip_preserves_structure() {
        let tree = sample();
        assert_eq!(tree.len(), 5);
        let doc = tree.to_document();
        assert_eq!(doc.children.len(), 3);
        assert_eq!(doc.children[0].children[0].props.id, "a1");
        assert_eq!(SceneTree::from_document(doc).len(), 5);
    }

    #[test]
    fn test_descendants_are_pre_order() {
        let tree = sample();
        let ids: Vec<_> = tree
            .descendants(tree.root())
            .into_iter()
            .filter_map(|id| tree.get(id).map(|n| n.props.id.clone()))
            .collect();
        assert_eq!(ids, vec!["root", "a", "a1", "b", "c"]);
    }

    #[test]
    fn test_detach_and_insert_keep_back_links() {
        let mut tree = sample();
        let b = tree.find("b").expect("b");
        let root = tree.root();

        assert_eq!(tree.detach(b).expect("detach"), 1);
        assert_eq!(tree.parent(b), None);
        assert!(matches!(tree.detach(b), Err(HeuristicsError::Detached(_))));

        tree.insert_child(root, 99, b).expect("insert");
        assert_eq!(tree.children(root).last(), Some(&b));
        assert_eq!(tree.parent(b), Some(root));
        assert!(tree.insert_child(root, 0, b).is_err());
    }

    #[test]
    fn test_splice_out_promotes_child_in_place() {
        let mut tree = sample();
        let a = tree.find("a").expect("a");
        let a1 = tree.find("a1").expect("a1");
        tree.get_mut(a).expect("a").props.x = 10.0;
        tree.get_mut(a1).expect("a1").props.x = 5.0;

        assert_eq!(tree.splice_out(a).expect("splice"), Some(a1));
        assert_eq!(tree.children(tree.root())[0], a1);
        assert_eq!(tree.parent(a1), Some(tree.root()));
        assert!((tree.get(a1).expect("a1").props.x - 15.0).abs() < f32::EPSILON);
        assert!(tree.get(a).is_none());
        assert!(matches!(tree.node(a), Err(HeuristicsError::Detached(_))));
    }

    #[test]
    fn test_splice_out_group_keeps_child_position() {
        let mut group = NodeProps::new("group", "group", NodeKind::Group);
        group.x = 50.0;
        group.y = 50.0;
        let mut rect = NodeProps::new("rect", "rect", NodeKind::Rectangle);
        rect.x = 50.0;
        rect.y = 50.0;
        let mut tree = SceneTree::from_document(frame(
            "root",
            vec![SerializedNode::with_children(group, vec![SerializedNode::leaf(rect)])],
        ));
        let rect = tree.find("rect").expect("rect");

        tree.splice_out(tree.find("group").expect("group")).expect("splice");

        let props = &tree.get(rect).expect("rect").props;
        assert!((props.x - 50.0).abs() < f32::EPSILON);
        assert!((props.y - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_splice_out_root_and_refusals() {
        let mut tree =
            SceneTree::from_document(frame("outer", vec![frame("inner", vec![])]));
        let outer = tree.root();
        let inner = tree.find("inner").expect("inner");

        assert_eq!(tree.splice_out(outer).expect("splice"), Some(inner));
        assert_eq!(tree.root(), inner);
        assert_eq!(tree.parent(inner), None);
        // A childless root stays.
        assert!(tree.splice_out(inner).is_err());
        assert_eq!(tree.len(), 1);

        let mut wide = sample();
        assert!(wide.splice_out(wide.root()).is_err());
    }

    #[test]
    fn test_remove_requires_detach() {
        let mut tree = sample();
        let a = tree.find("a").expect("a");
        assert!(tree.remove(a).is_err());
        tree.detach(a).expect("detach");
        tree.remove(a).expect("remove");
        assert!(tree.find("a1").is_none());
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_text_snapshot() {
        let tree = sample();
        let snap = tree.snapshot(tree.find("c").expect("c")).expect("snapshot");
        assert!(snap.has_text);
        assert_eq!(snap.text.font_size_max, Some(32.0));
        assert_eq!(snap.text.line_count, Some(1));
        assert_eq!(snap.text.bold_dominant, Some(true));
    }

    #[test]
    fn test_frame_snapshot_aggregates_children() {
        let mut tree = sample();
        let root = tree.root();
        {
            let props = &mut tree.get_mut(root).expect("root").props;
            props.layout_mode = AxisDirection::Vertical;
            props.item_spacing = 8.0;
            props.fills.push(Paint::solid());
            props.corner_radius = 4.0;
        }
        let a = tree.find("a").expect("a");
        let mut icon = NodeProps::new("icon", "icon", NodeKind::Vector);
        icon.width = 24.0;
        let icon = tree.push(SerializedNode::leaf(icon), None);
        tree.insert_child(a, 0, icon).expect("insert");

        let snap = tree.snapshot(root).expect("snapshot");
        assert!(snap.is_auto_layout());
        assert_eq!(snap.direction(), AxisDirection::Vertical);
        assert!((snap.item_spacing() - 8.0).abs() < f32::EPSILON);
        assert!(snap.has_background);
        assert_eq!(snap.child_count, 3);
        assert_eq!(
            snap.children_types,
            vec![NodeKind::Frame, NodeKind::Frame, NodeKind::Text]
        );
        assert!(snap.has_text);
        assert_eq!(snap.text.font_size_max, Some(32.0));
        assert_eq!(snap.text.font_size_min, Some(32.0));
        // Only direct text children are measured: 40 / 32 rounds to 1.
        assert_eq!(snap.text.line_count, Some(1));
        // The vector two levels down counts as a child image.
        assert!(snap.has_child_image);

        let a_snap = tree.snapshot(a).expect("snapshot");
        assert!(a_snap.has_child_image);
        assert_eq!(a_snap.text.line_count, Some(3));
        assert_eq!(a_snap.text.bold_dominant, Some(false));
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "id": "1:2",
            "type": "FRAME",
            "width": 320,
            "height": 200,
            "fills": [{"type": "IMAGE"}],
            "children": [{"id": "1:3", "type": "STICKY_NOTE"}]
        }"#;
        let tree = SceneTree::from_json(json).expect("parse");
        let root = tree.get(tree.root()).expect("root");
        assert!(root.props.visible);
        assert!(root.props.fills[0].visible);
        assert_eq!(root.props.layout_mode, AxisDirection::None);

        let child = tree.children(tree.root())[0];
        assert_eq!(tree.get(child).expect("child").props.kind(), NodeKind::Other);
        assert!(tree.snapshot(tree.root()).expect("snapshot").has_image_fill);

        let back: serde_json::Value =
            serde_json::from_str(&tree.to_json().expect("json")).expect("value");
        assert_eq!(back["type"], "FRAME");
        assert_eq!(back["layout_mode"], "NONE");
        assert_eq!(back["children"][0]["type"], "STICKY_NOTE");
    }

    #[test]
    fn test_node_type_keeps_unknown_names() {
        let known = NodeType::from("BOOLEAN_OPERATION".to_string());
        assert_eq!(known.kind(), NodeKind::BooleanOperation);
        assert_eq!(known.name(), "BOOLEAN_OPERATION");

        let unknown = NodeType::from("WASHI_TAPE".to_string());
        assert_eq!(unknown.kind(), NodeKind::Other);
        assert_eq!(String::from(unknown), "WASHI_TAPE");
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let tree = sample();
        assert!(matches!(
            tree.node(NodeId(42)),
            Err(HeuristicsError::NodeNotFound(_))
        ));
        assert!(tree.children(NodeId(42)).is_empty());
    }
}
