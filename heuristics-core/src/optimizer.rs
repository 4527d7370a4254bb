//! Structure optimizer: collapses wrapper containers that render nothing.
//!
//! A FRAME or GROUP is redundant when removing it (and moving its single child
//! up, if any) cannot change what is drawn. Everything that can make a wrapper
//! visible or affect its child's placement is reported as a
//! [`PreservationReason`].

use std::fmt;

use serde::Serialize;

use crate::tree::{NodeId, SceneTree};
use crate::{NodeKind, NodeSnapshot};

/// Distance from the origin a covering child must stay under.
pub const POSITION_TOLERANCE: f32 = 0.1;

/// Size difference a covering child must stay under.
pub const SIZE_TOLERANCE: f32 = 1.0;

/// Severity of an optimizer log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Informational.
    Info,
    /// Recoverable problem.
    Warn,
    /// Failure.
    Error,
}

/// Callback receiving every optimizer explanation.
pub type LogCallback = Box<dyn Fn(&str, LogLevel) + Send + Sync>;

/// Why a container is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "value", rename_all = "snake_case")]
pub enum PreservationReason {
    /// The node is locked.
    Locked,
    /// The node groups several children.
    Children(usize),
    /// A visible fill is drawn.
    Fill,
    /// A visible stroke is drawn.
    Stroke,
    /// A visible effect is drawn.
    Effects,
    /// Rounded corners clip the content.
    CornerRadius,
    /// Auto-layout padding offsets the child.
    Padding,
    /// Auto-layout gap between a nested auto-layout child.
    Gap,
    /// The child does not cover the container's bounds.
    OffsetChild,
    /// The node is a childless root.
    Root,
}

impl fmt::Display for PreservationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => f.write_str("locked"),
            Self::Children(n) => write!(f, "{n} children"),
            Self::Fill => f.write_str("visible fill"),
            Self::Stroke => f.write_str("visible stroke"),
            Self::Effects => f.write_str("visible effects"),
            Self::CornerRadius => f.write_str("clipping corner radius"),
            Self::Padding => f.write_str("padding"),
            Self::Gap => f.write_str("gap around nested auto-layout"),
            Self::OffsetChild => f.write_str("child offset from bounds"),
            Self::Root => f.write_str("childless root"),
        }
    }
}

/// Outcome of judging one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Not a FRAME or GROUP; never touched.
    NotContainer,
    /// Can be removed without visual change.
    Redundant,
    /// Must be kept.
    Preserved(Vec<PreservationReason>),
}

impl Verdict {
    /// Whether the node can be collapsed.
    #[must_use]
    pub const fn is_redundant(&self) -> bool {
        matches!(self, Self::Redundant)
    }
}

/// A collapsed container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovedNode {
    /// Source id.
    pub id: String,
    /// Layer name.
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Source id of the child moved into its place.
    pub promoted_child: Option<String>,
    /// Whether the promoted child became the new root.
    pub new_root: bool,
}

/// A container kept, with every reason found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreservedNode {
    /// Source id.
    pub id: String,
    /// Layer name.
    pub name: String,
    /// Reasons, never empty.
    pub reasons: Vec<PreservationReason>,
}

/// A redundant node that could not be removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationFailure {
    /// Source id.
    pub id: String,
    /// Layer name.
    pub name: String,
    /// Error message.
    pub error: String,
}

/// Summary of an [`StructureOptimizer::apply`] pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptimizationReport {
    /// Number of nodes removed.
    pub removed_count: usize,
    /// Removed nodes, in removal order (children before parents).
    pub removed: Vec<RemovedNode>,
    /// Kept containers.
    pub preserved: Vec<PreservedNode>,
    /// Removals that failed.
    pub failures: Vec<MutationFailure>,
}

/// Collapses redundant wrappers in a [`SceneTree`].
#[derive(Default)]
pub struct StructureOptimizer {
    on_log: Option<LogCallback>,
}

impl fmt::Debug for StructureOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructureOptimizer")
            .field("has_log_callback", &self.on_log.is_some())
            .finish()
    }
}

impl StructureOptimizer {
    /// Create an optimizer without a log callback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the callback receiving every explanation.
    pub fn set_log_callback<F>(&mut self, callback: F)
    where
        F: Fn(&str, LogLevel) + Send + Sync + 'static,
    {
        self.on_log = Some(Box::new(callback));
    }

    /// Builder form of [`Self::set_log_callback`].
    #[must_use]
    pub fn with_log_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, LogLevel) + Send + Sync + 'static,
    {
        self.set_log_callback(callback);
        self
    }

    fn log(&self, message: &str, level: LogLevel) {
        if let Some(ref callback) = self.on_log {
            callback(message, level);
        }
    }

    /// Judge a node. Pure; looks at the node and its direct children only.
    ///
    /// Every applicable reason is collected, not just the first.
    #[must_use]
    pub fn judge(tree: &SceneTree, id: NodeId) -> Verdict {
        let Some(node) = tree.get(id) else {
            return Verdict::NotContainer;
        };
        let props = &node.props;
        if !props.kind().is_container() {
            return Verdict::NotContainer;
        }

        let mut reasons = Vec::new();
        if props.locked {
            reasons.push(PreservationReason::Locked);
        }

        let children = node.children();
        if children.len() > 1 {
            reasons.push(PreservationReason::Children(children.len()));
        }

        if !children.is_empty() {
            if props.has_visible_fill() {
                reasons.push(PreservationReason::Fill);
            }
            if props.has_visible_stroke() {
                reasons.push(PreservationReason::Stroke);
            }
            if props.has_visible_effect() {
                reasons.push(PreservationReason::Effects);
            }
            if props.clips_rounded_corners() {
                reasons.push(PreservationReason::CornerRadius);
            }
        }

        if let [only] = children {
            if props.kind() == NodeKind::Frame {
                let child = tree.get(*only).map(|c| &c.props);
                match props.auto_layout() {
                    Some(layout) => {
                        if !layout.padding.is_zero() {
                            reasons.push(PreservationReason::Padding);
                        }
                        let child_is_auto_layout = child.is_some_and(|c| {
                            c.kind() == NodeKind::Frame && c.auto_layout().is_some()
                        });
                        if layout.item_spacing > 0.0 && child_is_auto_layout {
                            reasons.push(PreservationReason::Gap);
                        }
                    }
                    None => {
                        let fills_bounds = child.is_some_and(|c| {
                            c.x.abs() < POSITION_TOLERANCE
                                && c.y.abs() < POSITION_TOLERANCE
                                && (c.width - props.width).abs() < SIZE_TOLERANCE
                                && (c.height - props.height).abs() < SIZE_TOLERANCE
                        });
                        if !fills_bounds {
                            reasons.push(PreservationReason::OffsetChild);
                        }
                    }
                }
            }
        }

        if reasons.is_empty() {
            Verdict::Redundant
        } else {
            Verdict::Preserved(reasons)
        }
    }

    /// Whether a node can be removed without visual change.
    #[must_use]
    pub fn is_redundant(tree: &SceneTree, id: NodeId) -> bool {
        Self::judge(tree, id).is_redundant()
    }

    /// Reasons a container is kept; empty when it is redundant or not a
    /// container.
    #[must_use]
    pub fn preservation_reasons(tree: &SceneTree, id: NodeId) -> Vec<PreservationReason> {
        match Self::judge(tree, id) {
            Verdict::Preserved(reasons) => reasons,
            Verdict::NotContainer | Verdict::Redundant => Vec::new(),
        }
    }

    /// Follow single-child redundant wrappers down from `id` without mutating
    /// anything, and return the first node that would survive.
    #[must_use]
    pub fn optimize(tree: &SceneTree, id: NodeId) -> NodeId {
        let mut current = id;
        while Self::is_redundant(tree, current) {
            match tree.children(current) {
                [only] => current = *only,
                _ => break,
            }
        }
        current
    }

    /// Snapshot of the node [`Self::optimize`] lands on.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is unknown or removed.
    pub fn optimized_snapshot(
        tree: &SceneTree,
        id: NodeId,
    ) -> crate::HeuristicsResult<NodeSnapshot> {
        tree.snapshot(Self::optimize(tree, id))
    }

    /// Collapse every redundant container under (and including) `id`.
    ///
    /// Children are processed before their parent, so nested wrapper chains
    /// collapse in one pass. Failures are recorded and logged; the pass keeps
    /// going.
    pub fn apply(&self, tree: &mut SceneTree, id: NodeId) -> OptimizationReport {
        let mut report = OptimizationReport::default();
        self.apply_node(tree, id, &mut report);

        tracing::info!(
            removed = report.removed_count,
            preserved = report.preserved.len(),
            failures = report.failures.len(),
            "structure optimization finished"
        );
        report
    }

    fn apply_node(&self, tree: &mut SceneTree, id: NodeId, report: &mut OptimizationReport) {
        for child in tree.children(id).to_vec() {
            self.apply_node(tree, child, report);
        }

        let Some(node) = tree.get(id) else {
            return;
        };
        let (source_id, name, kind) = (
            node.props.id.clone(),
            node.props.name.clone(),
            node.props.kind(),
        );

        match Self::judge(tree, id) {
            Verdict::NotContainer => {}
            Verdict::Preserved(reasons) => {
                self.preserve(source_id, name, reasons, report);
            }
            Verdict::Redundant if id == tree.root() && tree.children(id).is_empty() => {
                self.preserve(source_id, name, vec![PreservationReason::Root], report);
            }
            Verdict::Redundant => {
                let was_root = id == tree.root();
                match tree.splice_out(id) {
                    Ok(promoted) => {
                        let promoted_child = promoted
                            .and_then(|c| tree.get(c))
                            .map(|c| c.props.id.clone());
                        let message = match &promoted_child {
                            Some(child) => format!("Removed \"{name}\" ({kind}), promoted {child}"),
                            None => format!("Removed empty \"{name}\" ({kind})"),
                        };
                        tracing::info!(node_id = %source_id, "{message}");
                        self.log(&message, LogLevel::Info);

                        report.removed_count += 1;
                        report.removed.push(RemovedNode {
                            id: source_id,
                            name,
                            kind,
                            promoted_child,
                            new_root: was_root,
                        });
                    }
                    Err(error) => {
                        let message = format!("Failed to remove \"{name}\": {error}");
                        tracing::warn!(node_id = %source_id, %error, "optimization failed");
                        self.log(&message, LogLevel::Warn);
                        report.failures.push(MutationFailure {
                            id: source_id,
                            name,
                            error: error.to_string(),
                        });
                    }
                }
            }
        }
    }

    fn preserve(
        &self,
        id: String,
        name: String,
        reasons: Vec<PreservationReason>,
        report: &mut OptimizationReport,
    ) {
        let list = reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!("Preserved \"{name}\": {list}");
        tracing::debug!(node_id = %id, "{message}");
        self.log(&message, LogLevel::Info);
        report.preserved.push(PreservedNode { id, name, reasons });
    }
}
