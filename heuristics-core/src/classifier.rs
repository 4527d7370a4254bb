//! Classification pipeline: optimize, classify every node, arbitrate near-ties.

use serde::Serialize;

use crate::arbiter::{self, CompletionClient};
use crate::engine::{evaluate, is_ambiguous};
use crate::heuristic::RuleSet;
use crate::optimizer::{OptimizationReport, StructureOptimizer};
use crate::rules::default_rules;
use crate::tree::{NodeId, SceneTree};
use crate::{EvaluatedResult, HeuristicsConfig, HeuristicsResult, NodeKind, NodeSnapshot};

/// Roles found for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Source node id.
    pub node_id: String,
    /// Layer name.
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Source id of the parent in the classified tree.
    pub parent_id: Option<String>,
    /// Ranked candidates above the confidence threshold.
    pub candidates: Vec<EvaluatedResult>,
    /// The chosen role, `None` when nothing matched.
    pub resolved: Option<EvaluatedResult>,
    /// Whether the top two candidates were too close to call.
    pub ambiguous: bool,
    /// Whether the arbiter's reply made the choice. `false` when the arbiter
    /// was unavailable or answered with no usable option.
    pub arbitrated: bool,
}

/// Output of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// Optimizer summary, absent when optimization is disabled.
    pub optimization: Option<OptimizationReport>,
    /// One entry per classified node, in pre-order.
    pub classifications: Vec<Classification>,
}

impl ClassificationReport {
    /// Classification of a source node id.
    #[must_use]
    pub fn get(&self, node_id: &str) -> Option<&Classification> {
        self.classifications.iter().find(|c| c.node_id == node_id)
    }

    /// Number of nodes flagged ambiguous.
    #[must_use]
    pub fn ambiguous_count(&self) -> usize {
        self.classifications.iter().filter(|c| c.ambiguous).count()
    }
}

/// Runs the optimizer, the engine and the arbiter over a scene tree.
#[derive(Debug)]
pub struct Classifier<'r> {
    rules: RuleSet<'r>,
    config: HeuristicsConfig,
    optimizer: StructureOptimizer,
}

impl Classifier<'static> {
    /// Classifier over the full shipped rule library.
    #[must_use]
    pub fn new(config: HeuristicsConfig) -> Self {
        Self::with_rules(default_rules(), config)
    }
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(HeuristicsConfig::default())
    }
}

impl<'r> Classifier<'r> {
    /// Classifier over a custom rule set.
    #[must_use]
    pub fn with_rules(rules: RuleSet<'r>, config: HeuristicsConfig) -> Self {
        Self {
            rules,
            config,
            optimizer: StructureOptimizer::new(),
        }
    }

    /// Replace the optimizer, e.g. to attach a log callback.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: StructureOptimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HeuristicsConfig {
        &self.config
    }

    /// Active rule set.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet<'r> {
        &self.rules
    }

    /// Classify a single node without arbitration.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is unknown or removed.
    pub fn classify_node(&self, tree: &SceneTree, id: NodeId) -> HeuristicsResult<Classification> {
        self.classify_one(tree, id).map(|(classification, _)| classification)
    }

    fn classify_one(
        &self,
        tree: &SceneTree,
        id: NodeId,
    ) -> HeuristicsResult<(Classification, NodeSnapshot)> {
        let snapshot = tree.snapshot(id)?;
        let candidates = evaluate(&snapshot, &self.rules, self.config.min_confidence);
        let ambiguous = is_ambiguous(&candidates, self.config.ambiguity_delta);
        let parent_id = tree
            .parent(id)
            .and_then(|p| tree.get(p))
            .map(|p| p.props.id.clone());

        let classification = Classification {
            node_id: snapshot.id.clone(),
            name: snapshot.name.clone(),
            kind: snapshot.kind,
            parent_id,
            resolved: candidates.first().cloned(),
            candidates,
            ambiguous,
            arbitrated: false,
        };
        Ok((classification, snapshot))
    }

    fn prepare(
        &self,
        tree: &mut SceneTree,
    ) -> HeuristicsResult<(Option<OptimizationReport>, Vec<(Classification, NodeSnapshot)>)> {
        let optimization = self.config.optimize.then(|| {
            let root = tree.root();
            self.optimizer.apply(tree, root)
        });

        let mut classified = Vec::new();
        for id in tree.descendants(tree.root()) {
            let entry = self.classify_one(tree, id)?;
            if entry.0.candidates.is_empty() && !self.config.include_unmatched {
                continue;
            }
            classified.push(entry);
        }
        Ok((optimization, classified))
    }

    fn finish(
        optimization: Option<OptimizationReport>,
        classified: Vec<(Classification, NodeSnapshot)>,
    ) -> ClassificationReport {
        let report = ClassificationReport {
            optimization,
            classifications: classified.into_iter().map(|(c, _)| c).collect(),
        };
        tracing::info!(
            nodes = report.classifications.len(),
            ambiguous = report.ambiguous_count(),
            "classification finished"
        );
        report
    }

    /// Optimize (if enabled) and classify every node; ambiguous nodes resolve
    /// to their top-ranked candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if a node cannot be snapshotted.
    pub fn classify(&self, tree: &mut SceneTree) -> HeuristicsResult<ClassificationReport> {
        let (optimization, classified) = self.prepare(tree)?;
        Ok(Self::finish(optimization, classified))
    }

    /// Like [`Self::classify`], but each ambiguous node's leading candidates
    /// are put to `client`. The client is called at most once per ambiguous
    /// node, and only for those. The shortlist holds at least two candidates
    /// whatever `max_arbiter_candidates` says.
    ///
    /// # Errors
    ///
    /// Returns an error if a node cannot be snapshotted. Arbiter failures are
    /// never errors.
    pub async fn classify_with_arbiter(
        &self,
        tree: &mut SceneTree,
        client: &dyn CompletionClient,
    ) -> HeuristicsResult<ClassificationReport> {
        let (optimization, mut classified) = self.prepare(tree)?;

        // A near-tie always offers at least the two tied candidates.
        let cap = self.config.max_arbiter_candidates.max(2);
        for (classification, snapshot) in &mut classified {
            let shortlist = classification.candidates.len().min(cap);
            if !classification.ambiguous || shortlist < 2 {
                continue;
            }
            let shortlist = &classification.candidates[..shortlist];
            if let Some(arbitration) = arbiter::arbitrate(shortlist, snapshot, client).await {
                let chosen = arbitration.result().clone();
                classification.arbitrated = arbitration.is_chosen();
                classification.resolved = Some(chosen);
            }
        }

        Ok(Self::finish(optimization, classified))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::rules::{rules_for, RuleGroup};
    use crate::tree::{NodeProps, Paint, SerializedNode};
    use crate::AxisDirection;

    struct Answer(&'static str, AtomicUsize);

    #[async_trait]
    impl CompletionClient for Answer {
        async fn complete(&self, _prompt: &str) -> HeuristicsResult<String> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Ok(self.0.to_string())
        }
    }

    /// A filled card, so the optimizer keeps it.
    fn column(id: &str) -> SerializedNode {
        let mut props = NodeProps::new(id, id, NodeKind::Frame);
        props.width = 300.0;
        props.height = 200.0;
        props.layout_mode = AxisDirection::Vertical;
        props.fills.push(Paint::solid());
        let mut copy = NodeProps::new(format!("{id}-copy"), "Copy", NodeKind::Text);
        copy.width = 300.0;
        copy.height = 20.0;
        SerializedNode::with_children(props, vec![SerializedNode::leaf(copy)])
    }

    fn row() -> SceneTree {
        let mut props = NodeProps::new("row", "Row", NodeKind::Frame);
        props.width = 940.0;
        props.height = 200.0;
        props.layout_mode = AxisDirection::Horizontal;
        props.item_spacing = 20.0;
        SceneTree::from_document(SerializedNode::with_children(
            props,
            vec![column("c1"), column("c2"), column("c3")],
        ))
    }

    fn layout_only() -> Classifier<'static> {
        Classifier::with_rules(rules_for(&[RuleGroup::Layout]), HeuristicsConfig::default())
    }

    #[test]
    fn test_sync_classification_takes_top_candidate() {
        let mut tree = row();
        let report = layout_only().classify(&mut tree).expect("classify");

        let row = report.get("row").expect("row classified");
        assert!(row.ambiguous);
        assert!(!row.arbitrated);
        assert_eq!(row.resolved.as_ref().map(EvaluatedResult::widget), Some("structure:columns"));

        let column = report.get("c1").expect("column classified");
        assert!(column.candidates.is_empty());
        assert_eq!(column.parent_id.as_deref(), Some("row"));
        assert_eq!(report.ambiguous_count(), 1);
    }

    #[tokio::test]
    async fn test_arbiter_consulted_only_for_ambiguous_nodes() {
        let mut tree = row();
        let client = Answer("2", AtomicUsize::new(0));
        let report = layout_only()
            .classify_with_arbiter(&mut tree, &client)
            .await
            .expect("classify");

        assert_eq!(client.1.load(Ordering::SeqCst), 1);
        let row = report.get("row").expect("row classified");
        assert!(row.arbitrated);
        assert_eq!(row.resolved.as_ref().map(EvaluatedResult::widget), Some("structure:grid"));
    }

    #[tokio::test]
    async fn test_unusable_reply_is_not_arbitration() {
        let mut tree = row();
        let client = Answer("no idea", AtomicUsize::new(0));
        let report = layout_only()
            .classify_with_arbiter(&mut tree, &client)
            .await
            .expect("classify");

        assert_eq!(client.1.load(Ordering::SeqCst), 1);
        let row = report.get("row").expect("row classified");
        assert!(row.ambiguous);
        assert!(!row.arbitrated);
        assert_eq!(row.resolved.as_ref().map(EvaluatedResult::widget), Some("structure:columns"));
    }

    #[tokio::test]
    async fn test_zero_candidate_cap_still_shortlists_the_tie() {
        let mut tree = row();
        let client = Answer("2", AtomicUsize::new(0));
        let config = HeuristicsConfig {
            max_arbiter_candidates: 0,
            ..HeuristicsConfig::default()
        };
        let report = Classifier::with_rules(rules_for(&[RuleGroup::Layout]), config)
            .classify_with_arbiter(&mut tree, &client)
            .await
            .expect("classify");

        assert_eq!(client.1.load(Ordering::SeqCst), 1);
        let row = report.get("row").expect("row classified");
        assert_eq!(row.candidates.len(), 2);
        assert!(row.arbitrated);
        assert_eq!(row.resolved.as_ref().map(EvaluatedResult::widget), Some("structure:grid"));
    }

    #[test]
    fn test_unmatched_nodes_can_be_skipped() {
        let mut tree = row();
        let config = HeuristicsConfig {
            include_unmatched: false,
            ..HeuristicsConfig::default()
        };
        let report = Classifier::with_rules(rules_for(&[RuleGroup::Layout]), config)
            .classify(&mut tree)
            .expect("classify");
        assert_eq!(report.classifications.len(), 1);
    }

    #[test]
    fn test_optimization_runs_first() {
        let text = {
            let mut props = NodeProps::new("title", "Title", NodeKind::Text);
            props.width = 400.0;
            props.height = 40.0;
            props.font_size = Some(36.0);
            props.font_weight = Some(700);
            SerializedNode::leaf(props)
        };
        let wrapper = SerializedNode::with_children(
            NodeProps::new("wrapper", "Wrapper", NodeKind::Group),
            vec![text],
        );
        let mut tree = SceneTree::from_document(wrapper);

        let report = Classifier::default().classify(&mut tree).expect("classify");
        assert_eq!(report.optimization.as_ref().map(|o| o.removed_count), Some(1));
        assert_eq!(report.classifications.len(), 1);
        let title = report.get("title").expect("title");
        assert_eq!(title.resolved.as_ref().map(EvaluatedResult::widget), Some("w:heading"));

        let mut untouched = SceneTree::from_document(tree.to_document());
        let report = Classifier::new(HeuristicsConfig::default().with_optimize(false))
            .classify(&mut untouched)
            .expect("classify");
        assert!(report.optimization.is_none());
    }
}
