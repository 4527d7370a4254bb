//! # Scene Heuristics Core
//!
//! Classifies the nodes of a design scene tree into widget roles, after
//! collapsing wrapper containers that contribute nothing visually.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              heuristics-core                │
//! ├─────────────────────────────────────────────┤
//! │  Scene Tree      │  Structure Optimizer     │
//! │  - Arena nodes   │  - Redundancy verdicts   │
//! │  - Snapshots     │  - Collapse + report     │
//! ├─────────────────────────────────────────────┤
//! │  Rule Library    │  Evaluation Engine       │
//! │  - 9 groups      │  - Rank + threshold      │
//! │  - Static rules  │  - Failure isolation     │
//! ├─────────────────────────────────────────────┤
//! │  Classifier      │  Disambiguation Arbiter  │
//! │  - Pipeline      │  - Prompt + reply parse  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use heuristics_core::{Classifier, SceneTree};
//!
//! let json = r#"{
//!     "id": "1:1", "name": "Wrapper", "type": "GROUP",
//!     "children": [{
//!         "id": "1:2", "name": "Title", "type": "TEXT",
//!         "width": 480, "height": 44, "font_size": 40, "font_weight": 700
//!     }]
//! }"#;
//! let mut tree = SceneTree::from_json(json).unwrap();
//! let report = Classifier::default().classify(&mut tree).unwrap();
//!
//! let title = report.get("1:2").unwrap();
//! assert_eq!(title.resolved.as_ref().unwrap().widget(), "w:heading");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arbiter;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod heuristic;
pub mod optimizer;
pub mod result;
pub mod rules;
pub mod snapshot;
pub mod tree;

pub use arbiter::{arbitrate, build_prompt, parse_choice, resolve, Arbitration, CompletionClient};
pub use classifier::{Classification, ClassificationReport, Classifier};
pub use config::HeuristicsConfig;
pub use engine::{evaluate, is_ambiguous, DEFAULT_MIN_CONFIDENCE};
pub use error::{HeuristicsError, HeuristicsResult};
pub use heuristic::{compose_heuristics, Heuristic, Rule, RuleError, RuleOutcome, RuleSet};
pub use optimizer::{
    LogCallback, LogLevel, OptimizationReport, PreservationReason, StructureOptimizer, Verdict,
};
pub use result::{EvaluatedResult, HeuristicResult, Meta};
pub use rules::{default_rules, rules_for, RuleGroup};
pub use snapshot::{AutoLayout, AxisDirection, NodeKind, NodeSnapshot, Padding, TextStats};
pub use tree::{NodeId, NodeProps, NodeType, Paint, PaintKind, SceneTree, SerializedNode};

/// Heuristics core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
