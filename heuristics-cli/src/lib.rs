//! # Scene Heuristics CLI
//!
//! Reads a serialized scene tree, collapses redundant wrappers, classifies
//! every node and reports the result as JSON.
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `resolve_config` - Defaults, then `--config` file, then flags and env vars
//! - `CommandCompletionClient` - Arbiter backed by an external command
//! - `run` - Load, classify, and build the [`RunReport`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use heuristics_core::{
    Classification, Classifier, CompletionClient, HeuristicsConfig, HeuristicsError,
    HeuristicsResult, OptimizationReport, SceneTree, SerializedNode,
};
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

/// Default arbiter timeout in milliseconds.
pub const DEFAULT_ARBITER_TIMEOUT_MS: u64 = 30_000;

/// Command-line arguments for scene-heuristics.
#[derive(Debug, Clone, Parser)]
#[command(name = "scene-heuristics")]
#[command(about = "Classify the nodes of a serialized design scene tree")]
#[command(version)]
pub struct CliArgs {
    /// Scene tree JSON document, `-` for stdin
    pub input: PathBuf,

    /// JSON configuration file
    #[arg(long, env = "HEURISTICS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Drop matches below this confidence
    #[arg(long, env = "HEURISTICS_MIN_CONFIDENCE")]
    pub min_confidence: Option<f32>,

    /// Top-two confidence gap under which the arbiter is consulted
    #[arg(long, env = "HEURISTICS_AMBIGUITY_DELTA")]
    pub ambiguity_delta: Option<f32>,

    /// Classify the tree as-is, without collapsing wrappers
    #[arg(long)]
    pub no_optimize: bool,

    /// Command answering arbiter prompts (prompt on stdin, choice on stdout)
    #[arg(long, env = "HEURISTICS_ARBITER_CMD")]
    pub arbiter_cmd: Option<String>,

    /// Arbiter timeout in milliseconds
    #[arg(
        long,
        env = "HEURISTICS_ARBITER_TIMEOUT_MS",
        default_value_t = DEFAULT_ARBITER_TIMEOUT_MS
    )]
    pub arbiter_timeout_ms: u64,

    /// Pretty-print the report
    #[arg(long)]
    pub pretty: bool,
}

/// Build the effective configuration: defaults, then the `--config` file,
/// then individual flags.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed, or the
/// result is out of range.
pub fn resolve_config(args: &CliArgs) -> Result<HeuristicsConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            HeuristicsConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => HeuristicsConfig::default(),
    };

    if let Some(min_confidence) = args.min_confidence {
        config.min_confidence = min_confidence;
    }
    if let Some(delta) = args.ambiguity_delta {
        config.ambiguity_delta = delta;
    }
    if args.no_optimize {
        config.optimize = false;
    }

    config.validate().context("Invalid command-line settings")?;
    Ok(config)
}

/// Arbiter backed by an external command.
///
/// The prompt is written to the command's stdin; its stdout is the reply.
#[derive(Debug, Clone)]
pub struct CommandCompletionClient {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCompletionClient {
    /// Create a client running `program` with `args`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Split a whitespace-separated command line. No shell quoting.
    #[must_use]
    pub fn from_command_line(command_line: &str, timeout: Duration) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect(), timeout))
    }

    async fn exchange(&self, prompt: &str) -> std::io::Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // Commands may answer without reading the prompt.
            match stdin.write_all(prompt.as_bytes()).await {
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e),
                _ => {}
            }
        }

        let mut reply = String::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_string(&mut reply).await?;
        }
        let status = child.wait().await?;
        if !status.success() {
            return Err(std::io::Error::other(format!("arbiter exited with {status}")));
        }
        Ok(reply)
    }
}

#[async_trait]
impl CompletionClient for CommandCompletionClient {
    async fn complete(&self, prompt: &str) -> HeuristicsResult<String> {
        match tokio::time::timeout(self.timeout, self.exchange(prompt)).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(HeuristicsError::Completion(format!("{}: {e}", self.program))),
            Err(_) => Err(HeuristicsError::Completion(format!(
                "{} timed out after {:?}",
                self.program, self.timeout
            ))),
        }
    }
}

/// JSON report printed by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Optimizer summary, absent with `--no-optimize`.
    pub optimization: Option<OptimizationReport>,
    /// Per-node classifications, in pre-order.
    pub classifications: Vec<Classification>,
    /// The tree after optimization.
    pub tree: SerializedNode,
}

/// Read a scene tree document from a file, or stdin for `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a scene tree.
pub async fn load_document(path: &Path) -> Result<SceneTree> {
    let json = if path == Path::new("-") {
        let mut json = String::new();
        tokio::io::stdin()
            .read_to_string(&mut json)
            .await
            .context("Failed to read stdin")?;
        json
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    SceneTree::from_json(&json).context("Input is not a scene tree document")
}

/// Run the whole pipeline for `args`.
///
/// # Errors
///
/// Returns an error on unreadable input or configuration. Arbiter failures
/// only downgrade to the engine's ranking.
pub async fn run(args: &CliArgs) -> Result<RunReport> {
    let config = resolve_config(args)?;
    let mut tree = load_document(&args.input).await?;
    tracing::info!(nodes = tree.len(), input = %args.input.display(), "scene tree loaded");

    let classifier = Classifier::new(config);
    let timeout = Duration::from_millis(args.arbiter_timeout_ms);
    let client = args
        .arbiter_cmd
        .as_deref()
        .and_then(|cmd| CommandCompletionClient::from_command_line(cmd, timeout));

    let report = match &client {
        Some(client) => classifier.classify_with_arbiter(&mut tree, client).await?,
        None => classifier.classify(&mut tree)?,
    };

    Ok(RunReport {
        optimization: report.optimization,
        classifications: report.classifications,
        tree: tree.to_document(),
    })
}

/// Serialize a report.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(report: &RunReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    json.context("Failed to serialize report")
}
