//! Disambiguation arbiter.
//!
//! Near-ties are settled by an external collaborator reached through a single
//! [`CompletionClient::complete`] call. The arbiter owns the prompt shape and
//! the reply contract; how the prompt is answered is up to the client. Every
//! failure degrades to the engine's own top candidate.

use std::fmt::Write as _;

use async_trait::async_trait;

use crate::{EvaluatedResult, HeuristicsResult, NodeSnapshot};

/// Free-text completion capability.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Answer a prompt.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HeuristicsError::Completion`] when no answer could be
    /// obtained.
    async fn complete(&self, prompt: &str) -> HeuristicsResult<String>;
}

/// Build the prompt listing `candidates` for `node`, numbered from 1.
#[must_use]
pub fn build_prompt(candidates: &[EvaluatedResult], node: &NodeSnapshot) -> String {
    let mut prompt = String::from("You are a UI analyzer.\n");
    let _ = writeln!(
        prompt,
        "Node (name: \"{}\", type: {}, width={}, height={}).",
        node.name, node.kind, node.width, node.height
    );
    prompt.push_str("Possible interpretations:\n");
    for (i, candidate) in candidates.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. pattern={}, widget={}, conf={:.2}",
            i + 1,
            candidate.pattern_id(),
            candidate.widget(),
            candidate.confidence()
        );
    }
    prompt.push_str(
        "\nChoose ONLY ONE option that best represents the correct \
         WordPress/Elementor/Elementor Pro/WooCommerce widget.\n\
         Answer only with the option number (1, 2, 3, ...).",
    );
    prompt
}

/// Zero-based index chosen by a reply: the first run of ASCII digits, read as
/// a 1-based option number. `None` if there is no number or it is outside
/// `1..=len`.
#[must_use]
pub fn parse_choice(reply: &str, len: usize) -> Option<usize> {
    let start = reply.find(|c: char| c.is_ascii_digit())?;
    let digits = &reply[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let choice: usize = digits[..end].parse().ok()?;
    (1..=len).contains(&choice).then(|| choice - 1)
}

/// How a candidate list was settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arbitration<'c> {
    /// The reply named this candidate.
    Chosen(&'c EvaluatedResult),
    /// No usable reply; the top-ranked candidate stands.
    Fallback(&'c EvaluatedResult),
}

impl<'c> Arbitration<'c> {
    /// The settled candidate.
    #[must_use]
    pub const fn result(self) -> &'c EvaluatedResult {
        match self {
            Self::Chosen(result) | Self::Fallback(result) => result,
        }
    }

    /// Whether the reply made the choice.
    #[must_use]
    pub const fn is_chosen(self) -> bool {
        matches!(self, Self::Chosen(_))
    }
}

/// Let `client` pick one of `candidates`, reporting whether it did.
///
/// Returns `None` only for an empty candidate list, in which case the client
/// is not called. A client error or an unusable reply falls back to
/// `candidates[0]`.
pub async fn arbitrate<'c>(
    candidates: &'c [EvaluatedResult],
    node: &NodeSnapshot,
    client: &dyn CompletionClient,
) -> Option<Arbitration<'c>> {
    let top = candidates.first()?;
    let prompt = build_prompt(candidates, node);

    let reply = match client.complete(&prompt).await {
        Ok(reply) => reply,
        Err(error) => {
            tracing::warn!(
                node_id = %node.id,
                %error,
                "arbiter unavailable, keeping top candidate"
            );
            return Some(Arbitration::Fallback(top));
        }
    };

    let chosen = parse_choice(&reply, candidates.len()).and_then(|index| candidates.get(index));
    match chosen {
        Some(result) => {
            tracing::debug!(
                node_id = %node.id,
                widget = result.widget(),
                "arbiter resolved candidates"
            );
            Some(Arbitration::Chosen(result))
        }
        None => {
            tracing::warn!(
                node_id = %node.id,
                reply = %reply.trim(),
                "unusable arbiter reply, keeping top candidate"
            );
            Some(Arbitration::Fallback(top))
        }
    }
}

/// Let `client` pick one of `candidates`.
///
/// Returns `None` only for an empty candidate list. See [`arbitrate`].
pub async fn resolve<'c>(
    candidates: &'c [EvaluatedResult],
    node: &NodeSnapshot,
    client: &dyn CompletionClient,
) -> Option<&'c EvaluatedResult> {
    arbitrate(candidates, node, client)
        .await
        .map(Arbitration::result)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{HeuristicResult, HeuristicsError, NodeKind};

    /// Replies with canned text and counts calls.
    struct Canned {
        reply: HeuristicsResult<&'static str>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn new(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(HeuristicsError::Completion("connection refused".to_string())),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for Canned {
        async fn complete(&self, _prompt: &str) -> HeuristicsResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(reply) => Ok((*reply).to_string()),
                Err(error) => Err(HeuristicsError::Completion(error.to_string())),
            }
        }
    }

    fn candidate(
        pattern: &str,
        widget: &str,
        confidence: f32,
        rule: &str,
        priority: u8,
    ) -> EvaluatedResult {
        EvaluatedResult::new(HeuristicResult::new(pattern, widget, confidence), rule, priority)
    }

    fn candidates() -> Vec<EvaluatedResult> {
        vec![
            candidate("layout.columns3", "structure:columns", 0.8, "layout.columns", 70),
            candidate("layout.grid", "structure:grid", 0.77, "layout.grid", 68),
            candidate("section.generic", "structure:section", 0.75, "section.generic", 60),
        ]
    }

    fn node() -> NodeSnapshot {
        NodeSnapshot::new("1:2", "Features", NodeKind::Frame).with_bounds(0.0, 0.0, 960.0, 320.0)
    }

    #[tokio::test]
    async fn test_reply_picks_one_based_option() {
        let candidates = candidates();
        let client = Canned::new("pick option 2");
        let chosen = resolve(&candidates, &node(), &client).await;
        assert_eq!(chosen, Some(&candidates[1]));
    }

    #[tokio::test]
    async fn test_out_of_range_falls_back_to_top() {
        let candidates = candidates();
        for reply in ["5", "0", "no idea", "99999999999999999999999"] {
            let client = Canned::new(reply);
            let chosen = resolve(&candidates, &node(), &client).await;
            assert_eq!(chosen, Some(&candidates[0]), "reply {reply:?}");
        }
    }

    #[tokio::test]
    async fn test_client_error_falls_back_to_top() {
        let candidates = candidates();
        let client = Canned::failing();
        assert_eq!(resolve(&candidates, &node(), &client).await, Some(&candidates[0]));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_arbitrate_reports_fallbacks() {
        let candidates = candidates();

        let chosen = arbitrate(&candidates, &node(), &Canned::new("1")).await;
        assert_eq!(chosen, Some(Arbitration::Chosen(&candidates[0])));

        let unusable = arbitrate(&candidates, &node(), &Canned::new("none of these")).await;
        assert_eq!(unusable, Some(Arbitration::Fallback(&candidates[0])));
        assert!(!unusable.is_some_and(Arbitration::is_chosen));

        let offline = arbitrate(&candidates, &node(), &Canned::failing()).await;
        assert_eq!(offline.map(Arbitration::result), Some(&candidates[0]));
        assert!(!offline.is_some_and(Arbitration::is_chosen));
    }

    #[tokio::test]
    async fn test_empty_candidates_skip_the_client() {
        let client = Canned::new("1");
        assert_eq!(resolve(&[], &node(), &client).await, None);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prompt_lists_numbered_candidates() {
        let prompt = build_prompt(&candidates(), &node());
        assert!(prompt.contains("Node (name: \"Features\", type: FRAME, width=960, height=320)."));
        assert!(prompt.contains("1. pattern=layout.columns3, widget=structure:columns, conf=0.80"));
        assert!(prompt.contains("2. pattern=layout.grid, widget=structure:grid, conf=0.77"));
        assert!(prompt.contains("3. pattern=section.generic"));
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("3", 3), Some(2));
        assert_eq!(parse_choice("Option 1, then 2", 3), Some(0));
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("", 3), None);
    }
}
