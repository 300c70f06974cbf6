use crate::bounds::OutputBounds;
use crate::error::Result;
use async_trait::async_trait;

/// External summarization capability: text in, bounded shorter text out.
///
/// Implementations decode deterministically (greedy, no sampling) and
/// terminate early once an end-of-sequence signal is produced, so identical
/// inputs yield identical summaries. The orchestrator depends only on this
/// contract and is agnostic to the model behind it.
#[async_trait]
pub trait SummarizationBackend: Send + Sync {
    /// Summarize `text` within the given output-length bounds.
    async fn summarize(&self, text: &str, bounds: OutputBounds) -> Result<String>;
}

/// Deterministic extractive stand-in for the model backend.
///
/// Returns the first `max_tokens` whitespace tokens of the input. Used by
/// tests and by `PRECIS_SUMMARIZER_MODE=stub` for model-free smoke runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubBackend;

#[async_trait]
impl SummarizationBackend for StubBackend {
    async fn summarize(&self, text: &str, bounds: OutputBounds) -> Result<String> {
        let taken: Vec<&str> = text.split_whitespace().take(bounds.max_tokens).collect();
        Ok(taken.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_truncates_to_max_tokens() {
        let backend = StubBackend;
        let bounds = OutputBounds {
            max_tokens: 3,
            min_tokens: 1,
        };
        let out = backend.summarize("a b c d e f", bounds).await.unwrap();
        assert_eq!(out, "a b c");
    }

    #[tokio::test]
    async fn stub_is_deterministic() {
        let backend = StubBackend;
        let bounds = OutputBounds::for_input(40);
        let first = backend.summarize("same text in", bounds).await.unwrap();
        let second = backend.summarize("same text in", bounds).await.unwrap();
        assert_eq!(first, second);
    }
}
