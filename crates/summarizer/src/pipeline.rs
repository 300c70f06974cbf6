use crate::backend::SummarizationBackend;
use crate::bounds::OutputBounds;
use crate::error::{Result, SummarizerError};
use precis_segmenter::{token_count, Segmenter, SegmenterConfig, TextChunk};
use serde::Serialize;
use std::sync::Arc;

/// Outcome of one chunk's trip through the backend
#[derive(Debug)]
pub enum ChunkOutcome {
    /// The backend produced a usable summary
    Summarized(String),

    /// The chunk was blank after trimming and never reached the backend
    Skipped,

    /// The backend failed or returned an unusable result
    Failed(SummarizerError),
}

/// Final result of a successful summarization run
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentSummary {
    /// Successful per-chunk summaries joined with single spaces, in
    /// original chunk order
    pub summary: String,

    /// Whitespace-token count of the original, unchunked input
    pub token_count: usize,

    /// Number of chunks the input was segmented into
    pub chunk_count: usize,

    /// Chunks that failed and were skipped
    pub failed_chunks: usize,
}

/// Orchestrates segmentation, per-chunk backend calls, and reassembly.
///
/// The backend is injected once at construction; each `summarize` call
/// operates on its own chunk list and accumulator, so concurrent calls
/// share nothing but the backend itself.
pub struct SummaryPipeline {
    backend: Arc<dyn SummarizationBackend>,
    segmenter: Segmenter,
}

impl SummaryPipeline {
    /// Create a pipeline with the default chunk budget
    #[must_use]
    pub fn new(backend: Arc<dyn SummarizationBackend>) -> Self {
        Self::with_config(backend, SegmenterConfig::default())
    }

    /// Create a pipeline with an explicit segmentation config
    #[must_use]
    pub fn with_config(backend: Arc<dyn SummarizationBackend>, config: SegmenterConfig) -> Self {
        Self {
            backend,
            segmenter: Segmenter::new(config),
        }
    }

    /// Summarize `text` chunk by chunk.
    ///
    /// A failing chunk is logged and skipped; the run only fails when no
    /// chunk produces a usable summary. Every fault surfaces through the
    /// returned `Result`, never as a panic.
    pub async fn summarize(&self, text: &str) -> Result<DocumentSummary> {
        let chunks = self.segmenter.segment(text);
        log::info!("Starting summary generation over {} chunk(s)", chunks.len());

        // Strictly sequential: the backend wraps a shared, compute-bound
        // model, and per-chunk order must match input order.
        let mut outcomes: Vec<ChunkOutcome> = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            outcomes.push(self.summarize_chunk(index, chunk).await);
        }

        let failed_chunks = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ChunkOutcome::Failed(_)))
            .count();
        let summaries: Vec<String> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                ChunkOutcome::Summarized(summary) => Some(summary),
                ChunkOutcome::Skipped | ChunkOutcome::Failed(_) => None,
            })
            .collect();

        if summaries.is_empty() {
            return Err(SummarizerError::EmptyResult);
        }

        Ok(DocumentSummary {
            summary: summaries.join(" "),
            token_count: token_count(text),
            chunk_count: chunks.len(),
            failed_chunks,
        })
    }

    async fn summarize_chunk(&self, index: usize, chunk: &TextChunk) -> ChunkOutcome {
        if chunk.is_blank() {
            return ChunkOutcome::Skipped;
        }

        let bounds = OutputBounds::for_input(chunk.token_count);
        log::debug!(
            "Chunk {index}: {} input token(s), output bounds {}..={}",
            chunk.token_count,
            bounds.min_tokens,
            bounds.max_tokens
        );

        match self.backend.summarize(&chunk.content, bounds).await {
            Ok(summary) if summary.trim().is_empty() => {
                log::warn!("Chunk {index}: backend returned an empty summary, skipping");
                ChunkOutcome::Failed(SummarizerError::model("empty summary returned"))
            }
            Ok(summary) => ChunkOutcome::Summarized(summary),
            Err(err) => {
                log::warn!("Chunk {index}: summarization failed, skipping: {err}");
                ChunkOutcome::Failed(err)
            }
        }
    }
}
