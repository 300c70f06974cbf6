//! End-to-end pipeline behavior against scripted backends.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use precis_summarizer::{
    OutputBounds, Result as SummarizerResult, SegmenterConfig, StubBackend, SummarizationBackend,
    SummarizerError, SummaryPipeline,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Three 6-token sentences; one chunk each under a 6-token budget.
const THREE_CHUNK_TEXT: &str = "one two three four five six. \
    seven eight nine ten eleven twelve. \
    thirteen fourteen fifteen sixteen seventeen eighteen.";

/// Backend scripted per call index: `Some(text)` succeeds, `None` fails.
struct ScriptedBackend {
    script: Mutex<Vec<Option<String>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(script: Vec<Option<&str>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|entry| entry.map(str::to_string))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummarizationBackend for ScriptedBackend {
    async fn summarize(&self, _text: &str, _bounds: OutputBounds) -> SummarizerResult<String> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().expect("script lock");
        match script.get(index) {
            Some(Some(out)) => Ok(out.clone()),
            Some(None) => Err(SummarizerError::model("scripted failure")),
            None => Ok(format!("summary {index}")),
        }
    }
}

fn three_chunk_pipeline(backend: Arc<ScriptedBackend>) -> SummaryPipeline {
    SummaryPipeline::with_config(backend, SegmenterConfig::with_max_chunk_tokens(6))
}

#[tokio::test]
async fn short_input_invokes_backend_once() {
    let backend = ScriptedBackend::new(vec![Some("condensed.")]);
    let pipeline = SummaryPipeline::new(backend.clone());

    let text = "Sentence one is here. Sentence two follows. Sentence three ends it.";
    let result = pipeline.summarize(text).await.unwrap();

    assert_eq!(backend.calls(), 1);
    assert_eq!(result.summary, "condensed.");
    assert_eq!(result.chunk_count, 1);
    assert_eq!(result.failed_chunks, 0);
    assert_eq!(result.token_count, 11);
}

#[tokio::test]
async fn failed_middle_chunk_is_skipped_not_fatal() {
    let backend = ScriptedBackend::new(vec![Some("alpha."), None, Some("gamma.")]);
    let pipeline = three_chunk_pipeline(backend.clone());

    let result = pipeline.summarize(THREE_CHUNK_TEXT).await.unwrap();

    assert_eq!(backend.calls(), 3);
    assert_eq!(result.summary, "alpha. gamma.");
    assert_eq!(result.chunk_count, 3);
    assert_eq!(result.failed_chunks, 1);
}

#[tokio::test]
async fn all_chunks_failing_yields_empty_result_error() {
    let backend = ScriptedBackend::new(vec![None, None, None]);
    let pipeline = three_chunk_pipeline(backend.clone());

    let err = pipeline.summarize(THREE_CHUNK_TEXT).await.unwrap_err();

    assert_eq!(backend.calls(), 3);
    assert!(matches!(err, SummarizerError::EmptyResult));
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn empty_input_fails_without_touching_backend() {
    let backend = ScriptedBackend::new(vec![]);
    let pipeline = SummaryPipeline::new(backend.clone());

    let err = pipeline.summarize("").await.unwrap_err();

    assert_eq!(backend.calls(), 0);
    assert!(matches!(err, SummarizerError::EmptyResult));
}

#[tokio::test]
async fn blank_backend_output_counts_as_chunk_failure() {
    let backend = ScriptedBackend::new(vec![Some("   "), Some("kept.")]);
    let pipeline = SummaryPipeline::with_config(
        backend.clone(),
        SegmenterConfig::with_max_chunk_tokens(6),
    );

    let text = "one two three four five six. seven eight nine ten eleven twelve.";
    let result = pipeline.summarize(text).await.unwrap();

    assert_eq!(result.summary, "kept.");
    assert_eq!(result.failed_chunks, 1);
}

#[tokio::test]
async fn token_count_reflects_original_unchunked_input() {
    let backend = ScriptedBackend::new(vec![]);
    let pipeline = three_chunk_pipeline(backend.clone());

    let result = pipeline.summarize(THREE_CHUNK_TEXT).await.unwrap();

    // 18 words; the delimiter rides on the adjacent word.
    assert_eq!(result.token_count, 18);
    assert_eq!(result.chunk_count, 3);
}

#[tokio::test]
async fn stub_backend_round_trip() {
    let pipeline = SummaryPipeline::new(Arc::new(StubBackend));

    let result = pipeline
        .summarize("The stub copies input. It keeps things short.")
        .await
        .unwrap();

    assert_eq!(result.summary, "The stub copies input. It keeps things short.");
    assert_eq!(result.failed_chunks, 0);
}
