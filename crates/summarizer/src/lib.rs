//! # Precis Summarizer
//!
//! Chunked summarization orchestration around a black-box seq2seq backend.
//!
//! Input text is segmented into bounded chunks, each chunk is summarized
//! independently with per-chunk output-length targets, and the partial
//! summaries are joined into one result. A failing chunk is skipped, not
//! fatal; the run only fails when nothing summarizable survives.
//!
//! ```text
//! Raw text
//!     │
//!     ├──> Segmentation (precis-segmenter, 500-token budget)
//!     │
//!     ├──> Per-chunk length budgeting (OutputBounds)
//!     │
//!     ├──> Sequential backend calls (SummarizationBackend)
//!     │
//!     └──> Reassembly (DocumentSummary) or EmptyResult failure
//! ```
//!
//! The backend is a narrow trait; the ONNX implementation lives behind it
//! alongside a deterministic stub, selected via `PRECIS_SUMMARIZER_MODE`.

mod backend;
mod bounds;
mod error;
mod model;
mod pipeline;

pub use backend::{StubBackend, SummarizationBackend};
pub use bounds::OutputBounds;
pub use error::{Result, SummarizerError};
pub use model::{backend_from_env, model_dir, BackendMode, OnnxBackend};
pub use pipeline::{ChunkOutcome, DocumentSummary, SummaryPipeline};

pub use precis_segmenter::{SegmenterConfig, DEFAULT_MAX_CHUNK_TOKENS};
