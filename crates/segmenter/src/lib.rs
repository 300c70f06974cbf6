//! # Precis Segmenter
//!
//! Sentence-aligned text segmentation with a per-chunk token budget.
//!
//! The segmenter splits raw text on sentence delimiters and packs the
//! resulting sentences into ordered chunks whose whitespace-token count
//! stays inside a configured budget. Sentences are never split: a single
//! sentence longer than the budget forms a chunk by itself, so downstream
//! consumers must treat the budget as a soft bound in that one case.
//!
//! ```text
//! Raw text
//!     │
//!     ├──> Sentence split (delimiter-based, whitespace trimmed)
//!     │
//!     ├──> Token budgeting (running whitespace-token total per buffer)
//!     │
//!     └──> Chunk assembly (sentences joined with single spaces)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use precis_segmenter::{Segmenter, SegmenterConfig};
//!
//! let segmenter = Segmenter::new(SegmenterConfig::default());
//! let chunks = segmenter.segment("First point. Second point.");
//!
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].sentence_count, 2);
//! ```

mod config;
mod segmenter;
mod types;

pub use config::{SegmenterConfig, DEFAULT_MAX_CHUNK_TOKENS};
pub use segmenter::Segmenter;
pub use types::{token_count, TextChunk};
