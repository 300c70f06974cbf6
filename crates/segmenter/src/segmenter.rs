use crate::config::SegmenterConfig;
use crate::types::{token_count, TextChunk};

/// Sentence delimiter used for splitting and restoration.
const SENTENCE_DELIMITER: char = '.';

/// Main segmenter interface for partitioning text into bounded chunks
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    /// Create a new segmenter with configuration
    #[must_use]
    pub fn new(config: SegmenterConfig) -> Self {
        config
            .validate()
            .expect("Invalid segmenter configuration provided");
        Self { config }
    }

    /// Partition `text` into ordered, sentence-aligned chunks.
    ///
    /// Fragments are produced by splitting on the sentence delimiter and
    /// trimming surrounding whitespace; blank fragments are dropped, and the
    /// delimiter is re-appended to the rest. Restoration is approximate: a
    /// fragment that did not originally end in the delimiter gains one.
    ///
    /// Deterministic, no failure modes. Empty or whitespace-only input
    /// yields no chunks.
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<TextChunk> {
        let max_tokens = self.config.max_chunk_tokens;

        let mut chunks: Vec<TextChunk> = Vec::new();
        let mut buffer: Vec<String> = Vec::new();
        let mut buffered_tokens = 0usize;

        for fragment in text.split(SENTENCE_DELIMITER) {
            let trimmed = fragment.trim();
            if trimmed.is_empty() {
                continue;
            }

            let sentence = format!("{trimmed}{SENTENCE_DELIMITER}");
            let sentence_tokens = token_count(&sentence);

            // Close the buffer before it would overflow the budget. An
            // oversized sentence landing in an empty buffer stays whole:
            // chunks never split below the sentence level.
            if buffered_tokens + sentence_tokens > max_tokens && !buffer.is_empty() {
                chunks.push(flush_buffer(&mut buffer));
                buffered_tokens = 0;
            }

            buffered_tokens += sentence_tokens;
            buffer.push(sentence);
        }

        if !buffer.is_empty() {
            chunks.push(flush_buffer(&mut buffer));
        }

        log::debug!(
            "Segmented {} input token(s) into {} chunk(s)",
            token_count(text),
            chunks.len()
        );

        chunks
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &SegmenterConfig {
        &self.config
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmenterConfig::default())
    }
}

fn flush_buffer(buffer: &mut Vec<String>) -> TextChunk {
    let sentence_count = buffer.len();
    let content = buffer.join(" ");
    buffer.clear();
    TextChunk::new(content, sentence_count)
}
