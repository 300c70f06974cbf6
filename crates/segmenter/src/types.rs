use serde::{Deserialize, Serialize};

/// Count whitespace tokens: the number of maximal non-whitespace substrings.
///
/// A cheap proxy for model-relevant length; intentionally not a subword
/// tokenizer.
#[must_use]
pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A sentence-aligned, bounded-size unit of input text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextChunk {
    /// Sentences joined with single spaces, delimiters restored
    pub content: String,

    /// Whitespace-token count of `content`
    pub token_count: usize,

    /// Number of sentences packed into this chunk
    pub sentence_count: usize,
}

impl TextChunk {
    /// Create a new chunk, computing the token count from the content
    #[must_use]
    pub fn new(content: String, sentence_count: usize) -> Self {
        let token_count = token_count(&content);
        Self {
            content,
            token_count,
            sentence_count,
        }
    }

    /// Check whether the chunk carries no summarizable content
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_count_basic() {
        assert_eq!(token_count("one two three"), 3);
        assert_eq!(token_count("  padded   out  "), 2);
        assert_eq!(token_count(""), 0);
        assert_eq!(token_count("   \t\n"), 0);
    }

    #[test]
    fn test_token_count_punctuation_attaches() {
        // Punctuation is not its own token; it rides on the adjacent word.
        assert_eq!(token_count("It ends."), 2);
        assert_eq!(token_count("."), 1);
    }

    #[test]
    fn test_chunk_new_counts_tokens() {
        let chunk = TextChunk::new("First point. Second point.".to_string(), 2);
        assert_eq!(chunk.token_count, 4);
        assert_eq!(chunk.sentence_count, 2);
        assert!(!chunk.is_blank());
    }

    #[test]
    fn test_blank_chunk() {
        let chunk = TextChunk::new("   ".to_string(), 0);
        assert!(chunk.is_blank());
        assert_eq!(chunk.token_count, 0);
    }
}
