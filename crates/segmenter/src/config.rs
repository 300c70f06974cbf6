use serde::{Deserialize, Serialize};

/// Default per-chunk budget in whitespace tokens.
///
/// Sized so a chunk plus generation overhead stays inside the input window
/// of common summarization models.
pub const DEFAULT_MAX_CHUNK_TOKENS: usize = 500;

/// Configuration for text segmentation behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Maximum chunk size in whitespace tokens (soft limit: a single
    /// oversized sentence still forms its own chunk)
    pub max_chunk_tokens: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_chunk_tokens: DEFAULT_MAX_CHUNK_TOKENS,
        }
    }
}

impl SegmenterConfig {
    /// Create a config with an explicit chunk budget
    #[must_use]
    pub const fn with_max_chunk_tokens(max_chunk_tokens: usize) -> Self {
        Self { max_chunk_tokens }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_tokens == 0 {
            return Err("max_chunk_tokens must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SegmenterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_chunk_tokens, DEFAULT_MAX_CHUNK_TOKENS);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let config = SegmenterConfig::with_max_chunk_tokens(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_budget() {
        let config = SegmenterConfig::with_max_chunk_tokens(64);
        assert!(config.validate().is_ok());
        assert_eq!(config.max_chunk_tokens, 64);
    }
}
