use serde::{Deserialize, Serialize};

/// Floor for the per-chunk maximum output length.
const MAX_OUTPUT_FLOOR: usize = 50;

/// Cap for the per-chunk maximum output length.
const MAX_OUTPUT_CEIL: usize = 100;

/// Margin subtracted from the maximum when deriving the minimum.
const MIN_OUTPUT_MARGIN: usize = 20;

/// Cap for the per-chunk minimum output length.
const MIN_OUTPUT_CEIL: usize = 30;

/// Per-chunk output-length targets handed to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBounds {
    /// Hard upper bound on generated tokens
    pub max_tokens: usize,

    /// End-of-sequence is suppressed until this many tokens are generated
    pub min_tokens: usize,
}

impl OutputBounds {
    /// Derive bounds for a chunk of `input_tokens` whitespace tokens.
    ///
    /// Targets roughly 2x compression with guardrails: half the input
    /// length, floored at 50 and capped at 100 for the maximum; the minimum
    /// trails the maximum by 20, capped at 30. `min_tokens <= max_tokens`
    /// holds for every input length.
    #[must_use]
    pub fn for_input(input_tokens: usize) -> Self {
        let max_tokens = (input_tokens / 2).clamp(MAX_OUTPUT_FLOOR, MAX_OUTPUT_CEIL);
        let min_tokens = (max_tokens - MIN_OUTPUT_MARGIN).min(MIN_OUTPUT_CEIL);
        Self {
            max_tokens,
            min_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_for_small_inputs_hit_the_floor() {
        // Anything at or below 100 tokens halves to <= 50 and gets floored.
        for input in [0, 1, 10, 60, 100] {
            let bounds = OutputBounds::for_input(input);
            assert_eq!(bounds.max_tokens, 50);
            assert_eq!(bounds.min_tokens, 30);
        }
    }

    #[test]
    fn bounds_scale_with_midrange_inputs() {
        let bounds = OutputBounds::for_input(150);
        assert_eq!(bounds.max_tokens, 75);
        assert_eq!(bounds.min_tokens, 30);
    }

    #[test]
    fn bounds_for_large_inputs_hit_the_cap() {
        for input in [200, 500, 10_000] {
            let bounds = OutputBounds::for_input(input);
            assert_eq!(bounds.max_tokens, 100);
            assert_eq!(bounds.min_tokens, 30);
        }
    }

    #[test]
    fn min_never_exceeds_max() {
        for input in 0..1_000 {
            let bounds = OutputBounds::for_input(input);
            assert!(
                bounds.min_tokens <= bounds.max_tokens,
                "violated at input_tokens={input}: {bounds:?}"
            );
        }
    }
}
