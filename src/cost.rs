//! Token and cost estimation
//!
//! Token counts are a characters-per-token approximation, not a real
//! tokenizer, and are reported to the user as approximate.

use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

use crate::error::{CommitLensError, Result};
use crate::model::CostEstimate;

/// Average number of characters in one token
pub const CHARS_PER_TOKEN: usize = 4;

/// Upper bound on the estimated length of a generated summary
pub const MAX_ESTIMATED_OUTPUT_TOKENS: usize = 4_000;

/// USD per million tokens
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ModelPrice {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPrice {
    const fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }
}

/// Rate used for models without a price entry (gpt-4o-mini)
pub const DEFAULT_PRICE: ModelPrice = ModelPrice::new(0.15, 0.60);

const PRICE_TABLE: &[(&str, ModelPrice)] = &[
    ("gpt-4o-mini", ModelPrice::new(0.15, 0.60)),
    ("gpt-4o", ModelPrice::new(2.50, 10.00)),
    ("gpt-4.1", ModelPrice::new(2.00, 8.00)),
    ("gpt-4.1-mini", ModelPrice::new(0.40, 1.60)),
    ("gpt-4.1-nano", ModelPrice::new(0.10, 0.40)),
    ("gpt-4-turbo", ModelPrice::new(10.00, 30.00)),
    ("gpt-3.5-turbo", ModelPrice::new(0.50, 1.50)),
    ("o3-mini", ModelPrice::new(1.10, 4.40)),
    ("o4-mini", ModelPrice::new(1.10, 4.40)),
];

/// Look up the price of `model_id`, preferring `overrides` over the built-in table
pub fn price_for(model_id: &str, overrides: &HashMap<String, ModelPrice>) -> Result<ModelPrice> {
    if let Some(price) = overrides.get(model_id) {
        return Ok(*price);
    }
    PRICE_TABLE
        .iter()
        .find(|(name, _)| *name == model_id)
        .map(|(_, price)| *price)
        .ok_or_else(|| CommitLensError::UnknownModel(model_id.to_string()))
}

/// Approximate token count of `text`, rounded up
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Estimate what sending `diff` to `model_id` would cost
///
/// Unknown models are priced at [`DEFAULT_PRICE`]; the returned estimate
/// records that the fallback was used.
///
/// # Example
///
/// ```
/// use commitlens::cost::estimate;
/// use std::collections::HashMap;
///
/// let estimate = estimate("+added line\n-removed line", "gpt-4o-mini", &HashMap::new());
/// assert_eq!(estimate.token_count, 7);
/// assert!(estimate.estimated_cost_usd > 0.0);
/// ```
pub fn estimate(
    diff: &str,
    model_id: &str,
    overrides: &HashMap<String, ModelPrice>,
) -> CostEstimate {
    let (price, default_pricing) = match price_for(model_id, overrides) {
        Ok(price) => (price, false),
        Err(err) => {
            warn!("{err}; using default pricing");
            (DEFAULT_PRICE, true)
        }
    };

    let token_count = estimate_tokens(diff);
    let estimated_output_tokens = (token_count / 3).min(MAX_ESTIMATED_OUTPUT_TOKENS);
    let estimated_cost_usd = token_count as f64 / 1_000_000.0 * price.input_per_million
        + estimated_output_tokens as f64 / 1_000_000.0 * price.output_per_million;

    CostEstimate {
        token_count,
        estimated_output_tokens,
        model_id: model_id.to_string(),
        estimated_cost_usd,
        default_pricing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_estimate_tokens_counts_chars_not_bytes() {
        // Arrange - four multi-byte characters
        let text = "日本語🎉";

        // Act
        let tokens = estimate_tokens(text);

        // Assert
        assert_eq!(tokens, 1);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let diff = "diff --git a/x b/x\n+hello\n".repeat(50);

        let first = estimate(&diff, "gpt-4o", &HashMap::new());
        let second = estimate(&diff, "gpt-4o", &HashMap::new());

        assert_eq!(first, second);
    }

    #[test]
    fn test_estimate_known_model_cost() {
        // Arrange - 3000 chars = 750 tokens, 250 output tokens
        let diff = "x".repeat(3000);

        // Act
        let result = estimate(&diff, "gpt-4o-mini", &HashMap::new());

        // Assert
        assert_eq!(result.token_count, 750);
        assert_eq!(result.estimated_output_tokens, 250);
        assert!(!result.default_pricing);
        let expected = 750.0 / 1_000_000.0 * 0.15 + 250.0 / 1_000_000.0 * 0.60;
        assert!((result.estimated_cost_usd - expected).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_unknown_model_falls_back() {
        // Arrange
        let diff = "x".repeat(400);

        // Act
        let unknown = estimate(&diff, "mystery-model", &HashMap::new());
        let default = estimate(&diff, "gpt-4o-mini", &HashMap::new());

        // Assert - still priced, at the default rate
        assert!(unknown.default_pricing);
        assert_eq!(unknown.model_id, "mystery-model");
        assert_eq!(unknown.estimated_cost_usd, default.estimated_cost_usd);
    }

    #[test]
    fn test_estimate_output_tokens_capped() {
        let diff = "x".repeat(1_000_000);

        let result = estimate(&diff, "gpt-4o", &HashMap::new());

        assert_eq!(result.token_count, 250_000);
        assert_eq!(result.estimated_output_tokens, MAX_ESTIMATED_OUTPUT_TOKENS);
    }

    #[test]
    fn test_estimate_empty_diff_is_free() {
        let result = estimate("", "gpt-4o", &HashMap::new());

        assert_eq!(result.token_count, 0);
        assert_eq!(result.estimated_cost_usd, 0.0);
    }

    #[test]
    fn test_price_for_override_wins() {
        // Arrange
        let overrides = HashMap::from([("gpt-4o".to_string(), ModelPrice::new(1.0, 2.0))]);

        // Act
        let price = price_for("gpt-4o", &overrides).unwrap();

        // Assert
        assert_eq!(price, ModelPrice::new(1.0, 2.0));
    }

    #[test]
    fn test_price_for_unknown_model_errors() {
        let result = price_for("mystery-model", &HashMap::new());

        assert!(matches!(result, Err(CommitLensError::UnknownModel(m)) if m == "mystery-model"));
    }

    #[test]
    fn test_every_table_entry_is_positive() {
        for (name, price) in PRICE_TABLE {
            let result = estimate("some diff text", name, &HashMap::new());
            assert!(result.estimated_cost_usd > 0.0, "{name} priced at zero");
            assert!(price.input_per_million > 0.0);
        }
    }
}
