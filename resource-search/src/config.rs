use serde::Deserialize;
use serde::Serialize;

pub const EXACT_MATCH_WEIGHT: f32 = 100.0;
pub const FIELD_FILTER_WEIGHT: f32 = 80.0;
pub const PREFIX_MATCH_WEIGHT: f32 = 60.0;
pub const SUBSTRING_MATCH_WEIGHT: f32 = 40.0;
pub const SECONDARY_FIELD_MULTIPLIER: f32 = 0.75;

/// Relevance weights applied per matching field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Value equals the query value (case-insensitive)
    #[serde(default = "default_exact")]
    pub exact: f32,

    /// Value matched through an explicit `field:` filter
    #[serde(default = "default_field_filter")]
    pub field_filter: f32,

    /// Value starts with the query term
    #[serde(default = "default_prefix")]
    pub prefix: f32,

    /// Value contains the query term
    #[serde(default = "default_substring")]
    pub substring: f32,

    /// Applied on top of the above for tag hits
    #[serde(default = "default_secondary_multiplier")]
    pub secondary_multiplier: f32,
}

fn default_exact() -> f32 {
    EXACT_MATCH_WEIGHT
}

fn default_field_filter() -> f32 {
    FIELD_FILTER_WEIGHT
}

fn default_prefix() -> f32 {
    PREFIX_MATCH_WEIGHT
}

fn default_substring() -> f32 {
    SUBSTRING_MATCH_WEIGHT
}

fn default_secondary_multiplier() -> f32 {
    SECONDARY_FIELD_MULTIPLIER
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            exact: default_exact(),
            field_filter: default_field_filter(),
            prefix: default_prefix(),
            substring: default_substring(),
            secondary_multiplier: default_secondary_multiplier(),
        }
    }
}

/// Configuration for the search engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub weights: ScoreWeights,

    /// Shortest partial token that produces suggestions
    #[serde(default = "default_min_suggestion_len")]
    pub min_suggestion_len: usize,

    /// Number of parsed queries kept per index generation (0 disables)
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    /// Upper bound on returned results (0 = unlimited)
    #[serde(default)]
    pub max_results: usize,
}

fn default_min_suggestion_len() -> usize {
    2
}

fn default_cache_size() -> usize {
    64
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            min_suggestion_len: default_min_suggestion_len(),
            cache_size: default_cache_size(),
            max_results: 0,
        }
    }
}

impl SearchConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let weights = &self.weights;
        for (label, value) in [
            ("exact", weights.exact),
            ("field_filter", weights.field_filter),
            ("prefix", weights.prefix),
            ("substring", weights.substring),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("weights.{label} must be > 0, got {value}"));
            }
        }

        if !(weights.secondary_multiplier > 0.0 && weights.secondary_multiplier <= 1.0) {
            return Err(format!(
                "weights.secondary_multiplier must be in (0.0, 1.0], got {}",
                weights.secondary_multiplier
            ));
        }

        if self.min_suggestion_len == 0 {
            return Err("min_suggestion_len must be > 0".to_string());
        }

        Ok(())
    }
}
