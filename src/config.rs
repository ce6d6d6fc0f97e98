use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum trimmed block length (in characters) for curated matching.
pub const DEFAULT_MATCH_MIN_CHARS: usize = 20;

/// Minimum trimmed block length (in characters) for fallback search.
pub const DEFAULT_FALLBACK_MIN_CHARS: usize = 50;

/// Number of sections kept in the final report.
pub const DEFAULT_TOP_N: usize = 5;

/// Weights and thresholds used when scoring blocks.
///
/// The defaults are empirical and have no derivation beyond "they produce the
/// expected sections". Tune them through a JSON file passed to
/// `analyze --scoring`; any field left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub match_min_chars: usize,
    pub fallback_min_chars: usize,
    /// A curated candidate without title or keyword hits must score strictly
    /// above this.
    pub match_gate: f32,
    /// A fallback candidate must score strictly above this.
    pub fallback_gate: f32,
    pub title_weight: f32,
    pub keyword_weight: f32,
    pub semantic_weight: f32,
    pub top_n: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_min_chars: DEFAULT_MATCH_MIN_CHARS,
            fallback_min_chars: DEFAULT_FALLBACK_MIN_CHARS,
            match_gate: 0.3,
            fallback_gate: 0.2,
            title_weight: 1.0,
            keyword_weight: 0.5,
            semantic_weight: 0.3,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl ScoringConfig {
    /// Load overrides from a JSON file on top of the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| {
            Error::Input {
                path: path.to_path_buf(),
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config from an optional override file.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::Config("top_n must be at least 1".to_string()));
        }
        let weights = [
            ("match_gate", self.match_gate),
            ("fallback_gate", self.fallback_gate),
            ("title_weight", self.title_weight),
            ("keyword_weight", self.keyword_weight),
            ("semantic_weight", self.semantic_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() {
                return Err(Error::Config(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}
