//! Ensemble configuration

use crate::error::{PavError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A source backend and its ensemble weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub project_id: String,
    pub weight: f64,
}

impl SourceSpec {
    pub fn new(project_id: impl Into<String>, weight: f64) -> Self {
        Self {
            project_id: project_id.into(),
            weight,
        }
    }
}

/// Parse a `sources` definition such as `"tfidf-en:2,fasttext-en:1"`
///
/// Items are `project_id[:weight]`, weight defaulting to 1. The returned
/// weights are normalized to sum to 1.
pub fn parse_sources(definition: &str) -> Result<Vec<SourceSpec>> {
    let mut sources = Vec::new();

    for item in definition.split(',') {
        let item = item.trim();
        let (project_id, weight) = match item.split_once(':') {
            Some((id, weight)) => {
                let weight: f64 = weight.trim().parse().map_err(|_| {
                    PavError::ConfigError(format!("Invalid weight in source '{}'", item))
                })?;
                (id.trim(), weight)
            }
            None => (item, 1.0),
        };
        if project_id.is_empty() {
            return Err(PavError::ConfigError(format!(
                "Empty project id in sources '{}'",
                definition
            )));
        }
        sources.push(SourceSpec::new(project_id, weight));
    }

    normalize_weights(sources)
}

fn normalize_weights(mut sources: Vec<SourceSpec>) -> Result<Vec<SourceSpec>> {
    if let Some(bad) = sources
        .iter()
        .find(|s| !s.weight.is_finite() || s.weight < 0.0)
    {
        return Err(PavError::ConfigError(format!(
            "Weight of source '{}' must be finite and non-negative, got {}",
            bad.project_id, bad.weight
        )));
    }

    let total: f64 = sources.iter().map(|s| s.weight).sum();
    if total <= 0.0 {
        return Err(PavError::ConfigError(
            "Source weights must not all be zero".to_string(),
        ));
    }
    for source in &mut sources {
        source.weight /= total;
    }
    Ok(sources)
}

/// Configuration of a PAV ensemble backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PavConfig {
    /// Source backends in merge order
    pub sources: Vec<SourceSpec>,
    /// Minimum positive training documents for a concept to get a regressor
    pub min_docs: usize,
    /// Maximum number of merged hits returned
    pub limit: Option<usize>,
    /// Minimum merged score of returned hits
    pub threshold: f64,
}

impl Default for PavConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            min_docs: 10,
            limit: None,
            threshold: 0.0,
        }
    }
}

impl PavConfig {
    /// Create a configuration with the given sources
    pub fn new(sources: Vec<SourceSpec>) -> Self {
        Self {
            sources,
            ..Default::default()
        }
    }

    /// Build from backend parameters (`sources`, `min-docs`, `limit`, `threshold`)
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let sources = params
            .get("sources")
            .ok_or_else(|| PavError::ConfigError("Missing parameter 'sources'".to_string()))?;
        let mut config = Self::new(parse_sources(sources)?);

        if let Some(value) = params.get("min-docs") {
            config.min_docs = parse_param("min-docs", value)?;
        }
        if let Some(value) = params.get("limit") {
            config.limit = Some(parse_param("limit", value)?);
        }
        if let Some(value) = params.get("threshold") {
            config.threshold = parse_param("threshold", value)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_min_docs(mut self, min_docs: usize) -> Self {
        self.min_docs = min_docs;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(PavError::ConfigError("No sources configured".to_string()));
        }
        if let Some(bad) = self
            .sources
            .iter()
            .find(|s| !s.weight.is_finite() || s.weight < 0.0)
        {
            return Err(PavError::ConfigError(format!(
                "Weight of source '{}' must be finite and non-negative",
                bad.project_id
            )));
        }
        if self.min_docs == 0 {
            return Err(PavError::ConfigError(
                "min-docs must be at least 1".to_string(),
            ));
        }
        if !self.threshold.is_finite() {
            return Err(PavError::ConfigError("threshold must be finite".to_string()));
        }
        Ok(())
    }
}

fn parse_param<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PavError::ConfigError(format!("Invalid value for '{}': {}", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources_normalizes_weights() {
        let sources = parse_sources("tfidf:2, fasttext:1 ,omikuji:1").unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].project_id, "tfidf");
        assert!((sources[0].weight - 0.5).abs() < 1e-12);
        assert!((sources[1].weight - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_parse_sources_default_weight() {
        let sources = parse_sources("a,b").unwrap();
        assert_eq!(sources, vec![SourceSpec::new("a", 0.5), SourceSpec::new("b", 0.5)]);
    }

    #[test]
    fn test_parse_sources_keeps_normalized_weights() {
        let sources = parse_sources("a:0.7,b:0.3").unwrap();
        assert!((sources[0].weight - 0.7).abs() < 1e-12);
        assert!((sources[1].weight - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_parse_sources_errors() {
        assert!(parse_sources("").is_err());
        assert!(parse_sources("a,,b").is_err());
        assert!(parse_sources("a:x").is_err());
        assert!(parse_sources("a:-1,b:2").is_err());
        assert!(parse_sources("a:0,b:0").is_err());
        assert!(parse_sources(":1").is_err());
    }

    #[test]
    fn test_from_params() {
        let params = HashMap::from([
            ("sources".to_string(), "tfidf:1,fasttext:3".to_string()),
            ("min-docs".to_string(), "5".to_string()),
            ("limit".to_string(), "100".to_string()),
        ]);
        let config = PavConfig::from_params(&params).unwrap();
        assert_eq!(config.min_docs, 5);
        assert_eq!(config.limit, Some(100));
        assert_eq!(config.threshold, 0.0);
        assert!((config.sources[1].weight - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_from_params_rejects_bad_values() {
        let missing = HashMap::from([("min-docs".to_string(), "5".to_string())]);
        assert!(PavConfig::from_params(&missing).is_err());

        let bad_min_docs = HashMap::from([
            ("sources".to_string(), "a".to_string()),
            ("min-docs".to_string(), "many".to_string()),
        ]);
        assert!(matches!(
            PavConfig::from_params(&bad_min_docs),
            Err(PavError::ConfigError(_))
        ));

        let zero_min_docs = HashMap::from([
            ("sources".to_string(), "a".to_string()),
            ("min-docs".to_string(), "0".to_string()),
        ]);
        assert!(PavConfig::from_params(&zero_min_docs).is_err());
    }
}
