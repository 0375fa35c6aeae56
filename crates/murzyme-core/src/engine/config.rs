use super::keywords::KeywordConfig;
use std::path::PathBuf;
use thiserror::Error;

/// Confidence reported for every registry match.
pub const DEFAULT_REGISTRY_CONFIDENCE: f64 = 95.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifacts {
    pub classifier_path: PathBuf,
    pub scaler_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Model artifacts; `None` disables the model tier.
    pub model: Option<ModelArtifacts>,
    /// Registry CSV file; `None` selects the built-in seed registry.
    pub registry_path: Option<PathBuf>,
    pub registry_confidence: f64,
    pub keywords: KeywordConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: None,
            registry_path: None,
            registry_confidence: DEFAULT_REGISTRY_CONFIDENCE,
            keywords: KeywordConfig::default(),
        }
    }
}

#[derive(Default)]
pub struct ClassifierConfigBuilder {
    classifier_path: Option<PathBuf>,
    scaler_path: Option<PathBuf>,
    registry_path: Option<PathBuf>,
    registry_confidence: Option<f64>,
    vocabulary: Option<Vec<String>>,
    dominant_term: Option<String>,
    carbon_ratio_threshold: Option<f64>,
}

impl ClassifierConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classifier_path(mut self, path: PathBuf) -> Self {
        self.classifier_path = Some(path);
        self
    }
    pub fn scaler_path(mut self, path: PathBuf) -> Self {
        self.scaler_path = Some(path);
        self
    }
    pub fn registry_path(mut self, path: PathBuf) -> Self {
        self.registry_path = Some(path);
        self
    }
    pub fn registry_confidence(mut self, confidence: f64) -> Self {
        self.registry_confidence = Some(confidence);
        self
    }
    pub fn vocabulary(mut self, terms: Vec<String>) -> Self {
        self.vocabulary = Some(terms);
        self
    }
    pub fn dominant_term(mut self, term: String) -> Self {
        self.dominant_term = Some(term);
        self
    }
    pub fn carbon_ratio_threshold(mut self, threshold: f64) -> Self {
        self.carbon_ratio_threshold = Some(threshold);
        self
    }

    pub fn build(self) -> Result<ClassifierConfig, ConfigError> {
        let model = match (self.classifier_path, self.scaler_path) {
            (Some(classifier_path), Some(scaler_path)) => Some(ModelArtifacts {
                classifier_path,
                scaler_path,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingParameter("scaler_path")),
            (None, Some(_)) => return Err(ConfigError::MissingParameter("classifier_path")),
        };

        let registry_confidence = self
            .registry_confidence
            .unwrap_or(DEFAULT_REGISTRY_CONFIDENCE);
        if !(0.0..=100.0).contains(&registry_confidence) {
            return Err(ConfigError::InvalidParameter {
                name: "registry_confidence",
                reason: format!("{} is outside 0-100", registry_confidence),
            });
        }

        let defaults = KeywordConfig::default();
        let carbon_ratio_threshold = self
            .carbon_ratio_threshold
            .unwrap_or(defaults.carbon_ratio_threshold);
        if !(0.0..=1.0).contains(&carbon_ratio_threshold) {
            return Err(ConfigError::InvalidParameter {
                name: "carbon_ratio_threshold",
                reason: format!("{} is outside 0-1", carbon_ratio_threshold),
            });
        }

        let vocabulary = self.vocabulary.unwrap_or(defaults.vocabulary);
        if vocabulary.iter().all(|term| term.trim().is_empty()) {
            return Err(ConfigError::InvalidParameter {
                name: "vocabulary",
                reason: "at least one term is required".to_string(),
            });
        }

        Ok(ClassifierConfig {
            model,
            registry_path: self.registry_path,
            registry_confidence,
            keywords: KeywordConfig {
                vocabulary,
                dominant_term: self.dominant_term.unwrap_or(defaults.dominant_term),
                carbon_ratio_threshold,
            },
        })
    }
}
