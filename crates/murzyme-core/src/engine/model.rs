use crate::core::features::vector::{FeatureVector28, SUMMARY_FEATURE_LEN};
use crate::core::models::result::Category;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Expected {expected} features, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Feature {index} is not finite after scaling")]
    NonFiniteFeature { index: usize },
    #[error("Decision value is not finite: {0}")]
    NonFiniteDecision(f64),
}

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid model artifact '{path}': {reason}")]
    Invalid { path: String, reason: String },
}

/// Maps the summary features into the space the classifier was trained in.
pub trait FeatureScaler: Send + Sync + fmt::Debug {
    fn transform(&self, features: &FeatureVector28) -> Result<Vec<f64>, ModelError>;
}

/// A two-class decision function. Positive values predict [`Category::Murzyme`].
pub trait BinaryClassifier: Send + Sync + fmt::Debug {
    fn decision_function(&self, features: &[f64]) -> Result<f64, ModelError>;

    fn predict(&self, features: &[f64]) -> Result<Category, ModelError> {
        Ok(category_for(self.decision_function(features)?))
    }
}

pub fn category_for(decision: f64) -> Category {
    if decision > 0.0 {
        Category::Murzyme
    } else {
        Category::NonMurzyme
    }
}

/// Sigmoid of the absolute decision margin, scaled to `[50, 100)`.
pub fn margin_confidence(decision: f64) -> f64 {
    100.0 / (1.0 + (-decision.abs()).exp())
}

/// Per-feature standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        let scaler = Self { mean, scale };
        scaler.validated()
    }

    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; SUMMARY_FEATURE_LEN],
            scale: vec![1.0; SUMMARY_FEATURE_LEN],
        }
    }

    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let scaler: Self = read_toml(path)?;
        scaler.validated().map_err(|reason| ModelLoadError::Invalid {
            path: path.to_string_lossy().to_string(),
            reason,
        })
    }

    fn validated(mut self) -> Result<Self, String> {
        check_len("mean", self.mean.len())?;
        check_len("scale", self.scale.len())?;
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err("mean and scale must be finite".to_string());
        }
        for scale in &mut self.scale {
            if *scale == 0.0 {
                *scale = 1.0;
            }
        }
        Ok(self)
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &FeatureVector28) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.mean.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.mean.len(),
                found: features.len(),
            });
        }
        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .enumerate()
            .map(|(index, (value, (mean, scale)))| {
                let scaled = (value - mean) / scale;
                if scaled.is_finite() {
                    Ok(scaled)
                } else {
                    Err(ModelError::NonFiniteFeature { index })
                }
            })
            .collect()
    }
}

/// A trained support vector classifier.
///
/// ```toml
/// kernel = "rbf"
/// gamma = 0.035
/// intercept = -0.42
/// dual-coef = [0.8, -0.8]
/// support-vectors = [[...], [...]]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kernel", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum SupportVectorClassifier {
    Linear {
        weights: Vec<f64>,
        intercept: f64,
    },
    Rbf {
        gamma: f64,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
    },
}

impl SupportVectorClassifier {
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let classifier: Self = read_toml(path)?;
        classifier
            .validate()
            .map_err(|reason| ModelLoadError::Invalid {
                path: path.to_string_lossy().to_string(),
                reason,
            })?;
        Ok(classifier)
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            SupportVectorClassifier::Linear { weights, intercept } => {
                check_len("weights", weights.len())?;
                if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
                    return Err("weights and intercept must be finite".to_string());
                }
            }
            SupportVectorClassifier::Rbf {
                gamma,
                support_vectors,
                dual_coef,
                intercept,
            } => {
                if !(gamma.is_finite() && *gamma > 0.0) {
                    return Err(format!("gamma must be positive, got {}", gamma));
                }
                if support_vectors.is_empty() {
                    return Err("at least one support vector is required".to_string());
                }
                if support_vectors.len() != dual_coef.len() {
                    return Err(format!(
                        "{} support vectors but {} dual coefficients",
                        support_vectors.len(),
                        dual_coef.len()
                    ));
                }
                for vector in support_vectors {
                    check_len("support vector", vector.len())?;
                }
                if !intercept.is_finite() {
                    return Err("intercept must be finite".to_string());
                }
            }
        }
        Ok(())
    }

    fn expected_len(&self) -> usize {
        match self {
            SupportVectorClassifier::Linear { weights, .. } => weights.len(),
            SupportVectorClassifier::Rbf {
                support_vectors, ..
            } => support_vectors.first().map_or(0, Vec::len),
        }
    }
}

impl BinaryClassifier for SupportVectorClassifier {
    fn decision_function(&self, features: &[f64]) -> Result<f64, ModelError> {
        let expected = self.expected_len();
        if features.len() != expected {
            return Err(ModelError::DimensionMismatch {
                expected,
                found: features.len(),
            });
        }

        let decision = match self {
            SupportVectorClassifier::Linear { weights, intercept } => {
                dot(weights, features) + intercept
            }
            SupportVectorClassifier::Rbf {
                gamma,
                support_vectors,
                dual_coef,
                intercept,
            } => {
                support_vectors
                    .iter()
                    .zip(dual_coef)
                    .map(|(sv, coef)| coef * (-gamma * squared_distance(sv, features)).exp())
                    .sum::<f64>()
                    + intercept
            }
        };

        if decision.is_finite() {
            Ok(decision)
        } else {
            Err(ModelError::NonFiniteDecision(decision))
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn check_len(name: &str, found: usize) -> Result<(), String> {
    if found == SUMMARY_FEATURE_LEN {
        Ok(())
    } else {
        Err(format!(
            "{} has {} entries, expected {}",
            name, found, SUMMARY_FEATURE_LEN
        ))
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ModelLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| ModelLoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ModelLoadError::Toml {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelVerdict {
    pub category: Category,
    pub decision: f64,
    pub confidence: f64,
}

/// A loaded scaler and classifier pair. Read-only once constructed.
#[derive(Debug)]
pub struct ModelTier {
    scaler: Box<dyn FeatureScaler>,
    classifier: Box<dyn BinaryClassifier>,
}

impl ModelTier {
    pub fn new(
        scaler: impl FeatureScaler + 'static,
        classifier: impl BinaryClassifier + 'static,
    ) -> Self {
        Self {
            scaler: Box::new(scaler),
            classifier: Box::new(classifier),
        }
    }

    pub fn load(classifier_path: &Path, scaler_path: &Path) -> Result<Self, ModelLoadError> {
        let scaler = StandardScaler::load(scaler_path)?;
        let classifier = SupportVectorClassifier::load(classifier_path)?;
        info!(
            classifier = %classifier_path.display(),
            scaler = %scaler_path.display(),
            "Loaded model artifacts."
        );
        Ok(Self::new(scaler, classifier))
    }

    pub fn evaluate(&self, features: &FeatureVector28) -> Result<ModelVerdict, ModelError> {
        let scaled = self.scaler.transform(features)?;
        let decision = self.classifier.decision_function(&scaled)?;
        if !decision.is_finite() {
            return Err(ModelError::NonFiniteDecision(decision));
        }
        Ok(ModelVerdict {
            category: category_for(decision),
            decision,
            confidence: margin_confidence(decision),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::stats::SummaryStatistics7;
    use std::fs;

    fn features(mean: f64) -> FeatureVector28 {
        let block = SummaryStatistics7 {
            mean,
            ..Default::default()
        };
        FeatureVector28::from_blocks([block; 4])
    }

    fn linear(intercept: f64) -> SupportVectorClassifier {
        SupportVectorClassifier::Linear {
            weights: vec![0.0; SUMMARY_FEATURE_LEN],
            intercept,
        }
    }

    fn toml_array(values: &[f64]) -> String {
        let items: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
        format!("[{}]", items.join(", "))
    }

    #[test]
    fn margin_confidence_is_symmetric_and_bounded() {
        assert_eq!(margin_confidence(0.0), 50.0);
        assert_eq!(margin_confidence(2.0), margin_confidence(-2.0));
        assert!((margin_confidence(1.0) - 73.10585786300049).abs() < 1e-9);
        assert!(margin_confidence(50.0) <= 100.0);
    }

    #[test]
    fn positive_decision_predicts_murzyme() {
        assert_eq!(linear(0.5).predict(&[0.0; SUMMARY_FEATURE_LEN]), Ok(Category::Murzyme));
        assert_eq!(
            linear(-0.5).predict(&[0.0; SUMMARY_FEATURE_LEN]),
            Ok(Category::NonMurzyme)
        );
        assert_eq!(
            linear(0.0).predict(&[0.0; SUMMARY_FEATURE_LEN]),
            Ok(Category::NonMurzyme)
        );
    }

    #[test]
    fn linear_decision_is_dot_product_plus_intercept() {
        let mut weights = vec![0.0; SUMMARY_FEATURE_LEN];
        weights[0] = 2.0;
        weights[7] = -1.0;
        let classifier = SupportVectorClassifier::Linear {
            weights,
            intercept: 0.25,
        };
        let decision = classifier.decision_function(&features(3.0)).unwrap();
        assert!((decision - 3.25).abs() < 1e-12);
    }

    #[test]
    fn rbf_decision_sums_weighted_kernels() {
        let classifier = SupportVectorClassifier::Rbf {
            gamma: 0.5,
            support_vectors: vec![vec![0.0; SUMMARY_FEATURE_LEN]],
            dual_coef: vec![2.0],
            intercept: -1.0,
        };
        let at_vector = classifier
            .decision_function(&[0.0; SUMMARY_FEATURE_LEN])
            .unwrap();
        assert!((at_vector - 1.0).abs() < 1e-12);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let result = linear(1.0).decision_function(&[1.0, 2.0]);
        assert_eq!(
            result,
            Err(ModelError::DimensionMismatch {
                expected: SUMMARY_FEATURE_LEN,
                found: 2
            })
        );
    }

    #[test]
    fn scaler_standardizes_and_replaces_zero_scale() {
        let mut scale = vec![2.0; SUMMARY_FEATURE_LEN];
        scale[1] = 0.0;
        let scaler = StandardScaler::new(vec![1.0; SUMMARY_FEATURE_LEN], scale).unwrap();
        let scaled = scaler.transform(&features(5.0)).unwrap();
        assert_eq!(scaled[0], 2.0);
        assert_eq!(scaled[1], -1.0);
    }

    #[test]
    fn scaler_rejects_wrong_lengths() {
        assert!(StandardScaler::new(vec![0.0; 3], vec![1.0; 3]).is_err());
    }

    #[test]
    fn model_tier_reports_category_and_confidence() {
        let tier = ModelTier::new(StandardScaler::identity(), linear(-1.0));
        let verdict = tier.evaluate(&features(0.0)).unwrap();
        assert_eq!(verdict.category, Category::NonMurzyme);
        assert_eq!(verdict.decision, -1.0);
        assert!((verdict.confidence - 73.10585786300049).abs() < 1e-9);
    }

    #[test]
    fn load_reads_toml_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let scaler_path = dir.path().join("scaler.toml");
        let classifier_path = dir.path().join("classifier.toml");
        fs::write(
            &scaler_path,
            format!(
                "mean = {}\nscale = {}\n",
                toml_array(&[0.0; SUMMARY_FEATURE_LEN]),
                toml_array(&[1.0; SUMMARY_FEATURE_LEN])
            ),
        )
        .unwrap();
        fs::write(
            &classifier_path,
            format!(
                "kernel = \"rbf\"\ngamma = 0.1\nintercept = 0.5\ndual-coef = [1.0]\nsupport-vectors = [{}]\n",
                toml_array(&[0.0; SUMMARY_FEATURE_LEN])
            ),
        )
        .unwrap();

        let tier = ModelTier::load(&classifier_path, &scaler_path).unwrap();
        let verdict = tier.evaluate(&features(0.0)).unwrap();
        assert_eq!(verdict.category, Category::Murzyme);
        assert!((verdict.decision - 1.5).abs() < 1e-12);
    }

    #[test]
    fn load_reports_missing_files_and_bad_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            StandardScaler::load(&missing),
            Err(ModelLoadError::Io { .. })
        ));

        let bad_kernel = dir.path().join("bad.toml");
        fs::write(&bad_kernel, "kernel = \"poly\"\n").unwrap();
        assert!(matches!(
            SupportVectorClassifier::load(&bad_kernel),
            Err(ModelLoadError::Toml { .. })
        ));

        let short = dir.path().join("short.toml");
        fs::write(&short, "kernel = \"linear\"\nweights = [1.0]\nintercept = 0.0\n").unwrap();
        assert!(matches!(
            SupportVectorClassifier::load(&short),
            Err(ModelLoadError::Invalid { .. })
        ));
    }
}
