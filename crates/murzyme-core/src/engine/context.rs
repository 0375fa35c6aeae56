use super::config::{ClassifierConfig, DEFAULT_REGISTRY_CONFIDENCE};
use super::keywords::KeywordHeuristic;
use super::model::ModelTier;
use super::registry::{CsvRegistry, RegistryProvider, StaticRegistry};
use crate::core::features::builder::FeatureBuilder;
use crate::core::io::pdb::PdbReader;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a classification call reads, built once and shared.
///
/// The model tier is `Some` only when both artifacts loaded. Nothing in the
/// context is mutated after construction, so one value can serve concurrent
/// calls.
#[derive(Debug, Clone)]
pub struct ClassifierContext {
    pub model: Option<Arc<ModelTier>>,
    pub registry: Option<Arc<dyn RegistryProvider>>,
    pub keywords: KeywordHeuristic,
    pub reader: PdbReader,
    pub features: FeatureBuilder,
    pub registry_confidence: f64,
}

impl Default for ClassifierContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierContext {
    /// A context with only the keyword tier enabled.
    pub fn new() -> Self {
        Self {
            model: None,
            registry: None,
            keywords: KeywordHeuristic::default(),
            reader: PdbReader::new(),
            features: FeatureBuilder::new(),
            registry_confidence: DEFAULT_REGISTRY_CONFIDENCE,
        }
    }

    pub fn with_model(mut self, model: ModelTier) -> Self {
        self.model = Some(Arc::new(model));
        self
    }

    pub fn with_registry(mut self, registry: impl RegistryProvider + 'static) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    pub fn with_keywords(mut self, keywords: KeywordHeuristic) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_reader(mut self, reader: PdbReader) -> Self {
        self.reader = reader;
        self
    }

    /// Builds a context from configuration. Model artifacts that fail to load
    /// disable the model tier with a warning; they never fail construction.
    /// Without a registry file the built-in seed registry is used.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let mut context = Self::new().with_keywords(KeywordHeuristic::new(config.keywords.clone()));
        context.registry_confidence = config.registry_confidence;

        if let Some(artifacts) = &config.model {
            match ModelTier::load(&artifacts.classifier_path, &artifacts.scaler_path) {
                Ok(model) => context = context.with_model(model),
                Err(e) => warn!("Model tier disabled: {}", e),
            }
        } else {
            info!("No model artifacts configured; model tier disabled.");
        }

        match &config.registry_path {
            Some(path) => context = context.with_registry(CsvRegistry::new(path)),
            None => match StaticRegistry::seed() {
                Ok(seed) => {
                    info!("No registry file configured; using the built-in seed registry.");
                    context = context.with_registry(seed);
                }
                Err(e) => warn!("Built-in seed registry unusable, registry tier disabled: {}", e),
            },
        }
        context
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }
}
