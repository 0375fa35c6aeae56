use murzyme::engine::config::DEFAULT_REGISTRY_CONFIDENCE;
use murzyme::engine::keywords::KeywordConfig;

pub struct DefaultsConfig {
    pub use_model: bool,
    pub registry_confidence: f64,
    pub keywords: KeywordConfig,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            use_model: true,
            registry_confidence: DEFAULT_REGISTRY_CONFIDENCE,
            keywords: KeywordConfig::default(),
        }
    }
}
