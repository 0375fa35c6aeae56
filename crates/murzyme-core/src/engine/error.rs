use thiserror::Error;

use super::model::ModelError;
use super::registry::RegistryError;

/// A recoverable failure inside one cascade tier. Never surfaced by
/// `classify`; recorded on the cascade trace instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Model inference failed: {source}")]
    Model {
        #[from]
        source: ModelError,
    },

    #[error("Registry lookup failed: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },
}
