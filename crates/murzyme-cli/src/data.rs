use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CLASSIFIER_FILE: &str = "models/classifier.toml";
const SCALER_FILE: &str = "models/scaler.toml";
const REGISTRY_FILE: &str = "registry/registry.csv";

/// The default artifacts looked up inside the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Classifier,
    Scaler,
    Registry,
}

impl Artifact {
    pub const ALL: [Artifact; 3] = [Artifact::Classifier, Artifact::Scaler, Artifact::Registry];

    fn relative_path(self) -> &'static str {
        match self {
            Artifact::Classifier => CLASSIFIER_FILE,
            Artifact::Scaler => SCALER_FILE,
            Artifact::Registry => REGISTRY_FILE,
        }
    }
}

#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_data_path()?;
        debug!("DataManager initialized with path: {:?}", &path);
        Ok(Self::with_custom_path(path))
    }

    pub fn with_custom_path(path: PathBuf) -> Self {
        Self { base_path: path }
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    pub fn artifact_path(&self, artifact: Artifact) -> PathBuf {
        self.base_path.join(artifact.relative_path())
    }

    /// The artifact's path, or `None` when the file is not present.
    pub fn existing_artifact(&self, artifact: Artifact) -> Option<PathBuf> {
        let path = self.artifact_path(artifact);
        path.is_file().then_some(path)
    }

    pub fn set_custom_path(path: &Path) -> Result<()> {
        if !path.is_absolute() {
            return Err(CliError::Argument(format!(
                "Data path must be absolute: {}",
                path.display()
            )));
        }
        let config_path = Self::get_path_config_file()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(config_path, path.to_string_lossy().as_bytes()).map_err(CliError::from)
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::get_path_config_file() {
            if config_path.exists() {
                fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    fn determine_data_path() -> Result<PathBuf> {
        match Self::get_path_config_file() {
            Ok(config_path) if config_path.exists() => {
                let custom_path_str = fs::read_to_string(&config_path)?.trim().to_string();
                if custom_path_str.is_empty() {
                    warn!("Custom path config file is empty, falling back to default path.");
                    Self::get_default_data_path()
                } else {
                    Ok(PathBuf::from(custom_path_str))
                }
            }
            _ => Self::get_default_data_path(),
        }
    }

    fn get_path_config_file() -> Result<PathBuf> {
        ProjectDirs::from("org", "murburn", "murzyme")
            .map(|dirs| dirs.config_dir().join("path.conf"))
            .ok_or_else(|| CliError::Data("Could not determine config directory path.".to_string()))
    }

    fn get_default_data_path() -> Result<PathBuf> {
        ProjectDirs::from("org", "murburn", "murzyme")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                CliError::Data("Could not determine default data directory path.".to_string())
            })
    }
}
