use murzyme::engine::config::ClassifierConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub config_file: Option<PathBuf>,
    pub core_config: ClassifierConfig,
}
