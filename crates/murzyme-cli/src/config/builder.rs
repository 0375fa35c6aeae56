use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileModelConfig};
use super::models::AppConfig;
use crate::cli::ArtifactArgs;
use crate::data::{Artifact, DataManager};
use crate::error::{CliError, Result};
use crate::utils::parser;
use murzyme::engine::config::ClassifierConfigBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Merges CLI arguments, `--set` values, the config file and built-in
/// defaults, in that order of precedence. Artifacts that are not named
/// anywhere are taken from the data directory when present there.
pub fn build_config(args: &ArtifactArgs, data_manager: &DataManager) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let model_file = file_config.model.take().unwrap_or_default();
    let registry_file = file_config.registry.take().unwrap_or_default();
    let keywords_file = file_config.keywords.take().unwrap_or_default();

    let mut builder = ClassifierConfigBuilder::new()
        .registry_confidence(
            registry_file
                .confidence
                .unwrap_or(defaults.registry_confidence),
        )
        .vocabulary(
            keywords_file
                .vocabulary
                .unwrap_or(defaults.keywords.vocabulary),
        )
        .dominant_term(
            keywords_file
                .dominant_term
                .unwrap_or(defaults.keywords.dominant_term),
        )
        .carbon_ratio_threshold(
            keywords_file
                .carbon_ratio_threshold
                .unwrap_or(defaults.keywords.carbon_ratio_threshold),
        );

    let use_model = !args.no_model && model_file.enabled.unwrap_or(defaults.use_model);
    if use_model {
        if let Some((classifier_path, scaler_path)) =
            resolve_model_paths(args, &model_file, data_manager)?
        {
            builder = builder
                .classifier_path(classifier_path)
                .scaler_path(scaler_path);
        }
    } else {
        info!("Model tier disabled by configuration.");
    }

    let registry_path = resolve_artifact(
        args.registry.as_deref(),
        registry_file.path.as_deref(),
        Artifact::Registry,
        data_manager,
    )?;
    if let Some(path) = registry_path {
        builder = builder.registry_path(path);
    } else {
        debug!("No registry file found; the built-in seed registry applies.");
    }

    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        config_file: args.config.clone(),
        core_config,
    })
}

fn resolve_model_paths(
    args: &ArtifactArgs,
    model_file: &FileModelConfig,
    data_manager: &DataManager,
) -> Result<Option<(PathBuf, PathBuf)>> {
    let named = args.model.is_some()
        || args.scaler.is_some()
        || model_file.classifier_path.is_some()
        || model_file.scaler_path.is_some();

    if !named {
        let found = data_manager
            .existing_artifact(Artifact::Classifier)
            .zip(data_manager.existing_artifact(Artifact::Scaler));
        if found.is_none() {
            debug!("Model artifacts not found in the data directory; model tier disabled.");
        }
        return Ok(found);
    }

    let classifier_path = resolve_artifact(
        args.model.as_deref(),
        model_file.classifier_path.as_deref(),
        Artifact::Classifier,
        data_manager,
    )?
    .ok_or_else(|| {
        CliError::Config("`model.classifier-path` is required when a scaler is given.".to_string())
    })?;
    let scaler_path = resolve_artifact(
        args.scaler.as_deref(),
        model_file.scaler_path.as_deref(),
        Artifact::Scaler,
        data_manager,
    )?
    .ok_or_else(|| {
        CliError::Config("`model.scaler-path` is required when a classifier is given.".to_string())
    })?;
    Ok(Some((classifier_path, scaler_path)))
}

fn resolve_artifact(
    cli_arg: Option<&Path>,
    file_arg: Option<&Path>,
    artifact: Artifact,
    data_manager: &DataManager,
) -> Result<Option<PathBuf>> {
    match cli_arg.or(file_arg) {
        Some(path) => resolve_explicit_path(path).map(Some),
        None => Ok(data_manager.existing_artifact(artifact)),
    }
}

fn resolve_explicit_path(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Provided path does not exist: {}", path.display()),
        )));
    }
    Ok(path.to_path_buf())
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;
        let invalid = |e: parser::ParseError| CliError::Config(e.to_string());

        match key {
            "model.classifier-path" => {
                config.model.get_or_insert_with(Default::default).classifier_path =
                    Some(PathBuf::from(value_str));
            }
            "model.scaler-path" => {
                config.model.get_or_insert_with(Default::default).scaler_path =
                    Some(PathBuf::from(value_str));
            }
            "model.enabled" => {
                config.model.get_or_insert_with(Default::default).enabled =
                    Some(parser::parse_bool(key, value_str).map_err(invalid)?);
            }
            "registry.path" => {
                config.registry.get_or_insert_with(Default::default).path =
                    Some(PathBuf::from(value_str));
            }
            "registry.confidence" => {
                config.registry.get_or_insert_with(Default::default).confidence =
                    Some(parser::parse_float(key, value_str).map_err(invalid)?);
            }
            "keywords.vocabulary" => {
                config.keywords.get_or_insert_with(Default::default).vocabulary =
                    Some(parser::parse_term_list(key, value_str).map_err(invalid)?);
            }
            "keywords.dominant-term" => {
                config.keywords.get_or_insert_with(Default::default).dominant_term =
                    Some(value_str.to_string());
            }
            "keywords.carbon-ratio-threshold" => {
                config
                    .keywords
                    .get_or_insert_with(Default::default)
                    .carbon_ratio_threshold =
                    Some(parser::parse_float(key, value_str).map_err(invalid)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
