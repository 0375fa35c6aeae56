use crate::cli::{DataArgs, DataCommands};
use crate::data::{Artifact, DataManager};
use crate::error::{CliError, Result};
use murzyme::engine::registry::SEED_REGISTRY_CSV;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: DataArgs) -> Result<()> {
    match args.command {
        DataCommands::Path => {
            handle_path()?;
        }
        DataCommands::SetPath { path } => {
            handle_set_path(path)?;
        }
        DataCommands::ResetPath => {
            handle_reset_path()?;
        }
        DataCommands::InitRegistry { force } => {
            let manager = DataManager::new()?;
            let path = manager.artifact_path(Artifact::Registry);
            write_seed_registry(&path, force)?;
            println!("Seed registry written to: {}", path.display());
        }
    }
    Ok(())
}

fn handle_path() -> Result<()> {
    let manager = DataManager::new()?;
    println!("{}", manager.get_data_path().display());
    for artifact in Artifact::ALL {
        let path = manager.artifact_path(artifact);
        let status = if path.is_file() { "present" } else { "missing" };
        println!("  {:<8} {}", status, path.display());
    }
    Ok(())
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    info!("Setting custom data path to {:?}", &path);
    DataManager::set_custom_path(&path)?;
    println!("Data path set to: {}", path.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    info!("Resetting data path to default.");
    DataManager::reset_path()?;
    let manager = DataManager::new()?;
    println!(
        "Data path reset to default: {}",
        manager.get_data_path().display()
    );
    Ok(())
}

fn write_seed_registry(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Argument(format!(
            "Registry file already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    info!("Writing seed registry to {:?}", path);
    fs::write(path, SEED_REGISTRY_CSV)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use murzyme::core::models::result::Category;
    use murzyme::engine::registry::CsvRegistry;
    use tempfile::tempdir;

    #[test]
    fn seed_registry_is_written_into_the_data_directory() {
        let temp_dir = tempdir().unwrap();
        let manager = DataManager::with_custom_path(temp_dir.path().to_path_buf());
        let path = manager.artifact_path(Artifact::Registry);

        write_seed_registry(&path, false).unwrap();

        assert_eq!(manager.existing_artifact(Artifact::Registry), Some(path.clone()));
        let snapshot = CsvRegistry::load(&path).unwrap();
        assert_eq!(snapshot.lookup("3HMX"), Some(Category::Murzyme));
        assert_eq!(snapshot.lookup("4W5A"), Some(Category::NonMurzyme));
    }

    #[test]
    fn existing_registry_is_kept_unless_forced() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("registry/registry.csv");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "pdb_id,category\n9XYZ,murzyme\n").unwrap();

        assert!(matches!(
            write_seed_registry(&path, false),
            Err(CliError::Argument(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "pdb_id,category\n9XYZ,murzyme\n");

        write_seed_registry(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), SEED_REGISTRY_CSV);
    }
}
