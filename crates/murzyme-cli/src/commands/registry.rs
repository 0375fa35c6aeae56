use crate::cli::{RegistryArgs, RegistryCommands};
use crate::config;
use crate::data::DataManager;
use crate::error::Result;
use murzyme::core::models::result::Category;
use murzyme::engine::registry::{CsvRegistry, RegistrySnapshot};
use std::io::{self, Write};
use tracing::info;

pub fn run(args: RegistryArgs) -> Result<()> {
    let data_manager = DataManager::new()?;
    let app_config = config::build_config(&args.artifacts, &data_manager)?;
    let snapshot = match app_config.core_config.registry_path {
        Some(path) => {
            info!("Loading registry from {:?}", &path);
            CsvRegistry::load(&path)?
        }
        None => {
            info!("No registry file configured; showing the built-in seed registry.");
            RegistrySnapshot::seed()?
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command {
        RegistryCommands::Search { term } => write_search(&mut out, &snapshot, &term)?,
        RegistryCommands::Stats => write_stats(&mut out, &snapshot)?,
    }
    out.flush()?;
    Ok(())
}

fn write_search(out: &mut impl Write, snapshot: &RegistrySnapshot, term: &str) -> Result<()> {
    let entries = snapshot.search(term);
    if entries.is_empty() {
        writeln!(out, "No registry entries match '{}'.", term)?;
        return Ok(());
    }
    for entry in entries {
        writeln!(out, "{}\t{}", entry.identifier, entry.category)?;
    }
    Ok(())
}

fn write_stats(out: &mut impl Write, snapshot: &RegistrySnapshot) -> Result<()> {
    for category in [Category::Murzyme, Category::NonMurzyme] {
        writeln!(out, "{:<12} {}", category.label(), snapshot.members(category).len())?;
    }
    writeln!(out, "{:<12} {}", "Total", snapshot.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RegistrySnapshot {
        RegistrySnapshot::new(["1RUB", "1R0A"], ["2LYZ"]).unwrap()
    }

    fn capture(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn search_lists_matching_entries_with_categories() {
        let text = capture(|out| write_search(out, &snapshot(), "1r"));
        assert_eq!(text, "1RUB\tMurzyme\n1R0A\tMurzyme\n");
    }

    #[test]
    fn search_without_matches_says_so() {
        let text = capture(|out| write_search(out, &snapshot(), "9XYZ"));
        assert_eq!(text, "No registry entries match '9XYZ'.\n");
    }

    #[test]
    fn stats_count_each_category() {
        let text = capture(|out| write_stats(out, &snapshot()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Murzyme") && lines[0].ends_with(" 2"));
        assert!(lines[1].starts_with("Non-Murzyme") && lines[1].ends_with(" 1"));
        assert!(lines[2].ends_with(" 3"));
    }
}
