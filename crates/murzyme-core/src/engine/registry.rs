use crate::core::models::result::Category;
use crate::core::utils::identifiers::{contains_ignore_ascii_case, normalize_identifier};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Registry entries shorter than this are never matched as substrings of
/// header text.
pub const MIN_SUBSTRING_MATCH_LEN: usize = 3;

/// Reference entries compiled into the library, in registry file format.
pub const SEED_REGISTRY_CSV: &str = include_str!("../../data/registry.csv");
const SEED_REGISTRY_NAME: &str = "<built-in seed registry>";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Registry entry '{value}' is not a valid identifier")]
    InvalidIdentifier { value: String },
    #[error("Identifier '{identifier}' is listed as both Murzyme and Non-Murzyme")]
    Conflict { identifier: String },
}

/// One row of a registry file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(rename = "pdb_id")]
    pub identifier: String,
    pub category: Category,
}

/// The two disjoint identifier sets, as of one point in time.
///
/// Identifiers are stored normalized (see [`normalize_identifier`]) and in
/// insertion order. Repeated identifiers within one set are kept once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    murzymes: Vec<String>,
    non_murzymes: Vec<String>,
    index: HashMap<String, Category>,
}

impl RegistrySnapshot {
    pub fn new<A, B>(murzymes: A, non_murzymes: B) -> Result<Self, RegistryError>
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        let mut snapshot = Self::default();
        for identifier in murzymes {
            snapshot.insert(identifier.as_ref(), Category::Murzyme)?;
        }
        for identifier in non_murzymes {
            snapshot.insert(identifier.as_ref(), Category::NonMurzyme)?;
        }
        Ok(snapshot)
    }

    pub fn from_entries<I>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = RegistryEntry>,
    {
        let mut snapshot = Self::default();
        for entry in entries {
            snapshot.insert(&entry.identifier, entry.category)?;
        }
        Ok(snapshot)
    }

    /// The built-in reference entries.
    pub fn seed() -> Result<Self, RegistryError> {
        Self::from_csv_reader(SEED_REGISTRY_CSV.as_bytes(), SEED_REGISTRY_NAME)
    }

    /// Reads `pdb_id,category` rows. `#` starts a comment line. `origin`
    /// names the source in errors.
    pub fn from_csv_reader<R: Read>(reader: R, origin: &str) -> Result<Self, RegistryError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let entries = reader
            .deserialize::<RegistryEntry>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RegistryError::Csv {
                path: origin.to_string(),
                source: e,
            })?;
        Self::from_entries(entries)
    }

    fn insert(&mut self, raw: &str, category: Category) -> Result<(), RegistryError> {
        let identifier = normalize_identifier(raw).ok_or_else(|| RegistryError::InvalidIdentifier {
            value: raw.to_string(),
        })?;
        match self.index.get(&identifier) {
            Some(&existing) if existing == category => Ok(()),
            Some(_) => Err(RegistryError::Conflict { identifier }),
            None => {
                self.index.insert(identifier.clone(), category);
                match category {
                    Category::Murzyme => self.murzymes.push(identifier),
                    Category::NonMurzyme => self.non_murzymes.push(identifier),
                }
                Ok(())
            }
        }
    }

    /// Exact lookup after normalizing `identifier`.
    pub fn lookup(&self, identifier: &str) -> Option<Category> {
        let normalized = normalize_identifier(identifier)?;
        self.index.get(&normalized).copied()
    }

    pub fn members(&self, category: Category) -> &[String] {
        match category {
            Category::Murzyme => &self.murzymes,
            Category::NonMurzyme => &self.non_murzymes,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All entries, Murzyme members first, each set in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = RegistryEntry> + '_ {
        let murzymes = self.murzymes.iter().map(|id| (id, Category::Murzyme));
        let non_murzymes = self.non_murzymes.iter().map(|id| (id, Category::NonMurzyme));
        murzymes
            .chain(non_murzymes)
            .map(|(identifier, category)| RegistryEntry {
                identifier: identifier.clone(),
                category,
            })
    }

    /// Entries whose identifier contains `term`, ignoring ASCII case.
    pub fn search(&self, term: &str) -> Vec<RegistryEntry> {
        let term = term.trim();
        self.entries()
            .filter(|entry| contains_ignore_ascii_case(&entry.identifier, term))
            .collect()
    }

    fn first_contained_in(&self, category: Category, text: &str) -> Option<&str> {
        self.members(category)
            .iter()
            .filter(|entry| entry.chars().count() >= MIN_SUBSTRING_MATCH_LEN)
            .find(|entry| text.contains(entry.as_str()))
            .map(String::as_str)
    }
}

/// Source of registry data for the cascade.
///
/// A snapshot is requested on every classification call, so implementations
/// backed by mutable storage must not serve a cached copy.
pub trait RegistryProvider: Send + Sync + fmt::Debug {
    fn snapshot(&self) -> Result<Cow<'_, RegistrySnapshot>, RegistryError>;
}

/// A fixed in-memory registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRegistry {
    snapshot: RegistrySnapshot,
}

impl StaticRegistry {
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        Self { snapshot }
    }

    /// A registry holding the built-in reference entries.
    pub fn seed() -> Result<Self, RegistryError> {
        RegistrySnapshot::seed().map(Self::new)
    }
}

impl RegistryProvider for StaticRegistry {
    fn snapshot(&self) -> Result<Cow<'_, RegistrySnapshot>, RegistryError> {
        Ok(Cow::Borrowed(&self.snapshot))
    }
}

/// A registry file with `pdb_id,category` columns, read again on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRegistry {
    path: PathBuf,
}

impl CsvRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(path: &Path) -> Result<RegistrySnapshot, RegistryError> {
        let path_str = path.to_string_lossy().to_string();
        let file = std::fs::File::open(path).map_err(|e| RegistryError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        let snapshot = RegistrySnapshot::from_csv_reader(file, &path_str)?;
        debug!(path = %path.display(), entries = snapshot.len(), "Read registry file.");
        Ok(snapshot)
    }
}

impl RegistryProvider for CsvRegistry {
    fn snapshot(&self) -> Result<Cow<'_, RegistrySnapshot>, RegistryError> {
        Self::load(&self.path).map(Cow::Owned)
    }
}

/// What the registry tier knows about a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryQuery<'a> {
    pub identifier: Option<&'a str>,
    /// Header text; compared case-insensitively.
    pub text: &'a str,
    pub mentions: &'a [String],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    HeaderText,
    Mention,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact identifier"),
            MatchKind::HeaderText => write!(f, "header text"),
            MatchKind::Mention => write!(f, "PDB mention"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryHit {
    pub category: Category,
    /// The registry entry that matched, normalized.
    pub identifier: String,
    pub kind: MatchKind,
}

const CATEGORY_ORDER: [Category; 2] = [Category::Murzyme, Category::NonMurzyme];

/// Runs the three matching steps in order and returns the first hit:
/// exact identifier, entries contained in the header text, then accession
/// codes mentioned next to "PDB". Murzyme members are tried before
/// Non-Murzyme members within each step.
pub fn match_registry(snapshot: &RegistrySnapshot, query: &RegistryQuery<'_>) -> Option<RegistryHit> {
    if let Some(identifier) = query.identifier.and_then(normalize_identifier) {
        if let Some(category) = snapshot.index.get(&identifier).copied() {
            return Some(RegistryHit {
                category,
                identifier,
                kind: MatchKind::Exact,
            });
        }
    }

    let text = query.text.to_uppercase();
    for category in CATEGORY_ORDER {
        if let Some(entry) = snapshot.first_contained_in(category, &text) {
            return Some(RegistryHit {
                category,
                identifier: entry.to_string(),
                kind: MatchKind::HeaderText,
            });
        }
    }

    query.mentions.iter().find_map(|mention| {
        let identifier = normalize_identifier(mention)?;
        let category = snapshot.index.get(&identifier).copied()?;
        Some(RegistryHit {
            category,
            identifier,
            kind: MatchKind::Mention,
        })
    })
}
