use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two mutually exclusive output classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Category 1.
    #[serde(rename = "Murzyme", alias = "murzyme")]
    Murzyme,
    /// Category 2.
    #[serde(rename = "Non-Murzyme", alias = "non-murzyme")]
    NonMurzyme,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::Murzyme => "Murzyme",
            Category::NonMurzyme => "Non-Murzyme",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "murzyme" | "1" => Ok(Category::Murzyme),
            "non-murzyme" | "non_murzyme" | "nonmurzyme" | "0" => Ok(Category::NonMurzyme),
            _ => Err(()),
        }
    }
}

/// Which cascade tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Model,
    Database,
    Keywords,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Model => f.write_str("model"),
            Provenance::Database => f.write_str("database"),
            Provenance::Keywords => f.write_str("keywords"),
        }
    }
}

pub const MIN_CONFIDENCE: f64 = 0.0;
pub const MAX_CONFIDENCE: f64 = 100.0;

/// The outcome of one classification call.
///
/// Confidence is clamped to `[0, 100]` and rounded to two decimals on
/// construction; the value is never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    classification: Category,
    confidence: f64,
    source: Provenance,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    note: Option<String>,
}

impl ClassificationResult {
    pub fn new(classification: Category, confidence: f64, source: Provenance) -> Self {
        Self {
            classification,
            confidence: round_confidence(confidence),
            source,
            pdb_id: None,
            note: None,
        }
    }

    pub fn with_pdb_id(mut self, pdb_id: Option<String>) -> Self {
        self.pdb_id = pdb_id;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn classification(&self) -> Category {
        self.classification
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn source(&self) -> Provenance {
        self.source
    }

    pub fn pdb_id(&self) -> Option<&str> {
        self.pdb_id.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

fn round_confidence(confidence: f64) -> f64 {
    if !confidence.is_finite() {
        return MIN_CONFIDENCE;
    }
    let clamped = confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
    (clamped * 100.0).round() / 100.0
}
