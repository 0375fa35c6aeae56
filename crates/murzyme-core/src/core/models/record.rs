use crate::core::io::fields::FieldError;
use nalgebra::Point3;
use std::fmt;

/// Header-level annotations recovered from the top of a PDB document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHeader {
    /// The 4-character accession code, uppercased, if one was recognized.
    pub identifier: Option<String>,
    /// Content of the HEADER record (classification, deposition date, code).
    pub classification: String,
    /// TITLE content, continuation lines joined with single spaces.
    pub title: String,
    /// KEYWDS content, continuation lines joined with single spaces.
    pub keywords: String,
    pub compound: String,
    pub source: String,
}

impl ParsedHeader {
    /// Uppercased keyword and title text scored by the keyword heuristic.
    pub fn keyword_text(&self) -> String {
        join_upper(&[&self.keywords, &self.title])
    }

    /// Uppercased HEADER, TITLE, KEYWDS, COMPND and SOURCE text searched by
    /// the registry's substring match.
    pub fn registry_text(&self) -> String {
        join_upper(&[
            &self.classification,
            &self.title,
            &self.keywords,
            &self.compound,
            &self.source,
        ])
    }
}

fn join_upper(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn append_text(target: &mut String, content: &str) {
    if content.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(content);
}

/// One ATOM record. A coordinate that failed to parse is `None`; the type
/// code and residue name still count.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub type_code: String,
    pub position: Option<Point3<f64>>,
    pub residue_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Helix,
    Sheet,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::Helix => write!(f, "helix"),
            SegmentKind::Sheet => write!(f, "sheet"),
        }
    }
}

/// A helix or sheet range reduced to `end - start`. Malformed ranges pass
/// through, so the length may be zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryStructureSegment {
    pub kind: SegmentKind,
    pub length: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnomalyKind {
    /// A coordinate field did not parse; the atom was kept without a position.
    InvalidCoordinate(FieldError),
    /// A coordinate parsed but is NaN or infinite; the atom was kept without a position.
    NonFiniteCoordinate,
    /// A helix or sheet bound did not parse; no segment was recorded.
    InvalidSegmentBound { kind: SegmentKind, error: FieldError },
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyKind::InvalidCoordinate(error) => write!(f, "{}", error),
            AnomalyKind::NonFiniteCoordinate => write!(f, "Coordinate is not finite"),
            AnomalyKind::InvalidSegmentBound { kind, error } => {
                write!(f, "Skipped {} record: {}", kind, error)
            }
        }
    }
}

/// A malformed field the reader recovered from, with its one-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAnomaly {
    pub line: usize,
    pub kind: AnomalyKind,
}

impl fmt::Display for ParseAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Everything the reader recovers from one document. Built once per call and
/// never shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    pub header: ParsedHeader,
    pub atoms: Vec<AtomRecord>,
    pub segments: Vec<SecondaryStructureSegment>,
    /// Distinct accession-like tokens from lines that mention "PDB", in
    /// document order.
    pub identifier_mentions: Vec<String>,
    pub anomalies: Vec<ParseAnomaly>,
}

impl ParsedDocument {
    pub fn helix_lengths(&self) -> impl Iterator<Item = i64> + '_ {
        self.lengths_of(SegmentKind::Helix)
    }

    pub fn sheet_lengths(&self) -> impl Iterator<Item = i64> + '_ {
        self.lengths_of(SegmentKind::Sheet)
    }

    pub fn positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.atoms.iter().filter_map(|atom| atom.position)
    }

    fn lengths_of(&self, kind: SegmentKind) -> impl Iterator<Item = i64> + '_ {
        self.segments
            .iter()
            .filter(move |segment| segment.kind == kind)
            .map(|segment| segment.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(kind: SegmentKind, length: i64) -> SecondaryStructureSegment {
        SecondaryStructureSegment { kind, length }
    }

    #[test]
    fn keyword_text_joins_keywords_then_title_uppercased() {
        let header = ParsedHeader {
            title: "Rubisco structure".into(),
            keywords: "lyase, carbon fixation".into(),
            ..Default::default()
        };
        assert_eq!(header.keyword_text(), "LYASE, CARBON FIXATION RUBISCO STRUCTURE");
    }

    #[test]
    fn registry_text_skips_empty_sections() {
        let header = ParsedHeader {
            classification: "oxidoreductase".into(),
            source: "spinach".into(),
            ..Default::default()
        };
        assert_eq!(header.registry_text(), "OXIDOREDUCTASE SPINACH");
        assert_eq!(ParsedHeader::default().registry_text(), "");
    }

    #[test]
    fn append_text_separates_with_single_space() {
        let mut text = String::new();
        append_text(&mut text, "CRYSTAL STRUCTURE");
        append_text(&mut text, "");
        append_text(&mut text, "OF RUBISCO");
        assert_eq!(text, "CRYSTAL STRUCTURE OF RUBISCO");
    }

    #[test]
    fn segment_lengths_are_split_by_kind_in_document_order() {
        let document = ParsedDocument {
            segments: vec![
                segment(SegmentKind::Sheet, 4),
                segment(SegmentKind::Helix, 8),
                segment(SegmentKind::Helix, -2),
            ],
            ..Default::default()
        };
        assert_eq!(document.helix_lengths().collect::<Vec<_>>(), vec![8, -2]);
        assert_eq!(document.sheet_lengths().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn positions_skip_atoms_without_coordinates() {
        let document = ParsedDocument {
            atoms: vec![
                AtomRecord {
                    type_code: "C".into(),
                    position: Some(Point3::new(1.0, 2.0, 3.0)),
                    residue_name: "ALA".into(),
                },
                AtomRecord {
                    type_code: "N".into(),
                    position: None,
                    residue_name: "ALA".into(),
                },
            ],
            ..Default::default()
        };
        assert_eq!(document.positions().count(), 1);
    }
}
