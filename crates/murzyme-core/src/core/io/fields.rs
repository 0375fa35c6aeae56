//! Fixed-column field layouts for PDB records.
//!
//! Every value the reader pulls out of a line is described by a [`FieldSpec`]
//! (character column, width and target type). Record layouts group those specs so a
//! format variant only needs a new [`PdbLayout`] value, never a change to the
//! reader's control flow.

use phf::{Map, phf_map};

/// The record types the reader understands, keyed by the trimmed record name
/// found in columns 1-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Header,
    Title,
    Keywords,
    Compound,
    Source,
    Remark,
    Atom,
    Helix,
    Sheet,
}

static RECORD_KINDS: Map<&'static str, RecordKind> = phf_map! {
    "HEADER" => RecordKind::Header,
    "TITLE" => RecordKind::Title,
    "KEYWDS" => RecordKind::Keywords,
    "COMPND" => RecordKind::Compound,
    "SOURCE" => RecordKind::Source,
    "REMARK" => RecordKind::Remark,
    "ATOM" => RecordKind::Atom,
    "HELIX" => RecordKind::Helix,
    "SHEET" => RecordKind::Sheet,
};

pub const RECORD_NAME_WIDTH: usize = 6;

impl RecordKind {
    /// Classifies a line by its leading record name.
    pub fn of_line(line: &str) -> Option<Self> {
        let name = slice_columns(line, 0, Some(RECORD_NAME_WIDTH));
        RECORD_KINDS.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Float,
    Int,
}

/// A named fixed-column field: `start` is a zero-based character column and
/// `len` the width in characters, or `None` for "to the end of the line".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub len: Option<usize>,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, start: usize, len: usize, kind: FieldKind) -> Self {
        Self {
            name,
            start,
            len: Some(len),
            kind,
        }
    }

    pub const fn rest_of_line(name: &'static str, start: usize) -> Self {
        Self {
            name,
            start,
            len: None,
            kind: FieldKind::Text,
        }
    }

    /// Extracts the trimmed field text. Short lines yield whatever part of the
    /// span exists, possibly an empty string.
    pub fn extract<'a>(&self, line: &'a str) -> &'a str {
        slice_columns(line, self.start, self.len)
    }

    pub fn parse_float(&self, line: &str) -> Result<f64, FieldError> {
        debug_assert_eq!(self.kind, FieldKind::Float);
        let raw = self.extract(line);
        raw.parse::<f64>().map_err(|_| self.error(raw))
    }

    pub fn parse_int(&self, line: &str) -> Result<i64, FieldError> {
        debug_assert_eq!(self.kind, FieldKind::Int);
        let raw = self.extract(line);
        raw.parse::<i64>().map_err(|_| self.error(raw))
    }

    /// One-based inclusive column range, as written in format documentation.
    pub fn columns(&self) -> String {
        match self.len {
            Some(len) => format!("{}-{}", self.start + 1, self.start + len),
            None => format!("{}-", self.start + 1),
        }
    }

    fn error(&self, raw: &str) -> FieldError {
        FieldError {
            field: self.name,
            columns: self.columns(),
            value: raw.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} in columns {columns} (value: '{value}')")]
pub struct FieldError {
    pub field: &'static str,
    pub columns: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomLayout {
    pub residue_name: FieldSpec,
    pub x: FieldSpec,
    pub y: FieldSpec,
    pub z: FieldSpec,
    pub element: FieldSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
    pub start: FieldSpec,
    pub end: FieldSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdbLayout {
    pub text_content: FieldSpec,
    pub atom: AtomLayout,
    pub helix: SegmentLayout,
    pub sheet: SegmentLayout,
}

impl PdbLayout {
    pub const STANDARD: Self = Self {
        text_content: FieldSpec::rest_of_line("text", 10),
        atom: AtomLayout {
            residue_name: FieldSpec::new("residue name", 17, 3, FieldKind::Text),
            x: FieldSpec::new("x coordinate", 30, 8, FieldKind::Float),
            y: FieldSpec::new("y coordinate", 38, 8, FieldKind::Float),
            z: FieldSpec::new("z coordinate", 46, 8, FieldKind::Float),
            element: FieldSpec::new("element symbol", 76, 2, FieldKind::Text),
        },
        helix: SegmentLayout {
            start: FieldSpec::new("helix start", 21, 4, FieldKind::Int),
            end: FieldSpec::new("helix end", 33, 4, FieldKind::Int),
        },
        sheet: SegmentLayout {
            start: FieldSpec::new("sheet start", 22, 4, FieldKind::Int),
            end: FieldSpec::new("sheet end", 33, 4, FieldKind::Int),
        },
    };
}

impl Default for PdbLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Cuts character columns `start..start + len` out of `line`, clamped to
/// the line's end.
fn slice_columns(line: &str, start: usize, len: Option<usize>) -> &str {
    let byte_offset = |column: usize| {
        line.char_indices()
            .nth(column)
            .map_or(line.len(), |(offset, _)| offset)
    };
    let begin = byte_offset(start);
    let end = len.map_or(line.len(), |len| byte_offset(start + len));
    line.get(begin..end).unwrap_or("").trim()
}
