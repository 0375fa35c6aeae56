use super::fields::{FieldError, PdbLayout, RecordKind};
use super::traits::StructureFile;
use crate::core::models::record::{
    AnomalyKind, AtomRecord, ParseAnomaly, ParsedDocument, ParsedHeader,
    SecondaryStructureSegment, SegmentKind, append_text,
};
use crate::core::utils::identifiers::{IDENTIFIER_LEN, is_accession_like};
use nalgebra::Point3;
use std::collections::HashSet;

/// Lines inspected for the accession code (HEADER and REMARK records).
pub const IDENTIFIER_SCAN_LINES: usize = 20;
/// Lines inspected for HEADER/TITLE/KEYWDS/COMPND/SOURCE text.
pub const HEADER_SCAN_LINES: usize = 50;

const HEADER_MIN_TOKENS: usize = 10;
const REMARK_IDENTIFIER_MARKER: &str = "PDB ID";

/// Line-oriented reader for PDB text.
///
/// Header-type records are only read within a bounded window at the top of
/// the document; ATOM, HELIX and SHEET records are read everywhere. The reader
/// is total: malformed fields are skipped and recorded as
/// [`ParseAnomaly`] values on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdbReader {
    layout: PdbLayout,
    identifier_scan_lines: usize,
    header_scan_lines: usize,
}

impl Default for PdbReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PdbReader {
    pub fn new() -> Self {
        Self::with_layout(PdbLayout::STANDARD)
    }

    pub fn with_layout(layout: PdbLayout) -> Self {
        Self {
            layout,
            identifier_scan_lines: IDENTIFIER_SCAN_LINES,
            header_scan_lines: HEADER_SCAN_LINES,
        }
    }

    pub fn with_scan_window(mut self, identifier_lines: usize, header_lines: usize) -> Self {
        self.identifier_scan_lines = identifier_lines;
        self.header_scan_lines = header_lines;
        self
    }

    pub fn layout(&self) -> &PdbLayout {
        &self.layout
    }

    pub fn parse(&self, text: &str) -> ParsedDocument {
        let mut document = ParsedDocument::default();
        let mut remark_identifier = None;
        let mut seen_mentions = HashSet::new();

        for (index, line) in text.lines().enumerate() {
            let line_num = index + 1;

            match RecordKind::of_line(line) {
                Some(RecordKind::Atom) => self.read_atom(line, line_num, &mut document),
                Some(RecordKind::Helix) => {
                    self.read_segment(line, line_num, SegmentKind::Helix, &mut document)
                }
                Some(RecordKind::Sheet) => {
                    self.read_segment(line, line_num, SegmentKind::Sheet, &mut document)
                }
                Some(kind) if index < self.header_scan_lines => {
                    let in_identifier_window = index < self.identifier_scan_lines;
                    self.read_annotation(kind, line, in_identifier_window, &mut document.header);
                    if kind == RecordKind::Remark
                        && in_identifier_window
                        && remark_identifier.is_none()
                    {
                        remark_identifier = remark_line_identifier(line);
                    }
                }
                _ => {}
            }

            collect_mentions(line, &mut document.identifier_mentions, &mut seen_mentions);
        }

        if document.header.identifier.is_none() {
            document.header.identifier = remark_identifier;
        }
        document
    }

    fn read_annotation(
        &self,
        kind: RecordKind,
        line: &str,
        in_identifier_window: bool,
        header: &mut ParsedHeader,
    ) {
        let content = self.layout.text_content.extract(line);
        match kind {
            RecordKind::Header => {
                append_text(&mut header.classification, content);
                if in_identifier_window && header.identifier.is_none() {
                    header.identifier = header_line_identifier(line);
                }
            }
            RecordKind::Title => append_text(&mut header.title, content),
            RecordKind::Keywords => append_text(&mut header.keywords, content),
            RecordKind::Compound => append_text(&mut header.compound, content),
            RecordKind::Source => append_text(&mut header.source, content),
            RecordKind::Remark | RecordKind::Atom | RecordKind::Helix | RecordKind::Sheet => {}
        }
    }

    fn read_atom(&self, line: &str, line_num: usize, document: &mut ParsedDocument) {
        let layout = &self.layout.atom;
        let position = match self.read_position(line) {
            Ok(point) if point.iter().all(|c| c.is_finite()) => Some(point),
            Ok(_) => {
                document.anomalies.push(ParseAnomaly {
                    line: line_num,
                    kind: AnomalyKind::NonFiniteCoordinate,
                });
                None
            }
            Err(error) => {
                document.anomalies.push(ParseAnomaly {
                    line: line_num,
                    kind: AnomalyKind::InvalidCoordinate(error),
                });
                None
            }
        };

        document.atoms.push(AtomRecord {
            type_code: layout.element.extract(line).to_string(),
            position,
            residue_name: layout.residue_name.extract(line).to_string(),
        });
    }

    fn read_position(&self, line: &str) -> Result<Point3<f64>, FieldError> {
        let layout = &self.layout.atom;
        let x = layout.x.parse_float(line)?;
        let y = layout.y.parse_float(line)?;
        let z = layout.z.parse_float(line)?;
        Ok(Point3::new(x, y, z))
    }

    fn read_segment(
        &self,
        line: &str,
        line_num: usize,
        kind: SegmentKind,
        document: &mut ParsedDocument,
    ) {
        let layout = match kind {
            SegmentKind::Helix => &self.layout.helix,
            SegmentKind::Sheet => &self.layout.sheet,
        };
        let bounds = layout
            .start
            .parse_int(line)
            .and_then(|start| layout.end.parse_int(line).map(|end| (start, end)));

        match bounds {
            Ok((start, end)) => document.segments.push(SecondaryStructureSegment {
                kind,
                length: end.saturating_sub(start),
            }),
            Err(error) => document.anomalies.push(ParseAnomaly {
                line: line_num,
                kind: AnomalyKind::InvalidSegmentBound { kind, error },
            }),
        }
    }
}

impl StructureFile for PdbReader {
    type Document = ParsedDocument;

    fn parse_str(&self, text: &str) -> Self::Document {
        self.parse(text)
    }
}

/// The accession code of a HEADER line: the last whitespace token, if the
/// line has at least ten tokens and that token is exactly four characters.
fn header_line_identifier(line: &str) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < HEADER_MIN_TOKENS {
        return None;
    }
    tokens
        .last()
        .filter(|token| token.chars().count() == IDENTIFIER_LEN)
        .map(|token| token.to_uppercase())
}

fn remark_line_identifier(line: &str) -> Option<String> {
    if !line.contains(REMARK_IDENTIFIER_MARKER) {
        return None;
    }
    line.split_whitespace()
        .find(|word| is_accession_like(word))
        .map(str::to_ascii_uppercase)
}

fn collect_mentions(line: &str, mentions: &mut Vec<String>, seen: &mut HashSet<String>) {
    if !(line.contains("PDB") || line.contains("pdb")) {
        return;
    }
    for word in line.split_whitespace().filter(|word| is_accession_like(word)) {
        let candidate = word.to_ascii_uppercase();
        if seen.insert(candidate.clone()) {
            mentions.push(candidate);
        }
    }
}
