use super::stats::Histogram;
use super::vector::{FEATURE_VECTOR_LEN, FeatureVector28, FeatureVector50};
use crate::core::models::record::ParsedDocument;
use crate::core::utils::geometry::distance_sample;
use nalgebra::Point3;

/// Number of leading coordinates used for the pairwise distance sample.
pub const DISTANCE_SAMPLE_POINTS: usize = 50;

/// The four feature vectors of one document, plus the histograms they were
/// packed from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub atom_type_counts: Histogram,
    pub residue_counts: Histogram,
    pub atom_types: FeatureVector50,
    pub residues: FeatureVector50,
    pub distances: FeatureVector50,
    pub secondary_structure: FeatureVector50,
}

impl FeatureSet {
    pub fn vectors(&self) -> [&FeatureVector50; 4] {
        [
            &self.atom_types,
            &self.residues,
            &self.distances,
            &self.secondary_structure,
        ]
    }

    pub fn summarize(&self) -> FeatureVector28 {
        FeatureVector28::from_blocks(self.vectors().map(FeatureVector50::summarize))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureBuilder {
    distance_points: usize,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self {
            distance_points: DISTANCE_SAMPLE_POINTS,
        }
    }
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&self, document: &ParsedDocument) -> FeatureSet {
        let atom_type_counts: Histogram = document
            .atoms
            .iter()
            .map(|atom| atom.type_code.as_str())
            .collect();
        let residue_counts: Histogram = document
            .atoms
            .iter()
            .map(|atom| atom.residue_name.as_str())
            .collect();

        let coords: Vec<Point3<f64>> = document
            .positions()
            .take(self.distance_points)
            .collect();
        let distances = distance_sample(&coords, self.distance_points, FEATURE_VECTOR_LEN);

        let secondary = document
            .helix_lengths()
            .chain(document.sheet_lengths())
            .map(|length| length as f64);

        FeatureSet {
            atom_types: FeatureVector50::from_values(atom_type_counts.counts()),
            residues: FeatureVector50::from_values(residue_counts.counts()),
            distances: FeatureVector50::from_values(distances),
            secondary_structure: FeatureVector50::from_values(secondary),
            atom_type_counts,
            residue_counts,
        }
    }

    pub fn summarize(&self, document: &ParsedDocument) -> FeatureVector28 {
        self.build(document).summarize()
    }
}
