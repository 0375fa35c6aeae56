use super::stats::{STATISTIC_COUNT, SummaryStatistics7};
use std::ops::Deref;

pub const FEATURE_VECTOR_LEN: usize = 50;
pub const FEATURE_BLOCKS: usize = 4;
pub const SUMMARY_FEATURE_LEN: usize = FEATURE_BLOCKS * STATISTIC_COUNT;

/// A fixed-length numeric encoding of one aspect of a document.
///
/// Shorter inputs are right-padded with zeros and longer inputs are
/// truncated to their first [`FEATURE_VECTOR_LEN`] values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector50 {
    values: [f64; FEATURE_VECTOR_LEN],
    source_len: usize,
}

impl FeatureVector50 {
    pub const fn zeros() -> Self {
        Self {
            values: [0.0; FEATURE_VECTOR_LEN],
            source_len: 0,
        }
    }

    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut vector = Self::zeros();
        for (index, value) in values.into_iter().enumerate() {
            if index < FEATURE_VECTOR_LEN {
                vector.values[index] = value;
            }
            vector.source_len = index + 1;
        }
        vector
    }

    pub fn as_array(&self) -> &[f64; FEATURE_VECTOR_LEN] {
        &self.values
    }

    /// Number of raw values before padding or truncation.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    pub fn is_padded(&self) -> bool {
        self.source_len < FEATURE_VECTOR_LEN
    }

    pub fn summarize(&self) -> SummaryStatistics7 {
        SummaryStatistics7::from_values(&self.values)
    }
}

impl Default for FeatureVector50 {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Deref for FeatureVector50 {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

/// Four [`SummaryStatistics7`] blocks in the order atom type, residue,
/// distance, secondary structure. The only input of the model tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector28([f64; SUMMARY_FEATURE_LEN]);

impl FeatureVector28 {
    pub fn from_blocks(blocks: [SummaryStatistics7; FEATURE_BLOCKS]) -> Self {
        let mut values = [0.0; SUMMARY_FEATURE_LEN];
        for (chunk, block) in values.chunks_exact_mut(STATISTIC_COUNT).zip(blocks) {
            chunk.copy_from_slice(&block.to_array());
        }
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; SUMMARY_FEATURE_LEN] {
        &self.0
    }

    pub fn block(&self, index: usize) -> Option<&[f64]> {
        self.0.chunks_exact(STATISTIC_COUNT).nth(index)
    }
}

impl Deref for FeatureVector28 {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
