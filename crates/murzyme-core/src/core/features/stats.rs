use std::collections::HashMap;

pub const STATISTIC_COUNT: usize = 7;

/// Seven summary statistics of one feature vector.
///
/// Standard deviation is the population form (divide by N). Percentiles
/// interpolate linearly between order statistics at rank `p * (N - 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryStatistics7 {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
}

impl SummaryStatistics7 {
    /// Summarizes `values`. Empty input, or input holding any NaN or
    /// infinite value, yields all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            mean,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: percentile(&sorted, 50.0),
            p25: percentile(&sorted, 25.0),
            p75: percentile(&sorted, 75.0),
        }
    }

    pub fn to_array(&self) -> [f64; STATISTIC_COUNT] {
        [
            self.mean,
            self.std_dev,
            self.min,
            self.max,
            self.median,
            self.p25,
            self.p75,
        ]
    }
}

/// Linear-interpolation percentile over non-empty sorted data.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Occurrence counts keyed by label, in first-encountered order.
///
/// Empty labels are counted towards [`Histogram::total`] but get no bin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    bins: Vec<(String, usize)>,
    index: HashMap<String, usize>,
    total: usize,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str) {
        self.total += 1;
        if label.is_empty() {
            return;
        }
        match self.index.get(label) {
            Some(&slot) => self.bins[slot].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.bins.len());
                self.bins.push((label.to_string(), 1));
            }
        }
    }

    pub fn count(&self, label: &str) -> usize {
        self.index.get(label).map_or(0, |&slot| self.bins[slot].1)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Share of all added labels equal to `label`; zero when nothing was added.
    pub fn fraction(&self, label: &str) -> f64 {
        self.count(label) as f64 / self.total.max(1) as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.bins.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn counts(&self) -> impl Iterator<Item = f64> + '_ {
        self.bins.iter().map(|(_, count)| *count as f64)
    }
}

impl<'a> FromIterator<&'a str> for Histogram {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut histogram = Histogram::new();
        for label in iter {
            histogram.add(label);
        }
        histogram
    }
}
