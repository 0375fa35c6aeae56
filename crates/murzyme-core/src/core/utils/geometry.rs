use nalgebra::{Point3, distance};

/// Yields the row-major flattening of the pairwise Euclidean distance matrix
/// over `coords`, lazily, so callers that only need a prefix never pay for the
/// full matrix.
pub fn pairwise_distances(coords: &[Point3<f64>]) -> impl Iterator<Item = f64> + '_ {
    coords
        .iter()
        .flat_map(move |a| coords.iter().map(move |b| distance(a, b)))
}

pub fn distance_sample(coords: &[Point3<f64>], max_points: usize, max_values: usize) -> Vec<f64> {
    let selected = &coords[..coords.len().min(max_points)];
    if selected.len() < 2 {
        return Vec::new();
    }
    pairwise_distances(selected).take(max_values).collect()
}
