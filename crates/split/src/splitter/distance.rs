//! Consecutive-window semantic distance.

/// Cosine distance `1 - cos(a, b)`, accumulated in f64.
///
/// A zero-norm vector has no direction; similarity is defined as 0
/// (distance 1) instead of dividing by zero.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        dot += f64::from(x) * f64::from(y);
        norm_a += f64::from(x) * f64::from(x);
        norm_b += f64::from(y) * f64::from(y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Distance between every pair of consecutive vectors: `N - 1` entries
/// for `N` vectors, empty for fewer than two.
pub fn distance_sequence(vectors: &[Vec<f32>]) -> Vec<f64> {
    vectors
        .windows(2)
        .map(|pair| cosine_distance(&pair[0], &pair[1]))
        .collect()
}
