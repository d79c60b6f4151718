//! Breakpoint detection over the distance sequence.
//!
//! Two interchangeable strategies, selected by configuration:
//!
//! - percentile: distances above the p-th percentile of the whole
//!   sequence mark boundaries
//! - curvature: the distance sequence is a 1-D signal; inflections
//!   (sign flips in adjacent second differences) with a large enough
//!   slope-change magnitude mark boundaries
//!
//! Both return strictly increasing atom indices in `(0, atom_count)`:
//! index `b` means atom `b` starts a new chunk. The implicit 0 and
//! `atom_count` bounds are the assembler's business.

use semsplit_core::DetectorConfig;

/// Run the configured strategy. `atom_count` bounds the output range.
pub fn detect(distances: &[f64], detector: &DetectorConfig, atom_count: usize) -> Vec<usize> {
    let mut boundaries = match *detector {
        DetectorConfig::Percentile { percentile } => percentile_breakpoints(distances, percentile),
        DetectorConfig::Curvature { threshold_factor } => {
            curvature_breakpoints(distances, threshold_factor)
        }
    };
    boundaries.retain(|&b| b > 0 && b < atom_count);
    boundaries.dedup();
    boundaries
}

/// Distances strictly above the p-th percentile become boundaries: a
/// spike at `distance[i]` separates atom `i` from atom `i + 1`.
fn percentile_breakpoints(distances: &[f64], percentile: f64) -> Vec<usize> {
    if distances.is_empty() {
        return Vec::new();
    }
    let threshold = percentile_of(distances, percentile);
    distances
        .iter()
        .enumerate()
        .filter(|(_, &d)| d > threshold)
        .map(|(i, _)| i + 1)
        .collect()
}

/// Linear-interpolated percentile of an unsorted sample.
fn percentile_of(sample: &[f64], p: f64) -> f64 {
    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Inflection-based detection on the second differences of the signal.
///
/// A candidate sits at raw index `k` where adjacent slope changes have
/// opposite sign; it survives when `|slope_change[k]|` exceeds
/// `mean + threshold_factor * std` of all slope-change magnitudes.
/// Each survivor maps to atom boundary `k + 2`, compensating for the
/// two differencing passes. Fewer than 3 distances cannot produce a
/// second difference, so the result is empty.
fn curvature_breakpoints(distances: &[f64], threshold_factor: f64) -> Vec<usize> {
    if distances.len() < 3 {
        return Vec::new();
    }

    let slopes: Vec<f64> = distances.windows(2).map(|w| w[1] - w[0]).collect();
    let slope_changes: Vec<f64> = slopes.windows(2).map(|w| w[1] - w[0]).collect();

    let magnitudes: Vec<f64> = slope_changes.iter().map(|c| c.abs()).collect();
    let mean = magnitudes.iter().sum::<f64>() / magnitudes.len() as f64;
    let variance = magnitudes
        .iter()
        .map(|m| (m - mean).powi(2))
        .sum::<f64>()
        / magnitudes.len() as f64;
    let threshold = mean + threshold_factor * variance.sqrt();

    slope_changes
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] * pair[1] < 0.0)
        .filter(|(k, _)| magnitudes[*k] > threshold)
        .map(|(k, _)| k + 2)
        .collect()
}
