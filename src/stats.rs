//! Descriptive statistics over recorded intervals
//!
//! Pure functions: a list of nanosecond intervals in, a fixed-shape
//! snapshot out. Below [`MIN_SAMPLES`] entries only the count is
//! populated; deriving rates from fewer samples is statistically
//! meaningless, not an error.

/// Minimum interval count before numeric statistics are derived.
pub const MIN_SAMPLES: usize = 10;

/// Descriptive statistics for a set of intervals.
///
/// The numeric fields are `None` for a partial snapshot
/// (`sample_count < MIN_SAMPLES`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatsSnapshot {
    pub sample_count: usize,
    pub mean_ms: Option<f64>,
    pub median_ms: Option<f64>,
    pub mean_hz: Option<f64>,
    pub median_hz: Option<f64>,
    /// Share of intervals within two standard deviations of the mean.
    /// A jitter-consistency score, not a confidence bound.
    pub stability_pct: Option<f64>,
}

impl StatsSnapshot {
    pub fn is_partial(&self) -> bool {
        self.mean_ms.is_none()
    }
}

/// Compute a statistics snapshot from nanosecond intervals.
pub fn compute(intervals_ns: &[u64]) -> StatsSnapshot {
    let count = intervals_ns.len();
    if count < MIN_SAMPLES {
        return StatsSnapshot {
            sample_count: count,
            ..Default::default()
        };
    }

    let ms: Vec<f64> = intervals_ns
        .iter()
        .map(|&ns| ns as f64 / 1_000_000.0)
        .collect();
    let mean_ms = ms.iter().sum::<f64>() / count as f64;
    let median_ms = median(&ms);

    let to_hz = |interval_ms: f64| {
        if interval_ms > 0.0 {
            1000.0 / interval_ms
        } else {
            0.0
        }
    };

    StatsSnapshot {
        sample_count: count,
        mean_ms: Some(mean_ms),
        median_ms: Some(median_ms),
        mean_hz: Some(to_hz(mean_ms)),
        median_hz: Some(to_hz(median_ms)),
        stability_pct: Some(stability_pct(&ms, mean_ms)),
    }
}

/// Median of an unsorted series; averages the two middle values for even
/// counts. NaN for an empty series.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Percentile by linear interpolation between adjacent order statistics at
/// the fractional rank `(n-1)*p/100`. `sorted` must be ascending.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (sorted.len() - 1) as f64 * (p / 100.0);
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    if lower == upper {
        return sorted[lower];
    }
    sorted[lower] * (upper as f64 - rank) + sorted[upper] * (rank - lower as f64)
}

/// Percentage of values within `mean ± 2σ`, using the population standard
/// deviation. Defined as 100% for a single value.
fn stability_pct(values_ms: &[f64], mean: f64) -> f64 {
    if values_ms.len() <= 1 {
        return 100.0;
    }
    let variance = values_ms
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / values_ms.len() as f64;
    let sigma = variance.sqrt();
    let (low, high) = (mean - 2.0 * sigma, mean + 2.0 * sigma);
    let within = values_ms.iter().filter(|&&v| v >= low && v <= high).count();
    within as f64 / values_ms.len() as f64 * 100.0
}
