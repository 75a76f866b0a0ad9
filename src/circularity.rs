//! Analog-stick circularity analysis
//!
//! Accumulates per-direction radius samples from normalized stick
//! coordinates and derives an average-deviation error metric. A
//! mechanically round stick traces a near-constant radius in every
//! direction; an elliptical or notchy one does not.

use std::collections::VecDeque;
use std::f64::consts::TAU;

pub const DEFAULT_SECTORS: usize = 24;
pub const DEFAULT_RADIUS_WINDOW: usize = 5000;

const MIN_SECTORS: usize = 8;
/// Samples required in the radius window before the error is derived.
const MIN_ERROR_SAMPLES: usize = 20;
/// Mean radii below this are treated as "stick at rest"; dividing by them
/// would blow the error metric up on sensor noise.
const RADIUS_FLOOR: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default)]
struct Sector {
    radius_sum: f64,
    count: u64,
}

/// Accumulates stick-travel samples across angular sectors.
///
/// State persists across measurement sessions; only [`reset`] clears it.
///
/// [`reset`]: CircularityAnalyzer::reset
#[derive(Debug)]
pub struct CircularityAnalyzer {
    sectors: Vec<Sector>,
    recent_radii: VecDeque<f64>,
    radius_window: usize,
    avg_error_pct: f64,
}

impl CircularityAnalyzer {
    /// `sectors` is clamped to at least 8; `radius_window` to at least the
    /// sample count needed to derive the error.
    pub fn new(sectors: usize, radius_window: usize) -> Self {
        let radius_window = radius_window.max(MIN_ERROR_SAMPLES);
        Self {
            sectors: vec![Sector::default(); sectors.max(MIN_SECTORS)],
            recent_radii: VecDeque::with_capacity(radius_window),
            radius_window,
            avg_error_pct: 0.0,
        }
    }

    /// Feed one normalized stick sample (x, y in [-1, 1]).
    pub fn add_sample(&mut self, x: f64, y: f64) {
        let radius = x.hypot(y);

        let mut angle = y.atan2(x);
        if angle < 0.0 {
            angle += TAU;
        }
        let sector_count = self.sectors.len();
        let index = ((angle / TAU) * sector_count as f64) as usize % sector_count;
        self.sectors[index].radius_sum += radius;
        self.sectors[index].count += 1;

        if self.recent_radii.len() == self.radius_window {
            self.recent_radii.pop_front();
        }
        self.recent_radii.push_back(radius);

        if self.recent_radii.len() >= MIN_ERROR_SAMPLES {
            let len = self.recent_radii.len() as f64;
            let avg_radius = self.recent_radii.iter().sum::<f64>() / len;
            if avg_radius > RADIUS_FLOOR {
                let avg_deviation = self
                    .recent_radii
                    .iter()
                    .map(|r| (r - avg_radius).abs())
                    .sum::<f64>()
                    / len;
                self.avg_error_pct = avg_deviation / avg_radius * 100.0;
            }
        }
    }

    /// Average travel radius per angular sector, 0 where no sample landed.
    /// Sector 0 starts at angle 0 (positive X axis), counter-clockwise.
    pub fn sector_profile(&self) -> Vec<f64> {
        self.sectors
            .iter()
            .map(|s| {
                if s.count > 0 {
                    s.radius_sum / s.count as f64
                } else {
                    0.0
                }
            })
            .collect()
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Average percentage deviation of the recent radii from their own
    /// mean. 0 until enough samples have arrived.
    pub fn avg_error_pct(&self) -> f64 {
        self.avg_error_pct
    }

    /// Total samples accumulated since the last reset.
    pub fn sample_count(&self) -> u64 {
        self.sectors.iter().map(|s| s.count).sum()
    }

    /// Clear all sector accumulators and the recent-radius window.
    pub fn reset(&mut self) {
        for sector in &mut self.sectors {
            *sector = Sector::default();
        }
        self.recent_radii.clear();
        self.avg_error_pct = 0.0;
    }
}

impl Default for CircularityAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_SECTORS, DEFAULT_RADIUS_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed `n` samples of constant radius at evenly spaced angles.
    fn feed_circle(analyzer: &mut CircularityAnalyzer, radius: f64, n: usize) {
        for i in 0..n {
            let angle = TAU * i as f64 / n as f64;
            analyzer.add_sample(radius * angle.cos(), radius * angle.sin());
        }
    }

    #[test]
    fn constant_radius_has_near_zero_error() {
        let mut analyzer = CircularityAnalyzer::new(24, 5000);
        feed_circle(&mut analyzer, 0.8, 48);
        assert!(
            analyzer.avg_error_pct() < 1e-6,
            "error was {}",
            analyzer.avg_error_pct()
        );
        assert_eq!(analyzer.sample_count(), 48);
    }

    #[test]
    fn elliptical_travel_has_visible_error() {
        let mut analyzer = CircularityAnalyzer::new(24, 5000);
        for i in 0..100 {
            let angle = TAU * i as f64 / 100.0;
            // Pronounced ellipse: x radius 1.0, y radius 0.5
            analyzer.add_sample(angle.cos(), 0.5 * angle.sin());
        }
        assert!(analyzer.avg_error_pct() > 5.0);
    }

    #[test]
    fn error_undefined_below_sample_threshold() {
        let mut analyzer = CircularityAnalyzer::new(24, 5000);
        feed_circle(&mut analyzer, 0.5, 19);
        assert_eq!(analyzer.avg_error_pct(), 0.0);
        // The 20th sample crosses the threshold
        analyzer.add_sample(0.5, 0.0);
        // Constant radius, so still ~0 but now derived
        assert!(analyzer.avg_error_pct() < 1e-6);
    }

    #[test]
    fn centered_stick_does_not_derive_error() {
        let mut analyzer = CircularityAnalyzer::new(24, 5000);
        for _ in 0..50 {
            analyzer.add_sample(0.0, 0.0);
        }
        // Mean radius under the floor: metric stays untouched
        assert_eq!(analyzer.avg_error_pct(), 0.0);
    }

    #[test]
    fn samples_land_in_the_right_sector() {
        let mut analyzer = CircularityAnalyzer::new(24, 5000);
        analyzer.add_sample(1.0, 0.0); // angle 0 -> sector 0
        analyzer.add_sample(0.0, 1.0); // angle pi/2 -> sector 6 of 24
        analyzer.add_sample(-1.0, 0.0); // angle pi -> sector 12
        analyzer.add_sample(0.0, -1.0); // angle 3pi/2 -> sector 18
        let profile = analyzer.sector_profile();
        for expected in [0usize, 6, 12, 18] {
            assert!(
                (profile[expected] - 1.0).abs() < 1e-9,
                "sector {expected} profile was {}",
                profile[expected]
            );
        }
        assert_eq!(profile.iter().filter(|&&r| r > 0.0).count(), 4);
    }

    #[test]
    fn sector_profile_averages_radii() {
        let mut analyzer = CircularityAnalyzer::new(8, 5000);
        analyzer.add_sample(0.4, 0.0);
        analyzer.add_sample(0.8, 0.0);
        let profile = analyzer.sector_profile();
        assert!((profile[0] - 0.6).abs() < 1e-9);
    }

    #[test]
    fn sector_count_is_clamped() {
        let analyzer = CircularityAnalyzer::new(2, 5000);
        assert_eq!(analyzer.sector_count(), 8);
    }

    #[test]
    fn radius_window_is_bounded() {
        let mut analyzer = CircularityAnalyzer::new(8, 20);
        // 30 samples at radius 1.0, then 20 at radius 0.5: the window only
        // retains the most recent 20, all identical, so error returns to ~0
        feed_circle(&mut analyzer, 1.0, 30);
        feed_circle(&mut analyzer, 0.5, 20);
        assert!(analyzer.avg_error_pct() < 1e-6);
    }

    #[test]
    fn reset_clears_everything() {
        let mut analyzer = CircularityAnalyzer::new(24, 5000);
        feed_circle(&mut analyzer, 0.9, 40);
        analyzer.reset();
        assert_eq!(analyzer.sample_count(), 0);
        assert_eq!(analyzer.avg_error_pct(), 0.0);
        assert!(analyzer.sector_profile().iter().all(|&r| r == 0.0));
    }
}
