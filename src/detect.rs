//! Qualifying-transition detection
//!
//! Decides, from two consecutive raw reports, whether a real input event
//! occurred and how long since the previous one. All timing is carried as
//! nanoseconds from a caller-chosen monotonic epoch so the logic stays
//! deterministic under test.

use crate::gamepad::RawDeviceState;
use serde::{Deserialize, Serialize};

/// Intervals at or below this are clock-quantization noise, not reports.
pub const MIN_INTERVAL_NS: u64 = 1_000;

/// What counts as a qualifying transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DetectionMode {
    /// Packet number advanced and the button/trigger/axis payload changed.
    /// Excludes heartbeat-only reports.
    #[default]
    Standard,
    /// Any packet-number advance qualifies, including reports that only
    /// carry sensor channels outside the modeled payload.
    Extended,
}

/// Stateful change detector fed one raw report per poll tick.
#[derive(Debug)]
pub struct ChangeDetector {
    mode: DetectionMode,
    previous: RawDeviceState,
    last_transition_ns: u64,
}

impl ChangeDetector {
    /// `initial` is the report taken at session start; `now_ns` anchors the
    /// first interval measurement.
    pub fn new(mode: DetectionMode, initial: RawDeviceState, now_ns: u64) -> Self {
        Self {
            mode,
            previous: initial,
            last_transition_ns: now_ns,
        }
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// Switch modes mid-run. Takes effect on the next report.
    pub fn set_mode(&mut self, mode: DetectionMode) {
        self.mode = mode;
    }

    /// Feed the current report. Returns the interval (ns) since the last
    /// qualifying transition when one is recorded this tick.
    ///
    /// Sub-microsecond intervals are discarded but still advance the
    /// last-transition timestamp, so quantization noise cannot inflate the
    /// next interval either.
    pub fn update(&mut self, current: &RawDeviceState, now_ns: u64) -> Option<u64> {
        if current.packet == self.previous.packet {
            return None;
        }

        let qualifying = match self.mode {
            DetectionMode::Extended => true,
            DetectionMode::Standard => !current.payload_matches(&self.previous),
        };

        let mut recorded = None;
        if qualifying {
            let interval_ns = now_ns.saturating_sub(self.last_transition_ns);
            if interval_ns > MIN_INTERVAL_NS {
                recorded = Some(interval_ns);
            }
            self.last_transition_ns = now_ns;
        }

        self.previous = *current;
        recorded
    }
}
