//! Session report and export functionality
//!
//! Renders the full interval log plus its summary statistics as a flat
//! text report, and auto-saves it under a timestamped filename. A report
//! is written on every terminal session state, even when the log is empty
//! or partial.

use crate::stats::{self, StatsSnapshot};
use chrono::Local;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A complete polling measurement report.
#[derive(Debug, Clone)]
pub struct PollingReport {
    /// Friendly device label, e.g. `#1 [Gamepad]`
    pub device_label: String,
    /// Full-session interval log in nanoseconds
    pub intervals_ns: Vec<u64>,
    /// Summary computed over the full log
    pub summary: StatsSnapshot,
}

impl PollingReport {
    pub fn new(device_label: impl Into<String>, intervals_ns: Vec<u64>) -> Self {
        let summary = stats::compute(&intervals_ns);
        Self {
            device_label: device_label.into(),
            intervals_ns,
            summary,
        }
    }

    /// Write the report:
    /// a header block, a `[Summary]` block, then one interval per line.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rule = "=".repeat(40);
        writeln!(out, "Gamepad Polling Rate Test Report")?;
        writeln!(out, "{rule}")?;
        writeln!(out, "Timestamp: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(out, "Device: {}", self.device_label)?;
        writeln!(out, "{rule}")?;
        writeln!(out)?;
        writeln!(out, "[Summary]")?;
        writeln!(
            out,
            "  Average Rate: {:.2} Hz",
            self.summary.mean_hz.unwrap_or(0.0)
        )?;
        writeln!(
            out,
            "  Median Rate: {:.2} Hz",
            self.summary.median_hz.unwrap_or(0.0)
        )?;
        writeln!(
            out,
            "  Average Interval: {:.3} ms",
            self.summary.mean_ms.unwrap_or(0.0)
        )?;
        writeln!(
            out,
            "  Median Interval: {:.3} ms",
            self.summary.median_ms.unwrap_or(0.0)
        )?;
        writeln!(
            out,
            "  Stability: {:.1}%",
            self.summary.stability_pct.unwrap_or(0.0)
        )?;
        writeln!(out, "  Total Samples: {}", self.intervals_ns.len())?;
        writeln!(out)?;
        writeln!(out, "[Raw Interval Data (ms)]")?;
        for &ns in &self.intervals_ns {
            writeln!(out, "{:.4}", ns as f64 / 1_000_000.0)?;
        }
        Ok(())
    }

    /// Render the report to a string.
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Timestamped auto-save filename, e.g.
    /// `Report_1 Gamepad_20260830_143015.txt`.
    pub fn file_name(&self) -> String {
        format!(
            "Report_{}_{}.txt",
            sanitize_label(&self.device_label),
            Local::now().format("%Y%m%d_%H%M%S")
        )
    }

    /// Write the report into `dir` under its auto-save filename.
    pub fn save_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(self.file_name());
        let mut file = File::create(&path)?;
        self.write_to(&mut file)?;
        Ok(path)
    }
}

/// Strip a device label down to filename-safe characters.
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .replace("__", "_")
        .trim()
        .to_string()
}
