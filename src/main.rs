//! Gamepad TestKit - gamepad polling rate measurement utility
//!
//! Thin terminal front-end over the measurement engine: picks a device,
//! runs one measurement session, prints live statistics, and writes the
//! report when the session ends.

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    run()
}

#[cfg(windows)]
fn run() -> Result<()> {
    use anyhow::Context;
    use crossterm::event::{self, Event, KeyCode};
    use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
    use gamepad_testkit::circularity::CircularityAnalyzer;
    use gamepad_testkit::config::Config;
    use gamepad_testkit::gamepad::{device_label, xinput::XInputSource, SampleSource, MAX_DEVICES};
    use gamepad_testkit::report::PollingReport;
    use gamepad_testkit::session::{
        MeasurementSession, SessionEvent, SessionState, DEFAULT_STOP_TIMEOUT,
    };
    use gamepad_testkit::stats::{self, StatsSnapshot};
    use std::io::{stdout, Write};
    use std::sync::mpsc;
    use std::time::Duration;

    fn print_live(snapshot: &StatsSnapshot, stick_error_pct: f64) {
        if snapshot.is_partial() {
            print!(
                "\rcollecting samples... {} (move the controller)          ",
                snapshot.sample_count
            );
        } else {
            print!(
                "\r{:7.1} Hz avg | {:7.1} Hz med | {:6.3} ms | stability {:5.1}% | stick err {:4.1}% | {} samples   ",
                snapshot.mean_hz.unwrap_or(0.0),
                snapshot.median_hz.unwrap_or(0.0),
                snapshot.mean_ms.unwrap_or(0.0),
                snapshot.stability_pct.unwrap_or(0.0),
                stick_error_pct,
                snapshot.sample_count,
            );
        }
        let _ = stdout().flush();
    }

    let config = Config::load().unwrap_or_default();
    let device_id: u32 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()
        .context("device index must be an integer (0-3)")?
        .unwrap_or(0);

    let mut probe = XInputSource::new();
    println!("Detected devices:");
    for idx in 0..MAX_DEVICES {
        println!("  {}", device_label(&mut probe, idx));
    }
    let label = device_label(&mut probe, device_id);

    let mut left_stick = CircularityAnalyzer::new(
        config.circularity.sectors,
        config.circularity.radius_window,
    );
    let mut right_stick = CircularityAnalyzer::new(
        config.circularity.sectors,
        config.circularity.radius_window,
    );

    let (event_tx, event_rx) = mpsc::channel();
    let mut session = MeasurementSession::start(
        XInputSource::new(),
        device_id,
        config.polling.mode,
        &config.polling,
        event_tx,
    );
    println!("Measuring {label} - keep the controller moving. Press q or Esc to stop.");

    enable_raw_mode()?;
    let mut stop_requested = false;
    let mut device_error: Option<String> = None;
    loop {
        while let Ok(session_event) = event_rx.try_recv() {
            match session_event {
                SessionEvent::Stats(snapshot) | SessionEvent::Completed(snapshot) => {
                    print_live(&snapshot, left_stick.avg_error_pct());
                }
                SessionEvent::DeviceError(message) => device_error = Some(message),
            }
        }

        if stop_requested || session.is_finished() {
            break;
        }

        // Stick travel is sampled on this thread at the UI cadence; the
        // worker only measures report timing.
        if let Ok(state) = probe.poll(device_id) {
            let (x, y) = state.left_stick();
            left_stick.add_sample(x, y);
            let (x, y) = state.right_stick();
            right_stick.add_sample(x, y);
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    stop_requested = true;
                }
            }
        }
    }
    disable_raw_mode()?;
    println!();

    let final_state = session.stop(DEFAULT_STOP_TIMEOUT);
    match final_state {
        SessionState::Completed => println!("Measurement complete (sample cap reached)."),
        SessionState::ManualStop => println!("Measurement stopped."),
        SessionState::Error => println!(
            "Device error: {}",
            device_error.as_deref().unwrap_or("device unavailable")
        ),
        other => println!("Session ended in state {other:?}"),
    }

    let intervals = session.snapshot_full();
    if intervals.len() >= stats::MIN_SAMPLES {
        let mut sorted_ms: Vec<f64> = intervals.iter().map(|&ns| ns as f64 / 1e6).collect();
        sorted_ms.sort_by(f64::total_cmp);
        println!(
            "p99 interval: {:.3} ms | left stick err: {:.1}% | right stick err: {:.1}%",
            stats::percentile(&sorted_ms, 99.0),
            left_stick.avg_error_pct(),
            right_stick.avg_error_pct(),
        );
    }

    // Terminal state always yields a report, even for a partial or empty run
    let report = PollingReport::new(label, intervals);
    if config.report.auto_save {
        let output_dir = match config.report.output_dir.clone() {
            Some(dir) => dir,
            None => std::env::current_dir().context("cannot resolve current directory")?,
        };
        let path = report.save_to_dir(&output_dir)?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

#[cfg(not(windows))]
fn run() -> Result<()> {
    anyhow::bail!("the XInput sample source is only available on Windows")
}
