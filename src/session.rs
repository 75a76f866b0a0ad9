//! Measurement session orchestration
//!
//! One dedicated worker thread per session runs the tight
//! poll -> detect -> record loop, sleeping a small fixed quantum between
//! iterations, and pushes statistics snapshots and terminal events over an
//! mpsc channel. Cancellation is cooperative: a single atomic flag checked
//! every iteration, paired with a bounded join on `stop`.

use crate::config::PollingConfig;
use crate::detect::{ChangeDetector, DetectionMode};
use crate::gamepad::SampleSource;
use crate::recorder::IntervalRecorder;
use crate::stats::{self, StatsSnapshot};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// The rolling window must hold at least this many samples for the live
/// statistics to be worth anything.
const MIN_WINDOW_CAPACITY: usize = 20;

/// Default bound on the cooperative-stop join.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_millis(1500);

/// Lifecycle of a measurement session. The three rightmost states are
/// terminal; a finished session cannot be restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created but not yet polling (transient; `start` moves straight on).
    Idle,
    Running,
    /// The append log reached its sample cap.
    Completed,
    /// The caller requested a stop before the cap was reached.
    ManualStop,
    /// The device became unavailable.
    Error,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::ManualStop | Self::Error)
    }
}

/// Events pushed from the worker to the session's consumer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Periodic rolling-window statistics, emitted in time order.
    Stats(StatsSnapshot),
    /// Final rolling-window statistics; the sample cap was reached.
    Completed(StatsSnapshot),
    /// The device could not be reached; the session is in `Error`.
    DeviceError(String),
}

struct Shared {
    state: Mutex<SessionState>,
    stop: AtomicBool,
}

impl Shared {
    fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Transition Running -> `next`. Terminal states are final, so repeated
    /// or racing transitions are no-ops.
    fn finish(&self, next: SessionState) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == SessionState::Running {
            *state = next;
            true
        } else {
            false
        }
    }
}

/// A single measurement run against one device.
///
/// Owns the interval recorder and the background worker. Dropping the
/// session stops the worker with the default timeout.
pub struct MeasurementSession {
    shared: Arc<Shared>,
    recorder: Arc<IntervalRecorder>,
    worker: Option<JoinHandle<()>>,
    device_id: u32,
    mode: DetectionMode,
}

impl MeasurementSession {
    /// Spawn the sampling worker and transition to Running.
    ///
    /// The first poll happens on the worker: if the device is unavailable
    /// right away the session moves to `Error` with zero samples and a
    /// [`SessionEvent::DeviceError`] is emitted.
    pub fn start<S>(
        source: S,
        device_id: u32,
        mode: DetectionMode,
        config: &PollingConfig,
        events: Sender<SessionEvent>,
    ) -> Self
    where
        S: SampleSource + Send + 'static,
    {
        let recorder = Arc::new(IntervalRecorder::new(
            config.window_capacity.max(MIN_WINDOW_CAPACITY),
            config.sample_cap,
        ));
        let shared = Arc::new(Shared {
            state: Mutex::new(SessionState::Running),
            stop: AtomicBool::new(false),
        });

        info!(
            "starting measurement on device {} ({:?} mode, window {}, cap {})",
            device_id,
            mode,
            recorder.window_capacity(),
            recorder.sample_cap()
        );

        let worker = {
            let shared = Arc::clone(&shared);
            let recorder = Arc::clone(&recorder);
            let poll_sleep = config.poll_sleep();
            let report_interval = config.report_interval();
            thread::spawn(move || {
                run_worker(
                    source,
                    device_id,
                    mode,
                    shared,
                    recorder,
                    events,
                    poll_sleep,
                    report_interval,
                )
            })
        };

        Self {
            shared,
            recorder,
            worker: Some(worker),
            device_id,
            mode,
        }
    }

    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    pub fn device_id(&self) -> u32 {
        self.device_id
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// Copy of the current rolling window.
    pub fn snapshot_window(&self) -> Vec<u64> {
        self.recorder.snapshot_window()
    }

    /// Copy of the full append log. After a terminal state this reflects
    /// every transition the session recorded.
    pub fn snapshot_full(&self) -> Vec<u64> {
        self.recorder.snapshot_full()
    }

    /// Request a cooperative stop and wait up to `timeout` for the worker
    /// to exit. Safe to call repeatedly and after completion.
    ///
    /// Best effort: if the worker misses the deadline it is abandoned with
    /// a warning. Its recorder handle is reference-counted, so any final
    /// writes land in a buffer nobody will read, not in freed memory.
    pub fn stop(&mut self, timeout: Duration) -> SessionState {
        self.shared.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let deadline = Instant::now() + timeout;
            while !worker.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(2));
            }
            if worker.is_finished() {
                if worker.join().is_err() {
                    warn!("worker for device {} panicked", self.device_id);
                }
            } else {
                warn!(
                    "worker for device {} did not stop within {:?}; abandoning thread",
                    self.device_id, timeout
                );
            }
        }
        self.state()
    }
}

impl Drop for MeasurementSession {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.stop(DEFAULT_STOP_TIMEOUT);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_worker<S: SampleSource>(
    mut source: S,
    device_id: u32,
    mode: DetectionMode,
    shared: Arc<Shared>,
    recorder: Arc<IntervalRecorder>,
    events: Sender<SessionEvent>,
    poll_sleep: Duration,
    report_interval: Duration,
) {
    let epoch = Instant::now();

    let initial = match source.poll(device_id) {
        Ok(state) => state,
        Err(err) => {
            warn!("device {device_id} unavailable at session start: {err}");
            shared.finish(SessionState::Error);
            let _ = events.send(SessionEvent::DeviceError(err.to_string()));
            source.set_actuator(device_id, 0, 0);
            return;
        }
    };

    let mut detector = ChangeDetector::new(mode, initial, 0);
    let mut last_report = epoch;

    loop {
        if shared.stop.load(Ordering::Relaxed) {
            if shared.finish(SessionState::ManualStop) {
                debug!(
                    "device {device_id} measurement stopped manually after {} samples",
                    recorder.len()
                );
            }
            break;
        }

        let current = match source.poll(device_id) {
            Ok(state) => state,
            Err(err) => {
                warn!("device {device_id} lost mid-session: {err}");
                shared.finish(SessionState::Error);
                let _ = events.send(SessionEvent::DeviceError(err.to_string()));
                break;
            }
        };

        let now = Instant::now();
        let now_ns = now.duration_since(epoch).as_nanos() as u64;

        if let Some(interval_ns) = detector.update(&current, now_ns) {
            if recorder.record(interval_ns) {
                let snapshot = stats::compute(&recorder.snapshot_window());
                shared.finish(SessionState::Completed);
                info!(
                    "device {device_id} measurement complete: {} samples",
                    recorder.len()
                );
                let _ = events.send(SessionEvent::Completed(snapshot));
                break;
            }
        }

        if now.duration_since(last_report) >= report_interval {
            last_report = now;
            let snapshot = stats::compute(&recorder.snapshot_window());
            let _ = events.send(SessionEvent::Stats(snapshot));
        }

        thread::sleep(poll_sleep);
    }

    // Session cleanup: whatever happened, leave the motors off.
    source.set_actuator(device_id, 0, 0);
}
