//! Gamepad state types and device access

mod source;
mod state;

#[cfg(windows)]
pub mod xinput;

pub use source::{device_label, DeviceCaps, DeviceError, DeviceSubtype, SampleSource, MAX_DEVICES};
pub use state::{buttons, RawDeviceState};
