//! Device query abstraction
//!
//! [`SampleSource`] is the single seam between the measurement engine and
//! the platform device API. The engine only ever issues a blocking `poll`
//! per tick; retry and backoff decisions belong to the session, not here.

use super::RawDeviceState;
use thiserror::Error;

/// Highest user index the XInput API addresses (pads 0-3).
pub const MAX_DEVICES: u32 = 4;

/// Failure to reach a device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The device at this index is not connected (or was unplugged).
    #[error("device #{0} is not connected")]
    NotConnected(u32),
    /// The underlying API returned an unexpected status code.
    #[error("device query failed with status {0}")]
    Api(u32),
}

/// Device subtype reported by the capabilities query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSubtype {
    Gamepad,
    Wheel,
    ArcadeStick,
    Unknown(u8),
}

impl DeviceSubtype {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x01 => Self::Gamepad,
            0x02 => Self::Wheel,
            0x03 => Self::ArcadeStick,
            other => Self::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gamepad => "Gamepad",
            Self::Wheel => "Wheel",
            Self::ArcadeStick => "Arcade Stick",
            Self::Unknown(_) => "Device",
        }
    }
}

/// Optional device metadata. Informational only; the measurement
/// algorithms never depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCaps {
    pub subtype: DeviceSubtype,
}

/// A blocking query interface over one family of input devices.
///
/// `poll` must be callable at sub-millisecond cadence without allocating.
pub trait SampleSource {
    /// Query the current raw state of the device at `device_id`.
    fn poll(&mut self, device_id: u32) -> Result<RawDeviceState, DeviceError>;

    /// Drive the vibration motors. Returns false when the device or the
    /// underlying API does not support actuation.
    fn set_actuator(&mut self, device_id: u32, left: u16, right: u16) -> bool;

    /// Query device metadata, when available.
    fn capabilities(&mut self, device_id: u32) -> Option<DeviceCaps>;
}

/// Build a human-readable label for a device slot, e.g. `#1 [Gamepad]`
/// or `#3 (disconnected)`.
pub fn device_label<S: SampleSource>(source: &mut S, device_id: u32) -> String {
    match source.poll(device_id) {
        Ok(_) => {
            let subtype = source
                .capabilities(device_id)
                .map(|caps| caps.subtype.name())
                .unwrap_or("Device");
            format!("#{} [{}]", device_id + 1, subtype)
        }
        Err(_) => format!("#{} (disconnected)", device_id + 1),
    }
}
