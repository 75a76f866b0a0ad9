//! XInput-backed sample source (Windows only)

use super::{DeviceCaps, DeviceError, DeviceSubtype, RawDeviceState, SampleSource};
use windows::Win32::Foundation::{ERROR_DEVICE_NOT_CONNECTED, ERROR_SUCCESS};
use windows::Win32::UI::Input::XboxController::{
    XInputGetCapabilities, XInputGetState, XInputSetState, XINPUT_CAPABILITIES, XINPUT_FLAG_ALL,
    XINPUT_STATE, XINPUT_VIBRATION,
};

/// Sample source backed by the system XInput API.
///
/// Stateless: every call goes straight to the driver, so one instance can
/// be probed for any user index.
#[derive(Debug, Default)]
pub struct XInputSource;

impl XInputSource {
    pub fn new() -> Self {
        Self
    }
}

impl SampleSource for XInputSource {
    fn poll(&mut self, device_id: u32) -> Result<RawDeviceState, DeviceError> {
        let mut state = XINPUT_STATE::default();
        let status = unsafe { XInputGetState(device_id, &mut state) };
        if status == ERROR_SUCCESS.0 {
            let gp = state.Gamepad;
            Ok(RawDeviceState {
                packet: state.dwPacketNumber,
                buttons: gp.wButtons.0,
                left_trigger: gp.bLeftTrigger,
                right_trigger: gp.bRightTrigger,
                thumb_lx: gp.sThumbLX,
                thumb_ly: gp.sThumbLY,
                thumb_rx: gp.sThumbRX,
                thumb_ry: gp.sThumbRY,
            })
        } else if status == ERROR_DEVICE_NOT_CONNECTED.0 {
            Err(DeviceError::NotConnected(device_id))
        } else {
            Err(DeviceError::Api(status))
        }
    }

    fn set_actuator(&mut self, device_id: u32, left: u16, right: u16) -> bool {
        let vibration = XINPUT_VIBRATION {
            wLeftMotorSpeed: left,
            wRightMotorSpeed: right,
        };
        let status = unsafe { XInputSetState(device_id, &vibration) };
        status == ERROR_SUCCESS.0
    }

    fn capabilities(&mut self, device_id: u32) -> Option<DeviceCaps> {
        let mut caps = XINPUT_CAPABILITIES::default();
        let status = unsafe { XInputGetCapabilities(device_id, XINPUT_FLAG_ALL, &mut caps) };
        if status == ERROR_SUCCESS.0 {
            Some(DeviceCaps {
                subtype: DeviceSubtype::from_raw(caps.SubType),
            })
        } else {
            None
        }
    }
}
