//! Raw controller state snapshots

/// XInput button bitmask values (`wButtons` layout).
pub mod buttons {
    pub const DPAD_UP: u16 = 0x0001;
    pub const DPAD_DOWN: u16 = 0x0002;
    pub const DPAD_LEFT: u16 = 0x0004;
    pub const DPAD_RIGHT: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    pub const BACK: u16 = 0x0020;
    pub const LEFT_THUMB: u16 = 0x0040;
    pub const RIGHT_THUMB: u16 = 0x0080;
    pub const LEFT_SHOULDER: u16 = 0x0100;
    pub const RIGHT_SHOULDER: u16 = 0x0200;
    pub const A: u16 = 0x1000;
    pub const B: u16 = 0x2000;
    pub const X: u16 = 0x4000;
    pub const Y: u16 = 0x8000;
}

/// A single device report: button bitmask, triggers, stick axes, and the
/// device-assigned packet (sequence) number. Queried fresh each poll tick
/// and never retained beyond change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawDeviceState {
    /// Monotonically increasing report counter assigned by the device
    pub packet: u32,
    /// Pressed buttons as a bitmask (see [`buttons`])
    pub buttons: u16,
    /// Left trigger travel, 0-255
    pub left_trigger: u8,
    /// Right trigger travel, 0-255
    pub right_trigger: u8,
    /// Left stick X axis, signed 16-bit
    pub thumb_lx: i16,
    /// Left stick Y axis, signed 16-bit
    pub thumb_ly: i16,
    /// Right stick X axis, signed 16-bit
    pub thumb_rx: i16,
    /// Right stick Y axis, signed 16-bit
    pub thumb_ry: i16,
}

impl RawDeviceState {
    /// Compare everything except the packet number.
    ///
    /// A report whose packet advanced but whose payload is unchanged is a
    /// heartbeat (or motion-sensor-only) report, not input motion.
    pub fn payload_matches(&self, other: &Self) -> bool {
        self.buttons == other.buttons
            && self.left_trigger == other.left_trigger
            && self.right_trigger == other.right_trigger
            && self.thumb_lx == other.thumb_lx
            && self.thumb_ly == other.thumb_ly
            && self.thumb_rx == other.thumb_rx
            && self.thumb_ry == other.thumb_ry
    }

    /// Check whether a button (or combination) from [`buttons`] is held.
    pub fn button_pressed(&self, mask: u16) -> bool {
        self.buttons & mask != 0
    }

    /// Left stick position normalized to [-1, 1] on both axes.
    pub fn left_stick(&self) -> (f64, f64) {
        (normalize_axis(self.thumb_lx), normalize_axis(self.thumb_ly))
    }

    /// Right stick position normalized to [-1, 1] on both axes.
    pub fn right_stick(&self) -> (f64, f64) {
        (normalize_axis(self.thumb_rx), normalize_axis(self.thumb_ry))
    }

    /// Left trigger travel normalized to [0, 1].
    pub fn left_trigger_norm(&self) -> f64 {
        self.left_trigger as f64 / 255.0
    }

    /// Right trigger travel normalized to [0, 1].
    pub fn right_trigger_norm(&self) -> f64 {
        self.right_trigger as f64 / 255.0
    }
}

/// Map a signed 16-bit axis to [-1, 1]. The raw range is asymmetric
/// (-32768..=32767), so the negative extreme is clamped.
fn normalize_axis(value: i16) -> f64 {
    (value as f64 / 32767.0).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_ignores_packet_number() {
        let a = RawDeviceState {
            packet: 1,
            buttons: buttons::A,
            thumb_lx: 100,
            ..Default::default()
        };
        let b = RawDeviceState { packet: 99, ..a };
        assert!(a.payload_matches(&b));
    }

    #[test]
    fn payload_mismatch_on_any_field() {
        let base = RawDeviceState::default();
        let cases = [
            RawDeviceState { buttons: buttons::B, ..base },
            RawDeviceState { left_trigger: 1, ..base },
            RawDeviceState { right_trigger: 255, ..base },
            RawDeviceState { thumb_lx: -5, ..base },
            RawDeviceState { thumb_ly: 5, ..base },
            RawDeviceState { thumb_rx: 1, ..base },
            RawDeviceState { thumb_ry: -1, ..base },
        ];
        for changed in cases {
            assert!(!base.payload_matches(&changed));
        }
    }

    #[test]
    fn button_pressed_checks_mask() {
        let state = RawDeviceState {
            buttons: buttons::A | buttons::LEFT_SHOULDER,
            ..Default::default()
        };
        assert!(state.button_pressed(buttons::A));
        assert!(state.button_pressed(buttons::LEFT_SHOULDER));
        assert!(!state.button_pressed(buttons::Y));
    }

    #[test]
    fn stick_normalization_range() {
        let state = RawDeviceState {
            thumb_lx: 32767,
            thumb_ly: i16::MIN,
            ..Default::default()
        };
        let (x, y) = state.left_stick();
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y + 1.0).abs() < 1e-9); // clamped at the asymmetric extreme
    }

    #[test]
    fn trigger_normalization() {
        let state = RawDeviceState {
            left_trigger: 0,
            right_trigger: 255,
            ..Default::default()
        };
        assert_eq!(state.left_trigger_norm(), 0.0);
        assert_eq!(state.right_trigger_norm(), 1.0);
    }

    #[test]
    fn centered_stick_is_origin() {
        let state = RawDeviceState::default();
        assert_eq!(state.left_stick(), (0.0, 0.0));
        assert_eq!(state.right_stick(), (0.0, 0.0));
    }
}
