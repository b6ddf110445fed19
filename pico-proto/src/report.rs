//! Model of the adapter's controller report.
//!
//! The adapter keeps a Switch Pro Controller input report and edits it as
//! commands arrive. [`SwitchReport`] reproduces that bookkeeping so the effect
//! of a command stream can be checked on the host without hardware.
//!
//! # Layout
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 0     | Battery / connection info |
//! | 1-3   | Buttons (right, shared, left + d-pad hat) |
//! | 4-6   | Left stick, two packed 12-bit axes |
//! | 7-9   | Right stick, two packed 12-bit axes |

use crate::types::{Button, Command, Stick};

/// Lowest raw stick value.
pub const STICK_MIN: u16 = 0x000;
/// Raw value of a centered axis.
pub const STICK_CENTER: u16 = 0x7FF;
/// Highest raw stick value.
pub const STICK_MAX: u16 = 0xFFF;

/// Battery full, charging grip connected.
pub const BATTERY_CONNECTION: u8 = 0x91;

/// Size of [`SwitchReport::to_bytes`] output.
pub const REPORT_SIZE: usize = 10;

const HAT_MASK: u8 = 0x0F;
const HAT_UP: u8 = 0x2;
const HAT_DOWN: u8 = 0x1;
const HAT_LEFT: u8 = 0x8;
const HAT_RIGHT: u8 = 0x4;
const HAT_NOTHING: u8 = 0x0;

/// Where a button lives in the three button bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ButtonSlot {
    /// A plain bit: (byte index, mask).
    Bit(usize, u8),
    /// A direction of the 4-bit hat in the low nibble of byte 2.
    Hat(u8),
}

const fn slot(button: Button) -> ButtonSlot {
    match button {
        Button::Y => ButtonSlot::Bit(0, 1 << 0),
        Button::X => ButtonSlot::Bit(0, 1 << 1),
        Button::B => ButtonSlot::Bit(0, 1 << 2),
        Button::A => ButtonSlot::Bit(0, 1 << 3),
        Button::R => ButtonSlot::Bit(0, 1 << 6),
        Button::ZR => ButtonSlot::Bit(0, 1 << 7),
        Button::Minus => ButtonSlot::Bit(1, 1 << 0),
        Button::Plus => ButtonSlot::Bit(1, 1 << 1),
        Button::RStick => ButtonSlot::Bit(1, 1 << 2),
        Button::LStick => ButtonSlot::Bit(1, 1 << 3),
        Button::Home => ButtonSlot::Bit(1, 1 << 4),
        Button::Capture => ButtonSlot::Bit(1, 1 << 5),
        Button::L => ButtonSlot::Bit(2, 1 << 6),
        Button::ZL => ButtonSlot::Bit(2, 1 << 7),
        Button::DpadUp => ButtonSlot::Hat(HAT_UP),
        Button::DpadDown => ButtonSlot::Hat(HAT_DOWN),
        Button::DpadLeft => ButtonSlot::Hat(HAT_LEFT),
        Button::DpadRight => ButtonSlot::Hat(HAT_RIGHT),
    }
}

/// Convert an axis in [-1.0, 1.0] to a raw 12-bit value.
///
/// Out-of-range input saturates to [`STICK_MIN`]..=[`STICK_MAX`]; NaN maps to
/// [`STICK_MIN`].
#[inline]
#[must_use]
pub fn encode_axis(value: f32) -> u16 {
    // Float-to-int casts saturate and send NaN to zero
    let raw = ((value + 1.0) * STICK_CENTER as f32) as u16;
    raw.min(STICK_MAX)
}

/// Pack two 12-bit axes into the 3-byte wire form.
#[inline]
#[must_use]
pub const fn pack_stick(h: u16, v: u16) -> [u8; 3] {
    [
        (h & 0xFF) as u8,
        (((h >> 8) & 0x0F) as u8) | (((v & 0x0F) as u8) << 4),
        ((v >> 4) & 0xFF) as u8,
    ]
}

/// Unpack the 3-byte wire form into two 12-bit axes.
#[inline]
#[must_use]
pub const fn unpack_stick(bytes: [u8; 3]) -> (u16, u16) {
    let h = bytes[0] as u16 | ((bytes[1] as u16 & 0x0F) << 8);
    let v = (bytes[1] as u16 >> 4) | ((bytes[2] as u16) << 4);
    (h, v)
}

/// The adapter's input report state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchReport {
    pub battery_connection: u8,
    pub buttons: [u8; 3],
    pub left: [u8; 3],
    pub right: [u8; 3],
}

impl Default for SwitchReport {
    fn default() -> Self {
        Self::neutral()
    }
}

impl SwitchReport {
    /// No buttons held, both sticks centered.
    #[must_use]
    pub const fn neutral() -> Self {
        let center = pack_stick(STICK_CENTER, STICK_CENTER);
        Self {
            battery_connection: BATTERY_CONNECTION,
            buttons: [0; 3],
            left: center,
            right: center,
        }
    }

    /// Hold a button. A d-pad direction replaces any other held direction.
    pub fn press(&mut self, button: Button) {
        match slot(button) {
            ButtonSlot::Bit(byte, mask) => self.buttons[byte] |= mask,
            ButtonSlot::Hat(dir) => self.buttons[2] = (self.buttons[2] & !HAT_MASK) | dir,
        }
    }

    /// Release a button. Releasing any d-pad direction clears the hat.
    pub fn release(&mut self, button: Button) {
        match slot(button) {
            ButtonSlot::Bit(byte, mask) => self.buttons[byte] &= !mask,
            ButtonSlot::Hat(_) => self.buttons[2] = (self.buttons[2] & !HAT_MASK) | HAT_NOTHING,
        }
    }

    /// Release every button.
    pub fn release_all(&mut self) {
        self.buttons = [0; 3];
    }

    /// Whether a button is currently held.
    #[must_use]
    pub fn is_pressed(&self, button: Button) -> bool {
        match slot(button) {
            ButtonSlot::Bit(byte, mask) => self.buttons[byte] & mask != 0,
            ButtonSlot::Hat(dir) => self.buttons[2] & HAT_MASK == dir,
        }
    }

    /// Whether any button is currently held.
    #[must_use]
    pub fn any_pressed(&self) -> bool {
        self.buttons != [0; 3]
    }

    /// Set a stick from axes in [-1.0, 1.0].
    pub fn set_stick(&mut self, stick: Stick, h: f32, v: f32) {
        let packed = pack_stick(encode_axis(h), encode_axis(v));
        match stick {
            Stick::Left => self.left = packed,
            Stick::Right => self.right = packed,
        }
    }

    /// Raw 12-bit (horizontal, vertical) values of a stick.
    #[must_use]
    pub const fn stick_raw(&self, stick: Stick) -> (u16, u16) {
        match stick {
            Stick::Left => unpack_stick(self.left),
            Stick::Right => unpack_stick(self.right),
        }
    }

    /// Whether both sticks sit at the neutral position.
    #[must_use]
    pub fn sticks_centered(&self) -> bool {
        let center = pack_stick(STICK_CENTER, STICK_CENTER);
        self.left == center && self.right == center
    }

    /// Return both sticks to neutral.
    pub fn center_sticks(&mut self) {
        self.set_stick(Stick::Left, 0.0, 0.0);
        self.set_stick(Stick::Right, 0.0, 0.0);
    }

    /// Apply one command the way the adapter does. `SLEEP` has no effect on
    /// the report.
    pub fn apply(&mut self, command: &Command) {
        match *command {
            Command::Press(button) => self.press(button),
            Command::Release(button) => self.release(button),
            Command::Stick { stick, x, y } => self.set_stick(stick, x, y),
            Command::Sleep { .. } => {}
            Command::CenterSticks => self.center_sticks(),
            Command::ReleaseAll => self.release_all(),
        }
    }

    /// Wire bytes of the report body.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; REPORT_SIZE] {
        let mut out = [0u8; REPORT_SIZE];
        out[0] = self.battery_connection;
        out[1..4].copy_from_slice(&self.buttons);
        out[4..7].copy_from_slice(&self.left);
        out[7..10].copy_from_slice(&self.right);
        out
    }
}
