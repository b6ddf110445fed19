//! Core protocol types: Button, Stick, Command.

/// A button on the emulated controller.
///
/// The set is closed: it matches the buttons the adapter firmware knows how
/// to drive. Wire names are lowercase (`a`, `zl`, `dpad_up`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    A,
    B,
    X,
    Y,
    L,
    R,
    ZL,
    ZR,
    Plus,
    Minus,
    Home,
    Capture,
    /// Left stick click (L3).
    LStick,
    /// Right stick click (R3).
    RStick,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl Button {
    /// Every button, in wire-table order.
    pub const ALL: [Button; 18] = [
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::L,
        Button::R,
        Button::ZL,
        Button::ZR,
        Button::Plus,
        Button::Minus,
        Button::Home,
        Button::Capture,
        Button::LStick,
        Button::RStick,
        Button::DpadUp,
        Button::DpadDown,
        Button::DpadLeft,
        Button::DpadRight,
    ];

    /// Wire name of the button.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Button::A => "a",
            Button::B => "b",
            Button::X => "x",
            Button::Y => "y",
            Button::L => "l",
            Button::R => "r",
            Button::ZL => "zl",
            Button::ZR => "zr",
            Button::Plus => "plus",
            Button::Minus => "minus",
            Button::Home => "home",
            Button::Capture => "capture",
            Button::LStick => "l_stick",
            Button::RStick => "r_stick",
            Button::DpadUp => "dpad_up",
            Button::DpadDown => "dpad_down",
            Button::DpadLeft => "dpad_left",
            Button::DpadRight => "dpad_right",
        }
    }

    /// Look up a button by wire name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &[u8]) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.name().as_bytes().eq_ignore_ascii_case(name))
    }
}

impl core::fmt::Display for Button {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// An analog stick on the emulated controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    pub const ALL: [Stick; 2] = [Stick::Left, Stick::Right];

    /// Wire name of the stick.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Stick::Left => "l_stick",
            Stick::Right => "r_stick",
        }
    }

    /// Look up a stick by wire name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &[u8]) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().as_bytes().eq_ignore_ascii_case(name))
    }
}

impl core::fmt::Display for Stick {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single adapter command (one protocol line).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Command {
    /// Hold a button down until released.
    Press(Button),
    /// Release a held button.
    Release(Button),
    /// Set a stick position. Axes are nominally in [-1.0, 1.0].
    Stick { stick: Stick, x: f32, y: f32 },
    /// Adapter-side sleep, in milliseconds.
    Sleep { millis: u32 },
    /// Return both sticks to neutral.
    CenterSticks,
    /// Release every button.
    ReleaseAll,
}

impl Command {
    /// Upper-case command word as it appears on the wire.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Command::Press(_) => "PRESS",
            Command::Release(_) => "RELEASE",
            Command::Stick { .. } => "STICK",
            Command::Sleep { .. } => "SLEEP",
            Command::CenterSticks => "CENTER_STICKS",
            Command::ReleaseAll => "RELEASE_ALL",
        }
    }
}
