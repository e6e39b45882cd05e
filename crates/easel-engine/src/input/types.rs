use std::fmt;

/// Keyboard key, resolved through the active layout.
///
/// Printable keys arrive as [`Key::Char`]; everything else is named.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Char(char),

    Up,
    Down,
    Left,
    Right,

    Escape,
    Enter,
    Tab,
    Backspace,
    Delete,

    Shift,
    Control,
    Alt,
    Meta,

    /// `F1`..`F24`.
    Function(u8),

    /// Key without a representation here.
    Unknown,
}

impl Key {
    /// Keys that produce no character (arrows, modifiers, function keys).
    pub fn is_coded(self) -> bool {
        !matches!(self, Key::Char(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Function(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Platform-agnostic input events.
///
/// Positions are in sketch pixels (canvas coordinates), already mapped from
/// the window by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseMoved { x: f32, y: f32 },
    MousePressed { button: MouseButton, x: f32, y: f32 },
    MouseReleased { button: MouseButton, x: f32, y: f32 },
    /// Wheel movement in lines; positive `dy` scrolls towards the user.
    MouseWheel { dx: f32, dy: f32 },
    /// Pointer left the window.
    MouseLeft,
    KeyPressed { key: Key, repeat: bool },
    KeyReleased { key: Key },
    Focused(bool),
}
