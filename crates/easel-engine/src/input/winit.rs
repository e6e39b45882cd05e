use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key as WinitKey, NamedKey};

use super::{InputEvent, InputState, Key, MouseButton};

/// Pixels per text line used to convert pixel wheel deltas into lines.
const WHEEL_LINE_PX: f64 = 20.0;

/// Maps physical window positions onto the sketch canvas.
///
/// The canvas is stretched over the whole surface, so a resized window keeps
/// reporting positions in sketch pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct CanvasMapping {
    sx: f64,
    sy: f64,
}

impl CanvasMapping {
    pub(crate) fn new(window: PhysicalSize<u32>, canvas: (u32, u32)) -> Self {
        let ratio = |c: u32, w: u32| if w == 0 { 1.0 } else { c as f64 / w as f64 };
        Self {
            sx: ratio(canvas.0, window.width),
            sy: ratio(canvas.1, window.height),
        }
    }

    pub(crate) fn map(&self, pos: PhysicalPosition<f64>) -> (f32, f32) {
        ((pos.x * self.sx) as f32, (pos.y * self.sy) as f32)
    }
}

/// Translates a winit `WindowEvent` into an engine [`InputEvent`].
///
/// Returns `None` for events the input subsystem does not represent.
pub(crate) fn translate_window_event(
    event: &WindowEvent,
    state: &InputState,
    mapping: CanvasMapping,
) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::MouseLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = mapping.map(*position);
            Some(InputEvent::MouseMoved { x, y })
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            // winit 0.30 has no cursor query; use the tracked position.
            let (x, y) = (state.mouse.x, state.mouse.y);
            let button = map_mouse_button(*button);
            Some(match st {
                ElementState::Pressed => InputEvent::MousePressed { button, x, y },
                ElementState::Released => InputEvent::MouseReleased { button, x, y },
            })
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(p) => ((p.x / WHEEL_LINE_PX) as f32, (p.y / WHEEL_LINE_PX) as f32),
            };
            Some(InputEvent::MouseWheel { dx, dy })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let key = map_key(&event.logical_key);
            Some(match event.state {
                ElementState::Pressed => InputEvent::KeyPressed { key, repeat: event.repeat },
                ElementState::Released => InputEvent::KeyReleased { key },
            })
        }

        _ => None,
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => Key::Unknown,
            }
        }
        WinitKey::Named(named) => map_named(*named),
        _ => Key::Unknown,
    }
}

fn map_named(named: NamedKey) -> Key {
    match named {
        NamedKey::Space => Key::Char(' '),

        NamedKey::ArrowUp => Key::Up,
        NamedKey::ArrowDown => Key::Down,
        NamedKey::ArrowLeft => Key::Left,
        NamedKey::ArrowRight => Key::Right,

        NamedKey::Escape => Key::Escape,
        NamedKey::Enter => Key::Enter,
        NamedKey::Tab => Key::Tab,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Delete => Key::Delete,

        NamedKey::Shift => Key::Shift,
        NamedKey::Control => Key::Control,
        NamedKey::Alt => Key::Alt,
        NamedKey::Super | NamedKey::Meta => Key::Meta,

        NamedKey::F1 => Key::Function(1),
        NamedKey::F2 => Key::Function(2),
        NamedKey::F3 => Key::Function(3),
        NamedKey::F4 => Key::Function(4),
        NamedKey::F5 => Key::Function(5),
        NamedKey::F6 => Key::Function(6),
        NamedKey::F7 => Key::Function(7),
        NamedKey::F8 => Key::Function(8),
        NamedKey::F9 => Key::Function(9),
        NamedKey::F10 => Key::Function(10),
        NamedKey::F11 => Key::Function(11),
        NamedKey::F12 => Key::Function(12),
        NamedKey::F13 => Key::Function(13),
        NamedKey::F14 => Key::Function(14),
        NamedKey::F15 => Key::Function(15),
        NamedKey::F16 => Key::Function(16),
        NamedKey::F17 => Key::Function(17),
        NamedKey::F18 => Key::Function(18),
        NamedKey::F19 => Key::Function(19),
        NamedKey::F20 => Key::Function(20),
        NamedKey::F21 => Key::Function(21),
        NamedKey::F22 => Key::Function(22),
        NamedKey::F23 => Key::Function(23),
        NamedKey::F24 => Key::Function(24),

        _ => Key::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_scales_to_canvas() {
        let m = CanvasMapping::new(PhysicalSize::new(800, 600), (400, 300));
        assert_eq!(m.map(PhysicalPosition::new(200.0, 100.0)), (100.0, 50.0));
    }

    #[test]
    fn mapping_survives_zero_window() {
        let m = CanvasMapping::new(PhysicalSize::new(0, 0), (400, 300));
        assert_eq!(m.map(PhysicalPosition::new(3.0, 4.0)), (3.0, 4.0));
    }

    #[test]
    fn character_keys() {
        assert_eq!(map_key(&WinitKey::Character("a".into())), Key::Char('a'));
        assert_eq!(map_key(&WinitKey::Character("ab".into())), Key::Unknown);
        assert_eq!(map_key(&WinitKey::Named(NamedKey::Space)), Key::Char(' '));
    }

    #[test]
    fn named_keys() {
        assert_eq!(map_named(NamedKey::ArrowLeft), Key::Left);
        assert_eq!(map_named(NamedKey::F12), Key::Function(12));
        assert_eq!(map_named(NamedKey::CapsLock), Key::Unknown);
    }

    #[test]
    fn back_forward_buttons_become_other() {
        assert_eq!(map_mouse_button(WinitMouseButton::Back), MouseButton::Other(3));
    }
}
