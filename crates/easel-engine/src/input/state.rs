use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{InputEvent, Key, MouseButton};

/// Processing-style input variables, updated from [`InputEvent`]s.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    /// Pointer position in sketch pixels.
    pub mouse: Vec2,

    /// Pointer position at the end of the previous frame.
    pub pmouse: Vec2,

    /// Any mouse button held.
    pub mouse_pressed: bool,

    /// Most recently pressed mouse button.
    pub mouse_button: Option<MouseButton>,

    /// Any key held.
    pub key_pressed: bool,

    /// Most recently pressed key.
    pub key: Option<Key>,

    pub focused: bool,

    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_event(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::MouseMoved { x, y } => {
                self.mouse = Vec2::new(x, y);
            }
            InputEvent::MousePressed { button, x, y } => {
                self.mouse = Vec2::new(x, y);
                self.buttons_down.insert(button);
                self.mouse_button = Some(button);
                self.mouse_pressed = true;
            }
            InputEvent::MouseReleased { button, x, y } => {
                self.mouse = Vec2::new(x, y);
                self.buttons_down.remove(&button);
                self.mouse_pressed = !self.buttons_down.is_empty();
            }
            InputEvent::KeyPressed { key, .. } => {
                self.keys_down.insert(key);
                self.key = Some(key);
                self.key_pressed = true;
            }
            InputEvent::KeyReleased { key } => {
                self.keys_down.remove(&key);
                self.key_pressed = !self.keys_down.is_empty();
            }
            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Releases are not delivered while unfocused.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                    self.key_pressed = false;
                    self.mouse_pressed = false;
                }
            }
            InputEvent::MouseWheel { .. } | InputEvent::MouseLeft => {}
        }
    }

    /// Rolls `pmouse` forward; called once per drawn frame.
    pub fn end_frame(&mut self) {
        self.pmouse = self.mouse;
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton) -> InputEvent {
        InputEvent::MousePressed { button, x: 1.0, y: 2.0 }
    }

    fn release(button: MouseButton) -> InputEvent {
        InputEvent::MouseReleased { button, x: 1.0, y: 2.0 }
    }

    // ── mouse ─────────────────────────────────────────────────────────────

    #[test]
    fn pmouse_lags_one_frame() {
        let mut s = InputState::new();
        s.apply_event(&InputEvent::MouseMoved { x: 10.0, y: 20.0 });
        assert_eq!(s.pmouse, Vec2::zero());
        s.end_frame();
        s.apply_event(&InputEvent::MouseMoved { x: 30.0, y: 40.0 });
        assert_eq!(s.pmouse, Vec2::new(10.0, 20.0));
        assert_eq!(s.mouse, Vec2::new(30.0, 40.0));
    }

    #[test]
    fn mouse_pressed_tracks_all_buttons() {
        let mut s = InputState::new();
        s.apply_event(&press(MouseButton::Left));
        s.apply_event(&press(MouseButton::Right));
        s.apply_event(&release(MouseButton::Left));
        assert!(s.mouse_pressed);
        assert_eq!(s.mouse_button, Some(MouseButton::Right));

        s.apply_event(&release(MouseButton::Right));
        assert!(!s.mouse_pressed);
        // The last button stays readable after release.
        assert_eq!(s.mouse_button, Some(MouseButton::Right));
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn key_pressed_and_last_key() {
        let mut s = InputState::new();
        s.apply_event(&InputEvent::KeyPressed { key: Key::Char('a'), repeat: false });
        s.apply_event(&InputEvent::KeyPressed { key: Key::Shift, repeat: false });
        assert_eq!(s.key, Some(Key::Shift));
        assert!(s.is_key_down(Key::Char('a')));

        s.apply_event(&InputEvent::KeyReleased { key: Key::Char('a') });
        assert!(s.key_pressed);
        s.apply_event(&InputEvent::KeyReleased { key: Key::Shift });
        assert!(!s.key_pressed);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::new();
        s.apply_event(&press(MouseButton::Left));
        s.apply_event(&InputEvent::KeyPressed { key: Key::Up, repeat: false });
        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.mouse_pressed && !s.key_pressed);
        assert!(!s.is_key_down(Key::Up));
    }

    #[test]
    fn coded_keys() {
        assert!(Key::Up.is_coded());
        assert!(!Key::Char('x').is_coded());
        assert_eq!(Key::Function(5).to_string(), "F5");
    }
}
