//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types; the
//! runtime translates window events (see `winit` below) into [`InputEvent`]s.

mod state;
mod types;
pub(crate) mod winit;

pub use state::InputState;
pub use types::{InputEvent, Key, MouseButton};
