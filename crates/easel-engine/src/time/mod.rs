//! Frame timing: one [`FrameClock`] per sketch loop, ticked once per drawn
//! frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
