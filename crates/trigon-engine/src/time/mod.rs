//! Frame timing.
//!
//! One `FrameClock` lives in each view and is ticked whenever a drawable is acquired.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
