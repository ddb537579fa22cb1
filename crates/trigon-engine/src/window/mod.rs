//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, wires the window to a
//! [`View`](crate::view::View) and forwards frame callbacks to a
//! [`ViewDelegate`](crate::core::ViewDelegate).

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
