//! Trigon engine crate.
//!
//! A device, a view that hands out drawables, a renderer that draws a static
//! triangle into them, and the window runtime that calls a view delegate once
//! per display refresh.

pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod view;
pub mod window;

pub use crate::core::{TriangleDelegate, ViewDelegate};
pub use device::{Device, DeviceInit};
pub use render::Renderer;
pub use view::View;
pub use window::{Runtime, RuntimeConfig};
