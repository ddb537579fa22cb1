//! Color types shared by the view and the renderer.

mod color;

pub use color::Color;
