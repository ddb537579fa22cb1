//! GPU rendering.
//!
//! The renderer owns its GPU resources (library, pipeline, buffers, argument
//! table) and records one pass per frame into a [`RenderTarget`].
//!
//! Convention:
//! - positions are clip-space `vec4<f32>` (+Y up)
//! - colors are linear premultiplied `vec4<f32>`

mod ctx;
pub mod geometry;
mod lifecycle;
mod renderer;

pub use ctx::RenderTarget;
pub use renderer::Renderer;
