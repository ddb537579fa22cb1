use crate::paint::Color;

/// Target for one frame's pass (encoder + color view + clear value).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub clear: Color,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        clear: Color,
    ) -> Self {
        Self {
            encoder,
            color_view,
            clear,
        }
    }
}
