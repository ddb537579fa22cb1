/// One acquired frame target.
///
/// Short-lived: hand it back to [`View::present`](super::View::present) once the
/// frame's commands are submitted. Holding a surface drawable blocks acquisition
/// of the next one.
pub struct Drawable {
    surface_texture: Option<wgpu::SurfaceTexture>,
    view: wgpu::TextureView,
}

impl Drawable {
    pub(super) fn from_surface(surface_texture: wgpu::SurfaceTexture) -> Self {
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            surface_texture: Some(surface_texture),
            view,
        }
    }

    pub(super) fn from_texture(texture: &wgpu::Texture) -> Self {
        Self {
            surface_texture: None,
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
        }
    }

    /// Color attachment to render into.
    pub fn texture_view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn is_offscreen(&self) -> bool {
        self.surface_texture.is_none()
    }

    /// Presents the frame. Returns `true` when the surface reported itself suboptimal.
    pub(super) fn present(self) -> bool {
        let Self { surface_texture, view } = self;
        drop(view);

        match surface_texture {
            Some(st) => {
                let suboptimal = st.suboptimal;
                st.present();
                suboptimal
            }
            None => false,
        }
    }
}
