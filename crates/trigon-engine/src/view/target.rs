use winit::dpi::PhysicalSize;

use crate::device::Device;

use super::Drawable;

/// Backing store of a view.
pub(super) enum Target<'w> {
    Surface {
        // Declared before `_instance` so the surface is released first..
        surface: wgpu::Surface<'w>,
        config: wgpu::SurfaceConfiguration,
        _instance: wgpu::Instance,
    },
    Offscreen {
        texture: wgpu::Texture,
    },
}

impl<'w> Target<'w> {
    pub(super) fn offscreen(device: &Device, size: PhysicalSize<u32>) -> Self {
        Target::Offscreen {
            texture: create_offscreen_texture(device, size),
        }
    }

    /// Acquires the next drawable.
    pub(super) fn acquire(&self) -> Result<Drawable, wgpu::SurfaceError> {
        match self {
            Target::Surface { surface, .. } => {
                surface.get_current_texture().map(Drawable::from_surface)
            }
            Target::Offscreen { texture } => Ok(Drawable::from_texture(texture)),
        }
    }

    /// Applies the current configuration again (after `Lost`/`Outdated`/suboptimal).
    pub(super) fn reconfigure(&self, device: &Device) {
        if let Target::Surface { surface, config, .. } = self {
            surface.configure(device.raw(), config);
        }
    }

    /// Resizes the backing store. `size` must be non-zero.
    pub(super) fn resize(&mut self, device: &Device, size: PhysicalSize<u32>) {
        debug_assert!(size.width > 0 && size.height > 0);
        match self {
            Target::Surface { surface, config, .. } => {
                config.width = size.width;
                config.height = size.height;
                surface.configure(device.raw(), config);
            }
            Target::Offscreen { texture } => {
                *texture = create_offscreen_texture(device, size);
            }
        }
    }

    pub(super) fn texture(&self) -> Option<&wgpu::Texture> {
        match self {
            Target::Surface { .. } => None,
            Target::Offscreen { texture } => Some(texture),
        }
    }
}

fn create_offscreen_texture(device: &Device, size: PhysicalSize<u32>) -> wgpu::Texture {
    device.raw().create_texture(&wgpu::TextureDescriptor {
        label: Some("trigon offscreen drawable"),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: device.color_format(),
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}
