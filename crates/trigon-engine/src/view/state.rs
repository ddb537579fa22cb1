use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::surface::{
    choose_alpha_mode, choose_present_mode, choose_surface_format, classify_surface_error,
};
use crate::device::{Device, DeviceInit, SurfaceErrorAction};
use crate::paint::Color;
use crate::time::{FrameClock, FrameTime};

use super::Drawable;
use super::target::Target;

/// Default clear color: dark grey, opaque.
const DEFAULT_CLEAR: Color = Color::from_premul(0.1, 0.1, 0.1, 1.0);

/// Hands out drawables bound to one device.
///
/// A windowed view owns the surface and reconfigures it on resize and on
/// `Lost`/`Outdated` errors. An offscreen view renders into a private texture.
pub struct View<'w> {
    device: Device,
    target: Target<'w>,
    window: Option<&'w Window>,

    /// Current drawable size in physical pixels. May be zero while minimized.
    size: PhysicalSize<u32>,
    clear_color: Color,

    clock: FrameClock,
    frame_time: Option<FrameTime>,
    frames_presented: u64,

    /// Set once the surface failed unrecoverably; no more drawables are handed out.
    failed: bool,
}

impl<'w> View<'w> {
    /// Creates a view on `window` together with a device that can present to it.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn for_window(window: &'w Window, init: &DeviceInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = crate::device::new_instance();

        // Surface lifetime is tied to `window` via `'w`.
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let mut device = Device::request(&instance, Some(&surface), init).await?;

        let caps = surface.get_capabilities(device.adapter());
        let format = choose_surface_format(&caps, init.prefer_srgb)
            .context("no supported surface formats")?;
        device.set_color_format(format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: choose_present_mode(&caps, init.present_mode),
            alpha_mode: choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(device.raw(), &config);

        log::debug!(
            "surface configured: {}x{} {:?} {:?}",
            size.width,
            size.height,
            config.format,
            config.present_mode
        );

        Ok(Self::with_target(
            device,
            Target::Surface {
                surface,
                config,
                _instance: instance,
            },
            Some(window),
            size,
        ))
    }

    /// Creates a texture-backed view of `size` on `device`.
    pub fn offscreen(device: &Device, size: PhysicalSize<u32>) -> View<'static> {
        View::with_target(
            device.clone(),
            Target::offscreen(device, size),
            None,
            size,
        )
    }

    fn with_target(
        device: Device,
        target: Target<'w>,
        window: Option<&'w Window>,
        size: PhysicalSize<u32>,
    ) -> Self {
        Self {
            device,
            target,
            window,
            size,
            clear_color: DEFAULT_CLEAR,
            clock: FrameClock::new(),
            frame_time: None,
            frames_presented: 0,
            failed: false,
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.device.color_format()
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Timing of the most recently acquired drawable.
    pub fn frame_time(&self) -> Option<FrameTime> {
        self.frame_time
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Whether the surface failed unrecoverably.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Backing texture of an offscreen view.
    pub fn offscreen_texture(&self) -> Option<&wgpu::Texture> {
        self.target.texture()
    }

    /// Resizes the drawable.
    ///
    /// wgpu cannot configure a 0x0 surface; a zero size is recorded and the
    /// reconfiguration deferred until a non-zero size arrives.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.target.resize(&self.device, new_size);
        self.clock.reset();
        log::debug!("view resized to {}x{}", new_size.width, new_size.height);
    }

    /// Acquires the drawable for the next frame.
    ///
    /// Returns `None` when the frame should be skipped: zero-sized view,
    /// transient surface error, reconfigured surface, or a failed view.
    pub fn current_drawable(&mut self) -> Option<Drawable> {
        if self.failed || self.size.width == 0 || self.size.height == 0 {
            return None;
        }

        match self.target.acquire() {
            Ok(drawable) => {
                self.frame_time = Some(self.clock.tick());
                Some(drawable)
            }
            Err(err) => {
                match classify_surface_error(&err) {
                    SurfaceErrorAction::Reconfigured => {
                        log::debug!("surface {err}; reconfiguring");
                        self.target.reconfigure(&self.device);
                    }
                    SurfaceErrorAction::SkipFrame => {
                        log::warn!("skipping frame: {err}");
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface failed: {err}");
                        self.failed = true;
                    }
                }
                None
            }
        }
    }

    /// Presents a drawable whose commands were submitted.
    pub fn present(&mut self, drawable: Drawable) {
        if let Some(window) = self.window {
            window.pre_present_notify();
        }

        if drawable.present() {
            log::debug!("surface suboptimal; reconfiguring");
            self.target.reconfigure(&self.device);
        }
        self.frames_presented += 1;
    }
}
