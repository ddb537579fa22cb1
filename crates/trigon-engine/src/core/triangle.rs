use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use crate::device::Device;
use crate::render::Renderer;
use crate::time::FrameTime;
use crate::view::View;

use super::ViewDelegate;

/// Frames between two frame-rate log lines.
const FPS_LOG_INTERVAL: u64 = 600;

/// Delegate that forwards every frame to a triangle [`Renderer`].
pub struct TriangleDelegate {
    renderer: Renderer,
}

impl TriangleDelegate {
    /// Builds the renderer (shaders, then buffers) on `device`.
    pub fn new(device: &Device) -> Result<Self> {
        let mut renderer = Renderer::new(device);
        renderer
            .build_shaders()
            .context("failed to build triangle shaders")?;
        renderer
            .build_buffers()
            .context("failed to build triangle buffers")?;

        Ok(Self { renderer })
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

impl ViewDelegate for TriangleDelegate {
    fn draw_in_view(&mut self, view: &mut View<'_>) {
        let submitted = self.renderer.frames_submitted();
        self.renderer.draw(view);
        let drew = self.renderer.frames_submitted() > submitted;

        if let Some(t) = fps_report(drew, view.frame_time()) {
            log::debug!("frame {}: {:.1} fps", t.frame_index, t.fps);
        }
    }

    fn drawable_size_will_change(&mut self, _view: &mut View<'_>, size: PhysicalSize<u32>) {
        log::debug!("drawable size now {}x{}", size.width, size.height);
    }
}

/// Timing to log after a frame, if any.
///
/// Only frames that were actually drawn are reported; a skipped frame leaves
/// the previous frame's timing in place.
fn fps_report(drew: bool, time: Option<FrameTime>) -> Option<FrameTime> {
    time.filter(|t| drew && t.frame_index > 0 && t.frame_index % FPS_LOG_INTERVAL == 0)
}

impl Drop for TriangleDelegate {
    fn drop(&mut self) {
        log::debug!("triangle delegate released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::test_device;
    use crate::paint::Color;

    fn test_delegate() -> Option<(Device, TriangleDelegate)> {
        let device = test_device()?;
        if !device.supports_vertex_storage() {
            return None;
        }
        let delegate = TriangleDelegate::new(&device).expect("delegate construction");
        Some((device, delegate))
    }

    #[test]
    fn construction_leaves_renderer_ready() {
        let Some((_, delegate)) = test_delegate() else { return };
        assert!(delegate.renderer().is_ready());
        assert_eq!(delegate.renderer().frames_submitted(), 0);
    }

    #[test]
    fn n_callbacks_submit_n_frames() {
        const N: u64 = 5;
        let Some((device, mut delegate)) = test_delegate() else { return };
        let mut view = View::offscreen(&device, PhysicalSize::new(64, 64));
        view.set_clear_color(Color::BLACK);

        for _ in 0..N {
            delegate.draw_in_view(&mut view);
        }

        assert_eq!(delegate.renderer().frames_submitted(), N);
        assert_eq!(view.frames_presented(), N);
        assert_eq!(view.frame_time().map(|t| t.frame_index), Some(N - 1));
        assert!(!view.has_failed());
    }

    fn frame(frame_index: u64) -> FrameTime {
        FrameTime {
            dt: 1.0 / 60.0,
            now: std::time::Instant::now(),
            frame_index,
            fps: 60.0,
        }
    }

    #[test]
    fn fps_reported_on_drawn_interval_frames_only() {
        assert!(fps_report(true, Some(frame(FPS_LOG_INTERVAL))).is_some());
        assert!(fps_report(true, Some(frame(2 * FPS_LOG_INTERVAL))).is_some());

        assert!(fps_report(true, Some(frame(0))).is_none());
        assert!(fps_report(true, Some(frame(FPS_LOG_INTERVAL + 1))).is_none());
        assert!(fps_report(true, None).is_none());
    }

    #[test]
    fn skipped_frame_does_not_repeat_the_report() {
        // Timing left over from the last drawn frame.
        assert!(fps_report(false, Some(frame(FPS_LOG_INTERVAL))).is_none());
    }

    #[test]
    fn zero_sized_view_submits_nothing() {
        let Some((device, mut delegate)) = test_delegate() else { return };
        let mut view = View::offscreen(&device, PhysicalSize::new(16, 16));

        delegate.draw_in_view(&mut view);
        view.resize(PhysicalSize::new(0, 0));
        delegate.draw_in_view(&mut view);
        delegate.draw_in_view(&mut view);

        assert_eq!(delegate.renderer().frames_submitted(), 1);
        assert_eq!(view.frames_presented(), 1);
        assert_eq!(view.frame_time().map(|t| t.frame_index), Some(0));
    }

    #[test]
    fn resize_then_draw_keeps_submitting() {
        let Some((device, mut delegate)) = test_delegate() else { return };
        let mut view = View::offscreen(&device, PhysicalSize::new(16, 16));

        delegate.draw_in_view(&mut view);
        let size = PhysicalSize::new(48, 24);
        view.resize(size);
        delegate.drawable_size_will_change(&mut view, size);
        delegate.draw_in_view(&mut view);

        assert_eq!(delegate.renderer().frames_submitted(), 2);
        assert_eq!(view.size(), size);
    }
}
