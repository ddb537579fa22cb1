use winit::dpi::PhysicalSize;

use crate::view::View;

/// Callbacks a view sends to the object drawing into it.
///
/// Calls arrive serially on the event-loop thread; control returns to the
/// loop after each one.
pub trait ViewDelegate {
    /// Called once per display refresh to render a frame into `view`.
    fn draw_in_view(&mut self, view: &mut View<'_>);

    /// Called after the drawable size changed. `view` is already resized.
    fn drawable_size_will_change(&mut self, view: &mut View<'_>, size: PhysicalSize<u32>) {
        let _ = (view, size);
    }
}
