use anyhow::{Context, Result, anyhow};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::ViewDelegate;
use crate::device::{Device, DeviceInit};
use crate::paint::Color;
use crate::view::View;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub clear_color: Color,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "trigon".to_string(),
            initial_size: LogicalSize::new(1024.0, 768.0),
            clear_color: Color::from_premul(0.1, 0.1, 0.1, 1.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `delegate` until the window closes.
    ///
    /// `make_delegate` runs once, after the device exists. Startup failures and
    /// an unrecoverable surface are returned as errors.
    pub fn run<D, F>(config: RuntimeConfig, device_init: DeviceInit, make_delegate: F) -> Result<()>
    where
        D: ViewDelegate + 'static,
        F: FnOnce(&Device) -> Result<D> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        let mut state = AppState::new(config, device_init, make_delegate);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.finish()
    }
}

#[self_referencing]
struct ViewEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    view: View<'this>,
}

struct AppState<D, F> {
    config: RuntimeConfig,
    device_init: DeviceInit,
    make_delegate: Option<F>,

    // Declared before `entry`: the delegate's GPU objects go before the surface.
    delegate: Option<D>,
    entry: Option<ViewEntry>,

    failure: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<D, F> AppState<D, F>
where
    D: ViewDelegate + 'static,
    F: FnOnce(&Device) -> Result<D> + 'static,
{
    fn new(config: RuntimeConfig, device_init: DeviceInit, make_delegate: F) -> Self {
        Self {
            config,
            device_init,
            make_delegate: Some(make_delegate),
            delegate: None,
            entry: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure.get_or_insert(err);
        self.request_exit(event_loop);
    }

    /// Creates the window, its view + device, then the delegate.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        log::info!("window \"{}\" created", self.config.title);

        let device_init = self.device_init.clone();
        let mut entry = ViewEntryTryBuilder {
            window,
            view_builder: |w| pollster::block_on(View::for_window(w, &device_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let clear_color = self.config.clear_color;
        entry.with_view_mut(|view| view.set_clear_color(clear_color));

        let make_delegate = self
            .make_delegate
            .take()
            .context("view delegate already constructed")?;
        let device = entry.with_view(|view| view.device().clone());
        let delegate = make_delegate(&device).context("failed to create view delegate")?;

        entry.with_window(|w| w.request_redraw());
        self.delegate = Some(delegate);
        self.entry = Some(entry);
        Ok(())
    }

    fn resize(&mut self, new_size: Option<PhysicalSize<u32>>) {
        let (Some(entry), Some(delegate)) = (self.entry.as_mut(), self.delegate.as_mut()) else {
            return;
        };

        let new_size = new_size.unwrap_or_else(|| entry.with_window(|w| w.inner_size()));
        entry.with_view_mut(|view| {
            view.resize(new_size);
            delegate.drawable_size_will_change(view, new_size);
        });
        entry.with_window(|w| w.request_redraw());
    }

    /// Drives one frame. Returns `false` once the view failed.
    fn redraw(&mut self) -> bool {
        let (Some(entry), Some(delegate)) = (self.entry.as_mut(), self.delegate.as_mut()) else {
            return true;
        };

        entry.with_view_mut(|view| {
            delegate.draw_in_view(view);
            !view.has_failed()
        })
    }

    fn finish(mut self) -> Result<()> {
        // Delegate first, then view and window.
        self.delegate = None;
        self.entry = None;

        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<D, F> ApplicationHandler for AppState<D, F>
where
    D: ViewDelegate + 'static,
    F: FnOnce(&Device) -> Result<D> + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e.context("failed to start"));
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw, paced by the present mode.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let is_ours = self
            .entry
            .as_ref()
            .is_some_and(|e| e.with_window(|w| w.id()) == window_id);
        if self.exit_requested || !is_ours {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.request_exit(event_loop);
            }

            WindowEvent::KeyboardInput { event, .. } if is_quit_key(&event) => {
                log::info!("quit key pressed");
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(Some(new_size)),

            WindowEvent::ScaleFactorChanged { .. } => self.resize(None),

            WindowEvent::RedrawRequested => {
                if !self.redraw() {
                    self.fail(event_loop, anyhow!("view can no longer present frames"));
                }
            }

            _ => {}
        }
    }
}

fn is_quit_key(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && !event.repeat
        && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
}
