use std::sync::Arc;

use anyhow::{Context, Result};

use super::DeviceInit;
use super::surface::OFFSCREEN_FORMAT;

/// Shared handle to the logical GPU.
///
/// Cloning is cheap: every clone refers to the same adapter, device and queue.
/// Holders reference the device; none of them is responsible for tearing it down.
#[derive(Clone)]
pub struct Device {
    adapter: Arc<wgpu::Adapter>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,

    /// Cached adapter metadata (name, backend, device type).
    info: wgpu::AdapterInfo,

    /// Capabilities below the WebGPU baseline the adapter supports.
    downlevel: wgpu::DownlevelCapabilities,

    /// Format of the drawables this device renders into.
    ///
    /// Negotiated with the surface for windowed views; fixed for headless devices.
    color_format: wgpu::TextureFormat,
}

impl Device {
    /// Requests a device that is not tied to any surface.
    ///
    /// Used for offscreen rendering and tests.
    pub async fn headless(init: &DeviceInit) -> Result<Self> {
        let instance = new_instance();
        Self::request(&instance, None, init).await
    }

    /// Requests an adapter (compatible with `surface` when given) and opens a device on it.
    pub(crate) async fn request(
        instance: &wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
        init: &DeviceInit,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!(
            "using adapter \"{}\" ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("trigon device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let downlevel = adapter.get_downlevel_capabilities();

        Ok(Self {
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
            info,
            downlevel,
            color_format: OFFSCREEN_FORMAT,
        })
    }

    /// Returns the underlying wgpu device.
    pub fn raw(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns the adapter the device was opened on.
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn info(&self) -> &wgpu::AdapterInfo {
        &self.info
    }

    /// Returns the submission queue of this device.
    ///
    /// wgpu exposes a single queue per device, so every caller shares it.
    pub fn new_command_queue(&self) -> Arc<wgpu::Queue> {
        Arc::clone(&self.queue)
    }

    /// Returns the drawable format pipelines must target.
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    pub(crate) fn set_color_format(&mut self, format: wgpu::TextureFormat) {
        self.color_format = format;
    }

    /// Whether vertex shaders may read storage buffers on this device.
    pub fn supports_vertex_storage(&self) -> bool {
        self.require_vertex_storage().is_ok()
    }

    /// Fails unless vertex shaders may read storage buffers on this device.
    ///
    /// The renderer fetches vertex data through storage bindings, so this is a
    /// hard requirement.
    pub fn require_vertex_storage(&self) -> Result<()> {
        require_vertex_storage(&self.info.name, &self.downlevel, &self.device.limits())
    }
}

/// Storage bindings the vertex stage needs (positions + colors).
const VERTEX_STORAGE_BINDINGS: u32 = 2;

pub(crate) fn require_vertex_storage(
    adapter: &str,
    downlevel: &wgpu::DownlevelCapabilities,
    limits: &wgpu::Limits,
) -> Result<()> {
    anyhow::ensure!(
        downlevel
            .flags
            .contains(wgpu::DownlevelFlags::VERTEX_STORAGE),
        "adapter \"{adapter}\" cannot read storage buffers from vertex shaders"
    );
    anyhow::ensure!(
        limits.max_storage_buffers_per_shader_stage >= VERTEX_STORAGE_BINDINGS,
        "adapter \"{adapter}\" allows {} storage buffers per stage, need {VERTEX_STORAGE_BINDINGS}",
        limits.max_storage_buffers_per_shader_stage
    );
    Ok(())
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("adapter", &self.info.name)
            .field("backend", &self.info.backend)
            .field("color_format", &self.color_format)
            .finish()
    }
}

/// Creates a wgpu instance over every backend compiled in.
pub(crate) fn new_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

/// Headless device for GPU-backed tests, or `None` when the machine has no usable adapter.
#[cfg(test)]
pub(crate) fn test_device() -> Option<Device> {
    match pollster::block_on(Device::headless(&DeviceInit::downlevel())) {
        Ok(device) => Some(device),
        Err(e) => {
            eprintln!("no GPU adapter available, skipping: {e:#}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_storage_accepted_on_downlevel_limits() {
        let caps = wgpu::DownlevelCapabilities::default();
        assert!(require_vertex_storage("gpu", &caps, &wgpu::Limits::downlevel_defaults()).is_ok());
    }

    #[test]
    fn missing_vertex_storage_flag_is_rejected_with_adapter_name() {
        let mut caps = wgpu::DownlevelCapabilities::default();
        caps.flags.remove(wgpu::DownlevelFlags::VERTEX_STORAGE);

        let err = require_vertex_storage("Old GPU", &caps, &wgpu::Limits::default()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("\"Old GPU\""), "{msg}");
        assert!(msg.contains("vertex shaders"), "{msg}");
    }

    #[test]
    fn too_few_storage_bindings_are_rejected() {
        let caps = wgpu::DownlevelCapabilities::default();
        let limits = wgpu::Limits {
            max_storage_buffers_per_shader_stage: 1,
            ..wgpu::Limits::default()
        };

        let err = require_vertex_storage("Tiny GPU", &caps, &limits).unwrap_err();
        assert!(format!("{err:#}").contains("Tiny GPU"));
    }

    #[test]
    fn headless_device_targets_offscreen_format() {
        let Some(device) = test_device() else { return };
        assert_eq!(device.color_format(), OFFSCREEN_FORMAT);
    }

    #[test]
    fn clones_share_the_queue() {
        let Some(device) = test_device() else { return };
        let copy = device.clone();
        assert!(Arc::ptr_eq(&device.new_command_queue(), &copy.new_command_queue()));
    }
}
