//! GPU device management.
//!
//! This module is responsible for:
//! - requesting the wgpu Adapter/Device/Queue
//! - negotiating the drawable format and alpha mode with a surface
//! - classifying per-frame surface errors

mod error;
mod handle;
mod init;
pub(crate) mod surface;

pub use error::SurfaceErrorAction;
pub use handle::Device;
pub use init::DeviceInit;

pub(crate) use handle::new_instance;
#[cfg(test)]
pub(crate) use handle::test_device;
