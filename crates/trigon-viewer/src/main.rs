use anyhow::Result;
use winit::dpi::LogicalSize;

use trigon_engine::logging::{LoggingConfig, init_logging};
use trigon_engine::paint::Color;
use trigon_engine::{DeviceInit, Runtime, RuntimeConfig, TriangleDelegate};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Trigon".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
        clear_color: Color::from_rgba_u8(26, 26, 31, 255),
    };

    log::info!("starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Runtime::run(config, DeviceInit::default(), TriangleDelegate::new)
}
