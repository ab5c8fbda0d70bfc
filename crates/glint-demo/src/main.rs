use anyhow::Result;
use glint_demo::{load_sources, TriangleApp, SHADER_PATH};
use glint_engine::device::GpuInit;
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("loading shaders from {SHADER_PATH}");
    let sources = load_sources(SHADER_PATH);

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), TriangleApp::new(sources))
}
