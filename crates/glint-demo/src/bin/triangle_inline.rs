//! Same triangle as `glint-demo`, with the shader sources compiled in.

use anyhow::Result;
use glint_demo::{TriangleApp, INLINE_FRAGMENT, INLINE_VERTEX};
use glint_engine::device::GpuInit;
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::window::{Runtime, RuntimeConfig};
use glint_source::ShaderSourcePair;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Hello World (inline shaders)".to_string(),
        ..RuntimeConfig::default()
    };
    let sources = ShaderSourcePair::new(INLINE_VERTEX, INLINE_FRAGMENT);

    Runtime::run(config, GpuInit::default(), TriangleApp::new(sources))
}
