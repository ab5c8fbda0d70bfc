//! Shared driver for the demo binaries.
//!
//! Both binaries draw the same red triangle; they differ only in where the
//! shader sources come from (`res/shaders/Basic.shader` or string constants).

use glint_engine::color::Color;
use glint_engine::core::{App, AppControl, FrameCtx};
use glint_engine::render::{Position2, TriangleRenderer};
use glint_source::{parse_file, ShaderSourcePair};

/// Shader file loaded by the `glint-demo` binary.
pub const SHADER_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/res/shaders/Basic.shader");

/// The triangle, in normalized device coordinates.
pub const TRIANGLE: [Position2; 3] = [
    Position2::new(-0.5, -0.5),
    Position2::new(0.0, 0.5),
    Position2::new(0.5, -0.5),
];

pub const INLINE_VERTEX: &str = "#version 450 core\n\
    \n\
    layout(location = 0) in vec2 position;\n\
    \n\
    void main()\n\
    {\n\
    \x20   gl_Position = vec4(position, 0.0, 1.0);\n\
    }\n";

pub const INLINE_FRAGMENT: &str = "#version 450 core\n\
    \n\
    layout(location = 0) out vec4 color;\n\
    \n\
    void main()\n\
    {\n\
    \x20   color = vec4(1.0, 0.0, 0.0, 1.0);\n\
    }\n";

/// Loads the demo shader file.
///
/// A missing or unreadable file is logged and yields empty sources; the
/// program then fails to link and the window just shows the clear color.
pub fn load_sources(path: &str) -> ShaderSourcePair {
    match parse_file(path) {
        Ok(pair) => {
            if !pair.is_complete() {
                log::warn!("{path}: missing a vertex or fragment section");
            }
            pair
        }
        Err(e) => {
            log::error!("{e}");
            ShaderSourcePair::default()
        }
    }
}

/// Clears the window and draws the triangle every frame.
pub struct TriangleApp {
    clear: Color,
    renderer: TriangleRenderer,
}

impl TriangleApp {
    pub fn new(sources: ShaderSourcePair) -> Self {
        Self {
            clear: Color::BLACK,
            renderer: TriangleRenderer::new(sources, TRIANGLE),
        }
    }
}

impl App for TriangleApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let renderer = &mut self.renderer;
        ctx.render(self.clear, |rctx, target| renderer.render(rctx, target))
    }

    fn on_exit(&mut self) {
        log::info!("shutting down");
    }
}
