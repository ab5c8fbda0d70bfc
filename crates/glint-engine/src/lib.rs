//! glint engine crate.
//!
//! Window runtime, GPU context and the shader program builder used by the
//! demo binaries.

pub mod color;
pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;

pub use glint_source as source;
