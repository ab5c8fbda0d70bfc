//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (programs, buffers) and create them
//! lazily on the first frame they are asked to draw.

mod ctx;
pub mod triangle;

pub use ctx::{RenderCtx, RenderTarget};
pub use triangle::{Position2, TriangleRenderer};
