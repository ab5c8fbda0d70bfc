//! Shader program building.
//!
//! Stage sources are GLSL. Each stage is parsed and validated on the CPU with
//! `naga`, lowered to WGSL, and only then handed to the device when the two
//! stages are linked into a render pipeline.
//!
//! Flow:
//! - `compile_stage` → `CompiledStage` (no driver resources)
//! - `validate_interface` → vertex/fragment/vertex-buffer agreement
//! - `ShaderProgram::link` → `wgpu::RenderPipeline`

mod compile;
mod link;
pub(crate) mod program;
mod stage;

pub use compile::{compile_stage, CompiledStage, StageCompileError, StageErrorKind};
pub use link::{validate_interface, LinkError};
pub use program::{compile_pair, PipelineDesc, ShaderCtx, ShaderProgram};
pub use stage::ShaderStage;
