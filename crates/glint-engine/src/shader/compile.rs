use std::fmt;

use naga::front::glsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::ShaderStage;

// ── errors ────────────────────────────────────────────────────────────────

/// Phase of stage compilation that rejected the source.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StageErrorKind {
    /// Source was empty or whitespace only.
    EmptySource,
    /// GLSL front end rejected the text.
    Parse,
    /// Source parsed but declares no entry point for the requested stage.
    MissingEntryPoint,
    /// IR failed validation.
    Validation,
    /// Validated IR could not be lowered to driver source.
    Emit,
}

impl fmt::Display for StageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EmptySource => "empty source",
            Self::Parse => "parse error",
            Self::MissingEntryPoint => "missing entry point",
            Self::Validation => "validation error",
            Self::Emit => "emit error",
        })
    }
}

/// A stage failed to compile. `diagnostic` holds the compiler's log text.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to compile {stage} shader ({kind}):\n{diagnostic}")]
pub struct StageCompileError {
    pub stage: ShaderStage,
    pub kind: StageErrorKind,
    pub diagnostic: String,
}

impl StageCompileError {
    fn new(stage: ShaderStage, kind: StageErrorKind, diagnostic: impl Into<String>) -> Self {
        Self { stage, kind, diagnostic: diagnostic.into() }
    }
}

// ── CompiledStage ─────────────────────────────────────────────────────────

/// A single stage that passed parsing and validation.
///
/// Holds no driver resources. The driver-side module is created from
/// [`wgsl`](Self::wgsl) at link time and released once the pipeline exists.
#[derive(Debug)]
pub struct CompiledStage {
    stage: ShaderStage,
    /// Index into `module.entry_points`; checked when the stage is built.
    entry_index: usize,
    module: naga::Module,
    wgsl: String,
}

impl CompiledStage {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Name of the stage's entry point function.
    pub fn entry_point(&self) -> &str {
        &self.naga_entry_point().name
    }

    /// Validated shader IR.
    pub fn module(&self) -> &naga::Module {
        &self.module
    }

    /// Driver-ready WGSL lowered from the IR.
    pub fn wgsl(&self) -> &str {
        &self.wgsl
    }

    pub(crate) fn naga_entry_point(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }
}

// ── compile_stage ─────────────────────────────────────────────────────────

/// Compiles GLSL `source` for `stage`.
///
/// Failures are logged at error level (stage + compiler log) and returned.
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<CompiledStage, StageCompileError> {
    let result = compile(stage, source);
    match &result {
        Ok(compiled) => log::debug!(
            "compiled {stage} shader (entry point `{}`, {} bytes of WGSL)",
            compiled.entry_point(),
            compiled.wgsl.len()
        ),
        Err(err) => log::error!("{err}"),
    }
    result
}

fn compile(stage: ShaderStage, source: &str) -> Result<CompiledStage, StageCompileError> {
    if source.trim().is_empty() {
        return Err(StageCompileError::new(
            stage,
            StageErrorKind::EmptySource,
            "source contains no code",
        ));
    }

    let options = glsl::Options::from(stage.to_naga());
    let module = glsl::Frontend::default()
        .parse(&options, source)
        .map_err(|e| StageCompileError::new(stage, StageErrorKind::Parse, e.emit_to_string(source)))?;

    let entry_index = module
        .entry_points
        .iter()
        .position(|ep| ep.stage == stage.to_naga())
        .ok_or_else(|| {
            StageCompileError::new(
                stage,
                StageErrorKind::MissingEntryPoint,
                format!("no {stage} entry point declared"),
            )
        })?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| {
            StageCompileError::new(stage, StageErrorKind::Validation, e.emit_to_string(source))
        })?;

    let wgsl = naga::back::wgsl::write_string(&module, &info, naga::back::wgsl::WriterFlags::empty())
        .map_err(|e| StageCompileError::new(stage, StageErrorKind::Emit, e.to_string()))?;

    Ok(CompiledStage { stage, entry_index, module, wgsl })
}
