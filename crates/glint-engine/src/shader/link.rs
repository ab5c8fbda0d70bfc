use naga::{Binding, Handle, Module, Type, TypeInner};

use super::{CompiledStage, StageCompileError};

/// Linking was refused or the stages do not fit together.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LinkError {
    /// At least one stage failed to compile; no program was built.
    #[error("link skipped: {} stage(s) failed to compile", .errors.len())]
    Skipped { errors: Vec<StageCompileError> },

    /// The fragment stage reads a location the vertex stage never writes.
    #[error("fragment input at location {location} is not written by the vertex stage")]
    UnmatchedVarying { location: u32 },

    /// Both stages use the location but disagree on its type.
    #[error("varying at location {location} is {vertex} in the vertex stage but {fragment} in the fragment stage")]
    VaryingTypeMismatch { location: u32, vertex: String, fragment: String },

    /// The vertex stage reads a location no vertex buffer attribute provides.
    #[error("vertex input at location {location} has no matching vertex buffer attribute")]
    MissingVertexAttribute { location: u32 },

    /// The device rejected the stage modules or the pipeline built from them.
    #[error("pipeline creation failed: {message}")]
    Pipeline { message: String },
}

/// A user-defined (`location`) binding and its type.
#[derive(Debug, Clone)]
struct Slot {
    location: u32,
    inner: TypeInner,
}

/// Checks that `vertex` and `fragment` agree with each other and with the
/// vertex buffer layouts they will be fed from.
pub fn validate_interface(
    vertex: &CompiledStage,
    fragment: &CompiledStage,
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> Result<(), LinkError> {
    let vs_ep = vertex.naga_entry_point();
    let fs_ep = fragment.naga_entry_point();

    // vertex inputs <- buffers
    for input in inputs(vertex.module(), vs_ep) {
        let provided = buffers
            .iter()
            .flat_map(|b| b.attributes.iter())
            .any(|a| a.shader_location == input.location);
        if !provided {
            return Err(LinkError::MissingVertexAttribute { location: input.location });
        }
    }

    // fragment inputs <- vertex outputs
    let varyings = outputs(vertex.module(), vs_ep);
    for input in inputs(fragment.module(), fs_ep) {
        let Some(out) = varyings.iter().find(|o| o.location == input.location) else {
            return Err(LinkError::UnmatchedVarying { location: input.location });
        };
        if out.inner != input.inner {
            return Err(LinkError::VaryingTypeMismatch {
                location: input.location,
                vertex: describe(&out.inner),
                fragment: describe(&input.inner),
            });
        }
    }

    Ok(())
}

fn inputs(module: &Module, ep: &naga::EntryPoint) -> Vec<Slot> {
    let mut slots = Vec::new();
    for arg in &ep.function.arguments {
        collect(module, arg.ty, arg.binding.as_ref(), &mut slots);
    }
    slots
}

fn outputs(module: &Module, ep: &naga::EntryPoint) -> Vec<Slot> {
    let mut slots = Vec::new();
    if let Some(result) = &ep.function.result {
        collect(module, result.ty, result.binding.as_ref(), &mut slots);
    }
    slots
}

/// Bound values contribute themselves; unbound structs contribute their bound members.
fn collect(module: &Module, ty: Handle<Type>, binding: Option<&Binding>, slots: &mut Vec<Slot>) {
    match binding {
        Some(Binding::Location { location, .. }) => slots.push(Slot {
            location: *location,
            inner: module.types[ty].inner.clone(),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect(module, member.ty, member.binding.as_ref(), slots);
                }
            }
        }
    }
}

fn describe(inner: &TypeInner) -> String {
    match inner {
        TypeInner::Scalar(s) => format!("{:?}{}", s.kind, s.width * 8),
        TypeInner::Vector { size, scalar } => {
            format!("vec{}<{:?}{}>", *size as u8, scalar.kind, scalar.width * 8)
        }
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::compile::tests::{FRAGMENT_OK, VERTEX_OK};
    use crate::shader::{compile_stage, ShaderStage};

    const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn position_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: 8,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRS,
        }
    }

    fn vs(src: &str) -> CompiledStage {
        compile_stage(ShaderStage::Vertex, src).unwrap()
    }

    fn fs(src: &str) -> CompiledStage {
        compile_stage(ShaderStage::Fragment, src).unwrap()
    }

    const VERTEX_WITH_COLOR: &str = "#version 450 core\n\
        layout(location = 0) in vec2 position;\n\
        layout(location = 0) out vec3 v_color;\n\
        void main() {\n\
            v_color = vec3(position, 1.0);\n\
            gl_Position = vec4(position, 0.0, 1.0);\n\
        }\n";

    const FRAGMENT_READS_VEC3: &str = "#version 450 core\n\
        layout(location = 0) in vec3 v_color;\n\
        layout(location = 0) out vec4 color;\n\
        void main() {\n\
            color = vec4(v_color, 1.0);\n\
        }\n";

    const FRAGMENT_READS_VEC4: &str = "#version 450 core\n\
        layout(location = 0) in vec4 v_color;\n\
        layout(location = 0) out vec4 color;\n\
        void main() {\n\
            color = v_color;\n\
        }\n";

    const FRAGMENT_READS_LOC1: &str = "#version 450 core\n\
        layout(location = 1) in vec3 v_normal;\n\
        layout(location = 0) out vec4 color;\n\
        void main() {\n\
            color = vec4(v_normal, 1.0);\n\
        }\n";

    // ── accepted ──────────────────────────────────────────────────────────

    #[test]
    fn matching_pair_links() {
        validate_interface(&vs(VERTEX_OK), &fs(FRAGMENT_OK), &[position_layout()]).unwrap();
    }

    #[test]
    fn matching_varying_links() {
        validate_interface(&vs(VERTEX_WITH_COLOR), &fs(FRAGMENT_READS_VEC3), &[position_layout()])
            .unwrap();
    }

    #[test]
    fn unused_vertex_output_is_fine() {
        validate_interface(&vs(VERTEX_WITH_COLOR), &fs(FRAGMENT_OK), &[position_layout()]).unwrap();
    }

    // ── rejected ──────────────────────────────────────────────────────────

    #[test]
    fn missing_vertex_attribute_is_rejected() {
        let err = validate_interface(&vs(VERTEX_OK), &fs(FRAGMENT_OK), &[]).unwrap_err();
        assert!(matches!(err, LinkError::MissingVertexAttribute { location: 0 }));
    }

    #[test]
    fn unmatched_varying_is_rejected() {
        let err = validate_interface(&vs(VERTEX_WITH_COLOR), &fs(FRAGMENT_READS_LOC1), &[
            position_layout(),
        ])
        .unwrap_err();
        assert!(matches!(err, LinkError::UnmatchedVarying { location: 1 }));
    }

    #[test]
    fn varying_type_mismatch_is_rejected() {
        let err = validate_interface(&vs(VERTEX_WITH_COLOR), &fs(FRAGMENT_READS_VEC4), &[
            position_layout(),
        ])
        .unwrap_err();
        assert!(matches!(err, LinkError::VaryingTypeMismatch { location: 0, .. }));
    }

    #[test]
    fn skipped_message_counts_failures() {
        let err = compile_stage(ShaderStage::Vertex, "").unwrap_err();
        let link = LinkError::Skipped { errors: vec![err.clone(), err] };
        assert_eq!(link.to_string(), "link skipped: 2 stage(s) failed to compile");
    }
}
