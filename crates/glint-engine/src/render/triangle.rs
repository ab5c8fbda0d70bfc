use bytemuck::{Pod, Zeroable};
use glint_source::ShaderSourcePair;
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};
use crate::shader::{PipelineDesc, ShaderProgram};

/// 2D position in normalized device coordinates, bound at location 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Position2 {
    pub pos: [f32; 2],
}

impl Position2 {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub const fn new(x: f32, y: f32) -> Self {
        Self { pos: [x, y] }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Position2>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Draws a static vertex list with one user-supplied program.
///
/// The program is linked and the vertices uploaded on the first frame. A
/// failed link is reported once; later frames draw nothing and the frame loop
/// keeps running.
pub struct TriangleRenderer {
    sources: ShaderSourcePair,
    vertices: Vec<Position2>,

    program: Option<ShaderProgram>,
    link_failed: bool,

    vbo: Option<wgpu::Buffer>,
}

impl TriangleRenderer {
    pub fn new(sources: ShaderSourcePair, vertices: impl Into<Vec<Position2>>) -> Self {
        Self {
            sources,
            vertices: vertices.into(),
            program: None,
            link_failed: false,
            vbo: None,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// True once linking has been attempted and failed.
    pub fn is_broken(&self) -> bool {
        self.link_failed
    }

    pub fn program(&self) -> Option<&ShaderProgram> {
        self.program.as_ref()
    }

    pub fn pipeline_desc() -> PipelineDesc {
        PipelineDesc {
            label: "glint triangle".to_string(),
            vertex_buffers: vec![Position2::layout()],
            ..PipelineDesc::default()
        }
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if self.vertices.is_empty() {
            return;
        }

        self.ensure_program(ctx);
        self.ensure_vertex_buffer(ctx);

        let Some(program) = self.program.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glint triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(program.pipeline());
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..self.vertex_count(), 0..1);
    }

    fn ensure_program(&mut self, ctx: &RenderCtx<'_>) {
        if self.link_failed {
            return;
        }
        if self.program.as_ref().is_some_and(|p| p.format() == ctx.surface_format) {
            return;
        }

        match ShaderProgram::link(
            ctx.shader_ctx(),
            &self.sources.vertex,
            &self.sources.fragment,
            &Self::pipeline_desc(),
        ) {
            Ok(program) => self.program = Some(program),
            Err(e) => {
                log::error!("triangle program unavailable, drawing nothing: {e}");
                self.program = None;
                self.link_failed = true;
            }
        }
    }

    fn ensure_vertex_buffer(&mut self, ctx: &RenderCtx<'_>) {
        if self.vbo.is_some() {
            return;
        }

        self.vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glint triangle vbo"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::program::tests::{noop_device, FRAGMENT_UNIFORM, TARGET};
    use crate::shader::{compile_pair, validate_interface};

    const VERTEX: &str = "#version 450 core\n\
        layout(location = 0) in vec2 position;\n\
        void main() {\n\
            gl_Position = vec4(position, 0.0, 1.0);\n\
        }\n";

    const FRAGMENT: &str = "#version 450 core\n\
        layout(location = 0) out vec4 color;\n\
        void main() {\n\
            color = vec4(1.0, 0.0, 0.0, 1.0);\n\
        }\n";

    #[test]
    fn position_layout_is_two_floats() {
        let layout = Position2::layout();
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn vertices_upload_as_packed_floats() {
        let verts = [Position2::new(-0.5, -0.5), Position2::new(0.0, 0.5)];
        let floats: &[f32] = bytemuck::cast_slice(&verts);
        assert_eq!(floats, &[-0.5, -0.5, 0.0, 0.5]);
    }

    #[test]
    fn new_renderer_is_pending() {
        let sources = ShaderSourcePair::new(VERTEX, FRAGMENT);
        let r = TriangleRenderer::new(sources, vec![Position2::new(0.0, 0.0); 3]);
        assert_eq!(r.vertex_count(), 3);
        assert!(r.program().is_none());
        assert!(!r.is_broken());
    }

    #[test]
    fn pipeline_desc_feeds_position_stage() {
        let (vs, fs) = compile_pair(VERTEX, FRAGMENT).unwrap();
        validate_interface(&vs, &fs, &TriangleRenderer::pipeline_desc().vertex_buffers).unwrap();
    }

    #[test]
    fn first_frame_links_and_uploads() {
        let (device, queue) = noop_device();
        let ctx = RenderCtx::new(&device, &queue, TARGET);
        let mut r = TriangleRenderer::new(ShaderSourcePair::new(VERTEX, FRAGMENT), [
            Position2::new(-0.5, -0.5),
            Position2::new(0.0, 0.5),
            Position2::new(0.5, -0.5),
        ]);

        r.ensure_program(&ctx);
        r.ensure_vertex_buffer(&ctx);

        assert!(!r.is_broken());
        assert_eq!(r.program().map(|p| p.format()), Some(TARGET));
        assert_eq!(r.vbo.as_ref().map(|b| b.size()), Some(24));
    }

    #[test]
    fn rejected_program_marks_renderer_broken() {
        let (device, queue) = noop_device();
        let ctx = RenderCtx::new(&device, &queue, TARGET);
        let mut r = TriangleRenderer::new(
            ShaderSourcePair::new(VERTEX, FRAGMENT_UNIFORM),
            vec![Position2::new(0.0, 0.0); 3],
        );

        r.ensure_program(&ctx);
        assert!(r.is_broken());
        assert!(r.program().is_none());

        // no relink attempt on later frames
        r.ensure_program(&ctx);
        assert!(r.program().is_none());
    }
}
