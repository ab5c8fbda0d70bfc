use super::{compile_stage, validate_interface, CompiledStage, LinkError, ShaderStage};

/// Device handle and output format the program is built against.
///
/// Passed explicitly to every build call; nothing here relies on a bound
/// "current program" in the driver.
#[derive(Copy, Clone)]
pub struct ShaderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub target_format: wgpu::TextureFormat,
}

impl<'a> ShaderCtx<'a> {
    pub fn new(device: &'a wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        Self { device, target_format }
    }
}

/// Fixed-function state baked into the program.
#[derive(Debug, Clone)]
pub struct PipelineDesc {
    pub label: String,
    pub vertex_buffers: Vec<wgpu::VertexBufferLayout<'static>>,
    pub topology: wgpu::PrimitiveTopology,
    pub blend: Option<wgpu::BlendState>,
}

impl Default for PipelineDesc {
    fn default() -> Self {
        Self {
            label: "glint program".to_string(),
            vertex_buffers: Vec::new(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: Some(wgpu::BlendState::REPLACE),
        }
    }
}

/// A linked vertex + fragment program, ready to bind in a render pass.
///
/// Dropping it releases the pipeline.
#[derive(Debug)]
pub struct ShaderProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
    format: wgpu::TextureFormat,
}

impl ShaderProgram {
    /// Compiles both stages and links them.
    ///
    /// Both stages are always compiled so every diagnostic is reported. If
    /// either fails, linking is skipped and [`LinkError::Skipped`] carries the
    /// stage errors.
    pub fn link(
        ctx: ShaderCtx<'_>,
        vertex_source: &str,
        fragment_source: &str,
        desc: &PipelineDesc,
    ) -> Result<Self, LinkError> {
        let (vertex, fragment) = compile_pair(vertex_source, fragment_source)?;
        Self::link_stages(ctx, &vertex, &fragment, desc)
    }

    /// Links two already compiled stages.
    ///
    /// Device-side rejections come back as [`LinkError::Pipeline`].
    pub fn link_stages(
        ctx: ShaderCtx<'_>,
        vertex: &CompiledStage,
        fragment: &CompiledStage,
        desc: &PipelineDesc,
    ) -> Result<Self, LinkError> {
        validate_interface(vertex, fragment, &desc.vertex_buffers)?;

        // Anything the device rejects lands in this scope instead of the
        // uncaptured-error handler, which panics.
        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        // Stage modules only live for pipeline creation.
        let vs_module = create_module(ctx.device, &desc.label, vertex);
        let fs_module = create_module(ctx.device, &desc.label, fragment);

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&desc.label),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&desc.label),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &desc.vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.target_format,
                    blend: desc.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            let err = LinkError::Pipeline { message: err.to_string() };
            log::error!("shader program `{}`: {err}", desc.label);
            return Err(err);
        }

        log::info!("linked shader program `{}` ({:?})", desc.label, ctx.target_format);

        Ok(Self {
            label: desc.label.clone(),
            pipeline,
            format: ctx.target_format,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Color format the program was linked against.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Compiles both stages, collecting every failure into [`LinkError::Skipped`].
pub fn compile_pair(
    vertex_source: &str,
    fragment_source: &str,
) -> Result<(CompiledStage, CompiledStage), LinkError> {
    let vertex = compile_stage(ShaderStage::Vertex, vertex_source);
    let fragment = compile_stage(ShaderStage::Fragment, fragment_source);

    match (vertex, fragment) {
        (Ok(vs), Ok(fs)) => Ok((vs, fs)),
        (vs, fs) => {
            let errors = [vs.err(), fs.err()].into_iter().flatten().collect();
            Err(LinkError::Skipped { errors })
        }
    }
}

fn create_module(device: &wgpu::Device, label: &str, stage: &CompiledStage) -> wgpu::ShaderModule {
    let label = format!("{label} {}", stage.stage());
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(stage.wgsl().into()),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::render::TriangleRenderer;
    use crate::shader::compile::tests::{FRAGMENT_OK, VERTEX_OK};

    pub(crate) const TARGET: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

    /// Device on the no-op backend: full wgpu validation, no GPU needed.
    pub(crate) fn noop_device() -> (wgpu::Device, wgpu::Queue) {
        wgpu::Device::noop(&wgpu::DeviceDescriptor::default())
    }

    /// Compiles and passes the interface checks, but reads a uniform the
    /// pipeline layout does not provide.
    pub(crate) const FRAGMENT_UNIFORM: &str = "#version 450 core\n\
        layout(set = 0, binding = 0) uniform U { vec4 u_color; };\n\
        layout(location = 0) out vec4 color;\n\
        void main() {\n\
            color = u_color;\n\
        }\n";

    #[test]
    fn default_desc_draws_triangle_lists() {
        let desc = PipelineDesc::default();
        assert_eq!(desc.topology, wgpu::PrimitiveTopology::TriangleList);
        assert!(desc.vertex_buffers.is_empty());
    }

    #[test]
    fn valid_pair_compiles() {
        let (vs, fs) = compile_pair(VERTEX_OK, FRAGMENT_OK).unwrap();
        assert_eq!(vs.stage(), ShaderStage::Vertex);
        assert_eq!(fs.stage(), ShaderStage::Fragment);
    }

    #[test]
    fn one_failed_stage_skips_link() {
        let errors = match compile_pair(VERTEX_OK, "").unwrap_err() {
            LinkError::Skipped { errors } => errors,
            other => panic!("expected skip, got {other:?}"),
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].stage, ShaderStage::Fragment);
    }

    #[test]
    fn both_failed_stages_are_reported() {
        let errors = match compile_pair("#version 450 core\nvoid main( {\n", "").unwrap_err() {
            LinkError::Skipped { errors } => errors,
            other => panic!("expected skip, got {other:?}"),
        };
        let stages: Vec<_> = errors.iter().map(|e| e.stage).collect();
        assert_eq!(stages, [ShaderStage::Vertex, ShaderStage::Fragment]);
    }

    // ── link ──────────────────────────────────────────────────────────────

    #[test]
    fn valid_pair_links_into_a_program() {
        let (device, _queue) = noop_device();
        let desc = TriangleRenderer::pipeline_desc();
        let program =
            ShaderProgram::link(ShaderCtx::new(&device, TARGET), VERTEX_OK, FRAGMENT_OK, &desc)
                .unwrap();
        assert_eq!(program.label(), "glint triangle");
        assert_eq!(program.format(), TARGET);
    }

    #[test]
    fn link_with_broken_stage_builds_nothing() {
        let (device, _queue) = noop_device();
        let desc = TriangleRenderer::pipeline_desc();
        let err = ShaderProgram::link(ShaderCtx::new(&device, TARGET), VERTEX_OK, "", &desc)
            .unwrap_err();
        assert!(matches!(err, LinkError::Skipped { ref errors } if errors.len() == 1));
    }

    #[test]
    fn interface_mismatch_is_reported_before_the_device() {
        let (device, _queue) = noop_device();
        let err = ShaderProgram::link(
            ShaderCtx::new(&device, TARGET),
            VERTEX_OK,
            FRAGMENT_OK,
            &PipelineDesc::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LinkError::MissingVertexAttribute { location: 0 }));
    }

    #[test]
    fn device_rejection_is_an_error_not_a_panic() {
        let (device, _queue) = noop_device();
        let desc = TriangleRenderer::pipeline_desc();
        let err = ShaderProgram::link(
            ShaderCtx::new(&device, TARGET),
            VERTEX_OK,
            FRAGMENT_UNIFORM,
            &desc,
        )
        .unwrap_err();
        match err {
            LinkError::Pipeline { message } => assert!(!message.is_empty()),
            other => panic!("expected pipeline error, got {other:?}"),
        }
    }

    #[test]
    fn device_stays_usable_after_rejection() {
        let (device, _queue) = noop_device();
        let ctx = ShaderCtx::new(&device, TARGET);
        let desc = TriangleRenderer::pipeline_desc();
        assert!(ShaderProgram::link(ctx, VERTEX_OK, FRAGMENT_UNIFORM, &desc).is_err());
        ShaderProgram::link(ctx, VERTEX_OK, FRAGMENT_OK, &desc).unwrap();
    }
}
