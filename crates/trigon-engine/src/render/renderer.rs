use std::sync::Arc;

use anyhow::Result;
use wgpu::util::DeviceExt;

use crate::device::Device;
use crate::view::View;

use super::RenderTarget;
use super::geometry::{TRIANGLE_COLORS, TRIANGLE_POSITIONS, TRIANGLE_VERTEX_COUNT};
use super::lifecycle::{Lifecycle, Stage};

const SHADER_SOURCE: &str = include_str!("shaders/triangle.wgsl");

/// Draws a static triangle.
///
/// Usage is `new`, then `build_shaders` and `build_buffers` (once each, in any
/// order), then `draw` once per frame. Drawing earlier is a programming error.
///
/// The device is shared with whoever created it; every other GPU object is
/// owned here and released on drop.
pub struct Renderer {
    device: Device,
    command_queue: Arc<wgpu::Queue>,

    /// Layout of the argument table (positions at 0, colors at 1).
    arguments_layout: wgpu::BindGroupLayout,

    shader_library: Option<wgpu::ShaderModule>,
    pipeline: Option<wgpu::RenderPipeline>,

    vertex_positions: Option<wgpu::Buffer>,
    vertex_colors: Option<wgpu::Buffer>,
    arguments: Option<wgpu::BindGroup>,

    lifecycle: Lifecycle,
    frames_submitted: u64,
}

impl Renderer {
    pub fn new(device: &Device) -> Self {
        let arguments_layout =
            device
                .raw()
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("trigon argument table layout"),
                    entries: &[storage_entry(0), storage_entry(1)],
                });

        Self {
            device: device.clone(),
            command_queue: device.new_command_queue(),
            arguments_layout,
            shader_library: None,
            pipeline: None,
            vertex_positions: None,
            vertex_colors: None,
            arguments: None,
            lifecycle: Lifecycle::default(),
            frames_submitted: 0,
        }
    }

    /// Compiles the shader library and builds the pipeline state for the
    /// device's drawable format.
    ///
    /// Fails when the device cannot feed vertex shaders from storage buffers.
    pub fn build_shaders(&mut self) -> Result<()> {
        self.lifecycle.expect_unbuilt(Stage::Shaders);

        self.device.require_vertex_storage()?;

        let device = self.device.raw();
        let format = self.device.color_format();

        let library = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trigon triangle shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("trigon triangle pipeline layout"),
            bind_group_layouts: &[&self.arguments_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("trigon triangle pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &library,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                // Vertices are fetched from the argument table by index.
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &library,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
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

        self.shader_library = Some(library);
        self.pipeline = Some(pipeline);
        self.lifecycle.mark_built(Stage::Shaders);

        log::debug!("triangle pipeline built for {format:?}");
        Ok(())
    }

    /// Uploads the triangle's positions and colors and builds the argument
    /// table that exposes them to the shader.
    pub fn build_buffers(&mut self) -> Result<()> {
        self.lifecycle.expect_unbuilt(Stage::Buffers);

        let device = self.device.raw();

        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trigon vertex positions"),
            contents: bytemuck::cast_slice(&TRIANGLE_POSITIONS),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trigon vertex colors"),
            contents: bytemuck::cast_slice(&TRIANGLE_COLORS),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let arguments = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("trigon argument table"),
            layout: &self.arguments_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: positions.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: colors.as_entire_binding(),
                },
            ],
        });

        self.vertex_positions = Some(positions);
        self.vertex_colors = Some(colors);
        self.arguments = Some(arguments);
        self.lifecycle.mark_built(Stage::Buffers);

        log::debug!("triangle buffers uploaded ({TRIANGLE_VERTEX_COUNT} vertices)");
        Ok(())
    }

    /// Renders one frame into `view` and presents it.
    ///
    /// The frame is skipped when the view has no drawable to offer.
    ///
    /// # Panics
    ///
    /// If `build_shaders` or `build_buffers` has not completed.
    pub fn draw(&mut self, view: &mut View<'_>) {
        self.lifecycle.assert_ready();

        let Some(drawable) = view.current_drawable() else {
            return;
        };

        let mut encoder = self
            .device
            .raw()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("trigon frame encoder"),
            });

        {
            let mut target =
                RenderTarget::new(&mut encoder, drawable.texture_view(), view.clear_color());
            self.encode(&mut target);
        }

        self.command_queue.submit(std::iter::once(encoder.finish()));
        self.frames_submitted += 1;

        view.present(drawable);
    }

    /// Records the clear + triangle pass into `target` without submitting.
    ///
    /// # Panics
    ///
    /// If `build_shaders` or `build_buffers` has not completed.
    pub fn encode(&self, target: &mut RenderTarget<'_>) {
        self.lifecycle.assert_ready();

        let pipeline = self
            .pipeline
            .as_ref()
            .expect("ready renderer has a pipeline");
        let arguments = self
            .arguments
            .as_ref()
            .expect("ready renderer has an argument table");

        let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trigon triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(target.clear.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, arguments, &[]);
        pass.draw(0..TRIANGLE_VERTEX_COUNT, 0..1);
    }

    /// Whether both build steps completed.
    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn shader_library(&self) -> Option<&wgpu::ShaderModule> {
        self.shader_library.as_ref()
    }

    pub fn pipeline(&self) -> Option<&wgpu::RenderPipeline> {
        self.pipeline.as_ref()
    }

    pub fn vertex_positions(&self) -> Option<&wgpu::Buffer> {
        self.vertex_positions.as_ref()
    }

    pub fn vertex_colors(&self) -> Option<&wgpu::Buffer> {
        self.vertex_colors.as_ref()
    }

    pub fn arguments(&self) -> Option<&wgpu::BindGroup> {
        self.arguments.as_ref()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        log::debug!(
            "renderer released after {} submitted frames",
            self.frames_submitted
        );
    }
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
