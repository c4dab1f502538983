use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use shaderfetch::ShaderSources;
use tracing::debug;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Viewport;
use crate::mesh::PlaneMesh;
use crate::scene::FrameInputs;
use crate::session::FrameTarget;
use crate::types::Antialiasing;

use super::context::GpuContext;
use super::pipeline::{uniform_layout, AuroraPipeline};
use super::AuroraUniforms;

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        viewport: Viewport,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: viewport.width.max(1),
                height: viewport.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

#[derive(Debug)]
struct FrameStats {
    frames: u32,
    since: Instant,
}

/// All GPU resources for the running scene: one mesh, one material, one draw.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: AuroraPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    multisample_target: Option<MultisampleTarget>,
    stats: FrameStats,
}

impl GpuState {
    pub(crate) fn new(
        window: Arc<Window>,
        viewport: Viewport,
        antialiasing: Antialiasing,
        sources: &ShaderSources,
    ) -> Result<Self> {
        let context = GpuContext::new(window, viewport, antialiasing)?;
        let device = &context.device;

        let layout = uniform_layout(device);
        let pipeline = AuroraPipeline::new(
            device,
            &layout,
            context.surface_format,
            context.sample_count,
            sources,
        )?;

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("aurora uniforms"),
            size: std::mem::size_of::<AuroraUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("aurora uniform bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mesh = PlaneMesh::aurora();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("aurora plane vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("aurora plane indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        debug!(
            vertices = mesh.vertices.len(),
            indices = mesh.index_count(),
            "uploaded aurora plane"
        );

        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                device,
                context.surface_format,
                context.viewport(),
                context.sample_count,
            )
        });

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            multisample_target,
            stats: FrameStats {
                frames: 0,
                since: Instant::now(),
            },
            context,
        })
    }

    fn record_stats(&mut self, time: f32) {
        self.stats.frames += 1;
        let elapsed = self.stats.since.elapsed();
        if elapsed >= Duration::from_secs(1) {
            debug!(
                fps = (self.stats.frames as f32 / elapsed.as_secs_f32()).round(),
                time,
                "render stats"
            );
            self.stats.frames = 0;
            self.stats.since = Instant::now();
        }
    }
}

impl FrameTarget for GpuState {
    type Error = wgpu::SurfaceError;

    fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.context.resize(viewport);
        if self.context.sample_count > 1 {
            self.multisample_target = Some(MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                viewport,
                self.context.sample_count,
            ));
        }
    }

    fn draw(&mut self, frame: &FrameInputs) -> Result<(), wgpu::SurfaceError> {
        let output = self.context.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms = AuroraUniforms::from_frame(frame);
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("aurora encoder"),
            });
        let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("aurora pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.record_stats(frame.time);
        Ok(())
    }
}
