//! The mesh render pass: one pipeline, a camera uniform slot per viewport,
//! and a model uniform slot per draw command.
//!
//! All uniforms for a frame are written up front into two buffers and bound
//! with dynamic offsets, so any number of viewports and draws share a single
//! command submission without the later writes clobbering the earlier draws.
//!
//! # Bind groups
//!
//! - **Group 0**: per-viewport camera uniforms (view-projection, eye, time)
//! - **Group 1**: per-draw model uniforms (model matrix, normal matrix, color)

use glam::{Mat4, Vec3};

use crate::color::Color;
use crate::gpu::GpuContext;
use crate::mesh::{Primitive, PrimitiveSet, Vertex3d};
use crate::viewport::ViewportRect;

/// Converts an OpenGL-convention clip volume (z in [-1, 1]) to wgpu's
/// (z in [0, 1]). Applied once per view at upload, so the projection
/// builders can stay in the textbook form.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

/// Minimum uniform buffer offset alignment; both uniform structs fit in one
/// slot of this stride.
const UNIFORM_STRIDE: u64 = 256;

/// Camera slots preallocated in the per-view buffer (quad mode uses four).
const MAX_VIEWS: usize = 8;

/// Initial number of model slots; the buffer grows when a frame needs more.
const INITIAL_MODEL_SLOTS: usize = 2048;

/// Per-viewport camera uniforms.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ViewUniforms {
    view_proj: [[f32; 4]; 4],
    /// Eye position in xyz, elapsed seconds in w.
    eye_time: [f32; 4],
}

/// Per-draw model uniforms.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for normals under
    /// non-uniform scale.
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
}

/// One mesh to draw: a shared primitive, its world matrix, and a flat color.
#[derive(Clone, Copy, Debug)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub model: Mat4,
    pub color: Color,
}

/// One viewport to render the frame's draw list into.
#[derive(Clone, Copy, Debug)]
pub struct ViewPlan {
    pub view: Mat4,
    /// OpenGL-convention projection; converted to wgpu depth at upload.
    pub projection: Mat4,
    /// Eye position handed to the shader for shading.
    pub eye: Vec3,
    pub viewport: ViewportRect,
}

/// Renders the frame's draw list into each requested viewport.
pub struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    model_slots: usize,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl MeshPass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: UNIFORM_STRIDE * MAX_VIEWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ViewUniforms>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &camera_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ViewUniforms>() as u64),
                }),
            }],
        });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ModelUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let (model_buffer, model_bind_group) =
            Self::create_model_buffer(device, &model_bind_group_layout, INITIAL_MODEL_SLOTS);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let (depth_texture, depth_view) = Self::create_depth_texture(gpu);

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Billboards and the frustum volume are viewed from both
                // sides, so no culling.
                cull_mode: None,
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_buffer,
            model_bind_group,
            model_bind_group_layout,
            model_slots: INITIAL_MODEL_SLOTS,
            depth_texture,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_model_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: UNIFORM_STRIDE * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });

        (buffer, bind_group)
    }

    fn create_depth_texture(gpu: &GpuContext) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            let (texture, view) = Self::create_depth_texture(gpu);
            self.depth_texture = texture;
            self.depth_view = view;
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    fn ensure_model_slots(&mut self, gpu: &GpuContext, needed: usize) {
        if needed > self.model_slots {
            let slots = needed.next_power_of_two();
            let (buffer, bind_group) =
                Self::create_model_buffer(&gpu.device, &self.model_bind_group_layout, slots);
            self.model_buffer = buffer;
            self.model_bind_group = bind_group;
            self.model_slots = slots;
        }
    }

    /// Renders `commands` into every viewport of `views` and submits.
    ///
    /// The whole frame is one render pass: the first viewport clears color
    /// and depth, uniform slots are written before the pass begins, and
    /// each viewport replays the draw list under its own camera slot.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        target: &wgpu::TextureView,
        primitives: &PrimitiveSet,
        views: &[ViewPlan],
        commands: &[DrawCommand],
        time: f32,
        clear: Color,
    ) {
        self.ensure_depth_size(gpu);
        self.ensure_model_slots(gpu, commands.len());

        let views = &views[..views.len().min(MAX_VIEWS)];

        // Pack every camera slot, then every model slot, stride apart.
        let mut camera_bytes = vec![0u8; views.len() * UNIFORM_STRIDE as usize];
        for (i, plan) in views.iter().enumerate() {
            let uniforms = ViewUniforms {
                view_proj: (OPENGL_TO_WGPU * plan.projection * plan.view).to_cols_array_2d(),
                eye_time: [plan.eye.x, plan.eye.y, plan.eye.z, time],
            };
            let offset = i * UNIFORM_STRIDE as usize;
            camera_bytes[offset..offset + std::mem::size_of::<ViewUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&uniforms));
        }
        gpu.queue.write_buffer(&self.camera_buffer, 0, &camera_bytes);

        let mut model_bytes = vec![0u8; commands.len() * UNIFORM_STRIDE as usize];
        for (i, command) in commands.iter().enumerate() {
            let uniforms = ModelUniforms {
                model: command.model.to_cols_array_2d(),
                normal_matrix: command.model.inverse().transpose().to_cols_array_2d(),
                color: command.color.to_array(),
            };
            let offset = i * UNIFORM_STRIDE as usize;
            model_bytes[offset..offset + std::mem::size_of::<ModelUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(&uniforms));
        }
        gpu.queue.write_buffer(&self.model_buffer, 0, &model_bytes);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Mesh Pass Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);

            for (view_index, plan) in views.iter().enumerate() {
                let rect = plan.viewport;
                pass.set_viewport(rect.x, rect.y, rect.width, rect.height, 0.0, 1.0);
                pass.set_bind_group(
                    0,
                    &self.camera_bind_group,
                    &[(view_index as u64 * UNIFORM_STRIDE) as u32],
                );

                for (draw_index, command) in commands.iter().enumerate() {
                    let Some(mesh) = primitives.resolve(command.primitive) else {
                        continue;
                    };

                    pass.set_bind_group(
                        1,
                        &self.model_bind_group,
                        &[(draw_index as u64 * UNIFORM_STRIDE) as u32],
                    );
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn clip_conversion_remaps_depth_to_half_open_range() {
        // GL near plane (z = -1) lands on wgpu 0, far plane (z = 1) stays 1.
        let near = OPENGL_TO_WGPU * Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert!((near.z).abs() < 1e-6);
        let far = OPENGL_TO_WGPU * Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert!((far.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_structs_fit_one_stride() {
        assert!(std::mem::size_of::<ViewUniforms>() as u64 <= UNIFORM_STRIDE);
        assert!(std::mem::size_of::<ModelUniforms>() as u64 <= UNIFORM_STRIDE);
    }
}
