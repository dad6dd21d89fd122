//! Mesh primitives, GPU geometry buffers, and the matrix stack the scene
//! composes its model transforms with.
//!
//! Geometry generation is kept in plain functions returning vertex and index
//! vectors so it stays testable without a device; [`Mesh`] only wraps the
//! upload.

use glam::{Mat4, Vec3};

use crate::gpu::GpuContext;

/// A vertex with position, normal, and texture coordinates.
///
/// 32 bytes per vertex: position at offset 0, normal at 12, uv at 24. The
/// layout is exposed via [`Vertex3d::LAYOUT`] for pipeline creation.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3d {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Unit cube centered at the origin, one vertex quad per face.
pub fn cube_geometry() -> (Vec<Vertex3d>, Vec<u32>) {
    #[rustfmt::skip]
    let vertices = vec![
        // Front face (Z+)
        Vertex3d::new([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
        Vertex3d::new([ 0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 0.0]),
        Vertex3d::new([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
        Vertex3d::new([-0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 1.0]),
        // Back face (Z-)
        Vertex3d::new([ 0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
        Vertex3d::new([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 0.0]),
        Vertex3d::new([-0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
        Vertex3d::new([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 1.0]),
        // Top face (Y+)
        Vertex3d::new([-0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [0.0, 0.0]),
        Vertex3d::new([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
        Vertex3d::new([ 0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [1.0, 1.0]),
        Vertex3d::new([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
        // Bottom face (Y-)
        Vertex3d::new([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 0.0]),
        Vertex3d::new([ 0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
        Vertex3d::new([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 1.0]),
        Vertex3d::new([-0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
        // Right face (X+)
        Vertex3d::new([ 0.5, -0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 0.0]),
        Vertex3d::new([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
        Vertex3d::new([ 0.5,  0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 1.0]),
        Vertex3d::new([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
        // Left face (X-)
        Vertex3d::new([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 0.0]),
        Vertex3d::new([-0.5, -0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 0.0]),
        Vertex3d::new([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 1.0]),
        Vertex3d::new([-0.5,  0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 1.0]),
    ];

    #[rustfmt::skip]
    let indices: Vec<u32> = vec![
        0,  1,  2,  2,  3,  0,  // front
        4,  5,  6,  6,  7,  4,  // back
        8,  9,  10, 10, 11, 8,  // top
        12, 13, 14, 14, 15, 12, // bottom
        16, 17, 18, 18, 19, 16, // right
        20, 21, 22, 22, 23, 20, // left
    ];

    (vertices, indices)
}

/// UV sphere of unit radius centered at the origin.
pub fn sphere_geometry(segments: u32, rings: u32) -> (Vec<Vertex3d>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for seg in 0..=segments {
            let theta = 2.0 * std::f32::consts::PI * seg as f32 / segments as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();

            vertices.push(Vertex3d::new(
                [x, y, z],
                [x, y, z],
                [seg as f32 / segments as f32, ring as f32 / rings as f32],
            ));
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;

            indices.push(current);
            indices.push(next);
            indices.push(current + 1);

            indices.push(current + 1);
            indices.push(next);
            indices.push(next + 1);
        }
    }

    (vertices, indices)
}

/// Square plane of the given side length on the XZ axes, normal up.
pub fn plane_geometry(size: f32) -> (Vec<Vertex3d>, Vec<u32>) {
    let half = size * 0.5;
    // UVs tile with the plane size so large surfaces keep their texel density.
    let tiles = (size / 8.0).max(1.0);
    let vertices = vec![
        Vertex3d::new([-half, 0.0, -half], [0.0, 1.0, 0.0], [0.0, 0.0]),
        Vertex3d::new([half, 0.0, -half], [0.0, 1.0, 0.0], [tiles, 0.0]),
        Vertex3d::new([half, 0.0, half], [0.0, 1.0, 0.0], [tiles, tiles]),
        Vertex3d::new([-half, 0.0, half], [0.0, 1.0, 0.0], [0.0, tiles]),
    ];

    let indices = vec![0, 1, 2, 2, 3, 0];

    (vertices, indices)
}

/// Unit billboard quad: one unit wide centered on X, rising from y = 0 to
/// y = 1 in the XY plane. Used for seaweed and fish sprites.
pub fn quad_geometry() -> (Vec<Vertex3d>, Vec<u32>) {
    let vertices = vec![
        Vertex3d::new([-0.5, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
        Vertex3d::new([0.5, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
        Vertex3d::new([0.5, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
        Vertex3d::new([-0.5, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
    ];

    let indices = vec![0, 1, 2, 2, 3, 0];

    (vertices, indices)
}

/// GPU-resident geometry with vertex and index buffers.
///
/// Immutable after creation; dynamic geometry (the frustum overlay) is
/// rebuilt by creating a new mesh.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Unit cube centered at the origin.
    pub fn cube(gpu: &GpuContext) -> Self {
        let (vertices, indices) = cube_geometry();
        Self::new(gpu, &vertices, &indices)
    }

    /// UV sphere of unit radius.
    pub fn sphere(gpu: &GpuContext, segments: u32, rings: u32) -> Self {
        let (vertices, indices) = sphere_geometry(segments, rings);
        Self::new(gpu, &vertices, &indices)
    }

    /// Square XZ plane of the given side length.
    pub fn plane(gpu: &GpuContext, size: f32) -> Self {
        let (vertices, indices) = plane_geometry(size);
        Self::new(gpu, &vertices, &indices)
    }

    /// Unit billboard quad in the XY plane.
    pub fn quad(gpu: &GpuContext) -> Self {
        let (vertices, indices) = quad_geometry();
        Self::new(gpu, &vertices, &indices)
    }
}

/// Names one of the shared primitive meshes owned by [`PrimitiveSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Cube,
    Sphere,
    Plane,
    Quad,
    /// Per-frame frustum overlay geometry; absent until first computed.
    Frustum,
}

/// The shared meshes every draw command indexes into.
pub struct PrimitiveSet {
    pub cube: Mesh,
    pub sphere: Mesh,
    pub plane: Mesh,
    pub quad: Mesh,
    /// Rebuilt each frame from the active camera's frustum.
    pub frustum: Option<Mesh>,
}

impl PrimitiveSet {
    pub fn new(gpu: &GpuContext) -> Self {
        Self {
            cube: Mesh::cube(gpu),
            sphere: Mesh::sphere(gpu, 32, 16),
            plane: Mesh::plane(gpu, 200.0),
            quad: Mesh::quad(gpu),
            frustum: None,
        }
    }

    /// Resolves a primitive name to its mesh. `None` only for a frustum that
    /// has not been computed yet this session.
    pub fn resolve(&self, primitive: Primitive) -> Option<&Mesh> {
        match primitive {
            Primitive::Cube => Some(&self.cube),
            Primitive::Sphere => Some(&self.sphere),
            Primitive::Plane => Some(&self.plane),
            Primitive::Quad => Some(&self.quad),
            Primitive::Frustum => self.frustum.as_ref(),
        }
    }
}

/// A stack of model matrices for composing hierarchical transforms.
///
/// Seeded with identity. `push` duplicates the top so a sub-assembly can
/// extend the current frame and `pop` back out of it; `save` replaces the
/// top with a new composition.
#[derive(Clone, Debug)]
pub struct MatrixStack {
    stack: Vec<Mat4>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
        }
    }

    /// Duplicates the current top.
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    /// Discards the current top. The identity seed is never popped.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Replaces the top with `matrix`.
    pub fn save(&mut self, matrix: Mat4) {
        *self.stack.last_mut().unwrap() = matrix;
    }

    pub fn top(&self) -> Mat4 {
        *self.stack.last().unwrap()
    }

    /// Multiplies a translation onto the top.
    pub fn translate(&mut self, offset: Vec3) {
        self.save(self.top() * Mat4::from_translation(offset));
    }

    /// Multiplies a rotation about X onto the top. Radians.
    pub fn rotate_x(&mut self, angle: f32) {
        self.save(self.top() * Mat4::from_rotation_x(angle));
    }

    /// Multiplies a rotation about Y onto the top. Radians.
    pub fn rotate_y(&mut self, angle: f32) {
        self.save(self.top() * Mat4::from_rotation_y(angle));
    }

    /// Multiplies a rotation about Z onto the top. Radians.
    pub fn rotate_z(&mut self, angle: f32) {
        self.save(self.top() * Mat4::from_rotation_z(angle));
    }

    /// Multiplies a non-uniform scale onto the top.
    pub fn scale(&mut self, factor: Vec3) {
        self.save(self.top() * Mat4::from_scale(factor));
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}
