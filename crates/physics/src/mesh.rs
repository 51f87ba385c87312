//! Mesh data handed to the physics layer by the asset loader.

use glam::Vec3;
use tracing::trace;

use crate::error::PhysicsError;

/// Static triangle mesh. Colliders share it through an `Arc` and never own it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Validate and wrap raw vertex/index buffers.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidMesh`] when the index count is not a
    /// multiple of three or an index points past the vertex buffer.
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, PhysicsError> {
        if indices.len() % 3 != 0 {
            return Err(PhysicsError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(PhysicsError::InvalidMesh(format!(
                "index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }
        Ok(Self { vertices, indices })
    }

    /// Axis-aligned box centred on the origin, wound counter-clockwise
    /// when seen from outside.
    #[must_use]
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents;
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 3, 2,  0, 2, 1, // -Z
            4, 5, 6,  4, 6, 7, // +Z
            0, 4, 7,  0, 7, 3, // -X
            1, 2, 6,  1, 6, 5, // +X
            0, 1, 5,  0, 5, 4, // -Y
            3, 7, 6,  3, 6, 2, // +Y
        ];
        Self { vertices, indices }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    Static,
    Dynamic,
}

/// Render mesh whose vertices are rewritten every frame by a soft body.
///
/// The renderer polls [`DeformableMesh::revision`] and re-uploads
/// [`DeformableMesh::vertex_bytes`] when it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct DeformableMesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    revision: u64,
}

impl DeformableMesh {
    #[must_use]
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            vertices: mesh.vertices.clone(),
            indices: mesh.indices.clone(),
            revision: 0,
        }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Out-of-range writes are ignored.
    pub fn set_vertex(&mut self, index: usize, position: Vec3) {
        if let Some(v) = self.vertices.get_mut(index) {
            *v = position;
        }
    }

    #[must_use]
    pub const fn usage(&self) -> BufferUsage {
        BufferUsage::Dynamic
    }

    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Mark the vertex buffer as changed for the renderer.
    pub fn upload(&mut self) {
        self.revision += 1;
        trace!(
            revision = self.revision,
            bytes = self.vertex_bytes().len(),
            "deformable vertex buffer uploaded"
        );
    }
}
