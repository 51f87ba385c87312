//! Convex collider built from a shared mesh

use std::sync::Arc;

use glam::{Mat3, Mat4, Vec3};
use tracing::debug;

use super::tolerance::{EPSILON, NORMAL_EPSILON};
use crate::mesh::Mesh;
use crate::transform::{to_offset_scale_matrix, Transform};

/// Convex hull wrapper around a collision mesh.
///
/// The mesh is placed by `owner_world * translate(offset) * scale(scale)`.
/// Face normals are cached in mesh space and kept consistent with the
/// assigned mesh.
#[derive(Debug, Clone)]
pub struct Collider {
    mesh: Option<Arc<Mesh>>,
    offset: Vec3,
    scale: Vec3,
    offset_scale: Mat4,
    normals: Vec<Vec3>,
}

impl Collider {
    /// A collider without a mesh, which never collides.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mesh: None,
            offset: Vec3::ZERO,
            scale: Vec3::ONE,
            offset_scale: Mat4::IDENTITY,
            normals: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_mesh(mesh: Arc<Mesh>) -> Self {
        let mut collider = Self::new();
        collider.set_mesh(Some(mesh));
        collider
    }

    /// Assign or clear the collision mesh and rebuild the normal cache.
    pub fn set_mesh(&mut self, mesh: Option<Arc<Mesh>>) {
        self.normals = mesh.as_deref().map(unique_face_normals).unwrap_or_default();
        if let Some(mesh) = &mesh {
            debug!(
                vertices = mesh.vertices().len(),
                normals = self.normals.len(),
                "collider mesh assigned"
            );
        }
        self.mesh = mesh;
    }

    #[must_use]
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }

    #[must_use]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_offset(&mut self, offset: Vec3) {
        self.offset = offset;
        self.offset_scale = to_offset_scale_matrix(self.offset, self.scale);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.offset_scale = to_offset_scale_matrix(self.offset, self.scale);
    }

    #[must_use]
    pub fn offset_scale_matrix(&self) -> Mat4 {
        self.offset_scale
    }

    /// Unique mesh-space face normals; a normal and its negation count once.
    #[must_use]
    pub fn face_normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Mesh space to world space.
    #[must_use]
    pub fn model_matrix(&self, transform: &Transform) -> Mat4 {
        transform.world_matrix() * self.offset_scale
    }

    /// Mesh vertices in world space; empty without a mesh.
    #[must_use]
    pub fn world_vertices(&self, transform: &Transform) -> Vec<Vec3> {
        let Some(mesh) = &self.mesh else {
            return Vec::new();
        };
        let model = self.model_matrix(transform);
        mesh.vertices().iter().map(|&v| model.transform_point3(v)).collect()
    }

    /// Face normals in world space, carried by the inverse-transpose so
    /// non-uniform scale keeps them perpendicular to the faces. A singular
    /// placement yields no normals.
    #[must_use]
    pub fn world_normals(&self, transform: &Transform) -> Vec<Vec3> {
        let linear = Mat3::from_mat4(self.model_matrix(transform));
        if linear.determinant().abs() < EPSILON {
            return Vec::new();
        }
        let normal_matrix = linear.inverse().transpose();
        self.normals
            .iter()
            .map(|&n| (normal_matrix * n).normalize_or_zero())
            .filter(|n| *n != Vec3::ZERO)
            .collect()
    }

    /// Vertex centroid in world space.
    #[must_use]
    pub fn world_center(&self, transform: &Transform) -> Option<Vec3> {
        centroid(&self.world_vertices(transform))
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn centroid(points: &[Vec3]) -> Option<Vec3> {
    if points.is_empty() {
        return None;
    }
    let sum: Vec3 = points.iter().copied().sum();
    Some(sum / points.len() as f32)
}

/// Newell's method over one polygon.
fn newell_normal(polygon: &[Vec3]) -> Vec3 {
    let mut normal = Vec3::ZERO;
    for (i, current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal.normalize_or_zero()
}

fn unique_face_normals(mesh: &Mesh) -> Vec<Vec3> {
    let mut normals: Vec<Vec3> = Vec::new();
    for triangle in mesh.triangles() {
        let normal = newell_normal(&triangle);
        if normal == Vec3::ZERO {
            continue;
        }
        let duplicate = normals.iter().any(|&n| {
            (n - normal).abs().max_element() < NORMAL_EPSILON
                || (n + normal).abs().max_element() < NORMAL_EPSILON
        });
        if !duplicate {
            normals.push(normal);
        }
    }
    normals
}
