//! Separating Axis Theorem over two convex meshes

use glam::Vec3;

use super::collider::centroid;
use super::tolerance::{EPSILON, SNAP_EPSILON};
use super::Collider;
use crate::transform::Transform;

impl Collider {
    /// Minimum translation vector separating `self` from `other`.
    ///
    /// Returns `None` when a separating axis exists, or when either side has
    /// no mesh, no transform, no vertices or no usable axis. The returned
    /// vector points from `self` towards `other` and its length is the
    /// penetration depth along the least-penetrating axis.
    #[must_use]
    pub fn calculate_mtv(
        &self,
        transform: Option<&Transform>,
        other: &Collider,
        other_transform: Option<&Transform>,
    ) -> Option<Vec3> {
        let (Some(transform_a), Some(transform_b)) = (transform, other_transform) else {
            return None;
        };
        if self.mesh().is_none() || other.mesh().is_none() {
            return None;
        }

        let vertices_a = self.world_vertices(transform_a);
        let vertices_b = other.world_vertices(transform_b);
        let (Some(center_a), Some(center_b)) = (centroid(&vertices_a), centroid(&vertices_b)) else {
            return None;
        };

        let normals_a = self.world_normals(transform_a);
        let normals_b = other.world_normals(transform_b);
        if normals_a.is_empty() || normals_b.is_empty() {
            return None;
        }
        let axes = candidate_axes(&normals_a, &normals_b);

        let mut min_overlap = f32::INFINITY;
        let mut best_axis = Vec3::ZERO;
        for axis in axes {
            let overlap = axis_overlap(axis, &vertices_a, &vertices_b)?;
            if overlap < min_overlap {
                min_overlap = overlap;
                best_axis = axis;
            }
        }

        // Point from A towards B
        if best_axis.dot(center_b - center_a) < 0.0 {
            best_axis = -best_axis;
        }

        Some(snap_to_zero(best_axis * min_overlap))
    }
}

/// Face normals of both sides followed by their non-parallel cross products.
fn candidate_axes(normals_a: &[Vec3], normals_b: &[Vec3]) -> Vec<Vec3> {
    let mut axes = Vec::with_capacity(normals_a.len() + normals_b.len() + normals_a.len() * normals_b.len());
    axes.extend_from_slice(normals_a);
    axes.extend_from_slice(normals_b);
    for a in normals_a {
        for b in normals_b {
            let axis = a.cross(*b);
            let length = axis.length();
            if length < EPSILON {
                continue; // Parallel
            }
            axes.push(axis / length);
        }
    }
    axes
}

/// `[min, max]` of the points projected onto `axis`.
pub(super) fn project(points: &[Vec3], axis: Vec3) -> (f32, f32) {
    points.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), p| {
        let d = p.dot(axis);
        (min.min(d), max.max(d))
    })
}

/// Translation needed along `axis` to separate the two point sets, or
/// `None` if their projections do not overlap.
fn axis_overlap(axis: Vec3, vertices_a: &[Vec3], vertices_b: &[Vec3]) -> Option<f32> {
    let (min_a, max_a) = project(vertices_a, axis);
    let (min_b, max_b) = project(vertices_b, axis);
    if max_a <= min_b || max_b <= min_a {
        return None;
    }
    Some((max_a - min_b).min(max_b - min_a))
}

fn snap_to_zero(v: Vec3) -> Vec3 {
    let snap = |c: f32| if c.abs() < SNAP_EPSILON { 0.0 } else { c };
    Vec3::new(snap(v.x), snap(v.y), snap(v.z))
}
