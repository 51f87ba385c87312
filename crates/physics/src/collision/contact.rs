//! Contact point derivation for an already detected collision

use glam::Vec3;

use super::sat::project;
use super::tolerance::{EPSILON, RELATIVE_EPSILON};
use super::Collider;
use crate::transform::Transform;

impl Collider {
    /// World-space contact point between `self` and `other` along `normal`
    /// (pointing from `self` towards `other`).
    ///
    /// The deepest features of both shapes along the normal classify the
    /// contact: a lone vertex on either side is a face-to-point contact, two
    /// edges meet at the closest points of their segments, and anything
    /// larger is clipped as face-to-face / edge-to-face on the contact plane.
    #[must_use]
    pub fn calculate_contact_point(
        &self,
        transform: Option<&Transform>,
        other: &Collider,
        other_transform: Option<&Transform>,
        normal: Vec3,
    ) -> Option<Vec3> {
        let (Some(transform_a), Some(transform_b)) = (transform, other_transform) else {
            return None;
        };
        let normal = normal.normalize_or_zero();
        if normal == Vec3::ZERO {
            return None;
        }

        let vertices_a = unique_points(self.world_vertices(transform_a));
        let vertices_b = unique_points(other.world_vertices(transform_b));
        if vertices_a.is_empty() || vertices_b.is_empty() {
            return None;
        }

        let support_a = support_set(&vertices_a, normal);
        let support_b = support_set(&vertices_b, -normal);

        let point = match (support_a.as_slice(), support_b.as_slice()) {
            ([vertex], _) | (_, [vertex]) => *vertex,
            ([a0, a1], [b0, b1]) => {
                let (on_a, on_b) = closest_points_on_segments(*a0, *a1, *b0, *b1);
                (on_a + on_b) * 0.5
            }
            _ => clipped_midpoint(&support_a, &support_b, normal),
        };
        Some(point)
    }
}

/// Meshes often split vertices per face; merge coincident positions.
fn unique_points(points: Vec<Vec3>) -> Vec<Vec3> {
    let mut unique: Vec<Vec3> = Vec::with_capacity(points.len());
    for p in points {
        if !unique.iter().any(|u| u.distance_squared(p) <= EPSILON * EPSILON) {
            unique.push(p);
        }
    }
    unique
}

/// Vertices tied for the most extreme projection along `direction`.
fn support_set(points: &[Vec3], direction: Vec3) -> Vec<Vec3> {
    let (min, max) = project(points, direction);
    let tolerance = (RELATIVE_EPSILON * (max - min)).max(EPSILON);
    points
        .iter()
        .copied()
        .filter(|p| p.dot(direction) >= max - tolerance)
        .collect()
}

/// Midpoint of the overlap of both support features, solved as two 1-D
/// problems on axes orthogonal to `normal` plus the mid-plane along it.
fn clipped_midpoint(support_a: &[Vec3], support_b: &[Vec3], normal: Vec3) -> Vec3 {
    let u = normal.any_orthonormal_vector();
    let v = normal.cross(u);

    let overlap_mid = |axis: Vec3| {
        let (min_a, max_a) = project(support_a, axis);
        let (min_b, max_b) = project(support_b, axis);
        (min_a.max(min_b) + max_a.min(max_b)) * 0.5
    };

    let (_, deepest_a) = project(support_a, normal);
    let (deepest_b, _) = project(support_b, normal);
    let along_normal = (deepest_a + deepest_b) * 0.5;

    u * overlap_mid(u) + v * overlap_mid(v) + normal * along_normal
}

/// Closest points between segments `p1q1` and `p2q2`.
pub(crate) fn closest_points_on_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    if a <= EPSILON && e <= EPSILON {
        return (p1, p2);
    }

    let (s, t) = if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            // Parallel segments: any s works, start from p1
            let mut s = if denom.abs() > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}
