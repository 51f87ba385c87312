//! Broad-phase collision detection: exhaustive pair scan

use glam::Vec3;

use super::{CollisionManifold, CollisionObject};

/// Every pair to test, as index pairs into the object list.
///
/// Without `dedupe` both orderings `(i, j)` and `(j, i)` are produced, so a
/// single overlap yields two mirrored manifolds.
#[must_use]
pub fn collision_pairs(count: usize, dedupe: bool) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..count {
        let start = if dedupe { i + 1 } else { 0 };
        for j in start..count {
            if i != j {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Run SAT for one ordered pair and build its manifold.
#[must_use]
pub fn detect_pair(a: &CollisionObject<'_>, b: &CollisionObject<'_>) -> Option<CollisionManifold> {
    let mtv = a.collider.calculate_mtv(a.transform, b.collider, b.transform)?;
    if mtv == Vec3::ZERO {
        return None;
    }

    let center = |object: &CollisionObject<'_>| {
        object
            .transform
            .and_then(|t| object.collider.world_center(t))
            .unwrap_or(Vec3::ZERO)
    };

    let normal = mtv.normalize();
    let contact_point = a
        .collider
        .calculate_contact_point(a.transform, b.collider, b.transform, normal)
        .unwrap_or_else(|| (center(a) + center(b)) * 0.5);

    Some(CollisionManifold {
        body_a: a.body,
        body_b: b.body,
        normal,
        depth: mtv.length(),
        contact_point,
    })
}
