//! Impulse-based collision response with positional correction

use glam::Vec3;
use tracing::trace;

use super::CollisionManifold;
use crate::body_data::BodyData;

/// What resolving a single manifold did.
/// Ordered by how much was done, so several outcomes fold with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Resolution {
    /// Both sides immovable.
    Immovable,
    /// Relative velocity along the normal was already non-negative.
    Separating,
    /// Impulse and positional correction applied.
    Resolved,
}

/// Sequential-impulse solver parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSolver {
    /// Fraction of the penetration beyond `slop` removed per manifold.
    pub correction_percent: f32,
    /// Penetration tolerated without correction, to avoid resting jitter.
    pub slop: f32,
}

impl CollisionSolver {
    #[must_use]
    pub const fn new(correction_percent: f32, slop: f32) -> Self {
        Self {
            correction_percent,
            slop,
        }
    }

    /// Resolve one manifold. `None` stands for a collider with no body,
    /// which behaves as an immovable obstacle.
    ///
    /// Velocities change immediately, so a later manifold in the same tick
    /// observes the result.
    pub fn resolve(
        &self,
        manifold: &CollisionManifold,
        body_a: Option<&mut BodyData>,
        body_b: Option<&mut BodyData>,
    ) -> Resolution {
        let inv_mass_a = body_a.as_deref().map_or(0.0, BodyData::inv_mass);
        let inv_mass_b = body_b.as_deref().map_or(0.0, BodyData::inv_mass);
        let inv_mass_sum = inv_mass_a + inv_mass_b;
        if inv_mass_sum == 0.0 {
            return Resolution::Immovable;
        }

        let velocity_a = body_a.as_deref().map_or(Vec3::ZERO, |b| b.velocity);
        let velocity_b = body_b.as_deref().map_or(Vec3::ZERO, |b| b.velocity);
        let normal = manifold.normal;
        let velocity_along_normal = (velocity_b - velocity_a).dot(normal);

        // Don't resolve if velocities are separating
        if velocity_along_normal >= 0.0 {
            return Resolution::Separating;
        }

        // A missing body has no restitution of its own
        let restitution = match (body_a.as_deref(), body_b.as_deref()) {
            (Some(a), Some(b)) => a.restitution().min(b.restitution()),
            (Some(only), None) | (None, Some(only)) => only.restitution(),
            (None, None) => 0.0,
        };

        let j = -(1.0 + restitution) * velocity_along_normal / inv_mass_sum;
        let impulse = normal * j;

        let correction_magnitude =
            self.correction_percent * (manifold.depth - self.slop).max(0.0) / inv_mass_sum;
        let correction = normal * correction_magnitude;

        trace!(
            impulse = j,
            correction = correction_magnitude,
            depth = manifold.depth,
            "manifold resolved"
        );

        if let Some(a) = body_a {
            a.apply_impulse(-impulse);
            a.position -= correction * a.inv_mass();
        }
        if let Some(b) = body_b {
            b.apply_impulse(impulse);
            b.position += correction * b.inv_mass();
        }
        Resolution::Resolved
    }
}

impl Default for CollisionSolver {
    fn default() -> Self {
        Self::new(0.1, 0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::BodyHandle;

    fn manifold(normal: Vec3, depth: f32) -> CollisionManifold {
        CollisionManifold {
            body_a: Some(BodyHandle(0)),
            body_b: Some(BodyHandle(1)),
            normal,
            depth,
            contact_point: Vec3::ZERO,
        }
    }

    #[test]
    fn elastic_head_on_exchanges_velocities() {
        let solver = CollisionSolver::new(0.0, 0.0);
        let mut a = BodyData::new(Vec3::ZERO, Vec3::ZERO, 1.0, 1.0);
        let mut b = BodyData::new(Vec3::X, Vec3::ZERO, 1.0, 1.0);
        a.velocity = Vec3::new(3.0, 0.0, 0.0);
        b.velocity = Vec3::new(-1.0, 0.0, 0.0);

        let outcome = solver.resolve(&manifold(Vec3::X, 0.1), Some(&mut a), Some(&mut b));

        assert_eq!(outcome, Resolution::Resolved);
        assert!((a.velocity.x + 1.0).abs() < 1e-6);
        assert!((b.velocity.x - 3.0).abs() < 1e-6);
    }

    #[test]
    fn separating_bodies_are_untouched() {
        let solver = CollisionSolver::default();
        let mut a = BodyData::new(Vec3::ZERO, Vec3::ZERO, 1.0, 0.5);
        let mut b = BodyData::new(Vec3::X, Vec3::ZERO, 1.0, 0.5);
        a.velocity = Vec3::new(-1.0, 0.0, 0.0);
        b.velocity = Vec3::new(1.0, 0.0, 0.0);

        let outcome = solver.resolve(&manifold(Vec3::X, 0.5), Some(&mut a), Some(&mut b));

        assert_eq!(outcome, Resolution::Separating);
        assert_eq!(a.velocity, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(a.position, Vec3::ZERO);
    }

    #[test]
    fn static_obstacle_absorbs_nothing() {
        let solver = CollisionSolver::default();
        let mut ground = BodyData::new(Vec3::ZERO, Vec3::ZERO, 0.0, 0.0);
        let mut falling = BodyData::new(Vec3::Y, Vec3::ZERO, 2.0, 0.0);
        falling.velocity = Vec3::new(0.0, -4.0, 0.0);

        solver.resolve(&manifold(Vec3::Y, 0.55), Some(&mut ground), Some(&mut falling));

        assert_eq!(ground.velocity, Vec3::ZERO);
        assert_eq!(ground.position, Vec3::ZERO);
        assert!(falling.velocity.y.abs() < 1e-6);
        // 0.1 * (0.55 - 0.05) / 0.5 * 0.5
        assert!((falling.position.y - 1.05).abs() < 1e-6);
    }

    #[test]
    fn missing_body_acts_as_wall() {
        let solver = CollisionSolver::new(0.0, 0.0);
        let mut ball = BodyData::new(Vec3::ZERO, Vec3::ZERO, 1.0, 1.0);
        ball.velocity = Vec3::new(2.0, 0.0, 0.0);

        solver.resolve(&manifold(Vec3::X, 0.1), Some(&mut ball), None);

        assert!((ball.velocity.x + 2.0).abs() < 1e-6);
    }

    #[test]
    fn two_immovable_bodies_are_skipped() {
        let solver = CollisionSolver::default();
        let outcome = solver.resolve(&manifold(Vec3::X, 1.0), None, None);
        assert_eq!(outcome, Resolution::Immovable);
    }
}
