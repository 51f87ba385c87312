//! # Physical State
//!
//! [`BodyData`] is the value type shared by both body kinds: a rigid body
//! owns one, a soft-body lattice owns one per node. It carries the
//! symplectic-Euler integration primitives so the two kinds integrate
//! identically.

use glam::{Mat3, Vec3};

/// Inertia of a unit cube per kilogram.
const UNIT_CUBE_INERTIA: f32 = 1.0 / 6.0;

/// Kinematic and mass state of a single point of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyData {
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Inertia per kilogram, so the tensor follows mass changes.
    unit_inertia: Mat3,
    inv_inertia: Mat3,
    force: Vec3,
    torque: Vec3,
    inv_mass: f32,
    restitution: f32,
}

impl BodyData {
    /// Create a body at rest. `mass <= 0` yields an immovable body.
    ///
    /// The inertia tensor starts as that of a unit cube, `(mass / 6) * I`.
    #[must_use]
    pub fn new(position: Vec3, rotation: Vec3, mass: f32, restitution: f32) -> Self {
        let mut data = Self {
            position,
            rotation,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            unit_inertia: Mat3::from_diagonal(Vec3::splat(UNIT_CUBE_INERTIA)),
            inv_inertia: Mat3::ZERO,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            inv_mass: 0.0,
            restitution: 0.0,
        };
        data.set_mass(mass);
        data.set_restitution(restitution);
        data
    }

    #[must_use]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Mass in kilograms, `f32::INFINITY` for immovable bodies.
    #[must_use]
    pub fn mass(&self) -> f32 {
        if self.inv_mass == 0.0 {
            f32::INFINITY
        } else {
            1.0 / self.inv_mass
        }
    }

    #[must_use]
    pub fn is_immovable(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Non-positive and non-finite masses are coerced to infinite mass.
    /// The inertia tensor is rescaled to the new mass.
    pub fn set_mass(&mut self, mass: f32) {
        self.inv_mass = if mass > 0.0 && mass.is_finite() {
            1.0 / mass
        } else {
            0.0
        };
        self.refresh_inertia();
    }

    #[must_use]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = if restitution.is_nan() {
            0.0
        } else {
            restitution.clamp(0.0, 1.0)
        };
    }

    /// Zero for immovable bodies.
    #[must_use]
    pub fn inertia(&self) -> Mat3 {
        if self.is_immovable() {
            Mat3::ZERO
        } else {
            self.unit_inertia * self.mass()
        }
    }

    #[must_use]
    pub fn inv_inertia(&self) -> Mat3 {
        self.inv_inertia
    }

    /// Ignored for immovable bodies, whose inertia stays zero.
    pub fn set_inertia(&mut self, inertia: Mat3) {
        if self.is_immovable() {
            return;
        }
        self.unit_inertia = inertia * self.inv_mass;
        self.refresh_inertia();
    }

    fn refresh_inertia(&mut self) {
        let inertia = self.inertia();
        self.inv_inertia = if inertia.determinant().abs() > f32::EPSILON {
            inertia.inverse()
        } else {
            Mat3::ZERO
        };
    }

    #[must_use]
    pub fn force(&self) -> Vec3 {
        self.force
    }

    #[must_use]
    pub fn torque(&self) -> Vec3 {
        self.torque
    }

    pub fn apply_force(&mut self, force: Vec3) {
        if self.is_immovable() {
            return;
        }
        self.force += force;
    }

    /// Accumulate `force × (world_point − position)`.
    pub fn apply_torque(&mut self, force: Vec3, world_point: Vec3) {
        if self.is_immovable() {
            return;
        }
        self.torque += force.cross(world_point - self.position);
    }

    /// Instantaneous change of linear velocity.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse * self.inv_mass;
    }

    /// Symplectic Euler velocity update, then clear the accumulators.
    pub fn integrate_forces(&mut self, dt: f32) {
        self.velocity += self.force * dt * self.inv_mass;
        self.angular_velocity += self.inv_inertia * (self.torque * dt);
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    pub fn integrate_velocity(&mut self, dt: f32) {
        if self.is_immovable() {
            return;
        }
        self.position += self.velocity * dt;
        self.rotation += self.angular_velocity * dt;
    }
}
