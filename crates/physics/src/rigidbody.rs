//! Single-mass rigid body

use glam::{Mat3, Vec3};
use tracing::warn;

use crate::body::PhysicsBody;
use crate::body_data::BodyData;
use crate::config::RigidbodyConfig;
use crate::transform::Transform;

#[derive(Debug, Clone, PartialEq)]
pub struct Rigidbody {
    data: BodyData,
    gravity_scale: f32,
    drag: f32,
}

impl Rigidbody {
    /// Place the body at the transform's position and rotation.
    ///
    /// The inertia tensor defaults to that of a unit cube of the configured
    /// mass, `(mass / 6) * I`.
    #[must_use]
    pub fn new(config: RigidbodyConfig, transform: &Transform) -> Self {
        if config.mass <= 0.0 {
            warn!(mass = config.mass, "non-positive mass, body made immovable");
        }
        let data = BodyData::new(
            transform.position(),
            transform.rotation(),
            config.mass,
            config.restitution,
        );
        Self {
            data,
            gravity_scale: config.gravity_scale,
            drag: config.drag.max(0.0),
        }
    }

    #[must_use]
    pub fn data(&self) -> &BodyData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut BodyData {
        &mut self.data
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.data.position
    }

    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.data.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        if !self.data.is_immovable() {
            self.data.velocity = velocity;
        }
    }

    #[must_use]
    pub fn inv_mass(&self) -> f32 {
        self.data.inv_mass()
    }

    /// Rescales the inertia tensor along with the mass.
    pub fn set_mass(&mut self, mass: f32) {
        self.data.set_mass(mass);
    }

    pub fn set_restitution(&mut self, restitution: f32) {
        self.data.set_restitution(restitution);
    }

    pub fn set_inertia(&mut self, inertia: Mat3) {
        self.data.set_inertia(inertia);
    }

    #[must_use]
    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    pub fn set_gravity_scale(&mut self, gravity_scale: f32) {
        self.gravity_scale = gravity_scale;
    }

    pub fn apply_force(&mut self, force: Vec3) {
        self.data.apply_force(force);
    }

    pub fn apply_torque(&mut self, force: Vec3, world_point: Vec3) {
        self.data.apply_torque(force, world_point);
    }

    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.data.apply_impulse(impulse);
    }
}

impl PhysicsBody for Rigidbody {
    fn update(&mut self, gravity: Vec3) {
        if self.data.is_immovable() {
            return;
        }
        let weight = gravity * self.gravity_scale * self.data.mass();
        self.data.apply_force(weight);

        // Air resistance, capped at the drag constant
        let speed = self.data.velocity.length();
        if speed > f32::EPSILON {
            let direction = self.data.velocity / speed;
            self.data.apply_force(-direction * speed.min(self.drag));
        }
    }

    fn integrate_forces(&mut self, dt: f32) {
        self.data.integrate_forces(dt);
    }

    fn integrate_velocity(&mut self, dt: f32) {
        self.data.integrate_velocity(dt);
    }

    fn closest_body_data(&self, _point: Vec3) -> Option<&BodyData> {
        Some(&self.data)
    }

    fn closest_body_data_mut(&mut self, _point: Vec3) -> Option<&mut BodyData> {
        Some(&mut self.data)
    }

    fn update_visual(&mut self, transform: &mut Transform) {
        transform.set_position_rotation(self.data.position, self.data.rotation);
    }
}
