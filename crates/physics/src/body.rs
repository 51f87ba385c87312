//! # Body Integration Contract
//!
//! [`PhysicsBody`] is the only view the collision pipeline has of a body.
//! [`Body`] is the tagged variant the world stores, forwarding to the
//! concrete kind.

use glam::Vec3;

use crate::body_data::BodyData;
use crate::rigidbody::Rigidbody;
use crate::softbody::Softbody;
use crate::transform::Transform;

/// A contact seen from one body. `normal` points out of the body towards
/// the shape it touches, and `point` sits midway through the overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyContact {
    pub point: Vec3,
    pub normal: Vec3,
    pub depth: f32,
}

impl BodyContact {
    /// A point on the other shape's deepest face.
    #[must_use]
    pub fn surface(&self) -> Vec3 {
        self.point - self.normal * (self.depth * 0.5)
    }

    /// How far `position` has crossed the other shape's face. Negative
    /// while still outside.
    #[must_use]
    pub fn penetration(&self, position: Vec3) -> f32 {
        (position - self.surface()).dot(self.normal)
    }
}

/// Operations shared by every dynamics body.
pub trait PhysicsBody {
    /// Accumulate this tick's forces (gravity, drag, springs).
    fn update(&mut self, gravity: Vec3);

    /// Velocity from accumulated force and torque; clears the accumulators.
    fn integrate_forces(&mut self, dt: f32);

    /// Position and rotation from velocity.
    fn integrate_velocity(&mut self, dt: f32);

    /// State record nearest to `point`; the one record of a rigid body.
    fn closest_body_data(&self, point: Vec3) -> Option<&BodyData>;

    fn closest_body_data_mut(&mut self, point: Vec3) -> Option<&mut BodyData>;

    /// State records absorbing a contact, each with its own penetration
    /// depth. Defaults to the record nearest the contact point at the
    /// contact's depth.
    fn contact_body_data_mut(&mut self, contact: &BodyContact) -> Vec<(&mut BodyData, f32)> {
        self.closest_body_data_mut(contact.point)
            .map(|data| (data, contact.depth))
            .into_iter()
            .collect()
    }

    /// Publish the integrated state to the owning transform or render mesh.
    fn update_visual(&mut self, transform: &mut Transform);
}

#[derive(Debug, Clone)]
pub enum Body {
    Rigid(Rigidbody),
    Soft(Softbody),
}

impl Body {
    #[must_use]
    pub fn as_rigid(&self) -> Option<&Rigidbody> {
        match self {
            Body::Rigid(body) => Some(body),
            Body::Soft(_) => None,
        }
    }

    pub fn as_rigid_mut(&mut self) -> Option<&mut Rigidbody> {
        match self {
            Body::Rigid(body) => Some(body),
            Body::Soft(_) => None,
        }
    }

    #[must_use]
    pub fn as_soft(&self) -> Option<&Softbody> {
        match self {
            Body::Soft(body) => Some(body),
            Body::Rigid(_) => None,
        }
    }

    pub fn as_soft_mut(&mut self) -> Option<&mut Softbody> {
        match self {
            Body::Soft(body) => Some(body),
            Body::Rigid(_) => None,
        }
    }
}

impl PhysicsBody for Body {
    fn update(&mut self, gravity: Vec3) {
        match self {
            Body::Rigid(body) => body.update(gravity),
            Body::Soft(body) => body.update(gravity),
        }
    }

    fn integrate_forces(&mut self, dt: f32) {
        match self {
            Body::Rigid(body) => body.integrate_forces(dt),
            Body::Soft(body) => body.integrate_forces(dt),
        }
    }

    fn integrate_velocity(&mut self, dt: f32) {
        match self {
            Body::Rigid(body) => body.integrate_velocity(dt),
            Body::Soft(body) => body.integrate_velocity(dt),
        }
    }

    fn closest_body_data(&self, point: Vec3) -> Option<&BodyData> {
        match self {
            Body::Rigid(body) => body.closest_body_data(point),
            Body::Soft(body) => body.closest_body_data(point),
        }
    }

    fn closest_body_data_mut(&mut self, point: Vec3) -> Option<&mut BodyData> {
        match self {
            Body::Rigid(body) => body.closest_body_data_mut(point),
            Body::Soft(body) => body.closest_body_data_mut(point),
        }
    }

    fn contact_body_data_mut(&mut self, contact: &BodyContact) -> Vec<(&mut BodyData, f32)> {
        match self {
            Body::Rigid(body) => body.contact_body_data_mut(contact),
            Body::Soft(body) => body.contact_body_data_mut(contact),
        }
    }

    fn update_visual(&mut self, transform: &mut Transform) {
        match self {
            Body::Rigid(body) => body.update_visual(transform),
            Body::Soft(body) => body.update_visual(transform),
        }
    }
}

impl From<Rigidbody> for Body {
    fn from(body: Rigidbody) -> Self {
        Body::Rigid(body)
    }
}

impl From<Softbody> for Body {
    fn from(body: Softbody) -> Self {
        Body::Soft(body)
    }
}
