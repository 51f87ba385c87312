//! # Simulation Parameters
//!
//! Plain numeric configuration for the world and for each body kind. The
//! scene loader deserializes these straight from JSON; every field has a
//! default so partial descriptions are accepted.

use glam::{UVec3, Vec3};
use serde::Deserialize;

/// World-wide parameters for the fixed-tick pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed physics time step in seconds.
    pub fixed_dt: f32,
    /// Upper bound on ticks run by a single `World::step` call.
    pub max_substeps: u32,
    /// Gravitational acceleration.
    pub gravity: Vec3,
    /// Fraction of the remaining penetration removed per manifold.
    pub correction_percent: f32,
    /// Penetration allowed before positional correction kicks in.
    pub slop: f32,
    /// Visit each unordered collider pair once instead of in both orders.
    pub dedupe_pairs: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_substeps: 8,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            correction_percent: 0.1,
            slop: 0.05,
            dedupe_pairs: false,
        }
    }
}

/// Parameters of a single-mass rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RigidbodyConfig {
    /// Mass in kilograms. Values `<= 0` make the body immovable.
    pub mass: f32,
    /// Bounciness, clamped to `[0, 1]`.
    pub restitution: f32,
    pub gravity_scale: f32,
    /// Maximum magnitude of the air-drag force.
    pub drag: f32,
}

impl Default for RigidbodyConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            restitution: 0.5,
            gravity_scale: 1.0,
            drag: 0.1,
        }
    }
}

/// Parameters of a mass-spring lattice.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SoftbodyConfig {
    /// Number of nodes along each axis.
    pub grid: UVec3,
    /// Extent of the lattice bounding box.
    pub size: Vec3,
    pub spring_constant: f32,
    pub dampening: f32,
}

impl Default for SoftbodyConfig {
    fn default() -> Self {
        Self {
            grid: UVec3::splat(4),
            size: Vec3::ONE,
            spring_constant: 100.0,
            dampening: 0.5,
        }
    }
}
