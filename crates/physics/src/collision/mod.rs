//! # Collision Detection and Response
//!
//! This module handles convex collision detection with the Separating Axis
//! Theorem and resolves the resulting manifolds with sequential impulses.

mod broad_phase;
mod collider;
mod contact;
mod response;
mod sat;

pub use broad_phase::*;
pub use collider::Collider;
pub use response::*;

use glam::Vec3;

use crate::transform::Transform;

/// Tunable thresholds used by the SAT and contact code.
pub mod tolerance {
    /// Absolute tolerance: parallel axes, vertex ties, degenerate lengths.
    pub const EPSILON: f32 = 1e-5;
    /// Relative tolerance for vertex ties, scaled by the projected extent.
    pub const RELATIVE_EPSILON: f32 = 1e-3;
    /// Normals closer than this (component-wise) are treated as duplicates.
    pub const NORMAL_EPSILON: f32 = 1e-4;
    /// MTV components below this are snapped to zero.
    pub const SNAP_EPSILON: f32 = 2.0 * EPSILON;
}

/// Index of a body slot in the collection handed to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub usize);

/// One detected overlapping pair, consumed during resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionManifold {
    /// `None` marks a collider without a body, treated as immovable.
    pub body_a: Option<BodyHandle>,
    pub body_b: Option<BodyHandle>,
    /// Unit normal pointing from A towards B.
    pub normal: Vec3,
    /// Penetration depth, never negative.
    pub depth: f32,
    /// World-space contact point, midway through the overlap. Falls back
    /// to the midpoint of the two collider centres when the contact cannot
    /// be derived.
    pub contact_point: Vec3,
}

/// A collider as seen by the broad phase for one tick.
#[derive(Debug, Clone, Copy)]
pub struct CollisionObject<'a> {
    pub collider: &'a Collider,
    pub transform: Option<&'a Transform>,
    pub body: Option<BodyHandle>,
}
