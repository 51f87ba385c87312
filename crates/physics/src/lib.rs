#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    clippy::similar_names,
    clippy::must_use_candidate
)]
//! # Convex Physics
//!
//! Collision detection and body dynamics for a real-time 3D engine.
//!
//! The crate detects overlaps between convex meshes with the Separating Axis
//! Theorem, resolves them with sequential impulses and Baumgarte-style
//! positional correction, and integrates two kinds of bodies through one
//! contract.
//!
//! ## Key Components
//!
//! -   **[`BodyData`]:** the physical state record shared by every body,
//!     with symplectic-Euler integration primitives.
//! -   **[`Collider`]:** a convex hull around a shared [`Mesh`], answering
//!     minimum-translation-vector and contact-point queries.
//! -   **[`PhysicsHandler`]:** the per-tick pipeline. All-pairs detection
//!     fills a FIFO of [`CollisionManifold`]s that resolution drains in
//!     order.
//! -   **[`Rigidbody`] / [`Softbody`]:** a single mass and a mass-spring
//!     lattice, both behind the [`PhysicsBody`] trait.
//! -   **[`World`]:** a flat entity store that runs the fixed-step loop.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use glam::Vec3;
//! use physics::{Collider, Mesh, PhysicsConfig, RigidbodyConfig, Transform, World};
//!
//! let cube = Arc::new(Mesh::cuboid(Vec3::splat(0.5)));
//! let mut world = World::new(PhysicsConfig::default());
//!
//! let ground = world.spawn("ground", Transform::from_position(Vec3::new(0.0, -1.0, 0.0)));
//! world.set_collider(ground, Collider::with_mesh(cube.clone()))?;
//!
//! let crate_box = world.spawn("crate", Transform::from_position(Vec3::new(0.0, 2.0, 0.0)));
//! world.set_collider(crate_box, Collider::with_mesh(cube))?;
//! world.attach_rigidbody(crate_box, RigidbodyConfig::default())?;
//!
//! world.step(1.0 / 30.0);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod body;
pub mod body_data;
mod builder;
pub mod collision;
pub mod config;
pub mod error;
pub mod handler;
pub mod mesh;
pub mod rigidbody;
pub mod simulation;
pub mod softbody;
pub mod transform;

pub use body::{Body, BodyContact, PhysicsBody};
pub use body_data::BodyData;
pub use collision::{BodyHandle, Collider, CollisionManifold, CollisionObject, CollisionSolver, Resolution};
pub use config::{PhysicsConfig, RigidbodyConfig, SoftbodyConfig};
pub use error::PhysicsError;
pub use handler::{PhysicsHandler, ResolveStats};
pub use mesh::{BufferUsage, DeformableMesh, Mesh};
pub use rigidbody::Rigidbody;
pub use simulation::{EntityId, TickReport, World};
pub use softbody::{NodeIndex, Softbody};
pub use transform::Transform;
