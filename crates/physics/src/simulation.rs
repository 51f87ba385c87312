//! # Physics Simulation Core
//!
//! [`World`] is the flat entity store the pipeline runs over. It owns one
//! transform per entity plus an optional collider and body, and advances
//! them with a fixed time step.

use tracing::{debug, warn};

use crate::body::{Body, PhysicsBody};
use crate::collision::{BodyHandle, Collider, CollisionObject};
use crate::config::PhysicsConfig;
use crate::handler::{PhysicsHandler, ResolveStats};
use crate::transform::Transform;

/// Handle to an entity in a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

/// Summary of one fixed tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub manifolds: usize,
    pub resolve: ResolveStats,
}

/// Main physics simulation container
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) config: PhysicsConfig,
    pub(crate) names: Vec<String>,
    pub(crate) transforms: Vec<Transform>,
    pub(crate) colliders: Vec<Option<Collider>>,
    pub(crate) bodies: Vec<Option<Body>>,
    handler: PhysicsHandler,
    accumulator: f32,
    ticks: u64,
}

impl World {
    #[must_use]
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            names: Vec::new(),
            transforms: Vec::new(),
            colliders: Vec::new(),
            bodies: Vec::new(),
            handler: PhysicsHandler::new(&config),
            accumulator: 0.0,
            ticks: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    #[must_use]
    pub fn handler(&self) -> &PhysicsHandler {
        &self.handler
    }

    /// Total fixed ticks run so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance by a variable frame time, running as many fixed ticks as fit.
    /// Returns the number of ticks run.
    pub fn step(&mut self, frame_dt: f32) -> usize {
        let fixed_dt = self.config.fixed_dt;
        if fixed_dt <= 0.0 || !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt;

        let mut ran = 0;
        while self.accumulator >= fixed_dt && ran < self.config.max_substeps as usize {
            self.tick();
            self.accumulator -= fixed_dt;
            ran += 1;
        }
        if self.accumulator >= fixed_dt {
            warn!(
                dropped = self.accumulator,
                max_substeps = self.config.max_substeps,
                "physics falling behind, dropping accumulated time"
            );
            self.accumulator %= fixed_dt;
        }
        ran
    }

    /// Run exactly one fixed tick.
    pub fn tick(&mut self) -> TickReport {
        let dt = self.config.fixed_dt;
        let gravity = self.config.gravity;

        for body in self.bodies.iter_mut().flatten() {
            body.update(gravity);
            body.integrate_forces(dt);
        }

        let objects: Vec<CollisionObject<'_>> = self
            .colliders
            .iter()
            .enumerate()
            .filter_map(|(i, collider)| {
                collider.as_ref().map(|collider| CollisionObject {
                    collider,
                    transform: Some(&self.transforms[i]),
                    body: self.bodies[i].is_some().then_some(BodyHandle(i)),
                })
            })
            .collect();
        let manifolds = self.handler.check_for_collisions(&objects);
        drop(objects);

        self.handler.narrow_phase();
        let resolve = self.handler.resolve_collisions(&mut self.bodies);

        for (body, transform) in self.bodies.iter_mut().zip(self.transforms.iter_mut()) {
            if let Some(body) = body {
                body.integrate_velocity(dt);
                body.update_visual(transform);
            }
        }

        self.ticks += 1;
        debug!(tick = self.ticks, manifolds, "physics tick");
        TickReport { manifolds, resolve }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
