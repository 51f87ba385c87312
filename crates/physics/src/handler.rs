//! # Collision Pipeline
//!
//! [`PhysicsHandler`] runs once per fixed tick: the broad phase fills a FIFO
//! queue of manifolds, the narrow phase is a hook, and resolution drains the
//! queue in discovery order, one impulse per pairing of touching records.

use std::collections::VecDeque;

use tracing::debug;

use crate::body::{BodyContact, PhysicsBody};
use crate::body_data::BodyData;
use crate::collision::{
    collision_pairs, detect_pair, BodyHandle, CollisionManifold, CollisionObject, CollisionSolver,
    Resolution,
};
use crate::config::PhysicsConfig;

/// Counts from the last `resolve_collisions` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStats {
    pub resolved: usize,
    pub separating: usize,
    pub immovable: usize,
}

#[derive(Debug, Clone)]
pub struct PhysicsHandler {
    solver: CollisionSolver,
    dedupe_pairs: bool,
    manifolds: VecDeque<CollisionManifold>,
}

impl PhysicsHandler {
    #[must_use]
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            solver: CollisionSolver::new(config.correction_percent, config.slop),
            dedupe_pairs: config.dedupe_pairs,
            manifolds: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn solver(&self) -> &CollisionSolver {
        &self.solver
    }

    /// Pending manifolds in discovery order.
    pub fn manifolds(&self) -> impl ExactSizeIterator<Item = &CollisionManifold> {
        self.manifolds.iter()
    }

    pub fn clear(&mut self) {
        self.manifolds.clear();
    }

    /// Test every collider pair and queue a manifold for each overlap.
    /// Returns the number of manifolds queued.
    pub fn check_for_collisions(&mut self, objects: &[CollisionObject<'_>]) -> usize {
        let before = self.manifolds.len();
        for (i, j) in collision_pairs(objects.len(), self.dedupe_pairs) {
            if let Some(manifold) = detect_pair(&objects[i], &objects[j]) {
                self.manifolds.push_back(manifold);
            }
        }
        let found = self.manifolds.len() - before;
        debug!(objects = objects.len(), manifolds = found, "broad phase complete");
        found
    }

    /// Contact refinement hook. Callers needing contact points use
    /// [`Collider::calculate_contact_point`](crate::Collider::calculate_contact_point).
    pub fn narrow_phase(&mut self) {}

    /// Drain the queue in FIFO order, a single pass.
    ///
    /// Each side contributes the state records absorbing the contact: the
    /// one record of a rigid body, the touching nodes of a soft body. Every
    /// pairing is resolved at the shallower of the two depths, and the
    /// manifold counts under the strongest outcome.
    pub fn resolve_collisions<B: PhysicsBody>(&mut self, bodies: &mut [Option<B>]) -> ResolveStats {
        let mut stats = ResolveStats::default();
        while let Some(manifold) = self.manifolds.pop_front() {
            let (body_a, body_b) = body_pair_mut(bodies, manifold.body_a, manifold.body_b);
            let contact = BodyContact {
                point: manifold.contact_point,
                normal: manifold.normal,
                depth: manifold.depth,
            };
            let mut side_a = contact_side(body_a, &contact);
            let mut side_b = contact_side(
                body_b,
                &BodyContact {
                    normal: -manifold.normal,
                    ..contact
                },
            );

            let mut outcome = Resolution::Immovable;
            for (data_a, depth_a) in &mut side_a {
                for (data_b, depth_b) in &mut side_b {
                    let pairing = CollisionManifold {
                        depth: f32::min(*depth_a, *depth_b),
                        ..manifold
                    };
                    let resolution = self.solver.resolve(&pairing, data_a.as_deref_mut(), data_b.as_deref_mut());
                    outcome = outcome.max(resolution);
                }
            }
            match outcome {
                Resolution::Resolved => stats.resolved += 1,
                Resolution::Separating => stats.separating += 1,
                Resolution::Immovable => stats.immovable += 1,
            }
        }
        debug!(
            resolved = stats.resolved,
            separating = stats.separating,
            immovable = stats.immovable,
            "collisions resolved"
        );
        stats
    }
}

impl Default for PhysicsHandler {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

/// Records one side offers to a contact. A missing body stands in as a
/// single immovable record.
fn contact_side<'a, B: PhysicsBody>(
    body: Option<&'a mut B>,
    contact: &BodyContact,
) -> Vec<(Option<&'a mut BodyData>, f32)> {
    let mut side: Vec<(Option<&'a mut BodyData>, f32)> = body
        .map(|body| body.contact_body_data_mut(contact))
        .unwrap_or_default()
        .into_iter()
        .map(|(data, depth)| (Some(data), depth))
        .collect();
    if side.is_empty() {
        side.push((None, contact.depth));
    }
    side
}

/// Disjoint mutable borrows of two body slots. A handle that is missing,
/// out of range, empty, or equal to the other handle yields `None` on that
/// side.
fn body_pair_mut<B>(
    bodies: &mut [Option<B>],
    a: Option<BodyHandle>,
    b: Option<BodyHandle>,
) -> (Option<&mut B>, Option<&mut B>) {
    let len = bodies.len();
    let a = a.map(|h| h.0).filter(|&i| i < len);
    let b = b.map(|h| h.0).filter(|&i| i < len);
    match (a, b) {
        (Some(i), Some(j)) if i != j => {
            let (low, high) = (i.min(j), i.max(j));
            let (head, tail) = bodies.split_at_mut(high);
            let low_ref = head[low].as_mut();
            let high_ref = tail[0].as_mut();
            if i < j {
                (low_ref, high_ref)
            } else {
                (high_ref, low_ref)
            }
        }
        (Some(i), _) => (bodies[i].as_mut(), None),
        (None, Some(j)) => (None, bodies[j].as_mut()),
        (None, None) => (None, None),
    }
}
