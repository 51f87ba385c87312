//! # World Builder
//!
//! Methods for adding entities, colliders and bodies to a [`World`], plus
//! checked accessors by [`EntityId`].

use crate::body::Body;
use crate::collision::Collider;
use crate::config::{RigidbodyConfig, SoftbodyConfig};
use crate::error::PhysicsError;
use crate::rigidbody::Rigidbody;
use crate::simulation::{EntityId, World};
use crate::softbody::Softbody;
use crate::transform::Transform;

impl World {
    /// Add an entity with only a transform.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> EntityId {
        self.names.push(name.into());
        self.transforms.push(transform);
        self.colliders.push(None);
        self.bodies.push(None);
        EntityId(self.transforms.len() - 1)
    }

    /// Replace the entity's collider.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] if `id` is not in this world.
    pub fn set_collider(&mut self, id: EntityId, collider: Collider) -> Result<(), PhysicsError> {
        let i = self.slot(id)?;
        self.colliders[i] = Some(collider);
        Ok(())
    }

    /// Attach a rigid body placed at the entity's current transform.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] if `id` is not in this world.
    pub fn attach_rigidbody(&mut self, id: EntityId, config: RigidbodyConfig) -> Result<(), PhysicsError> {
        let i = self.slot(id)?;
        let body = Rigidbody::new(config, &self.transforms[i]);
        self.bodies[i] = Some(Body::Rigid(body));
        Ok(())
    }

    /// Attach a soft body. Set the collider first so its mesh is skinned.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] if `id` is not in this world.
    pub fn attach_softbody(&mut self, id: EntityId, config: SoftbodyConfig) -> Result<(), PhysicsError> {
        let i = self.slot(id)?;
        let body = Softbody::new(config, &self.transforms[i], self.colliders[i].as_ref());
        self.bodies[i] = Some(Body::Soft(body));
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.names.iter().position(|n| n == name).map(EntityId)
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] if `id` is not in this world.
    pub fn name(&self, id: EntityId) -> Result<&str, PhysicsError> {
        self.slot(id).map(|i| self.names[i].as_str())
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] if `id` is not in this world.
    pub fn transform(&self, id: EntityId) -> Result<&Transform, PhysicsError> {
        self.slot(id).map(|i| &self.transforms[i])
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] if `id` is not in this world.
    pub fn transform_mut(&mut self, id: EntityId) -> Result<&mut Transform, PhysicsError> {
        self.slot(id).map(|i| &mut self.transforms[i])
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] if `id` is not in this world.
    pub fn collider(&self, id: EntityId) -> Result<Option<&Collider>, PhysicsError> {
        self.slot(id).map(|i| self.colliders[i].as_ref())
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] if `id` is not in this world.
    pub fn body(&self, id: EntityId) -> Result<Option<&Body>, PhysicsError> {
        self.slot(id).map(|i| self.bodies[i].as_ref())
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] if `id` is not in this world.
    pub fn body_mut(&mut self, id: EntityId) -> Result<Option<&mut Body>, PhysicsError> {
        self.slot(id).map(|i| self.bodies[i].as_mut())
    }

    fn slot(&self, id: EntityId) -> Result<usize, PhysicsError> {
        if id.0 < self.transforms.len() {
            Ok(id.0)
        } else {
            Err(PhysicsError::UnknownEntity(id))
        }
    }
}
