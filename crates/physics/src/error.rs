use thiserror::Error;

use crate::simulation::EntityId;

/// Errors raised at the API boundary of the physics crate.
///
/// Nothing inside a physics tick produces one of these: missing geometry and
/// degenerate numerics degrade to "no collision" instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),
}
