//! Spatial transform of an entity
//!
//! The physics layer reads world placement from a [`Transform`] and writes
//! corrected position/rotation back into it. Rotation is stored as XYZ Euler
//! angles in radians, matching [`BodyData`](crate::BodyData).

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Build a scale-rotation-translation matrix from Euler radians.
#[must_use]
pub fn to_transform_matrix(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, euler_to_quat(rotation), position)
}

/// Matrix that applies a collider's offset and non-uniform scale in local space.
#[must_use]
pub fn to_offset_scale_matrix(offset: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(offset) * Mat4::from_scale(scale)
}

#[must_use]
pub fn euler_to_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

/// Local position / rotation / scale with a cached world matrix.
///
/// The cached matrix is rebuilt on every write, so readers can take `&self`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    parent: Mat4,
    world: Mat4,
}

impl Transform {
    #[must_use]
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        let mut transform = Self {
            position,
            rotation,
            scale,
            parent: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
        };
        transform.refresh();
        transform
    }

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO, Vec3::ONE)
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.refresh();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.refresh();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.refresh();
    }

    /// Write position and rotation together with a single matrix rebuild.
    pub fn set_position_rotation(&mut self, position: Vec3, rotation: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.refresh();
    }

    /// World matrix of the parent entity, supplied by the scene graph.
    pub fn set_parent_matrix(&mut self, parent: Mat4) {
        self.parent = parent;
        self.refresh();
    }

    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    /// World-space orientation as XYZ Euler radians.
    #[must_use]
    pub fn world_rotation(&self) -> Vec3 {
        let (_, rotation, _) = self.world.to_scale_rotation_translation();
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.world.x_axis.truncate().normalize_or_zero()
    }

    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.world.y_axis.truncate().normalize_or_zero()
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.world.z_axis.truncate().normalize_or_zero()
    }

    /// Upper 3x3 of the world matrix, used to carry normals into world space.
    #[must_use]
    pub fn basis(&self) -> Mat3 {
        Mat3::from_mat4(self.world)
    }

    fn refresh(&mut self) {
        self.world = self.parent * to_transform_matrix(self.position, self.rotation, self.scale);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE)
    }
}
