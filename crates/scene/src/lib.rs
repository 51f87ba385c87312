#![deny(clippy::all, clippy::pedantic)]
//! JSON scene descriptions loaded into a physics [`World`].

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use physics::{Collider, Mesh, PhysicsConfig, RigidbodyConfig, SoftbodyConfig, Transform, World};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub physics: PhysicsConfig,
    pub entities: Vec<Entity>,
}

#[derive(Debug, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "one_vec")]
    pub scale: Vec3,
    #[serde(default)]
    pub collider: Option<ColliderDef>,
    #[serde(default)]
    pub body: Option<BodyDef>,
}

#[derive(Debug, Deserialize)]
pub struct ColliderDef {
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(default)]
    pub offset: Vec3,
    #[serde(default = "one_vec")]
    pub scale: Vec3,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "shape")]
pub enum Shape {
    #[serde(rename = "box")]
    Box { half_extents: Vec3 },
    #[serde(rename = "hull")]
    Hull { vertices: Vec<Vec3>, indices: Vec<u32> },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum BodyDef {
    #[serde(rename = "rigid")]
    Rigid(RigidbodyConfig),
    #[serde(rename = "soft")]
    Soft(SoftbodyConfig),
}

fn one_vec() -> Vec3 {
    Vec3::ONE
}

impl Scene {
    /// # Errors
    ///
    /// Malformed JSON or a field of the wrong type.
    pub fn from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the world. Identical boxes share one mesh.
    ///
    /// # Errors
    ///
    /// A hull with out-of-range indices, or two entities with the same name.
    pub fn into_world(self) -> Result<World> {
        let mut world = World::new(self.physics);
        let mut boxes: HashMap<[u32; 3], Arc<Mesh>> = HashMap::new();

        for entity in self.entities {
            if world.find(&entity.name).is_some() {
                anyhow::bail!("duplicate entity {}", entity.name);
            }
            let id = world.spawn(
                entity.name.clone(),
                Transform::new(entity.position, entity.rotation, entity.scale),
            );

            if let Some(def) = entity.collider {
                let mesh = match def.shape {
                    Shape::Box { half_extents } => boxes
                        .entry(half_extents.to_array().map(f32::to_bits))
                        .or_insert_with(|| Arc::new(Mesh::cuboid(half_extents)))
                        .clone(),
                    Shape::Hull { vertices, indices } => Arc::new(
                        Mesh::new(vertices, indices).with_context(|| format!("collider of {}", entity.name))?,
                    ),
                };
                let mut collider = Collider::with_mesh(mesh);
                collider.set_offset(def.offset);
                collider.set_scale(def.scale);
                world.set_collider(id, collider)?;
            }

            match entity.body {
                Some(BodyDef::Rigid(config)) => world.attach_rigidbody(id, config)?,
                Some(BodyDef::Soft(config)) => world.attach_softbody(id, config)?,
                None => {}
            }
        }

        info!(entities = world.len(), meshes = boxes.len(), "scene loaded");
        Ok(world)
    }
}
