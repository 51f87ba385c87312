//! # Mass-Spring Soft Body
//!
//! A 3-D lattice of unit-mass nodes joined by axis-aligned springs. Each
//! render-mesh vertex is skinned to its nearest node in the rest pose and
//! follows that node every frame.

use std::collections::HashMap;

use glam::{UVec3, Vec3};
use tracing::debug;

use crate::body::{BodyContact, PhysicsBody};
use crate::body_data::BodyData;
use crate::collision::Collider;
use crate::config::SoftbodyConfig;
use crate::mesh::DeformableMesh;
use crate::transform::Transform;

/// Lattice coordinate `(i, j, k)` along X, Y, Z. `j` grows upwards.
pub type NodeIndex = [usize; 3];

const NEIGHBOR_OFFSETS: [(usize, isize); 6] = [(0, -1), (0, 1), (1, -1), (1, 1), (2, -1), (2, 1)];

/// Below this, two nodes are treated as coincident.
const DEGENERATE_DISTANCE: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct Softbody {
    counts: [usize; 3],
    rest_length: Vec3,
    spring_constant: f32,
    dampening: f32,
    nodes: Vec<BodyData>,
    external_force: Vec3,
    render_mesh: Option<DeformableMesh>,
    skinning: HashMap<NodeIndex, Vec<usize>>,
}

impl Softbody {
    /// Build the lattice around the transform's world position.
    ///
    /// Node spacing along an axis equals the spring rest length,
    /// `size / count`. When `collider` carries a mesh it is cloned into a
    /// private render mesh, expressed relative to the entity position.
    #[must_use]
    pub fn new(config: SoftbodyConfig, transform: &Transform, collider: Option<&Collider>) -> Self {
        let grid = config.grid.max(UVec3::ONE);
        let counts = [grid.x as usize, grid.y as usize, grid.z as usize];
        let rest_length = config.size / grid.as_vec3();
        let origin = transform.world_position();

        let mut nodes = Vec::with_capacity(counts.iter().product());
        for k in 0..counts[2] {
            for j in 0..counts[1] {
                for i in 0..counts[0] {
                    let local = local_offset([i, j, k], counts, rest_length);
                    nodes.push(BodyData::new(origin + local, Vec3::ZERO, 1.0, 0.0));
                }
            }
        }

        let mut body = Self {
            counts,
            rest_length,
            spring_constant: config.spring_constant,
            dampening: config.dampening,
            nodes,
            external_force: Vec3::ZERO,
            render_mesh: None,
            skinning: HashMap::new(),
        };

        if let Some((collider, mesh)) = collider.and_then(|c| c.mesh().map(|m| (c, m))) {
            let placement = collider.offset_scale_matrix();
            let local: Vec<Vec3> = mesh.vertices().iter().map(|&v| placement.transform_point3(v)).collect();
            let mut render_mesh = DeformableMesh::from_mesh(mesh);
            for (index, &vertex) in local.iter().enumerate() {
                render_mesh.set_vertex(index, vertex);
                let node = body.nearest_node_local(vertex);
                body.skinning.entry(node).or_default().push(index);
            }
            debug!(
                nodes = body.nodes.len(),
                vertices = local.len(),
                skinned_nodes = body.skinning.len(),
                "soft body skinned"
            );
            body.render_mesh = Some(render_mesh);
        }

        body
    }

    #[must_use]
    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    #[must_use]
    pub fn rest_length(&self) -> Vec3 {
        self.rest_length
    }

    #[must_use]
    pub fn nodes(&self) -> &[BodyData] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&BodyData> {
        self.flat_index(index).map(|i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut BodyData> {
        self.flat_index(index).map(move |i| &mut self.nodes[i])
    }

    /// Mean node position. The owning transform follows it.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.nodes.iter().map(|node| node.position).sum::<Vec3>() / self.nodes.len() as f32
    }

    #[must_use]
    pub fn render_mesh(&self) -> Option<&DeformableMesh> {
        self.render_mesh.as_ref()
    }

    /// Render-mesh vertex indices driven by each node.
    #[must_use]
    pub fn skinning(&self) -> &HashMap<NodeIndex, Vec<usize>> {
        &self.skinning
    }

    /// Force applied to every node on each update, for poking the lattice.
    pub fn set_external_force(&mut self, force: Vec3) {
        self.external_force = force;
    }

    #[must_use]
    pub fn external_force(&self) -> Vec3 {
        self.external_force
    }

    /// Sum of the spring and damping forces acting on one node.
    #[must_use]
    pub fn spring_force(&self, index: NodeIndex) -> Vec3 {
        let Some(flat) = self.flat_index(index) else {
            return Vec3::ZERO;
        };
        let node = &self.nodes[flat];
        let mut force = Vec3::ZERO;
        for (axis, step) in NEIGHBOR_OFFSETS {
            let Some(neighbor) = self.neighbor(index, axis, step) else {
                continue;
            };
            let delta = node.position - self.nodes[neighbor].position;
            let distance = delta.length();
            let direction = if distance > DEGENERATE_DISTANCE {
                delta / distance
            } else {
                Vec3::ZERO
            };
            force += -self.spring_constant * (distance - self.rest_length[axis]) * direction
                - self.dampening * node.velocity;
        }
        force
    }

    #[must_use]
    pub fn is_top_layer(&self, index: NodeIndex) -> bool {
        index[1] + 1 == self.counts[1]
    }

    fn flat_index(&self, [i, j, k]: NodeIndex) -> Option<usize> {
        let [nx, ny, nz] = self.counts;
        (i < nx && j < ny && k < nz).then(|| i + nx * (j + ny * k))
    }

    fn node_index(&self, flat: usize) -> NodeIndex {
        let [nx, ny, _] = self.counts;
        [flat % nx, (flat / nx) % ny, flat / (nx * ny)]
    }

    fn neighbor(&self, index: NodeIndex, axis: usize, step: isize) -> Option<usize> {
        let mut neighbor = index;
        neighbor[axis] = index[axis].checked_add_signed(step)?;
        self.flat_index(neighbor)
    }

    fn nearest_node_local(&self, point: Vec3) -> NodeIndex {
        let mut best = [0, 0, 0];
        let mut best_distance = f32::INFINITY;
        for flat in 0..self.nodes.len() {
            let index = self.node_index(flat);
            let distance = local_offset(index, self.counts, self.rest_length).distance_squared(point);
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
        best
    }

    fn closest_flat(&self, point: Vec3) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_squared(point)
                    .total_cmp(&b.position.distance_squared(point))
            })
            .map(|(i, _)| i)
    }
}

/// Rest-pose offset of a node from the lattice centre.
fn local_offset(index: NodeIndex, counts: [usize; 3], rest_length: Vec3) -> Vec3 {
    let centered = |axis: usize| (index[axis] as f32 - (counts[axis] as f32 - 1.0) * 0.5) * rest_length[axis];
    Vec3::new(centered(0), centered(1), centered(2))
}

impl PhysicsBody for Softbody {
    fn update(&mut self, gravity: Vec3) {
        let forces: Vec<Vec3> = (0..self.nodes.len())
            .map(|flat| {
                let index = self.node_index(flat);
                let mut force = self.spring_force(index) + self.external_force;
                // Top layer hangs the lattice
                if !self.is_top_layer(index) {
                    force += gravity * self.nodes[flat].mass();
                }
                force
            })
            .collect();
        for (node, force) in self.nodes.iter_mut().zip(forces) {
            node.apply_force(force);
        }
    }

    fn integrate_forces(&mut self, dt: f32) {
        for node in &mut self.nodes {
            node.integrate_forces(dt);
        }
    }

    fn integrate_velocity(&mut self, dt: f32) {
        for node in &mut self.nodes {
            node.integrate_velocity(dt);
        }
    }

    fn closest_body_data(&self, point: Vec3) -> Option<&BodyData> {
        self.closest_flat(point).map(|i| &self.nodes[i])
    }

    fn closest_body_data_mut(&mut self, point: Vec3) -> Option<&mut BodyData> {
        self.closest_flat(point).map(move |i| &mut self.nodes[i])
    }

    /// Every node past the other shape's face, at its own depth. A contact
    /// that only grazes the collider falls back to the nearest node.
    fn contact_body_data_mut(&mut self, contact: &BodyContact) -> Vec<(&mut BodyData, f32)> {
        let crossed = self
            .nodes
            .iter()
            .any(|node| contact.penetration(node.position) >= 0.0);
        if !crossed {
            return self
                .closest_body_data_mut(contact.point)
                .map(|node| (node, contact.depth))
                .into_iter()
                .collect();
        }
        self.nodes
            .iter_mut()
            .filter_map(|node| {
                let depth = contact.penetration(node.position);
                (depth >= 0.0).then_some((node, depth))
            })
            .collect()
    }

    fn update_visual(&mut self, transform: &mut Transform) {
        let center = self.center();
        transform.set_position(center);

        let Some(mesh) = self.render_mesh.as_mut() else {
            return;
        };
        let [nx, ny, _] = self.counts;
        for (&[i, j, k], vertices) in &self.skinning {
            let position = self.nodes[i + nx * (j + ny * k)].position - center;
            for &vertex in vertices {
                mesh.set_vertex(vertex, position);
            }
        }
        mesh.upload();
    }
}
