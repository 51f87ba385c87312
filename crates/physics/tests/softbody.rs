use std::sync::Arc;

use glam::{UVec3, Vec3};
use physics::{BufferUsage, Collider, Mesh, PhysicsBody, Softbody, SoftbodyConfig, Transform};

fn config(grid: u32) -> SoftbodyConfig {
    SoftbodyConfig {
        grid: UVec3::splat(grid),
        ..SoftbodyConfig::default()
    }
}

fn every_index(body: &Softbody) -> Vec<[usize; 3]> {
    let [nx, ny, nz] = body.counts();
    let mut indices = Vec::new();
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                indices.push([i, j, k]);
            }
        }
    }
    indices
}

/// Each render vertex is driven by exactly one node
#[test]
fn test_every_vertex_skinned_once() {
    let points: Vec<Vec3> = (0..5)
        .flat_map(|i| (0..5).map(move |j| Vec3::new(i as f32 * 0.25 - 0.5, j as f32 * 0.2 - 0.4, 0.1 * (i + j) as f32 - 0.4)))
        .collect();
    let count = points.len();
    let collider = Collider::with_mesh(Arc::new(Mesh::new(points, Vec::new()).unwrap()));
    let body = Softbody::new(config(3), &Transform::default(), Some(&collider));

    let mut skinned: Vec<usize> = body.skinning().values().flatten().copied().collect();
    skinned.sort_unstable();
    assert_eq!(skinned, (0..count).collect::<Vec<_>>());

    let mesh = body.render_mesh().unwrap();
    assert_eq!(mesh.usage(), BufferUsage::Dynamic);
    assert_eq!(mesh.vertices().len(), count);
}

/// A corner vertex binds to the corner node
#[test]
fn test_skinning_picks_nearest_node() {
    let collider = Collider::with_mesh(Arc::new(Mesh::cuboid(Vec3::splat(0.5))));
    let body = Softbody::new(config(4), &Transform::default(), Some(&collider));
    let corner = body
        .render_mesh()
        .unwrap()
        .vertices()
        .iter()
        .position(|v| *v == Vec3::splat(0.5))
        .unwrap();
    assert!(body.skinning()[&[3_usize, 3, 3]].contains(&corner));
}

/// The lattice starts at rest length, so springs push nowhere
#[test]
fn test_rest_lattice_is_in_equilibrium() {
    let body = Softbody::new(config(4), &Transform::from_position(Vec3::new(3.0, -2.0, 1.0)), None);
    for index in every_index(&body) {
        let force = body.spring_force(index);
        assert!(force.length() < 1e-3, "node {index:?} feels {force:?}");
    }
}

/// The lattice is centred on the entity position
#[test]
fn test_lattice_centred_on_transform() {
    let origin = Vec3::new(3.0, -2.0, 1.0);
    let body = Softbody::new(config(4), &Transform::from_position(origin), None);
    let sum: Vec3 = body.nodes().iter().map(|n| n.position).sum();
    let centre = sum / body.nodes().len() as f32;
    assert!((centre - origin).length() < 1e-5);
    assert_eq!(body.nodes().len(), 64);
}

/// The top layer carries no gravity
#[test]
fn test_top_layer_hangs_without_gravity() {
    let mut body = Softbody::new(config(3), &Transform::default(), None);
    body.update(Vec3::new(0.0, -9.81, 0.0));

    for index in every_index(&body) {
        let force = body.node(index).unwrap().force();
        if body.is_top_layer(index) {
            assert!(force.length() < 1e-3, "top node {index:?} feels {force:?}");
        } else {
            assert!((force.y + 9.81).abs() < 1e-3, "node {index:?} feels {force:?}");
        }
    }
}

/// An external poke reaches every node
#[test]
fn test_external_force_applies_to_all_nodes() {
    let mut body = Softbody::new(config(2), &Transform::default(), None);
    body.set_external_force(Vec3::new(2.0, 0.0, 0.0));
    body.update(Vec3::ZERO);
    body.integrate_forces(0.5);
    for node in body.nodes() {
        assert!((node.velocity - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-3);
        assert_eq!(node.force(), Vec3::ZERO, "accumulator cleared");
    }
}

/// Moving a node drags its skinned vertices, recentres the transform and
/// bumps the buffer revision
#[test]
fn test_update_visual_follows_nodes() {
    let collider = Collider::with_mesh(Arc::new(Mesh::cuboid(Vec3::splat(0.5))));
    let origin = Vec3::new(0.0, 5.0, 0.0);
    let mut transform = Transform::from_position(origin);
    let mut body = Softbody::new(config(2), &transform, Some(&collider));
    assert_eq!(body.render_mesh().unwrap().revision(), 0);

    body.node_mut([1, 1, 1]).unwrap().position += Vec3::new(0.4, 0.0, 0.0);
    body.update_visual(&mut transform);

    let center = transform.position();
    assert!((center - (origin + Vec3::new(0.05, 0.0, 0.0))).length() < 1e-6);
    assert_eq!(center, body.center());

    let moved = body.node([1, 1, 1]).unwrap().position - center;
    let mesh = body.render_mesh().unwrap();
    assert_eq!(mesh.revision(), 1);
    for &vertex in &body.skinning()[&[1_usize, 1, 1]] {
        assert!((mesh.vertices()[vertex] - moved).length() < 1e-6);
    }
    assert_eq!(mesh.vertex_bytes().len(), mesh.vertices().len() * 12);
}

/// Contacts are routed to the node nearest the query point
#[test]
fn test_closest_body_data() {
    let mut body = Softbody::new(config(2), &Transform::default(), None);
    let target = body.node([1, 0, 1]).unwrap().position;
    let found = body.closest_body_data(Vec3::new(1.0, -1.0, 1.0)).unwrap();
    assert_eq!(found.position, target);

    body.closest_body_data_mut(target).unwrap().velocity = Vec3::Y;
    assert_eq!(body.node([1, 0, 1]).unwrap().velocity, Vec3::Y);
}

/// A lattice with no render mesh is still simulated
#[test]
fn test_without_mesh() {
    let mut body = Softbody::new(config(2), &Transform::default(), None);
    assert!(body.render_mesh().is_none());
    assert!(body.skinning().is_empty());
    body.update_visual(&mut Transform::default());
}
