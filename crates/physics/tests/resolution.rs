use std::sync::Arc;

use glam::{UVec3, Vec3};
use physics::{
    Body, BodyHandle, Collider, CollisionObject, Mesh, PhysicsConfig, PhysicsHandler, ResolveStats,
    Rigidbody, RigidbodyConfig, Softbody, SoftbodyConfig, Transform,
};

fn cube(half: f32) -> Collider {
    Collider::with_mesh(Arc::new(Mesh::cuboid(Vec3::splat(half))))
}

fn elastic() -> RigidbodyConfig {
    RigidbodyConfig {
        restitution: 1.0,
        drag: 0.0,
        ..RigidbodyConfig::default()
    }
}

/// Two unit cubes overlapping by 0.1 along X, closing at 4 m/s
fn head_on() -> (Vec<Transform>, Vec<Option<Rigidbody>>) {
    let transforms = vec![
        Transform::default(),
        Transform::from_position(Vec3::new(0.9, 0.0, 0.0)),
    ];
    let mut a = Rigidbody::new(elastic(), &transforms[0]);
    let mut b = Rigidbody::new(elastic(), &transforms[1]);
    a.set_velocity(Vec3::new(3.0, 0.0, 0.0));
    b.set_velocity(Vec3::new(-1.0, 0.0, 0.0));
    (transforms, vec![Some(a), Some(b)])
}

fn objects<'a>(colliders: &'a [Collider], transforms: &'a [Transform], with_bodies: bool) -> Vec<CollisionObject<'a>> {
    colliders
        .iter()
        .zip(transforms)
        .enumerate()
        .map(|(i, (collider, transform))| CollisionObject {
            collider,
            transform: Some(transform),
            body: with_bodies.then_some(BodyHandle(i)),
        })
        .collect()
}

/// Elastic head-on hit swaps velocities; the mirrored manifold is then separating
#[test]
fn test_elastic_exchange_through_handler() {
    let (transforms, mut bodies) = head_on();
    let colliders = [cube(0.5), cube(0.5)];
    let mut handler = PhysicsHandler::new(&PhysicsConfig::default());

    let found = handler.check_for_collisions(&objects(&colliders, &transforms, true));
    assert_eq!(found, 2, "one manifold per ordering");

    let stats = handler.resolve_collisions(&mut bodies);
    assert_eq!(
        stats,
        ResolveStats {
            resolved: 1,
            separating: 1,
            immovable: 0
        }
    );
    assert_eq!(handler.manifolds().len(), 0, "queue is drained");

    let a = bodies[0].as_ref().unwrap();
    let b = bodies[1].as_ref().unwrap();
    assert!((a.velocity().x + 1.0).abs() < 1e-5, "a: {:?}", a.velocity());
    assert!((b.velocity().x - 3.0).abs() < 1e-5, "b: {:?}", b.velocity());

    // 0.1 * (0.1 - 0.05) / 2, split evenly
    assert!((a.position().x + 0.0025).abs() < 1e-5);
    assert!((b.position().x - 0.9025).abs() < 1e-5);
}

/// Manifolds queue in pair discovery order
#[test]
fn test_manifolds_are_fifo() {
    let transforms = vec![
        Transform::default(),
        Transform::from_position(Vec3::new(0.9, 0.0, 0.0)),
        Transform::from_position(Vec3::new(10.0, 0.0, 0.0)),
    ];
    let colliders = [cube(0.5), cube(0.5), cube(0.5)];
    let mut handler = PhysicsHandler::default();
    handler.check_for_collisions(&objects(&colliders, &transforms, true));

    let order: Vec<_> = handler.manifolds().map(|m| (m.body_a, m.body_b)).collect();
    assert_eq!(
        order,
        vec![
            (Some(BodyHandle(0)), Some(BodyHandle(1))),
            (Some(BodyHandle(1)), Some(BodyHandle(0))),
        ]
    );
    let normals: Vec<Vec3> = handler.manifolds().map(|m| m.normal).collect();
    assert!((normals[0] - Vec3::X).length() < 1e-6);
    assert!((normals[1] + Vec3::X).length() < 1e-6);

    handler.clear();
    assert_eq!(handler.manifolds().len(), 0);
}

/// With pair deduplication each overlap is reported once
#[test]
fn test_dedupe_pairs() {
    let (transforms, mut bodies) = head_on();
    let colliders = [cube(0.5), cube(0.5)];
    let config = PhysicsConfig {
        dedupe_pairs: true,
        ..PhysicsConfig::default()
    };
    let mut handler = PhysicsHandler::new(&config);

    assert_eq!(handler.check_for_collisions(&objects(&colliders, &transforms, true)), 1);
    let stats = handler.resolve_collisions(&mut bodies);
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.separating, 0);
}

/// Bodies already moving apart keep their state
#[test]
fn test_separating_bodies_untouched() {
    let (transforms, mut bodies) = head_on();
    for (body, vx) in bodies.iter_mut().zip([-2.0, 2.0]) {
        body.as_mut().unwrap().set_velocity(Vec3::new(vx, 0.0, 0.0));
    }
    let colliders = [cube(0.5), cube(0.5)];
    let mut handler = PhysicsHandler::default();
    handler.check_for_collisions(&objects(&colliders, &transforms, true));
    let stats = handler.resolve_collisions(&mut bodies);

    assert_eq!(stats.separating, 2);
    assert_eq!(bodies[0].as_ref().unwrap().velocity(), Vec3::new(-2.0, 0.0, 0.0));
    assert_eq!(bodies[0].as_ref().unwrap().position(), Vec3::ZERO);
}

/// Colliders without bodies never move
#[test]
fn test_bodiless_pair_is_immovable() {
    let transforms = vec![Transform::default(), Transform::from_position(Vec3::Y * 0.5)];
    let colliders = [cube(0.5), cube(0.5)];
    let mut handler = PhysicsHandler::default();
    handler.check_for_collisions(&objects(&colliders, &transforms, false));
    let stats = handler.resolve_collisions::<Rigidbody>(&mut []);
    assert_eq!(stats.immovable, 2);
}

fn moving_lattice(at: &Transform, collider: &Collider, velocity: Vec3) -> Softbody {
    let mut soft = Softbody::new(
        SoftbodyConfig {
            grid: UVec3::splat(2),
            ..SoftbodyConfig::default()
        },
        at,
        Some(collider),
    );
    for index in [[0, 0, 0], [1, 0, 0], [0, 1, 0], [1, 1, 0], [0, 0, 1], [1, 0, 1], [0, 1, 1], [1, 1, 1]] {
        soft.node_mut(index).unwrap().velocity = velocity;
    }
    soft
}

/// Resolve a lattice (slot 0) against a body-less obstacle, each pair once
fn resolve_against_obstacle(
    lattice: (&Collider, &Transform),
    obstacle: (&Collider, &Transform),
    bodies: &mut [Option<Body>],
) -> ResolveStats {
    let config = PhysicsConfig {
        dedupe_pairs: true,
        ..PhysicsConfig::default()
    };
    let mut handler = PhysicsHandler::new(&config);
    let objects = [
        CollisionObject {
            collider: lattice.0,
            transform: Some(lattice.1),
            body: Some(BodyHandle(0)),
        },
        CollisionObject {
            collider: obstacle.0,
            transform: Some(obstacle.1),
            body: None,
        },
    ];
    handler.check_for_collisions(&objects);
    handler.resolve_collisions(bodies)
}

/// A contact grazing the collider margin goes to the single nearest node
#[test]
fn test_soft_body_nearest_node_absorbs_impulse() {
    let lattice_at = Transform::default();
    // Off-centre so the contact point (0.45, 0.15, 0.1) has one nearest node
    let wall_at = Transform::from_position(Vec3::new(0.9, 0.3, 0.2));
    let collider = cube(0.5);
    let mut bodies = vec![Some(Body::Soft(moving_lattice(&lattice_at, &collider, Vec3::X))), None];

    let stats = resolve_against_obstacle((&collider, &lattice_at), (&collider, &wall_at), &mut bodies);
    assert_eq!(stats.resolved, 1);

    let soft = bodies[0].as_ref().and_then(Body::as_soft).unwrap();
    let hit = soft.node([1, 1, 1]).unwrap();
    assert!(hit.velocity.length() < 1e-5, "nearest node stops: {:?}", hit.velocity);
    // Pushed back by 0.1 * (0.1 - 0.05)
    assert!((hit.position - Vec3::new(0.245, 0.25, 0.25)).length() < 1e-5);
    assert_eq!(soft.nodes().iter().filter(|n| n.velocity == Vec3::X).count(), 7);
}

/// Once nodes cross the obstacle's face, each of them takes the contact
#[test]
fn test_soft_body_crossed_nodes_absorb_impulse() {
    let lattice_at = Transform::default();
    // Floor top at y = -0.2, bottom layer at y = -0.25
    let floor_at = Transform::from_position(Vec3::new(0.0, -0.7, 0.0));
    let lattice = cube(0.5);
    let floor = Collider::with_mesh(Arc::new(Mesh::cuboid(Vec3::new(3.0, 0.5, 3.0))));
    let mut bodies = vec![Some(Body::Soft(moving_lattice(&lattice_at, &lattice, Vec3::NEG_Y))), None];

    let stats = resolve_against_obstacle((&lattice, &lattice_at), (&floor, &floor_at), &mut bodies);
    assert_eq!(stats.resolved, 1, "one manifold, four nodes");

    let soft = bodies[0].as_ref().and_then(Body::as_soft).unwrap();
    for node in soft.nodes() {
        if node.position.y < 0.0 {
            assert!(node.velocity.length() < 1e-5, "bottom node still moving: {:?}", node.velocity);
            assert!((node.position.y + 0.25).abs() < 1e-5, "within slop, no push");
        } else {
            assert_eq!(node.velocity, Vec3::NEG_Y);
        }
    }
}
