use bevy::log::{debug, info};
use bevy::math::Vec2;
use bevy_rapier2d::rapier::prelude::*;
use std::num::NonZeroUsize;

pub const REFERENCE_GRAVITY: Vec2 = Vec2::new(0.0, 490.0);
pub const FIXED_TIMESTEP_S: f32 = 1.0 / 60.0;
pub const SOLVER_SUBSTEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub position: Vec2,
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeMaterial {
    pub density: f32,
    pub friction: f32,
}

impl Default for ShapeMaterial {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.6,
        }
    }
}

// Level units are pixels with +y down, so gravity points along +y.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    fn new(gravity: Vec2) -> Self {
        Self {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    fn step(&mut self, dt: f32, substeps: usize) {
        self.integration_parameters.dt = dt;
        if let Some(iterations) = NonZeroUsize::new(substeps) {
            self.integration_parameters.num_solver_iterations = iterations.get();
        }

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    pub fn gravity(&self) -> Vec2 {
        to_vec2(&self.gravity)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.bodies
            .iter()
            .filter(|(_, body)| body.is_dynamic())
            .count()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    pub fn create_fixed_box(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        material: ShapeMaterial,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed().translation(to_vector(center)).build();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .density(material.density)
            .friction(material.friction)
            .build();
        self.insert_body(body, collider)
    }

    pub fn create_dynamic_box(
        &mut self,
        center: Vec2,
        angle: f32,
        half_extents: Vec2,
        material: ShapeMaterial,
        can_sleep: bool,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(center))
            .rotation(angle)
            .can_sleep(can_sleep)
            .build();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .density(material.density)
            .friction(material.friction)
            .build();
        self.insert_body(body, collider)
    }

    pub fn create_dynamic_ball(
        &mut self,
        center: Vec2,
        radius: f32,
        material: ShapeMaterial,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(center))
            .build();
        let collider = ColliderBuilder::ball(radius)
            .density(material.density)
            .friction(material.friction)
            .build();
        self.insert_body(body, collider)
    }

    fn insert_body(&mut self, body: RigidBody, collider: Collider) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    pub fn create_joint(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        joint: impl Into<GenericJoint>,
    ) -> ImpulseJointHandle {
        self.impulse_joints.insert(body1, body2, joint, true)
    }

    pub fn destroy_joint(&mut self, handle: ImpulseJointHandle) {
        if self.impulse_joints.remove(handle, true).is_none() {
            debug!("Joint {handle:?} was already gone from the physics world.");
        }
    }

    pub fn destroy_body(&mut self, handle: RigidBodyHandle) {
        let removed = self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if removed.is_none() {
            debug!("Body {handle:?} was already gone from the physics world.");
        }
    }

    pub fn joint(&self, handle: ImpulseJointHandle) -> Option<&ImpulseJoint> {
        self.impulse_joints.get(handle)
    }

    pub fn joint_mut(&mut self, handle: ImpulseJointHandle) -> Option<&mut ImpulseJoint> {
        self.impulse_joints.get_mut(handle, false)
    }

    // Sleeping bodies ignore new motor targets.
    pub fn wake_joint_bodies(&mut self, handle: ImpulseJointHandle) {
        let Some(joint) = self.impulse_joints.get(handle) else {
            return;
        };
        let (body1, body2) = (joint.body1, joint.body2);
        for body in [body1, body2] {
            if let Some(body) = self.bodies.get_mut(body) {
                body.wake_up(true);
            }
        }
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<BodyPose> {
        self.bodies.get(handle).map(|body| BodyPose {
            position: to_vec2(body.translation()),
            angle: body.rotation().angle(),
        })
    }

    pub fn world_point(&self, handle: RigidBodyHandle, local: Vec2) -> Option<Vec2> {
        self.bodies.get(handle).map(|body| {
            let world = body.position() * point![local.x, local.y];
            Vec2::new(world.x, world.y)
        })
    }

    pub fn local_point(&self, handle: RigidBodyHandle, world: Vec2) -> Option<Vec2> {
        self.bodies.get(handle).map(|body| {
            let local = body
                .position()
                .inverse_transform_point(&point![world.x, world.y]);
            Vec2::new(local.x, local.y)
        })
    }
}

#[derive(Default)]
pub struct PhysicsWorldManager {
    world: Option<PhysicsWorld>,
}

impl PhysicsWorldManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, gravity: Vec2) -> &mut PhysicsWorld {
        assert!(
            self.world.is_none(),
            "physics world created while another one is still alive"
        );
        info!("Created physics world with gravity ({}, {}).", gravity.x, gravity.y);
        self.world.insert(PhysicsWorld::new(gravity))
    }

    pub fn step(&mut self, dt: f32, substeps: usize) {
        if let Some(world) = self.world.as_mut() {
            world.step(dt, substeps);
        }
    }

    pub fn destroy(&mut self) {
        let world = self
            .world
            .take()
            .expect("physics world destroyed without a matching create");
        info!(
            "Destroyed physics world ({} bodies, {} joints released).",
            world.body_count(),
            world.joint_count()
        );
    }

    pub fn is_active(&self) -> bool {
        self.world.is_some()
    }

    pub fn world(&self) -> Option<&PhysicsWorld> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.world.as_mut()
    }
}

pub fn to_vector(value: Vec2) -> Vector<Real> {
    vector![value.x, value.y]
}

pub fn to_vec2(value: &Vector<Real>) -> Vec2 {
    Vec2::new(value.x, value.y)
}

pub fn spring_coefficients(hertz: f32, damping_ratio: f32) -> (f32, f32) {
    let omega = std::f32::consts::TAU * hertz;
    (omega * omega, 2.0 * damping_ratio * omega)
}
