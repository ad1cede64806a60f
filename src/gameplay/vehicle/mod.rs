use crate::gameplay::render::SceneRenderer;
use crate::physics::{spring_coefficients, BodyPose, PhysicsWorld, ShapeMaterial};
use bevy::log::{debug, info};
use bevy::math::Vec2;
use bevy_rapier2d::rapier::prelude::*;

const CHASSIS_SIZE_PER_SCALE: Vec2 = Vec2::new(8.0, 4.0);
const CHASSIS_SPAWN_OFFSET_PER_SCALE: Vec2 = Vec2::new(0.0, 1.0);
const CHASSIS_DENSITY_PER_SCALE: f32 = 0.01;
const CHASSIS_FRICTION: f32 = 0.2;
const WHEEL_RADIUS_PER_SCALE: f32 = 1.0;
const WHEEL_DENSITY_PER_SCALE: f32 = 0.02;
const WHEEL_FRICTION: f32 = 1.5;
const REAR_WHEEL_OFFSET_PER_SCALE: Vec2 = Vec2::new(-1.5, 3.2);
const FRONT_WHEEL_OFFSET_PER_SCALE: Vec2 = Vec2::new(3.3, 3.2);
const SUSPENSION_TRAVEL_PER_SCALE: f32 = 0.25;
const OBSERVATION_DROP_PER_SCALE: f32 = 0.4;
const WHEEL_MOTOR_GAIN: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleTuning {
    pub scale: f32,
    pub motor_torque: f32,
    pub suspension_hertz: f32,
    pub damping_ratio: f32,
    pub launch_speed: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            scale: 10.0,
            motor_torque: 90_000.0,
            suspension_hertz: 25.0,
            damping_ratio: 0.7,
            launch_speed: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePose {
    pub chassis: BodyPose,
    pub chassis_half_extents: Vec2,
    pub rear_wheel: BodyPose,
    pub front_wheel: BodyPose,
    pub wheel_radius: f32,
}

#[derive(Debug, Clone, Copy)]
struct RigParts {
    chassis: RigidBodyHandle,
    rear_wheel: RigidBodyHandle,
    front_wheel: RigidBodyHandle,
    rear_axle: ImpulseJointHandle,
    front_axle: ImpulseJointHandle,
    chassis_half_extents: Vec2,
    wheel_radius: f32,
    scale: f32,
    suspension_hertz: f32,
    damping_ratio: f32,
}

impl RigParts {
    fn axles(&self) -> [ImpulseJointHandle; 2] {
        [self.rear_axle, self.front_axle]
    }
}

// Either every part exists in the physics world or none does.
#[derive(Debug, Default)]
pub struct VehicleRig {
    parts: Option<RigParts>,
}

impl VehicleRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_spawned(&self) -> bool {
        self.parts.is_some()
    }

    pub fn spawn(&mut self, world: &mut PhysicsWorld, position: Vec2, tuning: &VehicleTuning) {
        assert!(
            self.parts.is_none(),
            "vehicle spawned while a previous rig is still alive"
        );

        let scale = tuning.scale;
        let chassis_half_extents = CHASSIS_SIZE_PER_SCALE * scale * 0.5;
        let chassis_center = position + CHASSIS_SPAWN_OFFSET_PER_SCALE * scale;
        let chassis = world.create_dynamic_box(
            chassis_center,
            0.0,
            chassis_half_extents,
            ShapeMaterial {
                density: CHASSIS_DENSITY_PER_SCALE * scale,
                friction: CHASSIS_FRICTION,
            },
            true,
        );

        let wheel_radius = WHEEL_RADIUS_PER_SCALE * scale;
        let wheel_material = ShapeMaterial {
            density: WHEEL_DENSITY_PER_SCALE * scale,
            friction: WHEEL_FRICTION,
        };
        let rear_center = position + REAR_WHEEL_OFFSET_PER_SCALE * scale;
        let front_center = position + FRONT_WHEEL_OFFSET_PER_SCALE * scale;
        let rear_wheel = world.create_dynamic_ball(rear_center, wheel_radius, wheel_material);
        let front_wheel = world.create_dynamic_ball(front_center, wheel_radius, wheel_material);

        let rear_axle = world.create_joint(
            chassis,
            rear_wheel,
            suspension_joint(rear_center - chassis_center, tuning),
        );
        let front_axle = world.create_joint(
            chassis,
            front_wheel,
            suspension_joint(front_center - chassis_center, tuning),
        );

        self.parts = Some(RigParts {
            chassis,
            rear_wheel,
            front_wheel,
            rear_axle,
            front_axle,
            chassis_half_extents,
            wheel_radius,
            scale,
            suspension_hertz: tuning.suspension_hertz,
            damping_ratio: tuning.damping_ratio,
        });
        info!(
            "Spawned vehicle at ({:.1}, {:.1}) with scale {scale}.",
            position.x, position.y
        );
    }

    pub fn despawn(&mut self, world: &mut PhysicsWorld) {
        let parts = self
            .parts
            .take()
            .expect("vehicle despawned while not spawned");

        world.destroy_joint(parts.rear_axle);
        world.destroy_joint(parts.front_axle);
        world.destroy_body(parts.rear_wheel);
        world.destroy_body(parts.front_wheel);
        world.destroy_body(parts.chassis);
        info!("Despawned vehicle.");
    }

    pub fn set_speed(&mut self, world: &mut PhysicsWorld, speed: f32) {
        let Some(parts) = self.parts else {
            debug!("Ignoring motor speed {speed} for an unspawned vehicle.");
            return;
        };
        for axle in parts.axles() {
            if let Some(joint) = world.joint_mut(axle) {
                joint
                    .data
                    .set_motor_velocity(JointAxis::AngX, speed, WHEEL_MOTOR_GAIN);
            }
            world.wake_joint_bodies(axle);
        }
    }

    pub fn set_torque(&mut self, world: &mut PhysicsWorld, torque: f32) {
        let Some(parts) = self.parts else {
            return;
        };
        for axle in parts.axles() {
            if let Some(joint) = world.joint_mut(axle) {
                joint.data.set_motor_max_force(JointAxis::AngX, torque);
            }
        }
    }

    pub fn set_hertz(&mut self, world: &mut PhysicsWorld, hertz: f32) {
        let Some(parts) = self.parts.as_mut() else {
            return;
        };
        parts.suspension_hertz = hertz;
        let parts = *parts;
        apply_suspension_spring(world, &parts);
    }

    pub fn set_damping_ratio(&mut self, world: &mut PhysicsWorld, damping_ratio: f32) {
        let Some(parts) = self.parts.as_mut() else {
            return;
        };
        parts.damping_ratio = damping_ratio;
        let parts = *parts;
        apply_suspension_spring(world, &parts);
    }

    // Chassis top-left corner nudged down; this is the point tested against zones.
    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        let Some(parts) = self.parts else {
            return Vec2::ZERO;
        };
        let local = Vec2::new(
            -parts.chassis_half_extents.x,
            -parts.chassis_half_extents.y + OBSERVATION_DROP_PER_SCALE * parts.scale,
        );
        world
            .world_point(parts.chassis, local)
            .unwrap_or(Vec2::ZERO)
    }

    pub fn pose(&self, world: &PhysicsWorld) -> Option<VehiclePose> {
        let parts = self.parts?;
        Some(VehiclePose {
            chassis: world.body_pose(parts.chassis)?,
            chassis_half_extents: parts.chassis_half_extents,
            rear_wheel: world.body_pose(parts.rear_wheel)?,
            front_wheel: world.body_pose(parts.front_wheel)?,
            wheel_radius: parts.wheel_radius,
        })
    }

    pub fn motor_speed(&self, world: &PhysicsWorld) -> Option<f32> {
        let parts = self.parts?;
        let joint = world.joint(parts.rear_axle)?;
        joint
            .data
            .motor(JointAxis::AngX)
            .map(|motor| motor.target_vel)
    }

    pub fn draw(&self, world: &PhysicsWorld, renderer: &mut impl SceneRenderer) {
        if let Some(pose) = self.pose(world) {
            renderer.draw_vehicle(&pose);
        }
    }
}

fn suspension_joint(anchor_on_chassis: Vec2, tuning: &VehicleTuning) -> GenericJoint {
    let (stiffness, damping) = spring_coefficients(tuning.suspension_hertz, tuning.damping_ratio);
    let travel = SUSPENSION_TRAVEL_PER_SCALE * tuning.scale;

    // Sideways slide is locked; the wheel rides the chassis-local y axis and spins freely.
    GenericJointBuilder::new(JointAxesMask::LIN_X)
        .local_anchor1(point![anchor_on_chassis.x, anchor_on_chassis.y])
        .local_anchor2(point![0.0, 0.0])
        .limits(JointAxis::LinY, [-travel, travel])
        .motor_model(JointAxis::LinY, MotorModel::AccelerationBased)
        .motor_position(JointAxis::LinY, 0.0, stiffness, damping)
        .motor_model(JointAxis::AngX, MotorModel::AccelerationBased)
        .motor_velocity(JointAxis::AngX, 0.0, WHEEL_MOTOR_GAIN)
        .motor_max_force(JointAxis::AngX, tuning.motor_torque)
        .contacts_enabled(false)
        .build()
}

fn apply_suspension_spring(world: &mut PhysicsWorld, parts: &RigParts) {
    let (stiffness, damping) = spring_coefficients(parts.suspension_hertz, parts.damping_ratio);
    for axle in parts.axles() {
        if let Some(joint) = world.joint_mut(axle) {
            joint
                .data
                .set_motor_position(JointAxis::LinY, 0.0, stiffness, damping);
        }
    }
}
