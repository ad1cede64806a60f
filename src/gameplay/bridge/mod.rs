pub mod registry;

use crate::gameplay::render::SceneRenderer;
use crate::physics::{spring_coefficients, PhysicsWorld, ShapeMaterial};
use bevy::log::{debug, info, warn};
use bevy::prelude::{Resource, Vec2};
use bevy_rapier2d::rapier::prelude::*;
use registry::{EntityRegistry, JointSegment, Node, NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeldTuning {
    pub angular_hertz: f32,
    pub angular_damping_ratio: f32,
    pub linear_hertz: f32,
    pub linear_damping_ratio: f32,
}

impl Default for WeldTuning {
    fn default() -> Self {
        Self {
            angular_hertz: 20.0,
            angular_damping_ratio: 10.0,
            linear_hertz: 10.0,
            linear_damping_ratio: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeTuning {
    pub proximity_margin: f32,
    pub clearance: f32,
    pub plank_half_thickness: f32,
    pub plank_material: ShapeMaterial,
    pub node_material: ShapeMaterial,
    pub weld: WeldTuning,
}

impl Default for BridgeTuning {
    fn default() -> Self {
        Self {
            proximity_margin: 12.0,
            clearance: 8.0,
            plank_half_thickness: 5.0,
            plank_material: ShapeMaterial::default(),
            node_material: ShapeMaterial::default(),
            weld: WeldTuning::default(),
        }
    }
}

// Level-space pointer for one fixed step.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    pub position: Option<Vec2>,
    pub primary_pressed: bool,
    pub secondary_pressed: bool,
}

impl PointerInput {
    pub fn at(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn with_primary(mut self) -> Self {
        self.primary_pressed = true;
        self
    }

    #[cfg(test)]
    pub fn with_secondary(mut self) -> Self {
        self.secondary_pressed = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeAction {
    Selected(NodeId),
    Built(usize),
    Rejected,
    Cancelled,
}

impl BridgeAction {
    pub fn is_node_click(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

// The selected node is never the focused one.
#[derive(Debug, Default)]
pub struct BridgeBuilder {
    focused: Option<NodeId>,
    selected: Option<NodeId>,
    pointer: Option<Vec2>,
    tuning: BridgeTuning,
}

impl BridgeBuilder {
    pub fn new(tuning: BridgeTuning) -> Self {
        Self {
            tuning,
            ..Self::default()
        }
    }

    pub fn tuning(&self) -> &BridgeTuning {
        &self.tuning
    }

    pub fn set_tuning(&mut self, tuning: BridgeTuning) {
        self.tuning = tuning;
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.focused = None;
        self.selected = None;
    }

    pub fn update(
        &mut self,
        pointer: &PointerInput,
        registry: &mut EntityRegistry,
        world: &mut PhysicsWorld,
    ) -> Option<BridgeAction> {
        self.pointer = pointer.position;
        self.focused = pointer
            .position
            .and_then(|position| self.hovered_node(position, registry));

        if pointer.secondary_pressed && self.selected.is_some() {
            debug!("Node selection cancelled.");
            self.clear_selection();
            return Some(BridgeAction::Cancelled);
        }

        if !pointer.primary_pressed {
            return None;
        }
        let focused = self.focused?;

        match self.selected {
            None => {
                self.selected = Some(focused);
                self.focused = None;
                Some(BridgeAction::Selected(focused))
            }
            Some(selected) if selected == focused => None,
            Some(selected) => {
                let built = build_joint(registry, world, selected, focused, &self.tuning);
                self.clear_selection();
                Some(built.map_or(BridgeAction::Rejected, BridgeAction::Built))
            }
        }
    }

    fn hovered_node(&self, position: Vec2, registry: &EntityRegistry) -> Option<NodeId> {
        let margin = self.tuning.proximity_margin;
        registry
            .nodes()
            .find(|(id, node)| {
                node.is_attached()
                    && Some(*id) != self.selected
                    && node.rect().inflate(margin).contains(position)
            })
            .map(|(id, _)| id)
    }

    pub fn draw(&self, registry: &EntityRegistry, renderer: &mut impl SceneRenderer) {
        let Some(selected) = self.selected.and_then(|id| registry.node(id)) else {
            return;
        };
        let Some(pointer) = self.pointer else {
            return;
        };
        renderer.draw_selection_line(selected.center(), pointer);
    }
}

pub fn spawn_node(
    registry: &mut EntityRegistry,
    world: &mut PhysicsWorld,
    position: Vec2,
    size: Vec2,
    material: ShapeMaterial,
) -> NodeId {
    let body = world.create_fixed_box(position + size * 0.5, size * 0.5, material);
    registry.add_node(Node::attached(position, size, body))
}

// The pair is ordered left to right; a rejected request leaves the world untouched.
pub fn build_joint(
    registry: &mut EntityRegistry,
    world: &mut PhysicsWorld,
    first: NodeId,
    second: NodeId,
    tuning: &BridgeTuning,
) -> Option<usize> {
    if first == second {
        return None;
    }
    let (Some(first_node), Some(second_node)) = (registry.node(first), registry.node(second))
    else {
        warn!("Ignoring joint request for a node that is no longer registered.");
        return None;
    };

    let ((id_a, node_a), (id_b, node_b)) = if second_node.position.x < first_node.position.x {
        ((second, second_node), (first, first_node))
    } else {
        ((first, first_node), (second, second_node))
    };
    let (Some(body_a), Some(body_b)) = (node_a.physics(), node_b.physics()) else {
        warn!("Ignoring joint request for a node without a physics body.");
        return None;
    };
    if !world.contains_body(body_a) || !world.contains_body(body_b) {
        warn!("Ignoring joint request for a node whose body left the world.");
        return None;
    }

    let center_a = node_a.center();
    let center_b = node_b.center();
    let span = center_a.distance(center_b);
    let half_length = span * 0.5 - tuning.clearance;
    if half_length <= 0.0 {
        warn!("Nodes are too close for a plank (span {span:.1}).");
        return None;
    }

    let direction = (center_b - center_a) / span;
    let angle = direction.y.atan2(direction.x);
    let pose_a = world.body_pose(body_a)?;
    let pose_b = world.body_pose(body_b)?;
    let attach_a = world.local_point(body_a, center_a + direction * tuning.clearance)?;
    let attach_b = world.local_point(body_b, center_b - direction * tuning.clearance)?;

    let half_extents = Vec2::new(half_length, tuning.plank_half_thickness);
    let plank = world.create_dynamic_box(
        (center_a + center_b) * 0.5,
        angle,
        half_extents,
        tuning.plank_material,
        false,
    );
    let joints = [
        world.create_joint(
            body_a,
            plank,
            weld_joint(
                attach_a,
                angle - pose_a.angle,
                Vec2::new(-half_length, 0.0),
                0.0,
                &tuning.weld,
            ),
        ),
        world.create_joint(
            plank,
            body_b,
            weld_joint(
                Vec2::new(half_length, 0.0),
                0.0,
                attach_b,
                angle - pose_b.angle,
                &tuning.weld,
            ),
        ),
    ];

    let index = registry.add_segment(JointSegment {
        node_a: id_a,
        node_b: id_b,
        plank,
        half_extents,
        joints,
    });
    info!(
        "Built plank {index} from ({:.0}, {:.0}) to ({:.0}, {:.0}).",
        center_a.x, center_a.y, center_b.x, center_b.y
    );
    Some(index)
}

// Every axis is free; damped springs pull it back to the rest frame.
fn weld_joint(
    anchor1: Vec2,
    angle1: f32,
    anchor2: Vec2,
    angle2: f32,
    weld: &WeldTuning,
) -> GenericJoint {
    let (linear_stiffness, linear_damping) =
        spring_coefficients(weld.linear_hertz, weld.linear_damping_ratio);
    let (angular_stiffness, angular_damping) =
        spring_coefficients(weld.angular_hertz, weld.angular_damping_ratio);

    let mut builder = GenericJointBuilder::new(JointAxesMask::empty())
        .local_frame1(Isometry::new(vector![anchor1.x, anchor1.y], angle1))
        .local_frame2(Isometry::new(vector![anchor2.x, anchor2.y], angle2))
        .contacts_enabled(true);
    for (axis, stiffness, damping) in [
        (JointAxis::LinX, linear_stiffness, linear_damping),
        (JointAxis::LinY, linear_stiffness, linear_damping),
        (JointAxis::AngX, angular_stiffness, angular_damping),
    ] {
        builder = builder
            .motor_model(axis, MotorModel::AccelerationBased)
            .motor_position(axis, 0.0, stiffness, damping);
    }
    builder.build()
}
