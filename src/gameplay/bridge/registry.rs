use crate::gameplay::render::{NodeHighlight, SceneRenderer};
use crate::physics::PhysicsWorld;
use bevy::log::debug;
use bevy::math::{Rect, Vec2};
use bevy_rapier2d::rapier::prelude::{ImpulseJointHandle, RigidBodyHandle};

// Ids from before a `clear` never resolve again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    epoch: u32,
}

// `position` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub position: Vec2,
    pub size: Vec2,
    body: Option<RigidBodyHandle>,
}

impl Node {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            body: None,
        }
    }

    pub fn attached(position: Vec2, size: Vec2, body: RigidBodyHandle) -> Self {
        Self {
            position,
            size,
            body: Some(body),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.position, self.position + self.size)
    }

    pub fn physics(&self) -> Option<RigidBodyHandle> {
        self.body
    }

    pub fn is_attached(&self) -> bool {
        self.body.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticBody {
    pub position: Vec2,
    pub size: Vec2,
    pub body: RigidBodyHandle,
}

impl StaticBody {
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.position, self.position + self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    Goal,
    Lose,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub kind: ZoneKind,
    pub rect: Rect,
}

impl Zone {
    pub fn new(kind: ZoneKind, position: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            rect: Rect::from_corners(position, position + size),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointSegment {
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub plank: RigidBodyHandle,
    pub half_extents: Vec2,
    pub joints: [ImpulseJointHandle; 2],
}

#[derive(Debug, Default)]
pub struct EntityRegistry {
    epoch: u32,
    nodes: Vec<Node>,
    statics: Vec<StaticBody>,
    segments: Vec<JointSegment>,
    goal: Option<Zone>,
    lose: Option<Zone>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId {
            index: self.nodes.len() as u32,
            epoch: self.epoch,
        };
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        if id.epoch != self.epoch {
            return None;
        }
        self.nodes.get(id.index as usize)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        let epoch = self.epoch;
        self.nodes.iter().enumerate().map(move |(index, node)| {
            (
                NodeId {
                    index: index as u32,
                    epoch,
                },
                node,
            )
        })
    }

    pub fn add_static(&mut self, body: StaticBody) {
        self.statics.push(body);
    }

    pub fn statics(&self) -> &[StaticBody] {
        &self.statics
    }

    pub fn add_segment(&mut self, segment: JointSegment) -> usize {
        self.segments.push(segment);
        self.segments.len() - 1
    }

    pub fn segments(&self) -> &[JointSegment] {
        &self.segments
    }

    pub fn set_zone(&mut self, zone: Zone) {
        let slot = match zone.kind {
            ZoneKind::Goal => &mut self.goal,
            ZoneKind::Lose => &mut self.lose,
        };
        if slot.is_some() {
            debug!("Replacing existing {:?} zone.", zone.kind);
        }
        *slot = Some(zone);
    }

    pub fn goal(&self) -> Option<&Zone> {
        self.goal.as_ref()
    }

    pub fn lose(&self) -> Option<&Zone> {
        self.lose.as_ref()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn static_count(&self) -> usize {
        self.statics.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
            && self.statics.is_empty()
            && self.segments.is_empty()
            && self.goal.is_none()
            && self.lose.is_none()
    }

    // Bodies belong to the world; only the records go.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.statics.clear();
        self.segments.clear();
        self.goal = None;
        self.lose = None;
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub fn draw(
        &self,
        world: &PhysicsWorld,
        focused: Option<NodeId>,
        selected: Option<NodeId>,
        renderer: &mut impl SceneRenderer,
    ) {
        for zone in [self.goal, self.lose].into_iter().flatten() {
            renderer.draw_zone(zone.kind, zone.rect);
        }
        for body in &self.statics {
            renderer.draw_static(body.rect());
        }
        for segment in &self.segments {
            if let Some(pose) = world.body_pose(segment.plank) {
                renderer.draw_plank(pose, segment.half_extents);
            }
        }
        for (id, node) in self.nodes() {
            let highlight = if Some(id) == selected {
                NodeHighlight::Selected
            } else if Some(id) == focused {
                NodeHighlight::Focused
            } else {
                NodeHighlight::None
            };
            renderer.draw_node(node.rect(), highlight);
        }
    }
}
