use crate::gameplay::bridge::registry::ZoneKind;
use crate::gameplay::vehicle::VehiclePose;
use crate::physics::BodyPose;
use bevy::math::{Isometry2d, Rot2};
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeHighlight {
    None,
    Focused,
    Selected,
}

// Coordinates are level space (pixels, +y down).
pub trait SceneRenderer {
    fn draw_static(&mut self, rect: Rect);
    fn draw_node(&mut self, rect: Rect, highlight: NodeHighlight);
    fn draw_plank(&mut self, pose: BodyPose, half_extents: Vec2);
    fn draw_zone(&mut self, kind: ZoneKind, rect: Rect);
    fn draw_vehicle(&mut self, pose: &VehiclePose);
    fn draw_selection_line(&mut self, from: Vec2, to: Vec2);
}

const STATIC_COLOR: Color = Color::srgb(0.55, 0.50, 0.42);
const NODE_COLOR: Color = Color::srgb(0.80, 0.82, 0.86);
const NODE_FOCUSED_COLOR: Color = Color::srgb(1.00, 0.86, 0.30);
const NODE_SELECTED_COLOR: Color = Color::srgb(0.30, 0.95, 0.45);
const PLANK_COLOR: Color = Color::srgb(0.72, 0.52, 0.30);
const GOAL_COLOR: Color = Color::srgba(0.25, 0.90, 0.40, 0.6);
const LOSE_COLOR: Color = Color::srgba(0.95, 0.25, 0.25, 0.6);
const CHASSIS_COLOR: Color = Color::srgb(0.30, 0.55, 0.95);
const WHEEL_COLOR: Color = Color::srgb(0.15, 0.15, 0.18);
const PREVIEW_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.7);

pub struct GizmoSceneRenderer<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
}

impl<'a, 'w, 's> GizmoSceneRenderer<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>) -> Self {
        Self { gizmos }
    }

    fn rect(&mut self, rect: Rect, color: Color) {
        self.gizmos.rect_2d(
            Isometry2d::from_translation(level_to_world(rect.center())),
            rect.size(),
            color,
        );
    }

    fn oriented_rect(&mut self, pose: BodyPose, half_extents: Vec2, color: Color) {
        self.gizmos
            .rect_2d(pose_isometry(pose), half_extents * 2.0, color);
    }
}

impl SceneRenderer for GizmoSceneRenderer<'_, '_, '_> {
    fn draw_static(&mut self, rect: Rect) {
        self.rect(rect, STATIC_COLOR);
    }

    fn draw_node(&mut self, rect: Rect, highlight: NodeHighlight) {
        let color = match highlight {
            NodeHighlight::None => NODE_COLOR,
            NodeHighlight::Focused => NODE_FOCUSED_COLOR,
            NodeHighlight::Selected => NODE_SELECTED_COLOR,
        };
        self.rect(rect, color);
    }

    fn draw_plank(&mut self, pose: BodyPose, half_extents: Vec2) {
        self.oriented_rect(pose, half_extents, PLANK_COLOR);
    }

    fn draw_zone(&mut self, kind: ZoneKind, rect: Rect) {
        let color = match kind {
            ZoneKind::Goal => GOAL_COLOR,
            ZoneKind::Lose => LOSE_COLOR,
        };
        self.rect(rect, color);
    }

    fn draw_vehicle(&mut self, pose: &VehiclePose) {
        self.oriented_rect(pose.chassis, pose.chassis_half_extents, CHASSIS_COLOR);
        for wheel in [pose.rear_wheel, pose.front_wheel] {
            let isometry = pose_isometry(wheel);
            self.gizmos
                .circle_2d(isometry, pose.wheel_radius, WHEEL_COLOR);
            // Spoke so wheel rotation is visible.
            let spoke = isometry.rotation * Vec2::new(pose.wheel_radius, 0.0);
            self.gizmos.line_2d(
                isometry.translation,
                isometry.translation + spoke,
                WHEEL_COLOR,
            );
        }
    }

    fn draw_selection_line(&mut self, from: Vec2, to: Vec2) {
        self.gizmos
            .line_2d(level_to_world(from), level_to_world(to), PREVIEW_COLOR);
    }
}

pub fn level_to_world(point: Vec2) -> Vec2 {
    Vec2::new(point.x, -point.y)
}

pub fn world_to_level(point: Vec2) -> Vec2 {
    Vec2::new(point.x, -point.y)
}

fn pose_isometry(pose: BodyPose) -> Isometry2d {
    Isometry2d::new(level_to_world(pose.position), Rot2::radians(-pose.angle))
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Static(Rect),
    Node(Rect, NodeHighlight),
    Plank(BodyPose),
    Zone(ZoneKind),
    Vehicle,
    SelectionLine(Vec2, Vec2),
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

#[cfg(test)]
impl RecordingRenderer {
    pub fn count(&self, predicate: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

#[cfg(test)]
impl SceneRenderer for RecordingRenderer {
    fn draw_static(&mut self, rect: Rect) {
        self.calls.push(DrawCall::Static(rect));
    }

    fn draw_node(&mut self, rect: Rect, highlight: NodeHighlight) {
        self.calls.push(DrawCall::Node(rect, highlight));
    }

    fn draw_plank(&mut self, pose: BodyPose, _half_extents: Vec2) {
        self.calls.push(DrawCall::Plank(pose));
    }

    fn draw_zone(&mut self, kind: ZoneKind, _rect: Rect) {
        self.calls.push(DrawCall::Zone(kind));
    }

    fn draw_vehicle(&mut self, _pose: &VehiclePose) {
        self.calls.push(DrawCall::Vehicle);
    }

    fn draw_selection_line(&mut self, from: Vec2, to: Vec2) {
        self.calls.push(DrawCall::SelectionLine(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_space_flips_vertical_axis() {
        let point = Vec2::new(12.0, 40.0);
        assert_eq!(level_to_world(point), Vec2::new(12.0, -40.0));
        assert_eq!(world_to_level(level_to_world(point)), point);
    }
}
