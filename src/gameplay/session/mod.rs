pub mod collision;
pub mod tutorial;

use crate::gameplay::bridge::registry::{EntityRegistry, StaticBody, Zone, ZoneKind};
use crate::gameplay::bridge::{spawn_node, BridgeAction, BridgeBuilder, BridgeTuning, PointerInput};
use crate::gameplay::render::SceneRenderer;
use crate::gameplay::vehicle::{VehicleRig, VehicleTuning};
use crate::levels::{LevelData, LevelLoadError, LevelRecord, LevelSource};
use crate::physics::{
    PhysicsWorldManager, ShapeMaterial, FIXED_TIMESTEP_S, REFERENCE_GRAVITY, SOLVER_SUBSTEPS,
};
use bevy::log::{debug, info, warn};
use bevy::math::Vec2;
use bevy::prelude::Resource;
use collision::{evaluate_zones, LevelState};
use std::path::PathBuf;

const TUTORIAL_HINT_LIFT: f32 = 36.0;
use tutorial::{Tutorial, TutorialStep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityNames {
    pub vehicle_spawn: String,
    pub static_body: String,
    pub node: String,
    pub goal: String,
    pub lose: String,
}

impl Default for EntityNames {
    fn default() -> Self {
        Self {
            vehicle_spawn: "Car".to_string(),
            static_body: "Static".to_string(),
            node: "Node".to_string(),
            goal: "Passed".to_string(),
            lose: "Lose".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionTuning {
    pub gravity: Vec2,
    pub timestep: f32,
    pub substeps: usize,
    pub static_material: ShapeMaterial,
    pub vehicle: VehicleTuning,
    pub bridge: BridgeTuning,
    pub entity_names: EntityNames,
    pub tutorial: bool,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            gravity: REFERENCE_GRAVITY,
            timestep: FIXED_TIMESTEP_S,
            substeps: SOLVER_SUBSTEPS,
            static_material: ShapeMaterial::default(),
            vehicle: VehicleTuning::default(),
            bridge: BridgeTuning::default(),
            entity_names: EntityNames::default(),
            tutorial: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    NodeClicked,
    SegmentBuilt { index: usize },
    TutorialAdvanced { step: TutorialStep },
    EngineStopped,
    LevelPassed,
    LevelLost,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLevel {
    pub index: usize,
    pub identifier: String,
    pub size: Vec2,
    pub background: Option<PathBuf>,
}

#[derive(Resource)]
pub struct LevelSession {
    physics: PhysicsWorldManager,
    vehicle: VehicleRig,
    registry: EntityRegistry,
    bridge: BridgeBuilder,
    state: LevelState,
    tutorial: Tutorial,
    current_level: usize,
    loaded: Option<LoadedLevel>,
    tuning: SessionTuning,
    source: Box<dyn LevelSource + Send + Sync>,
}

impl LevelSession {
    pub fn new(source: Box<dyn LevelSource + Send + Sync>, tuning: SessionTuning) -> Self {
        Self {
            physics: PhysicsWorldManager::new(),
            vehicle: VehicleRig::new(),
            registry: EntityRegistry::new(),
            bridge: BridgeBuilder::new(tuning.bridge),
            state: LevelState::Playing,
            tutorial: Tutorial::new(tuning.tutorial),
            current_level: 0,
            loaded: None,
            tuning,
            source,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.physics.is_active()
    }

    // Data is validated before the world exists, so a failed load leaves the session empty.
    pub fn load(&mut self, index: usize) -> Result<(), LevelLoadError> {
        if self.is_loaded() {
            self.reset();
        }

        let data = self.source.load(index)?;
        let plan = plan_level(&data, &self.tuning.entity_names)?;
        self.current_level = index;

        let world = self.physics.create(self.tuning.gravity);
        for (position, size) in plan.statics {
            let body =
                world.create_fixed_box(position + size * 0.5, size * 0.5, self.tuning.static_material);
            self.registry.add_static(StaticBody {
                position,
                size,
                body,
            });
        }
        for (position, size) in plan.nodes {
            spawn_node(
                &mut self.registry,
                world,
                position,
                size,
                self.tuning.bridge.node_material,
            );
        }
        self.registry.set_zone(plan.goal);
        if let Some(lose) = plan.lose {
            self.registry.set_zone(lose);
        }
        self.vehicle
            .spawn(world, plan.vehicle_spawn, &self.tuning.vehicle);

        self.state = LevelState::Playing;
        self.loaded = Some(LoadedLevel {
            index,
            identifier: data.identifier,
            size: data.size,
            background: data.background,
        });
        info!(
            "Loaded level {index}: {} statics, {} nodes.",
            self.registry.static_count(),
            self.registry.node_count()
        );
        Ok(())
    }

    pub fn update(&mut self, pointer: &PointerInput) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        self.physics
            .step(self.tuning.timestep, self.tuning.substeps);
        let Some(world) = self.physics.world_mut() else {
            return events;
        };

        if let Some(action) = self.bridge.update(pointer, &mut self.registry, world) {
            if action.is_node_click() {
                events.push(SessionEvent::NodeClicked);
            }
            if let BridgeAction::Built(index) = action {
                events.push(SessionEvent::SegmentBuilt { index });
            }
            let first_node = self.registry.nodes().next().map(|(id, _)| id);
            if let Some(step) = self.tutorial.observe(action, first_node) {
                debug!("Tutorial moved to {step:?}.");
                events.push(SessionEvent::TutorialAdvanced { step });
            }
        }

        if !self.vehicle.is_spawned() {
            return events;
        }
        let point = self.vehicle.position(world);
        if let Some(next) =
            evaluate_zones(self.state, point, self.registry.goal(), self.registry.lose())
        {
            self.state = next;
            self.vehicle.set_speed(world, 0.0);
            events.push(SessionEvent::EngineStopped);
            events.push(match next {
                LevelState::Passed => SessionEvent::LevelPassed,
                _ => SessionEvent::LevelLost,
            });
            info!(
                "Level {} ended with {next:?} at ({:.1}, {:.1}).",
                self.current_level, point.x, point.y
            );
            if next == LevelState::Passed && self.tutorial.finish() {
                events.push(SessionEvent::TutorialAdvanced {
                    step: TutorialStep::Done,
                });
            }
        }
        events
    }

    pub fn reset(&mut self) {
        if let Some(world) = self.physics.world_mut() {
            if self.vehicle.is_spawned() {
                self.vehicle.despawn(world);
            }
        }
        if self.physics.is_active() {
            self.physics.destroy();
        }
        self.registry.clear();
        self.bridge.clear_selection();
        self.state = LevelState::Playing;
        if self.loaded.take().is_some() {
            info!("Reset level {}.", self.current_level);
        }
    }

    pub fn next_level(&mut self) -> Result<(), LevelLoadError> {
        self.reset();
        self.load(self.current_level + 1)
    }

    pub fn reload(&mut self) -> Result<(), LevelLoadError> {
        self.load(self.current_level)
    }

    // Takes effect on the next `reload`.
    pub fn set_level(&mut self, index: usize) {
        self.current_level = index;
    }

    pub fn is_last_level(&self) -> bool {
        self.current_level + 1 == self.source.level_count()
    }

    pub fn is_level_clear(&self) -> bool {
        self.state == LevelState::Passed
    }

    pub fn move_car(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        let Some(world) = self.physics.world_mut() else {
            return false;
        };
        if !self.vehicle.is_spawned() {
            return false;
        }
        self.vehicle
            .set_speed(world, self.tuning.vehicle.launch_speed);
        info!("Vehicle launched at speed {}.", self.tuning.vehicle.launch_speed);
        true
    }

    // Scale only applies from the next spawn.
    pub fn retune_vehicle(&mut self, tuning: VehicleTuning) {
        self.tuning.vehicle = tuning;
        let Some(world) = self.physics.world_mut() else {
            return;
        };
        self.vehicle.set_torque(world, tuning.motor_torque);
        self.vehicle.set_hertz(world, tuning.suspension_hertz);
        self.vehicle
            .set_damping_ratio(world, tuning.damping_ratio);
    }

    pub fn set_bridge_tuning(&mut self, tuning: BridgeTuning) {
        self.tuning.bridge = tuning;
        self.bridge.set_tuning(tuning);
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn tutorial_step(&self) -> TutorialStep {
        self.tutorial.step()
    }

    // Hints float above the first node, then above the car once a plank is down.
    pub fn tutorial_hint(&self) -> Option<(&'static str, Vec2)> {
        let text = self.tutorial.step().hint()?;
        self.loaded.as_ref()?;
        let anchor = match self.tutorial.step() {
            TutorialStep::Launch => self.vehicle_position(),
            _ => self.registry.nodes().next().map(|(_, node)| node.center())?,
        };
        Some((text, anchor - Vec2::new(0.0, TUTORIAL_HINT_LIFT)))
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn level_count(&self) -> usize {
        self.source.level_count()
    }

    pub fn loaded_level(&self) -> Option<&LoadedLevel> {
        self.loaded.as_ref()
    }

    pub fn vehicle_position(&self) -> Vec2 {
        self.physics
            .world()
            .map(|world| self.vehicle.position(world))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn vehicle_motor_speed(&self) -> Option<f32> {
        self.vehicle.motor_speed(self.physics.world()?)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn bridge(&self) -> &BridgeBuilder {
        &self.bridge
    }

    pub fn physics(&self) -> &PhysicsWorldManager {
        &self.physics
    }

    pub fn tuning(&self) -> &SessionTuning {
        &self.tuning
    }

    pub fn draw(&self, renderer: &mut impl SceneRenderer) {
        let Some(world) = self.physics.world() else {
            return;
        };
        self.registry.draw(
            world,
            self.bridge.focused(),
            self.bridge.selected(),
            renderer,
        );
        self.bridge.draw(&self.registry, renderer);
        self.vehicle.draw(world, renderer);
    }
}

struct LevelPlan {
    vehicle_spawn: Vec2,
    statics: Vec<(Vec2, Vec2)>,
    nodes: Vec<(Vec2, Vec2)>,
    goal: Zone,
    lose: Option<Zone>,
}

fn plan_level(data: &LevelData, names: &EntityNames) -> Result<LevelPlan, LevelLoadError> {
    let missing = |name: &str| LevelLoadError::MissingEntity {
        level: data.identifier.clone(),
        name: name.to_string(),
    };
    let extents = |record: &LevelRecord| (record.position, record.size);

    let mut spawns = data.records_named(&names.vehicle_spawn);
    let vehicle_spawn = spawns
        .next()
        .map(|record| record.position)
        .ok_or_else(|| missing(&names.vehicle_spawn))?;
    if spawns.next().is_some() {
        warn!(
            "Level `{}` has more than one `{}`; using the first.",
            data.identifier, names.vehicle_spawn
        );
    }
    let goal = data
        .records_named(&names.goal)
        .last()
        .map(|record| Zone::new(ZoneKind::Goal, record.position, record.size))
        .ok_or_else(|| missing(&names.goal))?;
    let lose = data
        .records_named(&names.lose)
        .last()
        .map(|record| Zone::new(ZoneKind::Lose, record.position, record.size));

    let known = [
        &names.vehicle_spawn,
        &names.static_body,
        &names.node,
        &names.goal,
        &names.lose,
    ];
    for record in &data.records {
        if !known.contains(&&record.name) {
            debug!(
                "Skipping unknown entity `{}` in level `{}`.",
                record.name, data.identifier
            );
        }
    }

    Ok(LevelPlan {
        vehicle_spawn,
        statics: data.records_named(&names.static_body).map(extents).collect(),
        nodes: data.records_named(&names.node).map(extents).collect(),
        goal,
        lose,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::render::{DrawCall, RecordingRenderer};
    use crate::levels::StaticLevelSource;

    fn record(name: &str, position: Vec2, size: Vec2) -> LevelRecord {
        LevelRecord {
            name: name.to_string(),
            position,
            size,
        }
    }

    // Car at (50, 50) resting on ground whose top edge is y = 92.
    fn level(index: usize, goal_at: Vec2, lose_at: Option<Vec2>) -> LevelData {
        let mut records = vec![
            record("Car", Vec2::new(50.0, 50.0), Vec2::splat(16.0)),
            record("Static", Vec2::new(-200.0, 92.0), Vec2::new(4_000.0, 40.0)),
            record("Node", Vec2::new(600.0, 300.0), Vec2::splat(8.0)),
            record("Node", Vec2::new(800.0, 300.0), Vec2::splat(8.0)),
            record("Passed", goal_at, Vec2::new(100.0, 100.0)),
            record("Decoration", Vec2::ZERO, Vec2::ONE),
        ];
        if let Some(lose_at) = lose_at {
            records.push(record("Lose", lose_at, Vec2::new(100.0, 100.0)));
        }
        LevelData {
            index,
            identifier: format!("Level_{index}"),
            size: Vec2::new(1280.0, 720.0),
            records,
            background: None,
        }
    }

    fn far_level(index: usize) -> LevelData {
        level(index, Vec2::new(3_000.0, 0.0), Some(Vec2::new(0.0, 600.0)))
    }

    fn session(levels: Vec<LevelData>) -> LevelSession {
        LevelSession::new(
            Box::new(StaticLevelSource { levels }),
            SessionTuning::default(),
        )
    }

    fn standard_session() -> LevelSession {
        let mut broken = far_level(2);
        broken.records.retain(|record| record.name != "Car");
        session(vec![far_level(0), far_level(1), broken])
    }

    fn counts(session: &LevelSession) -> (usize, usize) {
        let world = session.physics().world().expect("world should be active");
        (world.body_count(), world.joint_count())
    }

    #[test]
    fn load_populates_world_registry_and_vehicle() {
        let mut session = standard_session();
        session.load(0).expect("level 0 should load");

        assert!(session.is_loaded());
        assert_eq!(session.state(), LevelState::Playing);
        assert_eq!(session.current_level(), 0);
        // One static, two nodes, chassis and two wheels.
        assert_eq!(counts(&session), (6, 2));
        assert_eq!(session.registry().node_count(), 2);
        assert!(session.registry().goal().is_some());
        assert!(session.registry().lose().is_some());
        assert!((session.vehicle_position() - Vec2::new(10.0, 44.0)).length() < 1e-3);
        assert_eq!(
            session.loaded_level().map(|level| level.identifier.as_str()),
            Some("Level_0")
        );
    }

    #[test]
    fn loading_again_resets_first() {
        let mut session = standard_session();
        session.load(0).expect("level 0 should load");
        let first = counts(&session);
        session.load(0).expect("level 0 should reload");
        assert_eq!(counts(&session), first);
        assert_eq!(session.registry().node_count(), 2);
    }

    #[test]
    fn reset_is_safe_with_nothing_loaded() {
        let mut session = standard_session();
        session.reset();
        assert!(!session.is_loaded());
        assert_eq!(session.vehicle_position(), Vec2::ZERO);
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = standard_session();
        session.load(0).expect("level 0 should load");
        let node = session.registry().nodes().next().map(|(_, node)| node.center());
        session.update(&PointerInput::at(node.expect("node exists")).with_primary());
        assert!(session.bridge().selected().is_some());

        session.reset();
        assert!(!session.is_loaded());
        assert!(session.registry().is_empty());
        assert_eq!(session.bridge().selected(), None);
        assert!(session.loaded_level().is_none());
    }

    #[test]
    fn failed_load_leaves_session_empty() {
        let mut session = standard_session();
        session.load(0).expect("level 0 should load");

        let error = session.load(2).expect_err("level 2 has no car");
        assert!(matches!(error, LevelLoadError::MissingEntity { ref name, .. } if name == "Car"));
        assert!(!session.is_loaded());
        assert!(session.registry().is_empty());

        let error = session.load(9).expect_err("level 9 does not exist");
        assert!(matches!(error, LevelLoadError::OutOfRange { index: 9, .. }));
        assert!(!session.is_loaded());
    }

    #[test]
    fn missing_goal_is_rejected_but_lose_is_optional() {
        let mut no_goal = far_level(0);
        no_goal.records.retain(|record| record.name != "Passed");
        let no_lose = level(1, Vec2::new(3_000.0, 0.0), None);
        let mut session = session(vec![no_goal, no_lose]);

        assert!(matches!(
            session.load(0),
            Err(LevelLoadError::MissingEntity { ref name, .. }) if name == "Passed"
        ));
        session.load(1).expect("lose zone is optional");
        assert!(session.registry().lose().is_none());
    }

    #[test]
    fn next_level_advances_and_tracks_the_last_level() {
        let mut session = standard_session();
        session.load(0).expect("level 0 should load");
        assert!(!session.is_last_level());

        session.next_level().expect("level 1 should load");
        assert_eq!(session.current_level(), 1);
        assert_eq!(counts(&session), (6, 2));
        assert!(!session.is_last_level());

        session.set_level(2);
        assert!(session.is_last_level());
    }

    #[test]
    fn reaching_the_goal_passes_once() {
        let mut session = session(vec![level(0, Vec2::ZERO, None)]);
        session.load(0).expect("level should load");
        assert!(session.move_car());

        let events = session.update(&PointerInput::default());
        assert_eq!(
            events,
            vec![
                SessionEvent::EngineStopped,
                SessionEvent::LevelPassed,
                SessionEvent::TutorialAdvanced {
                    step: TutorialStep::Done
                },
            ]
        );
        assert_eq!(session.tutorial_step(), TutorialStep::Done);
        assert_eq!(session.state(), LevelState::Passed);
        assert!(session.is_level_clear());
        assert_eq!(session.vehicle_motor_speed(), Some(0.0));

        for _ in 0..5 {
            assert!(session.update(&PointerInput::default()).is_empty());
            assert_eq!(session.state(), LevelState::Passed);
        }
        assert!(!session.move_car());
        assert_eq!(session.vehicle_motor_speed(), Some(0.0));
    }

    #[test]
    fn entering_the_hazard_loses() {
        let mut session = session(vec![level(0, Vec2::new(3_000.0, 0.0), Some(Vec2::ZERO))]);
        session.load(0).expect("level should load");

        let events = session.update(&PointerInput::default());
        assert_eq!(events, vec![SessionEvent::EngineStopped, SessionEvent::LevelLost]);
        assert_eq!(session.state(), LevelState::Lose);
        assert!(!session.is_level_clear());
        assert!(session.update(&PointerInput::default()).is_empty());
    }

    #[test]
    fn goal_takes_precedence_over_hazard() {
        let mut session = session(vec![level(0, Vec2::ZERO, Some(Vec2::ZERO))]);
        session.load(0).expect("level should load");

        session.update(&PointerInput::default());
        assert_eq!(session.state(), LevelState::Passed);
    }

    #[test]
    fn move_car_sets_launch_speed() {
        let mut session = standard_session();
        assert!(!session.move_car());
        session.load(0).expect("level 0 should load");
        assert_eq!(session.vehicle_motor_speed(), Some(0.0));

        assert!(session.move_car());
        assert_eq!(session.vehicle_motor_speed(), Some(150.0));
    }

    #[test]
    fn clicks_build_planks_through_update() {
        let mut session = standard_session();
        session.load(0).expect("level 0 should load");
        let centers: Vec<Vec2> = session
            .registry()
            .nodes()
            .map(|(_, node)| node.center())
            .collect();

        let events = session.update(&PointerInput::at(centers[0]).with_primary());
        assert_eq!(
            events,
            vec![
                SessionEvent::NodeClicked,
                SessionEvent::TutorialAdvanced {
                    step: TutorialStep::ConnectNode
                },
            ]
        );
        let events = session.update(&PointerInput::at(centers[1]).with_primary());
        assert_eq!(
            events,
            vec![
                SessionEvent::NodeClicked,
                SessionEvent::SegmentBuilt { index: 0 },
                SessionEvent::TutorialAdvanced {
                    step: TutorialStep::Launch
                },
            ]
        );
        assert_eq!(counts(&session), (7, 4));
    }

    #[test]
    fn tutorial_waits_for_the_first_node_and_steps_back_on_cancel() {
        let mut session = standard_session();
        session.load(0).expect("level 0 should load");
        let centers: Vec<Vec2> = session
            .registry()
            .nodes()
            .map(|(_, node)| node.center())
            .collect();

        let events = session.update(&PointerInput::at(centers[1]).with_primary());
        assert_eq!(events, vec![SessionEvent::NodeClicked]);
        assert_eq!(session.tutorial_step(), TutorialStep::SelectNode);

        session.update(&PointerInput::at(centers[1]).with_secondary());
        session.update(&PointerInput::at(centers[0]).with_primary());
        assert_eq!(session.tutorial_step(), TutorialStep::ConnectNode);

        let events = session.update(&PointerInput::at(centers[0]).with_secondary());
        assert_eq!(
            events,
            vec![SessionEvent::TutorialAdvanced {
                step: TutorialStep::SelectNode
            }]
        );
    }

    #[test]
    fn tutorial_hint_follows_the_first_node_then_the_car() {
        let mut session = standard_session();
        assert_eq!(session.tutorial_hint(), None);
        session.load(0).expect("level 0 should load");
        let centers: Vec<Vec2> = session
            .registry()
            .nodes()
            .map(|(_, node)| node.center())
            .collect();

        let (_, anchor) = session.tutorial_hint().expect("hint is shown");
        assert_eq!(anchor, centers[0] - Vec2::new(0.0, TUTORIAL_HINT_LIFT));

        session.update(&PointerInput::at(centers[0]).with_primary());
        session.update(&PointerInput::at(centers[1]).with_primary());
        let (text, anchor) = session.tutorial_hint().expect("launch hint is shown");
        assert!(text.contains("Space"));
        assert_eq!(
            anchor,
            session.vehicle_position() - Vec2::new(0.0, TUTORIAL_HINT_LIFT)
        );
    }

    #[test]
    fn tutorial_progress_survives_reloads_and_can_be_disabled() {
        let mut session = standard_session();
        session.load(0).expect("level 0 should load");
        let first = session.registry().nodes().next().map(|(_, node)| node.center());
        session.update(&PointerInput::at(first.expect("node exists")).with_primary());
        session.reload().expect("level 0 should reload");
        assert_eq!(session.tutorial_step(), TutorialStep::ConnectNode);

        let mut quiet = LevelSession::new(
            Box::new(StaticLevelSource {
                levels: vec![far_level(0)],
            }),
            SessionTuning {
                tutorial: false,
                ..SessionTuning::default()
            },
        );
        quiet.load(0).expect("level 0 should load");
        let first = quiet.registry().nodes().next().map(|(_, node)| node.center());
        let events = quiet.update(&PointerInput::at(first.expect("node exists")).with_primary());
        assert_eq!(events, vec![SessionEvent::NodeClicked]);
        assert_eq!(quiet.tutorial_step(), TutorialStep::Done);
        assert_eq!(quiet.tutorial_hint(), None);
    }

    #[test]
    fn retuning_updates_live_vehicle_and_next_spawn() {
        let mut session = standard_session();
        session.load(0).expect("level 0 should load");
        let tuning = VehicleTuning {
            launch_speed: 80.0,
            ..VehicleTuning::default()
        };
        session.retune_vehicle(tuning);
        session.move_car();
        assert_eq!(session.vehicle_motor_speed(), Some(80.0));
        assert_eq!(session.tuning().vehicle, tuning);
    }

    #[test]
    fn draw_hands_every_entity_to_the_renderer() {
        let mut session = standard_session();
        let mut renderer = RecordingRenderer::default();
        session.draw(&mut renderer);
        assert!(renderer.calls.is_empty());

        session.load(0).expect("level 0 should load");
        session.draw(&mut renderer);
        assert_eq!(renderer.count(|call| matches!(call, DrawCall::Static(_))), 1);
        assert_eq!(renderer.count(|call| matches!(call, DrawCall::Node(..))), 2);
        assert_eq!(renderer.count(|call| matches!(call, DrawCall::Zone(_))), 2);
        assert_eq!(renderer.count(|call| matches!(call, DrawCall::Vehicle)), 1);
    }
}
