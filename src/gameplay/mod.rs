pub mod bridge;
pub mod render;
pub mod session;
pub mod sfx;
pub mod vehicle;

use crate::config::GameConfig;
use crate::levels::LdtkLevelSource;
use crate::states::GameState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bridge::PointerInput;
use render::{level_to_world, world_to_level, GizmoSceneRenderer};
use session::{LevelSession, SessionEvent};
use sfx::GameplaySfxPlugin;
use std::path::{Path, PathBuf};

const ASSET_ROOT: &str = "assets";
const BACKGROUND_Z: f32 = -10.0;
const TUTORIAL_HINT_Z: f32 = 20.0;

pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerInput>()
            .init_resource::<ShownBackground>()
            .add_message::<LevelOutcomeMessage>()
            .add_message::<EngineCueMessage>()
            .add_message::<NodeClickCueMessage>()
            .add_systems(Startup, (configure_fixed_timestep, setup_level_session))
            .add_systems(
                Update,
                (collect_pointer_input, launch_and_restart_controls)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                FixedUpdate,
                advance_level_session.run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (
                    draw_level_session,
                    sync_level_background,
                    sync_tutorial_hint,
                    frame_level_camera,
                )
                    .run_if(resource_exists::<LevelSession>),
            )
            .add_plugins(GameplaySfxPlugin);
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcomeMessage {
    Passed { level: usize },
    Lost { level: usize },
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCueMessage {
    Started,
    Stopped,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeClickCueMessage;

#[derive(Component)]
struct LevelBackground;

#[derive(Component)]
struct TutorialHint;

#[derive(Resource, Debug, Default)]
struct ShownBackground {
    level: Option<usize>,
    path: Option<PathBuf>,
}

fn configure_fixed_timestep(mut commands: Commands, config: Res<GameConfig>) {
    let hz = config.game.physics.fixed_timestep_hz as f64;
    commands.insert_resource(Time::<Fixed>::from_hz(hz));
    info!("Fixed simulation step set to {hz} Hz.");
}

fn setup_level_session(mut commands: Commands, config: Res<GameConfig>) {
    let source = LdtkLevelSource::open(Path::new(ASSET_ROOT), &config.game.app.level_project)
        .unwrap_or_else(|error| panic!("failed to open level project: {error}"));

    let mut session = LevelSession::new(Box::new(source), config.session_tuning());
    session.set_level(config.game.app.starting_level);
    if let Err(error) = session.reload() {
        panic!(
            "failed to load starting level {}: {error}",
            config.game.app.starting_level
        );
    }

    commands.insert_resource(session);
}

fn collect_pointer_input(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut pointer: ResMut<PointerInput>,
) {
    let cursor_world = windows
        .single()
        .ok()
        .and_then(Window::cursor_position)
        .and_then(|cursor| {
            let (camera, camera_transform) = cameras.single().ok()?;
            camera.viewport_to_world_2d(camera_transform, cursor).ok()
        });

    pointer.position = cursor_world.map(world_to_level);
    // Presses accumulate until the next fixed step consumes them.
    pointer.primary_pressed |= mouse.just_pressed(MouseButton::Left);
    pointer.secondary_pressed |= mouse.just_pressed(MouseButton::Right);
}

fn launch_and_restart_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<LevelSession>,
    mut engine_cues: MessageWriter<EngineCueMessage>,
) {
    if keyboard.any_just_pressed([KeyCode::Space, KeyCode::Enter]) && session.move_car() {
        engine_cues.write(EngineCueMessage::Started);
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        engine_cues.write(EngineCueMessage::Stopped);
        if let Err(error) = session.reload() {
            error!("Level restart failed: {error}");
        }
    }
}

fn advance_level_session(
    mut session: ResMut<LevelSession>,
    mut pointer: ResMut<PointerInput>,
    mut outcomes: MessageWriter<LevelOutcomeMessage>,
    mut engine_cues: MessageWriter<EngineCueMessage>,
    mut clicks: MessageWriter<NodeClickCueMessage>,
) {
    let input = *pointer;
    pointer.primary_pressed = false;
    pointer.secondary_pressed = false;

    let level = session.current_level();
    for event in session.update(&input) {
        match event {
            SessionEvent::NodeClicked => {
                clicks.write(NodeClickCueMessage);
            }
            SessionEvent::TutorialAdvanced { step } => {
                debug!("Tutorial hint is now {step:?}.");
            }
            SessionEvent::SegmentBuilt { index } => {
                debug!("Plank {index} added to level {level}.");
            }
            SessionEvent::EngineStopped => {
                engine_cues.write(EngineCueMessage::Stopped);
            }
            SessionEvent::LevelPassed => {
                outcomes.write(LevelOutcomeMessage::Passed { level });
            }
            SessionEvent::LevelLost => {
                outcomes.write(LevelOutcomeMessage::Lost { level });
            }
        }
    }
}

fn draw_level_session(session: Res<LevelSession>, mut gizmos: Gizmos) {
    let mut renderer = GizmoSceneRenderer::new(&mut gizmos);
    session.draw(&mut renderer);
}

fn sync_level_background(
    mut commands: Commands,
    session: Res<LevelSession>,
    asset_server: Res<AssetServer>,
    mut shown: ResMut<ShownBackground>,
    existing: Query<Entity, With<LevelBackground>>,
) {
    let loaded = session.loaded_level();
    let level = loaded.map(|level| level.index);
    let path = loaded.and_then(|level| level.background.clone());
    if shown.level == level && shown.path == path {
        return;
    }

    for entity in &existing {
        commands.entity(entity).try_despawn();
    }

    if let (Some(loaded), Some(path)) = (loaded, path.as_ref()) {
        let center = level_to_world(loaded.size * 0.5);
        commands.spawn((
            Name::new("LevelBackground"),
            LevelBackground,
            Sprite {
                image: asset_server.load(path.clone()),
                custom_size: Some(loaded.size),
                ..default()
            },
            Transform::from_xyz(center.x, center.y, BACKGROUND_Z),
        ));
        debug!("Showing background `{}`.", path.display());
    }

    shown.level = level;
    shown.path = path;
}

fn sync_tutorial_hint(
    mut commands: Commands,
    session: Res<LevelSession>,
    mut hints: Query<(Entity, &mut Text2d, &mut Transform), With<TutorialHint>>,
) {
    let hint = session.tutorial_hint();
    match (hint, hints.single_mut()) {
        (Some((text, anchor)), Ok((_, mut shown, mut transform))) => {
            if shown.0 != text {
                shown.0 = text.to_string();
            }
            transform.translation = level_to_world(anchor).extend(TUTORIAL_HINT_Z);
        }
        (Some((text, anchor)), Err(_)) => {
            commands.spawn((
                Name::new("TutorialHint"),
                TutorialHint,
                Text2d::new(text),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.94, 0.62)),
                Transform::from_translation(level_to_world(anchor).extend(TUTORIAL_HINT_Z)),
            ));
        }
        (None, Ok((entity, ..))) => {
            commands.entity(entity).try_despawn();
        }
        (None, Err(_)) => {}
    }
}

fn frame_level_camera(
    session: Res<LevelSession>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let Some(loaded) = session.loaded_level() else {
        return;
    };
    let center = level_to_world(loaded.size * 0.5);
    for mut transform in &mut cameras {
        transform.translation.x = center.x;
        transform.translation.y = center.y;
    }
}
