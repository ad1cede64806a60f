use crate::gameplay::session::LevelSession;
use crate::gameplay::{EngineCueMessage, LevelOutcomeMessage};
use bevy::app::AppExit;
use bevy::prelude::*;

#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    Lost,
    LevelClear,
}

pub struct GameStatePlugin;

impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(OnEnter(GameState::Menu), enter_menu)
            .add_systems(OnExit(GameState::Menu), cleanup_state_overlay)
            .add_systems(Update, menu_controls.run_if(in_state(GameState::Menu)))
            .add_systems(OnEnter(GameState::Playing), enter_playing)
            .add_systems(
                Update,
                playing_controls.run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::Lost), enter_lost)
            .add_systems(OnExit(GameState::Lost), cleanup_state_overlay)
            .add_systems(Update, lost_controls.run_if(in_state(GameState::Lost)))
            .add_systems(OnEnter(GameState::LevelClear), enter_level_clear)
            .add_systems(OnExit(GameState::LevelClear), cleanup_state_overlay)
            .add_systems(
                Update,
                level_clear_controls.run_if(in_state(GameState::LevelClear)),
            );
    }
}

#[derive(Component)]
struct StateOverlayRoot;

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn continue_pressed(
    keyboard: &ButtonInput<KeyCode>,
    mouse: &ButtonInput<MouseButton>,
) -> bool {
    keyboard.any_just_pressed([KeyCode::Enter, KeyCode::Space])
        || mouse.just_pressed(MouseButton::Left)
}

fn enter_menu(mut commands: Commands, session: Option<Res<LevelSession>>) {
    let level_line = session
        .map(|session| {
            format!(
                "Level {} of {}",
                session.current_level() + 1,
                session.level_count()
            )
        })
        .unwrap_or_default();
    spawn_state_overlay(
        &mut commands,
        "BRIDGE RIDER",
        &format!(
            "{level_line}\n\n\
Click or press Enter to start\n\
Q - Quit"
        ),
    );
    info!("Entered state: Menu");
}

fn menu_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    if continue_pressed(&keyboard, &mouse) {
        next_state.set(GameState::Playing);
    }

    if keyboard.just_pressed(KeyCode::KeyQ) {
        exit.write(AppExit::Success);
    }
}

fn enter_playing(session: Option<ResMut<LevelSession>>) {
    if let Some(mut session) = session {
        if !session.is_loaded() {
            if let Err(error) = session.reload() {
                panic!("failed to load level {}: {error}", session.current_level());
            }
        }
    }
    info!("Entered state: Playing");
}

fn playing_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut outcomes: MessageReader<LevelOutcomeMessage>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for outcome in outcomes.read() {
        match outcome {
            LevelOutcomeMessage::Passed { level } => {
                info!("Level {level} passed.");
                next_state.set(GameState::LevelClear);
            }
            LevelOutcomeMessage::Lost { level } => {
                info!("Level {level} lost.");
                next_state.set(GameState::Lost);
            }
        }
    }

    if keyboard.any_just_pressed([KeyCode::Escape, KeyCode::Tab]) {
        next_state.set(GameState::Menu);
    }
}

fn enter_lost(mut commands: Commands) {
    spawn_state_overlay(
        &mut commands,
        "YOU LOSE",
        "Click or press Enter to restart",
    );
    info!("Entered state: Lost");
}

fn lost_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut session: ResMut<LevelSession>,
    mut engine_cues: MessageWriter<EngineCueMessage>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !continue_pressed(&keyboard, &mouse) {
        return;
    }

    engine_cues.write(EngineCueMessage::Stopped);
    match session.reload() {
        Ok(()) => next_state.set(GameState::Playing),
        Err(error) => error!("Level restart failed: {error}"),
    }
}

fn enter_level_clear(mut commands: Commands, session: Res<LevelSession>) {
    let body = if session.is_last_level() {
        "All levels cleared!\nClick or press Enter to play again"
    } else {
        "Click or press Enter for the next level"
    };
    spawn_state_overlay(&mut commands, "LEVEL CLEAR", body);
    info!("Entered state: LevelClear");
}

fn level_clear_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut session: ResMut<LevelSession>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !continue_pressed(&keyboard, &mouse) {
        return;
    }

    let result = if !session.is_level_clear() {
        warn!("Level {} was not passed; replaying it.", session.current_level());
        session.reload()
    } else if session.is_last_level() {
        session.set_level(0);
        session.reload()
    } else {
        session.next_level()
    };
    match result {
        Ok(()) => next_state.set(GameState::Playing),
        Err(error) => error!("Advancing to the next level failed: {error}"),
    }
}

fn spawn_state_overlay(commands: &mut Commands, title: &str, body: &str) {
    commands
        .spawn((
            Name::new("StateOverlay"),
            StateOverlayRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.01, 0.02, 0.03, 0.72)),
            ZIndex(300),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        min_width: Val::Px(420.0),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(10.0),
                        padding: UiRect::all(Val::Px(16.0)),
                        border: UiRect::all(Val::Px(1.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.08, 0.10, 0.13, 0.96)),
                    BorderColor::all(Color::srgba(0.56, 0.62, 0.68, 0.92)),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        Text::new(title),
                        TextFont {
                            font_size: 52.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.94, 0.97, 1.00)),
                    ));
                    panel.spawn((
                        Text::new(body),
                        TextFont {
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.90, 0.94, 0.98)),
                    ));
                });
        });
}

fn cleanup_state_overlay(
    mut commands: Commands,
    overlay_query: Query<Entity, With<StateOverlayRoot>>,
) {
    for entity in &overlay_query {
        commands.entity(entity).try_despawn();
    }
}
