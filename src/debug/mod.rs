use crate::config::{save_vehicle_tuning, GameConfig, CONFIG_DIR};
use crate::gameplay::session::LevelSession;
use crate::gameplay::vehicle::VehicleTuning;
use crate::states::GameState;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use std::ops::RangeInclusive;
use std::path::Path;

pub struct DebugOverlayPlugin;

impl Plugin for DebugOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugPanels>()
            .add_systems(Startup, spawn_session_readout)
            .add_systems(Update, toggle_debug_panels)
            .add_systems(
                Update,
                update_session_readout.run_if(resource_exists::<LevelSession>),
            )
            .add_systems(
                EguiPrimaryContextPass,
                vehicle_tuning_panel
                    .run_if(in_state(GameState::Playing))
                    .run_if(resource_exists::<LevelSession>),
            );
    }
}

#[derive(Component)]
struct SessionReadout;

#[derive(Resource, Debug, Default)]
struct DebugPanels {
    show_keys: bool,
    tuning_open: bool,
    // Edited values, seeded from the running rig when the panel opens.
    draft: Option<VehicleTuning>,
    status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuningField {
    MotorTorque,
    SuspensionHertz,
    DampingRatio,
    LaunchSpeed,
    Scale,
}

impl TuningField {
    const ALL: [Self; 5] = [
        Self::MotorTorque,
        Self::SuspensionHertz,
        Self::DampingRatio,
        Self::LaunchSpeed,
        Self::Scale,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::MotorTorque => "Motor torque",
            Self::SuspensionHertz => "Suspension Hz",
            Self::DampingRatio => "Damping ratio",
            Self::LaunchSpeed => "Launch speed",
            Self::Scale => "Scale (next load)",
        }
    }

    fn range(self) -> RangeInclusive<f32> {
        match self {
            Self::MotorTorque => 0.0..=300_000.0,
            Self::SuspensionHertz => 0.5..=60.0,
            Self::DampingRatio => 0.0..=5.0,
            Self::LaunchSpeed => 0.0..=400.0,
            Self::Scale => 2.0..=30.0,
        }
    }

    fn value_mut(self, tuning: &mut VehicleTuning) -> &mut f32 {
        match self {
            Self::MotorTorque => &mut tuning.motor_torque,
            Self::SuspensionHertz => &mut tuning.suspension_hertz,
            Self::DampingRatio => &mut tuning.damping_ratio,
            Self::LaunchSpeed => &mut tuning.launch_speed,
            Self::Scale => &mut tuning.scale,
        }
    }
}

enum PanelAction {
    Revert,
    Save,
}

fn spawn_session_readout(mut commands: Commands, config: Res<GameConfig>) {
    if !config.game.app.debug_overlay {
        return;
    }
    commands.spawn((
        SessionReadout,
        Text::new(""),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(Color::srgb(0.92, 0.95, 0.97)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(12.0),
            ..default()
        },
        ZIndex(100),
    ));
}

fn toggle_debug_panels(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Option<Res<LevelSession>>,
    mut panels: ResMut<DebugPanels>,
) {
    if keyboard.just_pressed(KeyCode::F2) {
        panels.show_keys = !panels.show_keys;
    }
    if keyboard.just_pressed(KeyCode::F1) {
        panels.tuning_open = !panels.tuning_open;
        panels.draft = session.map(|session| session.tuning().vehicle);
        panels.status.clear();
        info!(
            "Vehicle tuning panel {}.",
            if panels.tuning_open { "opened" } else { "closed" }
        );
    }
}

fn update_session_readout(
    diagnostics: Res<DiagnosticsStore>,
    session: Res<LevelSession>,
    panels: Res<DebugPanels>,
    mut readouts: Query<&mut Text, With<SessionReadout>>,
) {
    let Ok(mut text) = readouts.single_mut() else {
        return;
    };
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|value| value.smoothed())
        .unwrap_or(0.0);
    text.0 = session_readout(&session, fps, panels.show_keys);
}

fn session_readout(session: &LevelSession, fps: f64, show_keys: bool) -> String {
    let position = session.vehicle_position();
    let registry = session.registry();
    let mut lines = vec![
        format!("FPS {fps:.1}"),
        format!(
            "Level {}/{}  {:?}  tutorial {:?}",
            session.current_level() + 1,
            session.level_count(),
            session.state(),
            session.tutorial_step()
        ),
        format!(
            "Car ({:.1}, {:.1})  motor {:.1}",
            position.x,
            position.y,
            session.vehicle_motor_speed().unwrap_or(0.0)
        ),
        format!(
            "Nodes {}  planks {}",
            registry.node_count(),
            registry.segment_count()
        ),
    ];
    if let Some(world) = session.physics().world() {
        let gravity = world.gravity();
        lines.push(format!(
            "Bodies {} ({} dynamic)  joints {}  gravity ({:.0}, {:.0})",
            world.body_count(),
            world.dynamic_body_count(),
            world.joint_count(),
            gravity.x,
            gravity.y
        ));
    }
    if show_keys {
        lines.extend(KEYBINDS.iter().map(|line| line.to_string()));
    } else {
        lines.push("F2 keys".to_string());
    }
    lines.join("\n")
}

const KEYBINDS: [&str; 8] = [
    "Left click  select node, then connect",
    "Right click  cancel selection",
    "Space / Enter  launch",
    "R  restart level",
    "Esc / Tab  menu",
    "F1  vehicle tuning",
    "F2  hide keys",
    "F5  reload config",
];

fn vehicle_tuning_panel(
    mut contexts: EguiContexts,
    mut panels: ResMut<DebugPanels>,
    mut config: ResMut<GameConfig>,
    mut session: ResMut<LevelSession>,
) {
    if !panels.tuning_open {
        return;
    }
    let vehicle_id = config.game.app.default_vehicle.clone();
    let mut draft = panels.draft.unwrap_or(session.tuning().vehicle);
    let mut open = true;
    let mut changed = false;
    let mut action = None;

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    egui::Window::new("Vehicle Tuning")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!(
                "`{vehicle_id}` in level {}",
                session.current_level() + 1
            ));
            egui::Grid::new("vehicle_tuning_fields")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for field in TuningField::ALL {
                        ui.label(field.label());
                        changed |= ui
                            .add(egui::Slider::new(field.value_mut(&mut draft), field.range()))
                            .changed();
                        ui.end_row();
                    }
                });
            ui.horizontal(|ui| {
                if ui.button("Revert to config").clicked() {
                    action = Some(PanelAction::Revert);
                }
                if ui.button("Save").clicked() {
                    action = Some(PanelAction::Save);
                }
            });
            if !panels.status.is_empty() {
                ui.separator();
                ui.label(panels.status.as_str());
            }
        });
    panels.tuning_open = open;

    if changed {
        config.set_vehicle_tuning(&vehicle_id, &draft);
        session.retune_vehicle(draft);
        panels.status = "Live values, not saved.".to_string();
    }

    match action {
        Some(PanelAction::Revert) => match GameConfig::load_from_dir(Path::new(CONFIG_DIR)) {
            Ok(reloaded) => {
                *config = reloaded;
                draft = config.vehicle_tuning();
                session.retune_vehicle(draft);
                panels.status = "Reverted to the saved config.".to_string();
            }
            Err(error) => {
                error!("Vehicle tuning revert failed: {error}");
                panels.status = format!("Revert failed: {error}");
            }
        },
        Some(PanelAction::Save) => {
            match save_vehicle_tuning(Path::new(CONFIG_DIR), &vehicle_id, &draft) {
                Ok(saved) => {
                    *config = saved;
                    panels.status = format!("Saved `{vehicle_id}`.");
                }
                Err(error) => {
                    error!("Vehicle tuning save failed: {error}");
                    panels.status = format!("Save failed: {error}");
                }
            }
        }
        None => {}
    }
    panels.draft = Some(draft);
}
