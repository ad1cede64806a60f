use crate::gameplay::bridge::{BridgeTuning, WeldTuning};
use crate::gameplay::session::{EntityNames, LevelSession, SessionTuning};
use crate::gameplay::vehicle::VehicleTuning;
use crate::physics::ShapeMaterial;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = "config";
const VEHICLES_FILE: &str = "vehicles.toml";

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_game_config)
            .add_systems(Startup, apply_window_title)
            .add_systems(Update, reload_game_config_hotkey);
    }
}

fn load_game_config(mut commands: Commands) {
    let config = GameConfig::load_from_dir(Path::new(CONFIG_DIR)).unwrap_or_else(|error| {
        panic!("failed to load configuration from `{CONFIG_DIR}`: {error}");
    });

    log_config_summary("Loaded", &config);
    info!("Press F5 to hot-reload config files from `{CONFIG_DIR}`.");

    commands.insert_resource(config);
}

fn apply_window_title(
    config: Res<GameConfig>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    for mut window in &mut windows {
        window.title = config.game.app.window_title.clone();
    }
}

fn reload_game_config_hotkey(
    keyboard: Res<ButtonInput<KeyCode>>,
    game_config: Option<ResMut<GameConfig>>,
    session: Option<ResMut<LevelSession>>,
) {
    if !keyboard.just_pressed(KeyCode::F5) {
        return;
    }

    let Some(mut current_config) = game_config else {
        warn!("Config hot-reload requested, but `GameConfig` resource is not initialized yet.");
        return;
    };

    match GameConfig::load_from_dir(Path::new(CONFIG_DIR)) {
        Ok(new_config) => {
            *current_config = new_config;
            log_config_summary("Hot-reloaded", &current_config);
            if let Some(mut session) = session {
                session.retune_vehicle(current_config.vehicle_tuning());
                session.set_bridge_tuning(current_config.bridge_tuning());
                info!("Applied reloaded vehicle and bridge tuning to the running level.");
            }
        }
        Err(error) => {
            error!("Config hot-reload failed; keeping previous config: {error}");
        }
    }
}

fn log_config_summary(prefix: &str, config: &GameConfig) {
    info!(
        "{prefix} config: {} vehicles (default `{}`), level project `{}`.",
        config.vehicles_by_id.len(),
        config.game.app.default_vehicle,
        config.game.app.level_project.display()
    );
}

#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub game: GameFile,
    pub vehicles: VehiclesFile,
    pub bridge: BridgeFile,
    pub vehicles_by_id: HashMap<String, VehicleConfig>,
}

impl GameConfig {
    pub fn load_from_dir(config_dir: &Path) -> Result<Self, ConfigError> {
        let game: GameFile = read_toml(&config_dir.join("game.toml"))?;
        let vehicles: VehiclesFile = read_toml(&config_dir.join(VEHICLES_FILE))?;
        let bridge: BridgeFile = read_toml(&config_dir.join("bridge.toml"))?;

        let config = Self {
            vehicles_by_id: to_index("vehicles.toml::vehicles", &vehicles.vehicles)?,
            game,
            vehicles,
            bridge,
        };

        config.validate_references()?;
        Ok(config)
    }

    fn validate_references(&self) -> Result<(), ConfigError> {
        if !self
            .vehicles_by_id
            .contains_key(&self.game.app.default_vehicle)
        {
            return Err(ConfigError::Validation(format!(
                "game.toml::app.default_vehicle references unknown vehicle id `{}`",
                self.game.app.default_vehicle
            )));
        }

        let physics = &self.game.physics;
        if physics.fixed_timestep_hz <= 0.0 {
            return Err(ConfigError::Validation(
                "game.toml::physics.fixed_timestep_hz must be > 0".to_string(),
            ));
        }
        if physics.solver_substeps == 0 {
            return Err(ConfigError::Validation(
                "game.toml::physics.solver_substeps must be >= 1".to_string(),
            ));
        }

        let names = &self.game.entities;
        let mut seen = HashSet::new();
        for (key, name) in [
            ("vehicle_spawn", &names.vehicle_spawn),
            ("static_body", &names.static_body),
            ("node", &names.node),
            ("goal", &names.goal),
            ("lose", &names.lose),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "game.toml::entities.{key} must not be empty"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "game.toml::entities.{key} reuses entity name `{name}`"
                )));
            }
        }

        for (index, vehicle) in self.vehicles.vehicles.iter().enumerate() {
            if vehicle.scale <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "vehicles.toml::vehicles[{index}].scale must be > 0"
                )));
            }
            if vehicle.motor_torque < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "vehicles.toml::vehicles[{index}].motor_torque must be >= 0"
                )));
            }
            if vehicle.suspension_hertz <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "vehicles.toml::vehicles[{index}].suspension_hertz must be > 0"
                )));
            }
            if vehicle.damping_ratio < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "vehicles.toml::vehicles[{index}].damping_ratio must be >= 0"
                )));
            }
        }

        let plank = &self.bridge.plank;
        if plank.clearance < 0.0 {
            return Err(ConfigError::Validation(
                "bridge.toml::plank.clearance must be >= 0".to_string(),
            ));
        }
        if plank.half_thickness <= 0.0 || plank.density <= 0.0 {
            return Err(ConfigError::Validation(
                "bridge.toml::plank.half_thickness and density must be > 0".to_string(),
            ));
        }
        if self.bridge.selection.proximity_margin < 0.0 {
            return Err(ConfigError::Validation(
                "bridge.toml::selection.proximity_margin must be >= 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn default_vehicle(&self) -> Option<&VehicleConfig> {
        self.vehicles_by_id.get(&self.game.app.default_vehicle)
    }

    // Returns false when no vehicle has that id.
    pub fn set_vehicle_tuning(&mut self, vehicle_id: &str, tuning: &VehicleTuning) -> bool {
        let indexed = self.vehicles_by_id.get_mut(vehicle_id);
        let listed = self
            .vehicles
            .vehicles
            .iter_mut()
            .find(|vehicle| vehicle.id == vehicle_id);
        let mut found = false;
        for vehicle in indexed.into_iter().chain(listed) {
            vehicle.apply_tuning(tuning);
            found = true;
        }
        found
    }

    pub fn vehicle_tuning(&self) -> VehicleTuning {
        self.default_vehicle()
            .map(VehicleConfig::tuning)
            .unwrap_or_default()
    }

    pub fn bridge_tuning(&self) -> BridgeTuning {
        let bridge = &self.bridge;
        BridgeTuning {
            proximity_margin: bridge.selection.proximity_margin,
            clearance: bridge.plank.clearance,
            plank_half_thickness: bridge.plank.half_thickness,
            plank_material: ShapeMaterial {
                density: bridge.plank.density,
                friction: bridge.plank.friction,
            },
            node_material: ShapeMaterial {
                density: 1.0,
                friction: bridge.node_friction,
            },
            weld: WeldTuning {
                angular_hertz: bridge.weld.angular_hertz,
                angular_damping_ratio: bridge.weld.angular_damping_ratio,
                linear_hertz: bridge.weld.linear_hertz,
                linear_damping_ratio: bridge.weld.linear_damping_ratio,
            },
        }
    }

    pub fn session_tuning(&self) -> SessionTuning {
        let physics = &self.game.physics;
        let entities = &self.game.entities;
        SessionTuning {
            gravity: Vec2::from_array(physics.gravity),
            timestep: 1.0 / physics.fixed_timestep_hz,
            substeps: physics.solver_substeps,
            static_material: ShapeMaterial {
                density: 1.0,
                friction: physics.ground_friction,
            },
            vehicle: self.vehicle_tuning(),
            bridge: self.bridge_tuning(),
            entity_names: EntityNames {
                vehicle_spawn: entities.vehicle_spawn.clone(),
                static_body: entities.static_body.clone(),
                node: entities.node.clone(),
                goal: entities.goal.clone(),
                lose: entities.lose.clone(),
            },
            tutorial: self.game.app.tutorial,
        }
    }
}

// Writes one vehicle's tuning into `vehicles.toml` and reloads the whole directory.
// A reload failure puts the previous file contents back.
pub fn save_vehicle_tuning(
    config_dir: &Path,
    vehicle_id: &str,
    tuning: &VehicleTuning,
) -> Result<GameConfig, ConfigError> {
    for (key, value) in [
        ("scale", tuning.scale),
        ("motor_torque", tuning.motor_torque),
        ("suspension_hertz", tuning.suspension_hertz),
        ("damping_ratio", tuning.damping_ratio),
        ("launch_speed", tuning.launch_speed),
    ] {
        if !value.is_finite() {
            return Err(ConfigError::Validation(format!(
                "vehicle `{vehicle_id}` {key} is not a finite number"
            )));
        }
    }

    let path = config_dir.join(VEHICLES_FILE);
    let original = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let mut vehicles: VehiclesFile =
        toml::from_str(&original).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source: Box::new(source),
        })?;
    let Some(vehicle) = vehicles
        .vehicles
        .iter_mut()
        .find(|vehicle| vehicle.id == vehicle_id)
    else {
        return Err(ConfigError::Validation(format!(
            "{VEHICLES_FILE}::vehicles has no vehicle with id `{vehicle_id}`"
        )));
    };
    vehicle.apply_tuning(tuning);

    let updated = toml::to_string_pretty(&vehicles).map_err(|source| ConfigError::Serialize {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, updated).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    match GameConfig::load_from_dir(config_dir) {
        Ok(config) => {
            info!("Saved tuning for vehicle `{vehicle_id}` to `{}`.", path.display());
            Ok(config)
        }
        Err(cause) => {
            let cause = Box::new(cause);
            match fs::write(&path, &original) {
                Ok(()) => {
                    warn!("Saved tuning was rejected; restored `{}`.", path.display());
                    Err(ConfigError::Rejected { path, cause })
                }
                Err(source) => Err(ConfigError::RevertFailed {
                    path,
                    cause,
                    source,
                }),
            }
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },
    Validation(String),
    Rejected {
        path: PathBuf,
        cause: Box<ConfigError>,
    },
    RevertFailed {
        path: PathBuf,
        cause: Box<ConfigError>,
        source: std::io::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse `{}`: {source}", path.display())
            }
            Self::Serialize { path, source } => {
                write!(f, "failed to serialize `{}`: {source}", path.display())
            }
            Self::Validation(message) => write!(f, "{message}"),
            Self::Rejected { path, cause } => write!(
                f,
                "saved `{}` was rejected ({cause}); previous contents restored",
                path.display()
            ),
            Self::RevertFailed {
                path,
                cause,
                source,
            } => write!(
                f,
                "saved `{}` was rejected ({cause}) and restoring it failed: {source}",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
            Self::Validation(_) => None,
            Self::Rejected { cause, .. } => Some(cause.as_ref()),
            Self::RevertFailed { source, .. } => Some(source),
        }
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

fn to_index<T>(label: &str, rows: &[T]) -> Result<HashMap<String, T>, ConfigError>
where
    T: HasId + Clone,
{
    let mut map = HashMap::new();

    for row in rows {
        let id = row.id();
        if id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{label} contains an empty id"
            )));
        }

        if map.insert(id.to_string(), row.clone()).is_some() {
            return Err(ConfigError::Validation(format!(
                "{label} contains duplicate id `{id}`"
            )));
        }
    }

    Ok(map)
}

trait HasId {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameFile {
    pub app: AppConfig,
    pub physics: PhysicsConfig,
    pub entities: EntitiesConfig,
    pub sfx: SfxConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub window_title: String,
    pub level_project: PathBuf,
    #[serde(default)]
    pub starting_level: usize,
    pub default_vehicle: String,
    pub debug_overlay: bool,
    #[serde(default = "default_tutorial")]
    pub tutorial: bool,
}

fn default_tutorial() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhysicsConfig {
    pub fixed_timestep_hz: f32,
    pub solver_substeps: usize,
    pub gravity: [f32; 2],
    #[serde(default = "default_ground_friction")]
    pub ground_friction: f32,
}

fn default_ground_friction() -> f32 {
    0.6
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitiesConfig {
    pub vehicle_spawn: String,
    pub static_body: String,
    pub node: String,
    pub goal: String,
    pub lose: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SfxConfig {
    pub enabled: bool,
    pub engine_loop: String,
    pub node_click: String,
    pub master_volume: f32,
    pub engine_volume: f32,
    pub click_volume: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehiclesFile {
    pub vehicles: Vec<VehicleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehicleConfig {
    pub id: String,
    pub scale: f32,
    pub motor_torque: f32,
    pub suspension_hertz: f32,
    pub damping_ratio: f32,
    pub launch_speed: f32,
}

impl VehicleConfig {
    pub fn tuning(&self) -> VehicleTuning {
        VehicleTuning {
            scale: self.scale,
            motor_torque: self.motor_torque,
            suspension_hertz: self.suspension_hertz,
            damping_ratio: self.damping_ratio,
            launch_speed: self.launch_speed,
        }
    }

    fn apply_tuning(&mut self, tuning: &VehicleTuning) {
        self.scale = tuning.scale;
        self.motor_torque = tuning.motor_torque;
        self.suspension_hertz = tuning.suspension_hertz;
        self.damping_ratio = tuning.damping_ratio;
        self.launch_speed = tuning.launch_speed;
    }
}

impl HasId for VehicleConfig {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeFile {
    pub selection: SelectionConfig,
    pub plank: PlankConfig,
    pub weld: WeldConfig,
    #[serde(default = "default_node_friction")]
    pub node_friction: f32,
}

fn default_node_friction() -> f32 {
    0.6
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    pub proximity_margin: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlankConfig {
    pub clearance: f32,
    pub half_thickness: f32,
    pub density: f32,
    pub friction: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeldConfig {
    pub angular_hertz: f32,
    pub angular_damping_ratio: f32,
    pub linear_hertz: f32,
    pub linear_damping_ratio: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: &str) -> VehicleConfig {
        VehicleConfig {
            id: id.to_string(),
            scale: 10.0,
            motor_torque: 90_000.0,
            suspension_hertz: 25.0,
            damping_ratio: 0.7,
            launch_speed: 150.0,
        }
    }

    fn config(default_vehicle: &str) -> GameConfig {
        let vehicles = vec![vehicle("rider")];
        GameConfig {
            game: GameFile {
                app: AppConfig {
                    window_title: "test".to_string(),
                    level_project: PathBuf::from("levels/levels.ldtk"),
                    starting_level: 0,
                    default_vehicle: default_vehicle.to_string(),
                    debug_overlay: false,
                    tutorial: true,
                },
                physics: PhysicsConfig {
                    fixed_timestep_hz: 60.0,
                    solver_substeps: 4,
                    gravity: [0.0, 490.0],
                    ground_friction: 0.6,
                },
                entities: EntitiesConfig {
                    vehicle_spawn: "Car".to_string(),
                    static_body: "Static".to_string(),
                    node: "Node".to_string(),
                    goal: "Passed".to_string(),
                    lose: "Lose".to_string(),
                },
                sfx: SfxConfig {
                    enabled: true,
                    engine_loop: "audio/engine_loop.wav".to_string(),
                    node_click: "audio/node_click.wav".to_string(),
                    master_volume: 1.0,
                    engine_volume: 0.6,
                    click_volume: 0.8,
                },
            },
            vehicles_by_id: to_index("vehicles", &vehicles).expect("ids are unique"),
            vehicles: VehiclesFile { vehicles },
            bridge: BridgeFile {
                selection: SelectionConfig {
                    proximity_margin: 12.0,
                },
                plank: PlankConfig {
                    clearance: 8.0,
                    half_thickness: 5.0,
                    density: 1.0,
                    friction: 0.6,
                },
                weld: WeldConfig {
                    angular_hertz: 20.0,
                    angular_damping_ratio: 10.0,
                    linear_hertz: 10.0,
                    linear_damping_ratio: 15.0,
                },
                node_friction: 0.6,
            },
        }
    }

    #[test]
    fn validation_fails_for_missing_vehicle_reference() {
        let error = config("missing_car")
            .validate_references()
            .expect_err("validation should fail");
        let message = error.to_string();

        assert!(message.contains("default_vehicle"));
        assert!(message.contains("missing_car"));
    }

    #[test]
    fn validation_rejects_reused_entity_names() {
        let mut config = config("rider");
        config.game.entities.lose = "Passed".to_string();
        let message = config
            .validate_references()
            .expect_err("names must be distinct")
            .to_string();
        assert!(message.contains("entities.lose"));
    }

    #[test]
    fn duplicate_vehicle_ids_are_rejected() {
        let error = to_index("vehicles.toml::vehicles", &[vehicle("a"), vehicle("a")])
            .expect_err("duplicate ids");
        assert!(error.to_string().contains("duplicate id `a`"));
    }

    #[test]
    fn reference_tuning_matches_core_defaults() {
        let config = config("rider");
        config.validate_references().expect("config is valid");
        assert_eq!(config.session_tuning(), SessionTuning::default());
    }

    #[test]
    fn bundled_config_files_load() {
        let config = GameConfig::load_from_dir(Path::new(CONFIG_DIR))
            .expect("bundled config should be valid");
        assert!(config.default_vehicle().is_some());
        assert!(config.session_tuning().substeps >= 1);
    }

    fn scratch_config_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bridge_rider_config_{}_{name}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("scratch dir should be creatable");
        for file in ["game.toml", VEHICLES_FILE, "bridge.toml"] {
            fs::copy(Path::new(CONFIG_DIR).join(file), dir.join(file))
                .expect("bundled config should copy");
        }
        dir
    }

    #[test]
    fn live_tuning_updates_index_and_list() {
        let mut config = config("rider");
        let tuning = VehicleTuning {
            motor_torque: 1_234.0,
            ..VehicleTuning::default()
        };
        assert!(config.set_vehicle_tuning("rider", &tuning));
        assert_eq!(config.vehicle_tuning(), tuning);
        assert_eq!(config.vehicles.vehicles[0].motor_torque, 1_234.0);
        assert!(!config.set_vehicle_tuning("ghost", &tuning));
    }

    #[test]
    fn saved_tuning_reloads_and_leaves_other_vehicles_alone() {
        let dir = scratch_config_dir("save");
        let before = GameConfig::load_from_dir(&dir).expect("bundled config is valid");
        let tuning = VehicleTuning {
            motor_torque: 120_000.0,
            launch_speed: 90.0,
            ..before.vehicle_tuning()
        };

        let saved = save_vehicle_tuning(&dir, "rider", &tuning).expect("save should succeed");
        let reloaded = GameConfig::load_from_dir(&dir).expect("saved file is valid");
        fs::remove_dir_all(&dir).ok();

        assert_eq!(saved.vehicle_tuning(), tuning);
        assert_eq!(reloaded.vehicle_tuning(), tuning);
        assert_eq!(
            reloaded.vehicles_by_id["heavy_rider"].motor_torque,
            before.vehicles_by_id["heavy_rider"].motor_torque
        );
    }

    #[test]
    fn rejected_save_restores_the_previous_file() {
        let dir = scratch_config_dir("rejected");
        let path = dir.join(VEHICLES_FILE);
        let original = fs::read_to_string(&path).expect("vehicles file exists");
        let tuning = VehicleTuning {
            scale: -1.0,
            ..VehicleTuning::default()
        };

        let error = save_vehicle_tuning(&dir, "rider", &tuning).expect_err("scale must be > 0");
        let restored = fs::read_to_string(&path).expect("vehicles file still exists");
        fs::remove_dir_all(&dir).ok();

        assert!(matches!(error, ConfigError::Rejected { .. }));
        assert!(error.to_string().contains("scale must be > 0"));
        assert!(error.source().is_some());
        assert_eq!(restored, original);
    }

    #[test]
    fn unknown_or_non_finite_tuning_never_touches_the_file() {
        let dir = scratch_config_dir("untouched");
        let path = dir.join(VEHICLES_FILE);
        let original = fs::read_to_string(&path).expect("vehicles file exists");

        let unknown = save_vehicle_tuning(&dir, "ghost", &VehicleTuning::default())
            .expect_err("ghost does not exist");
        let nan = save_vehicle_tuning(
            &dir,
            "rider",
            &VehicleTuning {
                damping_ratio: f32::NAN,
                ..VehicleTuning::default()
            },
        )
        .expect_err("NaN is not saved");
        let after = fs::read_to_string(&path).expect("vehicles file exists");
        fs::remove_dir_all(&dir).ok();

        assert!(unknown.to_string().contains("ghost"));
        assert!(nan.to_string().contains("damping_ratio"));
        assert_eq!(after, original);
    }

    #[test]
    fn failed_restore_is_reported_with_both_causes() {
        let error = ConfigError::RevertFailed {
            path: PathBuf::from("config/vehicles.toml"),
            cause: Box::new(ConfigError::Validation("scale must be > 0".to_string())),
            source: std::io::Error::other("disk full"),
        };
        let message = error.to_string();
        assert!(message.contains("scale must be > 0"));
        assert!(message.contains("restoring it failed: disk full"));
        assert_eq!(
            error.source().map(ToString::to_string),
            Some("disk full".to_string())
        );
    }
}
