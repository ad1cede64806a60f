use bevy::log::info;
use bevy::math::Vec2;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

const ENTITY_LAYER: &str = "Entities";
const LEVEL_IDENTIFIER_PREFIX: &str = "Level_";

// `position` is the top-left corner in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRecord {
    pub name: String,
    pub position: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelData {
    pub index: usize,
    pub identifier: String,
    pub size: Vec2,
    pub records: Vec<LevelRecord>,
    // Relative to the asset root.
    pub background: Option<PathBuf>,
}

impl LevelData {
    pub fn records_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a LevelRecord> {
        self.records.iter().filter(move |record| record.name == name)
    }
}

pub trait LevelSource {
    fn level_count(&self) -> usize;
    fn load(&self, index: usize) -> Result<LevelData, LevelLoadError>;
}

#[derive(Debug)]
pub enum LevelLoadError {
    OutOfRange {
        index: usize,
        count: usize,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    MissingLayer {
        level: String,
        layer: String,
    },
    MissingBackground {
        level: String,
        path: PathBuf,
    },
    MissingEntity {
        level: String,
        name: String,
    },
}

impl Display for LevelLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { index, count } => {
                write!(f, "level {index} does not exist ({count} levels available)")
            }
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse `{}`: {source}", path.display())
            }
            Self::MissingLayer { level, layer } => {
                write!(f, "level `{level}` has no `{layer}` layer")
            }
            Self::MissingBackground { level, path } => write!(
                f,
                "background `{}` of level `{level}` was not found",
                path.display()
            ),
            Self::MissingEntity { level, name } => {
                write!(f, "level `{level}` has no `{name}` entity")
            }
        }
    }
}

impl Error for LevelLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LdtkLevelSource {
    asset_root: PathBuf,
    project_dir: PathBuf,
    levels: Vec<LdtkLevel>,
}

impl LdtkLevelSource {
    pub fn open(asset_root: &Path, project_path: &Path) -> Result<Self, LevelLoadError> {
        let full_path = asset_root.join(project_path);
        let raw = fs::read_to_string(&full_path).map_err(|source| LevelLoadError::Io {
            path: full_path.clone(),
            source,
        })?;
        let source = Self::from_json_str(&raw, asset_root, project_path)?;
        info!(
            "Loaded level project `{}` with {} levels.",
            full_path.display(),
            source.level_count()
        );
        Ok(source)
    }

    pub fn from_json_str(
        raw: &str,
        asset_root: &Path,
        project_path: &Path,
    ) -> Result<Self, LevelLoadError> {
        let project: LdtkProject =
            serde_json::from_str(raw).map_err(|source| LevelLoadError::Parse {
                path: asset_root.join(project_path),
                source,
            })?;
        Ok(Self {
            asset_root: asset_root.to_path_buf(),
            project_dir: project_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            levels: project.levels,
        })
    }
}

impl LevelSource for LdtkLevelSource {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn load(&self, index: usize) -> Result<LevelData, LevelLoadError> {
        let identifier = format!("{LEVEL_IDENTIFIER_PREFIX}{index}");
        let Some(level) = self
            .levels
            .iter()
            .find(|level| level.identifier == identifier)
        else {
            return Err(LevelLoadError::OutOfRange {
                index,
                count: self.level_count(),
            });
        };

        let Some(layer) = level
            .layer_instances
            .iter()
            .flatten()
            .find(|layer| layer.identifier == ENTITY_LAYER)
        else {
            return Err(LevelLoadError::MissingLayer {
                level: identifier,
                layer: ENTITY_LAYER.to_string(),
            });
        };

        let background = match level.bg_rel_path.as_deref() {
            Some(relative) => {
                let asset_path = self.project_dir.join(relative);
                if !self.asset_root.join(&asset_path).is_file() {
                    return Err(LevelLoadError::MissingBackground {
                        level: identifier,
                        path: asset_path,
                    });
                }
                Some(asset_path)
            }
            None => None,
        };

        let records = layer
            .entity_instances
            .iter()
            .map(|entity| LevelRecord {
                name: entity.identifier.clone(),
                position: Vec2::new(entity.px[0], entity.px[1]),
                size: Vec2::new(entity.width, entity.height),
            })
            .collect();

        Ok(LevelData {
            index,
            identifier,
            size: Vec2::new(level.px_wid, level.px_hei),
            records,
            background,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LdtkProject {
    levels: Vec<LdtkLevel>,
}

#[derive(Debug, Clone, Deserialize)]
struct LdtkLevel {
    identifier: String,
    #[serde(rename = "pxWid")]
    px_wid: f32,
    #[serde(rename = "pxHei")]
    px_hei: f32,
    #[serde(rename = "bgRelPath", default)]
    bg_rel_path: Option<String>,
    #[serde(rename = "layerInstances", default)]
    layer_instances: Option<Vec<LdtkLayer>>,
}

#[derive(Debug, Clone, Deserialize)]
struct LdtkLayer {
    #[serde(rename = "__identifier")]
    identifier: String,
    #[serde(rename = "entityInstances", default)]
    entity_instances: Vec<LdtkEntity>,
}

#[derive(Debug, Clone, Deserialize)]
struct LdtkEntity {
    #[serde(rename = "__identifier")]
    identifier: String,
    px: [f32; 2],
    width: f32,
    height: f32,
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticLevelSource {
    pub levels: Vec<LevelData>,
}

#[cfg(test)]
impl LevelSource for StaticLevelSource {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn load(&self, index: usize) -> Result<LevelData, LevelLoadError> {
        self.levels
            .get(index)
            .cloned()
            .ok_or(LevelLoadError::OutOfRange {
                index,
                count: self.levels.len(),
            })
    }
}
