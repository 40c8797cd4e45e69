//! Engine configuration (veneer.toml)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Size;

/// Main GUI surface (frame buffer)
pub const GUI_SURFACE: u32 = 0;
/// Front panel / LCD surface
pub const DISPLAY_SURFACE: u32 = 1;

pub const DEFAULT_SKIN: &str = "Default/skin.xml";
pub const DEFAULT_DISPLAY_SKIN: &str = "skin_default/skin_display.xml";

/// Configuration loaded from veneer.toml
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Persisted skin choices
    #[serde(default)]
    pub skin: SkinSettings,

    /// Roots used by the default path resolver
    #[serde(default)]
    pub paths: PathsConfig,

    /// Desktop size per surface
    #[serde(default = "default_surfaces")]
    pub surface: Vec<SurfaceConfig>,

    #[serde(default)]
    pub log: LogConfig,
}

/// The two persisted skin choices
///
/// Paths are relative to the skin (or display skin) directory, e.g.
/// `"MySkin/skin.xml"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinSettings {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_display")]
    pub display: String,
}

impl Default for SkinSettings {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            display: default_display(),
        }
    }
}

fn default_primary() -> String {
    DEFAULT_SKIN.to_string()
}

fn default_display() -> String {
    DEFAULT_DISPLAY_SKIN.to_string()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub skin_dir: Option<PathBuf>,
    #[serde(default)]
    pub display_skin_dir: Option<PathBuf>,
    #[serde(default)]
    pub fonts_dir: Option<PathBuf>,
    #[serde(default)]
    pub user_dir: Option<PathBuf>,
}

impl PathsConfig {
    fn data_root() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("veneer"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn skin_dir(&self) -> PathBuf {
        self.skin_dir
            .clone()
            .unwrap_or_else(|| Self::data_root().join("skins"))
    }

    pub fn display_skin_dir(&self) -> PathBuf {
        self.display_skin_dir
            .clone()
            .unwrap_or_else(|| Self::data_root().join("display"))
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.fonts_dir
            .clone()
            .unwrap_or_else(|| Self::data_root().join("fonts"))
    }

    pub fn user_dir(&self) -> PathBuf {
        self.user_dir
            .clone()
            .unwrap_or_else(|| Self::data_root().join("user"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub id: u32,
    pub width: i32,
    pub height: i32,
}

impl SurfaceConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

fn default_surfaces() -> Vec<SurfaceConfig> {
    vec![
        SurfaceConfig {
            id: GUI_SURFACE,
            width: 1280,
            height: 720,
        },
        SurfaceConfig {
            id: DISPLAY_SURFACE,
            width: 400,
            height: 240,
        },
    ]
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file; logging stays off when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl EngineConfig {
    /// Find veneer.toml in standard locations
    pub fn find_config_path() -> Option<PathBuf> {
        // Check in order: config dir, exe dir, cwd
        let candidates = [
            dirs::config_dir().map(|p| p.join("veneer").join("veneer.toml")),
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("veneer.toml"))),
            Some(PathBuf::from("veneer.toml")),
        ];

        candidates.into_iter().flatten().find(|c| c.exists())
    }

    /// Load configuration, returning defaults if no file is found
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::with_defaults()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Write the configuration back, e.g. after the skin choice changed
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Defaults as if an empty file had been read
    pub fn with_defaults() -> Self {
        Self {
            surface: default_surfaces(),
            ..Self::default()
        }
    }

    /// Open the configured log file, if any
    pub fn init_logging(&self) {
        if let Some(file) = &self.log.file {
            crate::log::init(file);
        }
    }

    /// Desktop size for a surface, if configured
    pub fn surface_size(&self, id: u32) -> Option<Size> {
        self.surface.iter().find(|s| s.id == id).map(|s| s.size())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
