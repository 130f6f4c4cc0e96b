use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

use egui::{Pos2, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{errors::RecapError, export::DEFAULT_EXPORT_FILE_NAME};

const CONFIG_DIR_NAME: &str = "motorecap";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_TICK_PERIOD_MS: u64 = 50;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WindowPosition {
    pub x: f32,
    pub y: f32,
}

impl Default for WindowPosition {
    fn default() -> Self {
        Self { x: 0., y: 0. }
    }
}

impl From<WindowPosition> for Pos2 {
    fn from(value: WindowPosition) -> Self {
        Pos2::new(value.x, value.y)
    }
}

impl From<Pos2> for WindowPosition {
    fn from(value: Pos2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 420.,
            height: 760.,
        }
    }
}

impl From<WindowSize> for Vec2 {
    fn from(value: WindowSize) -> Self {
        Vec2::new(value.width, value.height)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub tick_period_ms: u64,
    pub window_position: WindowPosition,
    pub window_size: WindowSize,
    pub export_file_name: String,
    pub export_dir: Option<PathBuf>,
    pub ask_export_location: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            window_position: WindowPosition::default(),
            window_size: WindowSize::default(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            export_dir: None,
            ask_export_location: false,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf, RecapError> {
        Ok(dirs::config_dir()
            .ok_or(RecapError::NoConfigDir)?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// Loads the config from the platform config directory, `None` if it was never saved.
    pub fn from_local_file() -> Result<Option<Self>, RecapError> {
        let config_path = Self::default_path()?;
        if config_path.exists() {
            Self::from_path(&config_path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, RecapError> {
        debug!("Loading config from {:?}", path);
        let file = File::open(path).map_err(|e| RecapError::ConfigIOError { source: e })?;
        serde_json::from_reader(file).map_err(|e| RecapError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<(), RecapError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), RecapError> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| RecapError::ConfigIOError { source: e })?;
        }

        let file = File::create(path).map_err(|e| RecapError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| RecapError::ConfigSerializeError { source: e })
    }

    /// Poll period of the slide clock, at least one millisecond.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms.max(1))
    }
}
