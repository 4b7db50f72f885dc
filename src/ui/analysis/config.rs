use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::charts::{ChartKind, MetricKind, MissedFramesMode};
use crate::errors::FramesightError;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone)]
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

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct AppConfig {
    pub window_position: WindowPosition,
    pub chart_kind: ChartKind,
    pub metric: MetricKind,
    pub missed_frames_mode: MissedFramesMode,
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_position: WindowPosition::default(),
            chart_kind: ChartKind::FrameTimes,
            metric: MetricKind::AverageFps,
            missed_frames_mode: MissedFramesMode::Percentages,
            export_width: 1200,
            export_height: 800,
        }
    }
}

impl AppConfig {
    pub fn window_size(&self) -> Vec2 {
        Vec2::new(1100., 700.)
    }

    pub fn from_local_file() -> Option<Self> {
        let config_path = dirs::config_dir()?.join("framesight").join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let file = std::fs::File::open(config_path).ok()?;
            serde_json::from_reader(file).ok()
        } else {
            None
        }
    }

    pub fn save(&self) -> Result<(), FramesightError> {
        let config_path = dirs::config_dir()
            .ok_or(FramesightError::NoConfigDir)?
            .join("framesight")
            .join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| FramesightError::ConfigIoError { source: e })?;
            }
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| FramesightError::ConfigIoError { source: e })?;
        serde_json::to_writer(file, self)
            .map_err(|e| FramesightError::ConfigSerializeError { source: e })
    }
}
