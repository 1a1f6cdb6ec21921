use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::models::FlashMode;

/// Plugin configuration, read from `plugins."camera-kit"` in `tauri.conf.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Default for `capture` when the caller does not say.
    pub save_to_camera_roll: bool,
    /// Default for `set_flash_mode` when the caller does not say.
    pub flash_mode: FlashMode,
    pub long_press_ms: u64,
    pub focus_half_size: i32,
    pub focus_complete_delay_ms: u64,
    /// Highest zoom step the pinch gesture may reach; 0 disables pinch zoom.
    pub max_zoom: u32,
    pub capture_timeout_ms: u64,
    pub capture_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_to_camera_roll: true,
            flash_mode: FlashMode::Auto,
            long_press_ms: 750,
            focus_half_size: 50,
            focus_complete_delay_ms: 200,
            max_zoom: 0,
            capture_timeout_ms: 2000,
            capture_dir: None,
        }
    }
}

impl Config {
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn focus_complete_delay(&self) -> Duration {
        Duration::from_millis(self.focus_complete_delay_ms)
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }

    pub fn capture_dir(&self) -> PathBuf {
        self.capture_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
