//! # Engine Configuration
//!
//! All configuration structures the engine reads at bootstrap. Every struct
//! is serde-serializable and fills missing fields from its `Default`, so a
//! config file only needs to name what it changes:
//!
//! ```toml
//! [window]
//! title = "Spectrum"
//!
//! [run]
//! fixed_delta_time = 0.016
//! max_frames = 600
//! ```

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};
use crate::foundation::time::DEFAULT_FPS_SMOOTHING;
use crate::render::Color;

/// Window bootstrap settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Clear colour
    pub background_color: Color,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Nora Engine".to_string(),
            width: 800,
            height: 600,
            background_color: Color::BLACK,
        }
    }
}

/// Scene dispatch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Weight of the newest sample in the smoothed FPS estimate, in `(0, 1]`
    pub fps_smoothing: f32,

    /// Stop dispatching to a component after its first failed lifecycle call
    pub disable_on_error: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fps_smoothing: DEFAULT_FPS_SMOOTHING,
            disable_on_error: false,
        }
    }
}

/// Frame loop settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Use this delta for every frame instead of measuring wall-clock time
    pub fixed_delta_time: Option<f32>,

    /// Stop after this many frames
    pub max_frames: Option<u64>,
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window configuration
    pub window: WindowConfig,
    /// Scene configuration
    pub scene: SceneConfig,
    /// Frame loop configuration
    pub run: RunConfig,
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Builder: set the window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Builder: run with a fixed delta for a bounded number of frames
    pub fn with_fixed_frames(mut self, delta_time: f32, frames: u64) -> Self {
        self.run.fixed_delta_time = Some(delta_time);
        self.run.max_frames = Some(frames);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = r#"
            [window]
            title = "Spectrum"

            [run]
            max_frames = 10
        "#;
        let config = EngineConfig::from_str_as(text, ConfigFormat::Toml).expect("valid config");

        assert_eq!(config.window.title, "Spectrum");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.run.max_frames, Some(10));
        assert_eq!(config.run.fixed_delta_time, None);
        assert_eq!(config.scene, SceneConfig::default());
    }

    #[test]
    fn test_ron_roundtrip_through_file() {
        let config = EngineConfig::default()
            .with_title("Round trip")
            .with_fixed_frames(0.02, 3);
        let path = std::env::temp_dir().join(format!("nora_engine_config_{}.ron", std::process::id()));

        config.save_to_file(&path).expect("save");
        let loaded = EngineConfig::load_from_file(&path).expect("load");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = EngineConfig::load_from_file("engine.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = EngineConfig::load_or_default("definitely/not/here.toml");
        assert_eq!(config, EngineConfig::default());
    }
}
