//! Viewer configuration.
//!
//! # Loading
//!
//! ```rust,ignore
//! let cfg = AppConfig::from_file("tree_morph.toml")?
//!     .with_env_overrides();
//! cfg.validate()?;
//! ```
//!
//! # TOML structure
//!
//! Every table and key is optional; missing ones take their defaults.
//!
//! ```toml
//! [field]
//! seed = 42
//!
//! [field.counts]
//! light = 900
//!
//! [gesture]
//! enabled = true
//! max_rate_hz = 15.0
//!
//! [window]
//! width = 960
//! height = 720
//! fps = 60
//!
//! [camera]
//! distance = 32.0
//! auto_rotate = 0.5
//! ```
//!
//! # Environment overrides
//!
//! | Variable | Config path | Type |
//! |---|---|---|
//! | `TREE_MORPH_GESTURE` | `gesture.enabled` | bool |
//! | `TREE_MORPH_SEED` | `field.seed` | u64 |
//! | `TREE_MORPH_FPS` | `window.fps` | u32 |

use std::env;
use std::path::Path;

use ornament_field::FieldConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Start with gesture control on (the `G` key flips it at runtime).
    pub enabled:     bool,
    /// Upper bound on classified samples per second; `0` disables the limit.
    pub max_rate_hz: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig { enabled: true, max_rate_hz: hand_gesture::DEFAULT_MAX_RATE_HZ }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width:  usize,
    pub height: usize,
    /// Render loop cap.
    pub fps:    u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig { width: 960, height: 720, fps: 60 }
    }
}

/// Orbit camera around the scene origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Horizontal distance from the orbit axis.
    pub distance:    f32,
    pub height:      f32,
    /// Vertical field of view in degrees.
    pub fov:         f32,
    /// Orbit speed in turns per minute while the tree stands formed with no
    /// hand in view.
    pub auto_rotate: f32,
    /// Uniform scale applied to the whole scene.
    pub scene_scale: f32,
    pub y_offset:    f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            distance:    32.0,
            height:      2.0,
            fov:         45.0,
            auto_rotate: 0.5,
            scene_scale: 0.65,
            y_offset:    -2.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub field:   FieldConfig,
    pub gesture: GestureConfig,
    pub window:  WindowConfig,
    pub camera:  CameraConfig,
}

impl AppConfig {
    /// Read and parse a TOML file.  Missing keys fall back to defaults;
    /// unreadable files and malformed TOML are errors.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let cfg = Self::from_toml_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_toml_str(toml: &str) -> AppResult<Self> {
        toml::from_str(toml).map_err(|e| AppError::Config(format!("failed to parse TOML: {}", e)))
    }

    pub fn to_toml_string(&self) -> AppResult<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(format!("failed to serialize TOML: {}", e)))
    }

    /// Apply `TREE_MORPH_*` variables from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup.  Values that fail to parse are
    /// logged and ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("TREE_MORPH_GESTURE") {
            match parse_flag(&v) {
                Some(b) => self.gesture.enabled = b,
                None    => warn!(value = %v, "ignoring TREE_MORPH_GESTURE"),
            }
        }
        if let Some(v) = lookup("TREE_MORPH_SEED") {
            match v.trim().parse::<u64>() {
                Ok(seed) => self.field.seed = Some(seed),
                Err(_)   => warn!(value = %v, "ignoring TREE_MORPH_SEED"),
            }
        }
        if let Some(v) = lookup("TREE_MORPH_FPS") {
            match v.trim().parse::<u32>() {
                Ok(fps) => self.window.fps = fps,
                Err(_)  => warn!(value = %v, "ignoring TREE_MORPH_FPS"),
            }
        }
        self
    }

    /// Check every section, reporting the first problem with its table name.
    pub fn validate(&self) -> AppResult<()> {
        self.field.validate()?;

        let g = &self.gesture;
        if !g.max_rate_hz.is_finite() || g.max_rate_hz < 0.0 {
            return Err(AppError::Config(format!("[gesture] max_rate_hz must be >= 0, got {}", g.max_rate_hz)));
        }

        let w = &self.window;
        if w.width < 64 || w.height < 64 {
            return Err(AppError::Config(format!("[window] {}x{} is too small (min 64x64)", w.width, w.height)));
        }
        if w.fps == 0 {
            return Err(AppError::Config("[window] fps must be at least 1".into()));
        }

        let c = &self.camera;
        for (name, v) in [("distance", c.distance), ("scene_scale", c.scene_scale)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(AppError::Config(format!("[camera] {} must be positive, got {}", name, v)));
            }
        }
        if !(c.fov > 1.0 && c.fov < 179.0) {
            return Err(AppError::Config(format!("[camera] fov must lie in (1, 179) degrees, got {}", c.fov)));
        }
        for (name, v) in [("height", c.height), ("auto_rotate", c.auto_rotate), ("y_offset", c.y_offset)] {
            if !v.is_finite() {
                return Err(AppError::Config(format!("[camera] {} must be finite", name)));
            }
        }
        Ok(())
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes"  => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
