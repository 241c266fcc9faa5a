use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::sim::{AnimState, JumpWindows};

pub const TUNING_FILE_NAME: &str = "tuning.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldTuning {
    pub tile_size_px: f32,
    pub respawn_margin_px: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            tile_size_px: 64.0,
            respawn_margin_px: 400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub run_speed: f32,
    pub run_accel: f32,
    pub friction: f32,
    /// Magnitude of the upward launch speed.
    pub jump_impulse: f32,
    pub jump_buffer_seconds: f32,
    pub coyote_seconds: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 2200.0,
            max_fall_speed: 1400.0,
            run_speed: 300.0,
            run_accel: 2100.0,
            friction: 2300.0,
            jump_impulse: 860.0,
            jump_buffer_seconds: 0.14,
            coyote_seconds: 0.10,
        }
    }
}

impl PhysicsTuning {
    pub fn jump_windows(&self) -> JumpWindows {
        JumpWindows {
            buffer_seconds: self.jump_buffer_seconds,
            coyote_seconds: self.coyote_seconds,
        }
    }
}

/// Per-tick fraction of the remaining distance the camera covers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraTuning {
    pub follow_rate_x: f32,
    pub follow_rate_y: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            follow_rate_x: 0.12,
            follow_rate_y: 0.08,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationTuning {
    pub walk_deadzone: f32,
    pub idle_frame_seconds: f32,
    pub walk_frame_seconds: f32,
    pub jump_frame_seconds: f32,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self {
            walk_deadzone: 24.0,
            idle_frame_seconds: 0.16,
            walk_frame_seconds: 0.09,
            jump_frame_seconds: 0.16,
        }
    }
}

impl AnimationTuning {
    pub fn frame_seconds(&self, state: AnimState) -> f32 {
        match state {
            AnimState::Idle => self.idle_frame_seconds,
            AnimState::Walk => self.walk_frame_seconds,
            AnimState::Jump => self.jump_frame_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderTuning {
    pub source_tile_px: u32,
    pub tile_sheet_columns: u32,
    pub sprite_width_px: u32,
    pub sprite_height_px: u32,
}

impl Default for RenderTuning {
    fn default() -> Self {
        Self {
            source_tile_px: 32,
            tile_sheet_columns: 10,
            sprite_width_px: 92,
            sprite_height_px: 92,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub world: WorldTuning,
    pub physics: PhysicsTuning,
    pub camera: CameraTuning,
    pub animation: AnimationTuning,
    pub render: RenderTuning,
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse tuning json at {at}: {source}")]
    Parse {
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tuning value at {field}: expected {expected}, got {actual}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },
}

impl Tuning {
    /// Reads `path` when it exists; a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, TuningError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "tuning_defaults_used");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(TuningError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let tuning = Self::from_json(&raw)?;
        info!(path = %path.display(), "tuning_loaded");
        Ok(tuning)
    }

    pub fn from_json(raw: &str) -> Result<Self, TuningError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let tuning: Tuning =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                let at = error.path().to_string();
                TuningError::Parse {
                    at,
                    source: error.into_inner(),
                }
            })?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("world.tile_size_px", self.world.tile_size_px),
            ("physics.gravity", self.physics.gravity),
            ("physics.max_fall_speed", self.physics.max_fall_speed),
            ("physics.run_speed", self.physics.run_speed),
            ("physics.run_accel", self.physics.run_accel),
            ("physics.friction", self.physics.friction),
            ("physics.jump_impulse", self.physics.jump_impulse),
            ("animation.idle_frame_seconds", self.animation.idle_frame_seconds),
            ("animation.walk_frame_seconds", self.animation.walk_frame_seconds),
            ("animation.jump_frame_seconds", self.animation.jump_frame_seconds),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, "positive finite number", value));
            }
        }

        let non_negative = [
            ("world.respawn_margin_px", self.world.respawn_margin_px),
            ("physics.jump_buffer_seconds", self.physics.jump_buffer_seconds),
            ("physics.coyote_seconds", self.physics.coyote_seconds),
            ("animation.walk_deadzone", self.animation.walk_deadzone),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, "non-negative finite number", value));
            }
        }

        let rates = [
            ("camera.follow_rate_x", self.camera.follow_rate_x),
            ("camera.follow_rate_y", self.camera.follow_rate_y),
        ];
        for (field, value) in rates {
            if !(value.is_finite() && value > 0.0 && value <= 1.0) {
                return Err(invalid(field, "number in (0, 1]", value));
            }
        }

        let counts = [
            ("render.source_tile_px", self.render.source_tile_px),
            ("render.tile_sheet_columns", self.render.tile_sheet_columns),
            ("render.sprite_width_px", self.render.sprite_width_px),
            ("render.sprite_height_px", self.render.sprite_height_px),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(invalid(field, "non-zero integer", value));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, expected: &'static str, actual: impl ToString) -> TuningError {
    TuningError::Invalid {
        field,
        expected,
        actual: actual.to_string(),
    }
}
