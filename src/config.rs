use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

// Gameplay tuning. Every field can be overridden from a TOML file; missing
// fields keep the defaults below.

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub mission_duration_seconds: f32,
    pub fps: u32,

    pub rover_speed: f32,
    /// Side of the fallback square, also its collision rectangle.
    pub rover_size: f32,
    /// Loaded rover images wider than this are scaled down.
    pub rover_max_image_width: f32,

    pub target_count: usize,
    pub target_radius: f32,
    pub target_margin: f32,
    pub target_min_center_distance: f32,
    pub score_per_target: u32,

    pub visible_hazard_count: usize,
    pub hidden_hazard_count: usize,
    pub visible_hazard_min_size: f32,
    pub visible_hazard_max_size: f32,
    pub hidden_hazard_size: f32,
    pub hazard_min_center_distance: f32,
    /// Shrink factor applied to both bounding circles before a hazard test.
    pub hazard_collision_ratio: f32,
    pub hazard_penalty_score: u32,
    pub hazard_penalty_time_seconds: f32,
    pub hazard_debounce_ms: i64,
    pub hazard_message_ms: i64,

    /// HUD timer turns red at or below this many seconds.
    pub low_time_warning_seconds: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield_width: 800.0,
            playfield_height: 600.0,
            mission_duration_seconds: 60.0,
            fps: 60,
            rover_speed: 5.0,
            rover_size: 50.0,
            rover_max_image_width: 80.0,
            target_count: 5,
            target_radius: 15.0,
            target_margin: 50.0,
            target_min_center_distance: 100.0,
            score_per_target: 100,
            visible_hazard_count: 3,
            hidden_hazard_count: 3,
            visible_hazard_min_size: 60.0,
            visible_hazard_max_size: 100.0,
            hidden_hazard_size: 50.0,
            hazard_min_center_distance: 150.0,
            hazard_collision_ratio: 0.8,
            hazard_penalty_score: 50,
            hazard_penalty_time_seconds: 5.0,
            hazard_debounce_ms: 1000,
            hazard_message_ms: 1500,
            low_time_warning_seconds: 10.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0} must be > 0")]
    NotPositive(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("hazard_collision_ratio must be in (0, 1], got {0}")]
    RatioOutOfRange(f32),

    #[error("visible hazard size range is inverted ({min} > {max})")]
    InvertedRange { min: f32, max: f32 },

    /// No point of the placement region is far enough from the center.
    #[error("playfield too small to place {0} away from the center")]
    UnsatisfiablePlacement(&'static str),
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.playfield_width / 2.0, self.playfield_height / 2.0)
    }

    pub fn frame_interval_ms(&self) -> i64 {
        1000 / i64::from(self.fps.max(1))
    }

    /// Reject values that would break the simulation, including layouts where
    /// rejection sampling could never find a valid spot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("mission_duration_seconds", self.mission_duration_seconds),
            ("rover_speed", self.rover_speed),
            ("rover_size", self.rover_size),
            ("rover_max_image_width", self.rover_max_image_width),
            ("target_radius", self.target_radius),
            ("visible_hazard_min_size", self.visible_hazard_min_size),
            ("hidden_hazard_size", self.hidden_hazard_size),
            ("fps", self.fps as f32),
        ];
        for (field, value) in positives {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive(field));
            }
        }
        // Zero is fine for these.
        let non_negatives = [
            ("target_margin", self.target_margin),
            ("target_min_center_distance", self.target_min_center_distance),
            ("hazard_min_center_distance", self.hazard_min_center_distance),
            ("hazard_penalty_time_seconds", self.hazard_penalty_time_seconds),
            ("hazard_debounce_ms", self.hazard_debounce_ms as f32),
            ("hazard_message_ms", self.hazard_message_ms as f32),
            ("low_time_warning_seconds", self.low_time_warning_seconds),
        ];
        for (field, value) in non_negatives {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative(field));
            }
        }
        if !(self.hazard_collision_ratio > 0.0 && self.hazard_collision_ratio <= 1.0) {
            return Err(ConfigError::RatioOutOfRange(self.hazard_collision_ratio));
        }
        if self.visible_hazard_min_size > self.visible_hazard_max_size {
            return Err(ConfigError::InvertedRange {
                min: self.visible_hazard_min_size,
                max: self.visible_hazard_max_size,
            });
        }

        if self.target_count > 0 {
            let m = self.target_margin;
            let region = (m, self.playfield_width - m, m, self.playfield_height - m);
            if !self.region_reaches(region, self.target_min_center_distance) {
                return Err(ConfigError::UnsatisfiablePlacement("targets"));
            }
        }
        if self.visible_hazard_count > 0 {
            let s = self.visible_hazard_max_size;
            let region = (0.0, self.playfield_width - s, 0.0, self.playfield_height - s);
            if !self.region_reaches(region, self.hazard_min_center_distance) {
                return Err(ConfigError::UnsatisfiablePlacement("visible hazards"));
            }
        }
        if self.hidden_hazard_count > 0 {
            let s = self.hidden_hazard_size;
            let region = (0.0, self.playfield_width - s, 0.0, self.playfield_height - s);
            if !self.region_reaches(region, self.hazard_min_center_distance) {
                return Err(ConfigError::UnsatisfiablePlacement("hidden hazards"));
            }
        }
        Ok(())
    }

    /// True when some corner of `(x0, x1, y0, y1)` lies strictly farther than
    /// `min_distance` from the playfield center.
    fn region_reaches(&self, (x0, x1, y0, y1): (f32, f32, f32, f32), min_distance: f32) -> bool {
        if x0 > x1 || y0 > y1 {
            return false;
        }
        let (cx, cy) = self.center();
        let dx = (x0 - cx).abs().max((x1 - cx).abs());
        let dy = (y0 - cy).abs().max((y1 - cy).abs());
        dx.hypot(dy) > min_distance
    }
}
