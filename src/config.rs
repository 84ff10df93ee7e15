//! Game balance configuration
//!
//! Every tunable of the simulation lives in [`GameConfig`]. Hosts may ship a
//! JSON file overriding any subset of fields; missing fields keep their
//! defaults from [`crate::consts`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a configuration is rejected
#[derive(Debug)]
pub enum ConfigError {
    /// A size that must be strictly positive is not
    NonPositive { field: &'static str, value: f32 },
    /// A speed or duration that may be zero is negative or not finite
    Negative { field: &'static str, value: f32 },
    /// An entity cannot fit horizontally inside the arena
    ArenaTooSmall { field: &'static str, size: f32, arena_width: f32 },
    /// A `[min, max]` pair is inverted
    InvertedRange { min_field: &'static str, max_field: &'static str },
    /// A counter that must be at least one is zero
    Zero { field: &'static str },
    /// The JSON document could not be parsed
    Parse(serde_json::Error),
    /// The config file could not be read
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive and finite, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must be non-negative and finite, got {value}")
            }
            Self::ArenaTooSmall {
                field,
                size,
                arena_width,
            } => write!(
                f,
                "{field} ({size}) does not fit inside an arena {arena_width} wide"
            ),
            Self::InvertedRange {
                min_field,
                max_field,
            } => write!(f, "{min_field} must not exceed {max_field}"),
            Self::Zero { field } => write!(f, "{field} must be at least 1"),
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Io(err) => write!(f, "cannot read config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Game balance and arena geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Horizontal distance per step while a move control is held
    pub player_speed: f32,
    /// Player top edge sits this far above the arena bottom
    pub player_bottom_offset: f32,

    // === Projectiles ===
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,
    pub shot_interval_ms: f32,

    // === Enemies ===
    pub enemy_min_size: f32,
    pub enemy_size_range: f32,
    pub enemy_min_speed: f32,
    pub enemy_max_speed: f32,

    // === Difficulty ramp ===
    pub spawn_base_interval_ms: f32,
    pub spawn_floor_interval_ms: f32,
    pub spawn_points_per_step: u32,
    pub spawn_step_ms: f32,
    pub spawn_max_reduction_ms: f32,
    pub speed_bonus_cap: f32,
    pub speed_bonus_divisor: f32,

    // === Session ===
    pub kill_reward: u32,
    pub starting_lives: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,

            projectile_width: PROJECTILE_WIDTH,
            projectile_height: PROJECTILE_HEIGHT,
            projectile_speed: PROJECTILE_SPEED,
            shot_interval_ms: SHOT_INTERVAL_MS,

            enemy_min_size: ENEMY_MIN_SIZE,
            enemy_size_range: ENEMY_SIZE_RANGE,
            enemy_min_speed: ENEMY_MIN_SPEED,
            enemy_max_speed: ENEMY_MAX_SPEED,

            spawn_base_interval_ms: SPAWN_BASE_INTERVAL_MS,
            spawn_floor_interval_ms: SPAWN_FLOOR_INTERVAL_MS,
            spawn_points_per_step: SPAWN_POINTS_PER_STEP,
            spawn_step_ms: SPAWN_STEP_MS,
            spawn_max_reduction_ms: SPAWN_MAX_REDUCTION_MS,
            speed_bonus_cap: SPEED_BONUS_CAP,
            speed_bonus_divisor: SPEED_BONUS_DIVISOR,

            kill_reward: KILL_REWARD,
            starting_lives: STARTING_LIVES,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("player_width", self.player_width)?;
        positive("player_height", self.player_height)?;
        non_negative("player_speed", self.player_speed)?;
        non_negative("player_bottom_offset", self.player_bottom_offset)?;
        positive("projectile_width", self.projectile_width)?;
        positive("projectile_height", self.projectile_height)?;
        non_negative("projectile_speed", self.projectile_speed)?;
        non_negative("shot_interval_ms", self.shot_interval_ms)?;
        positive("enemy_min_size", self.enemy_min_size)?;
        non_negative("enemy_size_range", self.enemy_size_range)?;
        non_negative("enemy_min_speed", self.enemy_min_speed)?;
        non_negative("enemy_max_speed", self.enemy_max_speed)?;
        non_negative("spawn_base_interval_ms", self.spawn_base_interval_ms)?;
        non_negative("spawn_floor_interval_ms", self.spawn_floor_interval_ms)?;
        non_negative("spawn_step_ms", self.spawn_step_ms)?;
        non_negative("spawn_max_reduction_ms", self.spawn_max_reduction_ms)?;
        non_negative("speed_bonus_cap", self.speed_bonus_cap)?;
        positive("speed_bonus_divisor", self.speed_bonus_divisor)?;

        if self.player_width > self.arena_width {
            return Err(ConfigError::ArenaTooSmall {
                field: "player_width",
                size: self.player_width,
                arena_width: self.arena_width,
            });
        }
        let largest_enemy = self.enemy_min_size + self.enemy_size_range;
        if largest_enemy > self.arena_width {
            return Err(ConfigError::ArenaTooSmall {
                field: "enemy_min_size + enemy_size_range",
                size: largest_enemy,
                arena_width: self.arena_width,
            });
        }
        if self.enemy_min_speed > self.enemy_max_speed {
            return Err(ConfigError::InvertedRange {
                min_field: "enemy_min_speed",
                max_field: "enemy_max_speed",
            });
        }
        if self.spawn_floor_interval_ms > self.spawn_base_interval_ms {
            return Err(ConfigError::InvertedRange {
                min_field: "spawn_floor_interval_ms",
                max_field: "spawn_base_interval_ms",
            });
        }
        if self.spawn_points_per_step == 0 {
            return Err(ConfigError::Zero {
                field: "spawn_points_per_step",
            });
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Zero {
                field: "starting_lives",
            });
        }
        Ok(())
    }

    /// Player start position: horizontally centered, fixed height
    pub fn player_start(&self) -> (f32, f32) {
        (
            self.arena_width / 2.0 - self.player_width / 2.0,
            self.arena_height - self.player_bottom_offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "arena_width": 360.0, "kill_reward": 25 }"#)
            .expect("valid config");
        assert_eq!(config.arena_width, 360.0);
        assert_eq!(config.kill_reward, 25);
        assert_eq!(config.arena_height, ARENA_HEIGHT);
        assert_eq!(config.starting_lives, STARTING_LIVES);
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let json = GameConfig::default().to_json().expect("serializes");
        let back = GameConfig::from_json(&json).expect("parses");
        assert_eq!(back, GameConfig::default());
    }

    #[test]
    fn test_rejects_player_wider_than_arena() {
        let config = GameConfig {
            arena_width: 30.0,
            enemy_min_size: 10.0,
            enemy_size_range: 5.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ArenaTooSmall { field: "player_width", .. })
        ));
    }

    #[test]
    fn test_rejects_enemy_wider_than_arena() {
        let config = GameConfig {
            arena_width: 50.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ArenaTooSmall { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let speeds = GameConfig {
            enemy_min_speed: 4.0,
            enemy_max_speed: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            speeds.validate(),
            Err(ConfigError::InvertedRange { min_field: "enemy_min_speed", .. })
        ));

        let spawn = GameConfig {
            spawn_floor_interval_ms: 900.0,
            ..Default::default()
        };
        assert!(matches!(
            spawn.validate(),
            Err(ConfigError::InvertedRange { min_field: "spawn_floor_interval_ms", .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_and_nan_sizes() {
        let zero = GameConfig {
            projectile_height: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::NonPositive { field: "projectile_height", .. })
        ));

        let nan = GameConfig {
            arena_height: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_zero_speed_allowed_but_negative_rejected() {
        let still = GameConfig {
            player_speed: 0.0,
            ..Default::default()
        };
        assert!(still.validate().is_ok());

        let backwards = GameConfig {
            player_speed: -1.0,
            ..Default::default()
        };
        let err = backwards.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Negative { field: "player_speed", .. }
        ));
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_rejects_zero_counters() {
        let lives = GameConfig {
            starting_lives: 0,
            ..Default::default()
        };
        assert!(matches!(lives.validate(), Err(ConfigError::Zero { .. })));

        let step = GameConfig {
            spawn_points_per_step: 0,
            ..Default::default()
        };
        assert!(matches!(step.validate(), Err(ConfigError::Zero { .. })));
    }

    #[test]
    fn test_bad_json_reports_parse_error() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid config json"));
    }

    #[test]
    fn test_player_start_is_centered() {
        let config = GameConfig::default();
        assert_eq!(config.player_start(), (180.0, 520.0));
    }
}
