//! Box Shooter - A vertical arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, session state)
//! - `input`: Touch-zone and button mapping onto the three logical controls
//! - `driver`: Frame clock and self-rescheduling frame loop
//! - `platform`: Headless and browser frame schedulers
//! - `game`: Session, input and clock shared with the frame loop
//! - `config`: Data-driven game balance
//! - `highscores`: In-memory leaderboard

pub mod config;
pub mod driver;
pub mod game;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use driver::{FrameClock, FrameLoop, FrameRequest, FrameScheduler};
pub use game::Game;
pub use highscores::HighScores;
pub use input::{Control, ControlPad, InputController};

/// Default tuning constants
///
/// Speeds are world units per simulation step, intervals are milliseconds.
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 400.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 6.0;
    /// Distance from the arena bottom to the player's top edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 80.0;

    /// Projectile defaults
    pub const PROJECTILE_WIDTH: f32 = 8.0;
    pub const PROJECTILE_HEIGHT: f32 = 16.0;
    pub const PROJECTILE_SPEED: f32 = 8.0;
    /// Minimum time between two shots
    pub const SHOT_INTERVAL_MS: f32 = 200.0;

    /// Enemy defaults - square, size in [MIN, MIN + RANGE)
    pub const ENEMY_MIN_SIZE: f32 = 36.0;
    pub const ENEMY_SIZE_RANGE: f32 = 24.0;
    pub const ENEMY_MIN_SPEED: f32 = 1.2;
    pub const ENEMY_MAX_SPEED: f32 = 3.0;

    /// Spawn interval ramp: base - min(MAX_REDUCTION, (score / POINTS) * STEP), floored
    pub const SPAWN_BASE_INTERVAL_MS: f32 = 500.0;
    pub const SPAWN_FLOOR_INTERVAL_MS: f32 = 150.0;
    pub const SPAWN_POINTS_PER_STEP: u32 = 5;
    pub const SPAWN_STEP_MS: f32 = 10.0;
    pub const SPAWN_MAX_REDUCTION_MS: f32 = 350.0;

    /// Extra enemy speed: min(CAP, score / DIVISOR)
    pub const SPEED_BONUS_CAP: f32 = 2.2;
    pub const SPEED_BONUS_DIVISOR: f32 = 50.0;

    /// Score per destroyed enemy
    pub const KILL_REWARD: u32 = 10;
    pub const STARTING_LIVES: u32 = 3;
}
