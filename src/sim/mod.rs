//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (oldest entity first)
//! - No rendering or platform dependencies

pub mod geometry;
pub mod state;
pub mod tick;

pub use geometry::{Hitbox, overlaps};
pub use state::{GameEvent, GamePhase, GameState, SessionStatus, Snapshot};
pub use tick::{ControlState, advance, spawn_interval, speed_bonus};
