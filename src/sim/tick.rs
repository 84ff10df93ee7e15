//! Per-frame simulation step
//!
//! Advances the game state by one variable-length frame. Movement is per
//! step; cooldown and spawn timers accumulate wall-clock milliseconds.

use serde::{Deserialize, Serialize};

use super::geometry::overlaps;
use super::state::GameState;
use crate::config::GameConfig;

/// Logical controls held during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    /// Move left
    pub left: bool,
    /// Move right
    pub right: bool,
    /// Fire (subject to the shot interval)
    pub fire: bool,
}

/// Current enemy spawn interval for a score
///
/// `base - min(max_reduction, floor(score / points_per_step) * step)`, never
/// below the floor. Non-increasing in score.
pub fn spawn_interval(config: &GameConfig, score: u32) -> f32 {
    let steps = score / config.spawn_points_per_step.max(1);
    let reduction = (steps as f32 * config.spawn_step_ms).min(config.spawn_max_reduction_ms);
    (config.spawn_base_interval_ms - reduction).max(config.spawn_floor_interval_ms)
}

/// Extra downward speed applied to every enemy, capped
pub fn speed_bonus(config: &GameConfig, score: u32) -> f32 {
    (score as f32 / config.speed_bonus_divisor).min(config.speed_bonus_cap)
}

/// Negative or non-finite frame times count as zero
fn sanitize_dt(dt_ms: f32) -> f32 {
    if dt_ms.is_finite() && dt_ms >= 0.0 {
        dt_ms
    } else {
        log::warn!("Rejected frame delta {dt_ms}, stepping with 0 ms");
        0.0
    }
}

/// Advance the game state by one frame of `dt_ms` milliseconds
///
/// A no-op once the session is over. Events are appended to the state's
/// feed and stay there until [`GameState::drain_events`] is called.
pub fn advance(state: &mut GameState, controls: ControlState, dt_ms: f32) {
    if state.is_over() {
        return;
    }
    let dt = sanitize_dt(dt_ms);
    state.time_ticks += 1;

    // --- PLAYER MOVEMENT ---
    // Both directions may be held; they cancel out
    let arena_width = state.config().arena_width;
    let player_speed = state.player.speed();
    if controls.left {
        state.player.pos.x -= player_speed;
    }
    if controls.right {
        state.player.pos.x += player_speed;
    }
    state.player.clamp_x(0.0, arena_width);

    // --- FIRE GATING ---
    // The cooldown runs on wall-clock time, held or not
    state.shot_timer_ms += dt;
    if controls.fire && state.shot_timer_ms >= state.config().shot_interval_ms {
        let origin = state.player;
        state.spawn_projectile(&origin);
        state.shot_timer_ms = 0.0;
    }

    // --- PROJECTILES ---
    for projectile in &mut state.projectiles {
        projectile.pos.y -= projectile.speed();
    }
    state.projectiles.retain(|p| p.bottom() >= 0.0);

    // --- SPAWNING ---
    state.spawn_timer_ms += dt;
    if state.spawn_timer_ms >= spawn_interval(state.config(), state.score) {
        state.spawn_enemy();
        state.spawn_timer_ms = 0.0;
    }

    // --- ENEMIES ---
    resolve_enemies(state);
}

/// Move every enemy, then resolve breach, projectile and player contact
///
/// Enemies are visited oldest first. Removals are marked during the scan
/// and compacted afterwards so no element is skipped.
fn resolve_enemies(state: &mut GameState) {
    let arena_height = state.config().arena_height;
    let bonus = speed_bonus(state.config(), state.score);

    let mut enemy_alive = vec![true; state.enemies.len()];
    let mut projectile_alive = vec![true; state.projectiles.len()];

    for i in 0..state.enemies.len() {
        let enemy = &mut state.enemies[i];
        enemy.pos.y += enemy.speed() + bonus;
        let enemy = *enemy;

        // Fully past the bottom edge
        if enemy.y() > arena_height {
            enemy_alive[i] = false;
            state.lose_life();
            continue;
        }

        // First live projectile wins; it kills only this enemy
        let hit = state
            .projectiles
            .iter()
            .enumerate()
            .find(|(j, p)| projectile_alive[*j] && overlaps(&enemy, p))
            .map(|(j, _)| j);
        if let Some(j) = hit {
            enemy_alive[i] = false;
            projectile_alive[j] = false;
            state.award_kill();
            log::debug!("Enemy {} destroyed, score {}", i, state.score);
            continue;
        }

        if overlaps(&enemy, &state.player) {
            enemy_alive[i] = false;
            state.lose_life();
        }
    }

    let mut alive = enemy_alive.into_iter();
    state.enemies.retain(|_| alive.next().unwrap_or(true));
    let mut alive = projectile_alive.into_iter();
    state.projectiles.retain(|_| alive.next().unwrap_or(true));
}
