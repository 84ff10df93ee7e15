//! Game state and core simulation types
//!
//! One owned [`GameState`] holds the entity store (player, projectiles,
//! enemies), the session (score, lives, phase) and the step timers.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Hitbox;
use crate::config::GameConfig;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Lives exhausted; only a restart leaves this phase
    GameOver,
}

/// Something that happened during a step, for presentation/progression hooks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ProjectileFired,
    EnemySpawned,
    /// Enemy destroyed by a projectile
    EnemyDestroyed { score: u32 },
    /// Enemy breached the bottom or touched the player
    LifeLost { remaining: u32 },
    GameOver { final_score: u32 },
}

/// Score, lives and game-over flag for HUD polling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub score: u32,
    pub lives: u32,
    pub is_over: bool,
}

/// Read-only world view handed to the renderer after each step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: Hitbox,
    pub projectiles: Vec<Hitbox>,
    pub enemies: Vec<Hitbox>,
    pub score: u32,
    pub lives: u32,
    pub is_over: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance and arena geometry (validated by the caller)
    config: GameConfig,
    /// Run seed for reproducibility
    seed: u64,
    rng: Pcg32,
    pub(crate) player: Hitbox,
    /// Live projectiles, oldest first
    pub(crate) projectiles: Vec<Hitbox>,
    /// Live enemies, oldest first
    pub(crate) enemies: Vec<Hitbox>,
    pub(crate) score: u32,
    pub(crate) lives: u32,
    pub(crate) phase: GamePhase,
    /// Milliseconds since the last shot
    pub(crate) shot_timer_ms: f32,
    /// Milliseconds since the last enemy spawn
    pub(crate) spawn_timer_ms: f32,
    /// Steps simulated this session
    pub(crate) time_ticks: u64,
    /// Recorded by every step; kept until [`GameState::drain_events`] or restart
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given config and seed
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = Self::start_player(&config);
        let lives = config.starting_lives;
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            score: 0,
            lives,
            phase: GamePhase::Running,
            shot_timer_ms: 0.0,
            spawn_timer_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    fn start_player(config: &GameConfig) -> Hitbox {
        let (x, y) = config.player_start();
        Hitbox::new(x, y, config.player_width, config.player_height)
            .with_speed(config.player_speed)
    }

    /// Reset every entity, timer and session field
    ///
    /// Legal from any phase. The RNG stream continues so consecutive
    /// sessions differ.
    pub fn restart(&mut self) {
        self.player = Self::start_player(&self.config);
        self.projectiles.clear();
        self.enemies.clear();
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.phase = GamePhase::Running;
        self.shot_timer_ms = 0.0;
        self.spawn_timer_ms = 0.0;
        self.time_ticks = 0;
        self.events.clear();
        log::info!("Session restarted");
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self) -> &Hitbox {
        &self.player
    }

    pub fn projectiles(&self) -> &[Hitbox] {
        &self.projectiles
    }

    pub fn enemies(&self) -> &[Hitbox] {
        &self.enemies
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            score: self.score,
            lives: self.lives,
            is_over: self.is_over(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.player,
            projectiles: self.projectiles.clone(),
            enemies: self.enemies.clone(),
            score: self.score,
            lives: self.lives,
            is_over: self.is_over(),
        }
    }

    /// Take the events recorded since the last drain
    ///
    /// Hosts stepping with [`advance`](crate::sim::advance) directly should
    /// call this once per frame; [`Game::frame`](crate::Game::frame) does.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn an enemy at a random column just above the arena
    pub fn spawn_enemy(&mut self) {
        let cfg = &self.config;
        let size = cfg.enemy_min_size + self.rng.random::<f32>() * cfg.enemy_size_range;
        let x = self.rng.random::<f32>() * (cfg.arena_width - size).max(0.0);
        let speed = cfg.enemy_min_speed
            + self.rng.random::<f32>() * (cfg.enemy_max_speed - cfg.enemy_min_speed);
        log::debug!("Enemy spawned at x={:.1} size={:.1} speed={:.2}", x, size, speed);
        self.spawn_enemy_at(Hitbox::new(x, -size, size, size).with_speed(speed));
    }

    /// Insert an enemy with a known hitbox
    pub fn spawn_enemy_at(&mut self, enemy: Hitbox) {
        self.enemies.push(enemy);
        self.events.push(GameEvent::EnemySpawned);
    }

    /// Spawn a projectile centered on `origin`'s top edge
    pub fn spawn_projectile(&mut self, origin: &Hitbox) {
        let cfg = &self.config;
        let projectile = Hitbox::new(
            origin.center_x() - cfg.projectile_width / 2.0,
            origin.y() - cfg.projectile_height,
            cfg.projectile_width,
            cfg.projectile_height,
        )
        .with_speed(cfg.projectile_speed);
        self.projectiles.push(projectile);
        self.events.push(GameEvent::ProjectileFired);
    }

    /// Remove the enemy at `index`, keeping the order of the rest
    ///
    /// `None` if the index is out of range.
    pub fn remove_enemy_at(&mut self, index: usize) -> Option<Hitbox> {
        (index < self.enemies.len()).then(|| self.enemies.remove(index))
    }

    /// Remove the projectile at `index`, keeping the order of the rest
    ///
    /// `None` if the index is out of range.
    pub fn remove_projectile_at(&mut self, index: usize) -> Option<Hitbox> {
        (index < self.projectiles.len()).then(|| self.projectiles.remove(index))
    }

    /// Award the kill reward
    pub(crate) fn award_kill(&mut self) {
        self.score = self.score.saturating_add(self.config.kill_reward);
        self.events.push(GameEvent::EnemyDestroyed { score: self.score });
    }

    /// Deduct one life, entering `GameOver` when none remain
    pub(crate) fn lose_life(&mut self) {
        if self.is_over() {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            remaining: self.lives,
        });
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver {
                final_score: self.score,
            });
            log::info!(
                "Game over: score {} after {} steps",
                self.score,
                self.time_ticks
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(GameConfig::default(), 7)
    }

    #[test]
    fn test_new_session() {
        let s = state();
        assert_eq!(s.score(), 0);
        assert_eq!(s.lives(), 3);
        assert_eq!(s.phase(), GamePhase::Running);
        assert!(s.projectiles().is_empty());
        assert!(s.enemies().is_empty());
        assert_eq!(s.player().x(), 180.0);
        assert_eq!(s.player().y(), 520.0);
        assert_eq!(s.player().speed(), 6.0);
    }

    #[test]
    fn test_spawn_enemy_within_ranges() {
        let mut s = state();
        for _ in 0..200 {
            s.spawn_enemy();
        }
        let cfg = GameConfig::default();
        for e in s.enemies() {
            assert_eq!(e.w(), e.h());
            assert!(e.w() >= cfg.enemy_min_size);
            assert!(e.w() <= cfg.enemy_min_size + cfg.enemy_size_range);
            assert!(e.x() >= 0.0 && e.right() <= cfg.arena_width);
            assert_eq!(e.bottom(), 0.0);
            assert!(e.speed() >= cfg.enemy_min_speed && e.speed() <= cfg.enemy_max_speed);
        }
    }

    #[test]
    fn test_spawn_projectile_centered_on_top_edge() {
        let mut s = state();
        let origin = Hitbox::new(100.0, 520.0, 40.0, 40.0);
        s.spawn_projectile(&origin);
        let p = s.projectiles()[0];
        assert_eq!(p.x(), 116.0);
        assert_eq!(p.y(), 504.0);
        assert_eq!(p.bottom(), origin.y());
        assert_eq!(p.speed(), 8.0);
        assert_eq!(s.drain_events(), vec![GameEvent::ProjectileFired]);
    }

    #[test]
    fn test_removal_keeps_insertion_order() {
        let mut s = state();
        for i in 0..4 {
            s.spawn_enemy_at(Hitbox::new(i as f32 * 50.0, 0.0, 10.0, 10.0));
        }
        let removed = s.remove_enemy_at(1);
        assert_eq!(removed.map(|e| e.x()), Some(50.0));
        let xs: Vec<f32> = s.enemies().iter().map(|e| e.x()).collect();
        assert_eq!(xs, vec![0.0, 100.0, 150.0]);
        assert_eq!(s.remove_enemy_at(3), None);
        assert_eq!(s.enemies().len(), 3);
    }

    #[test]
    fn test_remove_projectile_at() {
        let mut s = state();
        for x in [0.0, 100.0, 200.0] {
            s.spawn_projectile(&Hitbox::new(x, 300.0, 40.0, 40.0));
        }
        let removed = s.remove_projectile_at(0);
        assert_eq!(removed.map(|p| p.x()), Some(16.0));
        let xs: Vec<f32> = s.projectiles().iter().map(|p| p.x()).collect();
        assert_eq!(xs, vec![116.0, 216.0]);

        assert_eq!(s.remove_projectile_at(2), None);
        assert_eq!(s.projectiles().len(), 2);
    }

    #[test]
    fn test_drain_empties_event_feed() {
        let mut s = state();
        s.spawn_enemy();
        s.spawn_projectile(&Hitbox::new(0.0, 300.0, 10.0, 10.0));
        assert_eq!(s.drain_events().len(), 2);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_lose_life_enters_game_over_once() {
        let mut s = state();
        s.score = 40;
        s.lose_life();
        s.lose_life();
        assert!(!s.is_over());
        s.lose_life();
        assert!(s.is_over());
        assert_eq!(s.lives(), 0);

        // Further deductions are ignored
        s.lose_life();
        assert_eq!(s.lives(), 0);
        let events = s.drain_events();
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count(),
            1
        );
        assert_eq!(events.last(), Some(&GameEvent::GameOver { final_score: 40 }));
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut s = state();
        s.score = 150;
        s.lives = 0;
        s.phase = GamePhase::GameOver;
        s.player.pos.x = 3.0;
        s.spawn_enemy();
        s.spawn_projectile(&Hitbox::new(0.0, 300.0, 10.0, 10.0));
        s.shot_timer_ms = 120.0;
        s.spawn_timer_ms = 80.0;

        s.restart();

        assert_eq!(
            s.status(),
            SessionStatus {
                score: 0,
                lives: 3,
                is_over: false
            }
        );
        assert!(s.projectiles().is_empty());
        assert!(s.enemies().is_empty());
        assert_eq!(s.player().x(), 180.0);
        assert_eq!(s.shot_timer_ms, 0.0);
        assert_eq!(s.spawn_timer_ms, 0.0);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_restart_while_running_is_a_reset() {
        let mut s = state();
        s.score = 30;
        s.restart();
        assert_eq!(s.score(), 0);
        assert_eq!(s.phase(), GamePhase::Running);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut s = state();
        s.spawn_enemy();
        let json = serde_json::to_string(&s.snapshot()).expect("serializes");
        let back: Snapshot = serde_json::from_str(&json).expect("parses");
        assert_eq!(back.enemies.len(), 1);
        assert_eq!(back.lives, 3);
        assert!(!back.is_over);
    }
}
