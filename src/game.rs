//! Game - one session plus the input and clock that drive it
//!
//! This is the value shared between the frame loop and the input
//! handlers as `Rc<RefCell<Game>>`.

use crate::config::GameConfig;
use crate::driver::FrameClock;
use crate::input::InputController;
use crate::sim::{self, GameEvent, GameState, SessionStatus, Snapshot};

#[derive(Debug, Clone)]
pub struct Game {
    pub state: GameState,
    pub input: InputController,
    clock: FrameClock,
    /// Events from the most recent frame
    events: Vec<GameEvent>,
}

impl Game {
    /// The config must already be validated
    pub fn new(config: GameConfig, seed: u64) -> Self {
        log::info!("New game with seed {}", seed);
        Self {
            state: GameState::new(config, seed),
            input: InputController::new(),
            clock: FrameClock::new(),
            events: Vec::new(),
        }
    }

    /// Run one frame at timestamp `now_ms`
    ///
    /// The control flags are copied before stepping so input written
    /// during the frame applies to the next one.
    pub fn frame(&mut self, now_ms: f64) {
        let dt = self.clock.delta(now_ms);
        let controls = self.input.snapshot();
        sim::advance(&mut self.state, controls, dt);
        self.events = self.state.drain_events();
    }

    /// Start a fresh session, keeping the config and RNG stream
    pub fn restart(&mut self) {
        self.state.restart();
        self.input.clear();
        self.clock.reset();
        self.events.clear();
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }
}
