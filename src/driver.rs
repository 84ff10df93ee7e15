//! Frame driver
//!
//! [`FrameLoop`] asks a [`FrameScheduler`] for one callback per display
//! refresh, runs one [`Game::frame`] in it and asks for the next. The
//! browser scheduler wraps `requestAnimationFrame`; the headless one is
//! fired by hand.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::game::Game;

/// Handle for a scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest(pub i32);

/// Callback receiving the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Source of per-refresh callbacks
pub trait FrameScheduler {
    /// Run `callback` once at the next refresh
    fn request_frame(&self, callback: FrameCallback) -> FrameRequest;

    /// Drop a pending callback; unknown or already-run requests are ignored
    fn cancel_frame(&self, request: FrameRequest);
}

/// Wall-clock delta between consecutive frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous call
    ///
    /// 0 on the first call after creation or [`reset`](Self::reset).
    /// Timestamps going backwards give 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last {
            Some(last) => (now_ms - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last = Some(now_ms);
        dt
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

struct LoopShared<S> {
    scheduler: S,
    game: Rc<RefCell<Game>>,
    observer: RefCell<Box<dyn FnMut(&Game)>>,
    pending: Cell<Option<FrameRequest>>,
    running: Cell<bool>,
}

/// Running frame loop; stops when dropped
pub struct FrameLoop<S: FrameScheduler + 'static> {
    shared: Rc<LoopShared<S>>,
}

impl<S: FrameScheduler + 'static> FrameLoop<S> {
    /// Start requesting frames
    ///
    /// `observer` runs after every frame with the updated game, for HUD
    /// and rendering.
    pub fn start<F>(scheduler: S, game: Rc<RefCell<Game>>, observer: F) -> Self
    where
        F: FnMut(&Game) + 'static,
    {
        let shared = Rc::new(LoopShared {
            scheduler,
            game,
            observer: RefCell::new(Box::new(observer)),
            pending: Cell::new(None),
            running: Cell::new(true),
        });
        schedule(&shared);
        log::info!("Frame loop started");
        Self { shared }
    }

    /// Cancel the pending frame; callbacks already queued become no-ops
    pub fn stop(&self) {
        if !self.shared.running.replace(false) {
            return;
        }
        if let Some(request) = self.shared.pending.take() {
            self.shared.scheduler.cancel_frame(request);
        }
        log::info!("Frame loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.get()
    }

    pub fn game(&self) -> &Rc<RefCell<Game>> {
        &self.shared.game
    }

    pub fn scheduler(&self) -> &S {
        &self.shared.scheduler
    }
}

impl<S: FrameScheduler + 'static> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule<S: FrameScheduler + 'static>(shared: &Rc<LoopShared<S>>) {
    let weak = Rc::downgrade(shared);
    let request = shared.scheduler.request_frame(Box::new(move |now| {
        if let Some(shared) = weak.upgrade() {
            on_frame(&shared, now);
        }
    }));
    shared.pending.set(Some(request));
}

fn on_frame<S: FrameScheduler + 'static>(shared: &Rc<LoopShared<S>>, now: f64) {
    shared.pending.set(None);
    if !shared.running.get() {
        return;
    }

    shared.game.borrow_mut().frame(now);
    {
        let game = shared.game.borrow();
        let mut observer = shared.observer.borrow_mut();
        observer(&game);
    }

    if shared.running.get() {
        schedule(shared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::platform::ManualScheduler;

    fn shared_game() -> Rc<RefCell<Game>> {
        Rc::new(RefCell::new(Game::new(GameConfig::default(), 5)))
    }

    #[test]
    fn test_clock_first_delta_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1234.0), 0.0);
        assert_eq!(clock.delta(1250.0), 16.0);
        assert_eq!(clock.delta(1240.0), 0.0);
        assert_eq!(clock.delta(1260.0), 20.0);

        clock.reset();
        assert_eq!(clock.delta(9999.0), 0.0);
    }

    #[test]
    fn test_one_tick_per_frame() {
        let scheduler = ManualScheduler::new();
        let game = shared_game();
        let observed = Rc::new(Cell::new(0u32));
        let seen = observed.clone();
        let _frames = FrameLoop::start(scheduler.clone(), game.clone(), move |_| {
            seen.set(seen.get() + 1);
        });

        assert_eq!(scheduler.pending_count(), 1);
        for i in 0..5 {
            assert_eq!(scheduler.fire(i as f64 * 16.0), 1);
        }
        assert_eq!(game.borrow().state.time_ticks(), 5);
        assert_eq!(observed.get(), 5);
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_stop_prevents_further_ticks() {
        let scheduler = ManualScheduler::new();
        let game = shared_game();
        let frames = FrameLoop::start(scheduler.clone(), game.clone(), |_| {});

        scheduler.fire(0.0);
        frames.stop();
        assert!(!frames.is_running());
        assert_eq!(scheduler.pending_count(), 0);

        scheduler.fire(16.0);
        assert_eq!(game.borrow().state.time_ticks(), 1);

        // Stopping twice is harmless
        frames.stop();
    }

    #[test]
    fn test_drop_cancels_loop() {
        let scheduler = ManualScheduler::new();
        let game = shared_game();
        {
            let _frames = FrameLoop::start(scheduler.clone(), game.clone(), |_| {});
            scheduler.fire(0.0);
        }
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.fire(16.0), 0);
        assert_eq!(game.borrow().state.time_ticks(), 1);
    }

    #[test]
    fn test_input_written_between_frames() {
        let scheduler = ManualScheduler::new();
        let game = shared_game();
        let positions = Rc::new(RefCell::new(Vec::new()));
        let log = positions.clone();
        let _frames = FrameLoop::start(scheduler.clone(), game.clone(), move |g| {
            log.borrow_mut().push(g.snapshot().player.x());
        });

        scheduler.fire(0.0);
        game.borrow_mut().input.press(crate::Control::Right);
        scheduler.fire(16.0);
        game.borrow_mut().input.release(crate::Control::Right);
        scheduler.fire(32.0);

        assert_eq!(*positions.borrow(), vec![180.0, 186.0, 186.0]);
    }
}
