//! Box Shooter - entry points
//!
//! - wasm32: wires the touch pad, keyboard and restart button to a
//!   `requestAnimationFrame` loop and keeps the HUD in sync
//! - native: headless runner playing seeded sessions with an autopilot

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use box_shooter::platform::AnimationFrames;
    use box_shooter::{Control, ControlPad, FrameLoop, Game, GameConfig, HighScores};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, MouseEvent, TouchEvent};

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
        static FRAMES: RefCell<Option<FrameLoop<AnimationFrames>>> = const { RefCell::new(None) };
        static HIGH_SCORES: RefCell<HighScores> = RefCell::new(HighScores::new());
    }

    /// HUD elements, any of which may be missing from the page
    struct Hud {
        score: Option<Element>,
        lives: Option<Element>,
        game_over: Option<Element>,
        final_score: Option<Element>,
        recorded: bool,
    }

    impl Hud {
        fn find(document: &Document) -> Self {
            Self {
                score: document.get_element_by_id("score"),
                lives: document.get_element_by_id("lives"),
                game_over: document.get_element_by_id("game-over"),
                final_score: document.get_element_by_id("final-score"),
                recorded: false,
            }
        }

        fn update(&mut self, game: &Game) {
            let status = game.status();
            if let Some(el) = &self.score {
                el.set_text_content(Some(&status.score.to_string()));
            }
            if let Some(el) = &self.lives {
                el.set_text_content(Some(&status.lives.to_string()));
            }

            if status.is_over && !self.recorded {
                self.recorded = true;
                HIGH_SCORES.with(|hs| {
                    hs.borrow_mut().record(&game.state, js_sys::Date::now());
                });
                if let Some(el) = &self.final_score {
                    el.set_text_content(Some(&status.score.to_string()));
                }
                if let Some(el) = &self.game_over {
                    let _ = el.set_attribute("class", "");
                }
            } else if !status.is_over && self.recorded {
                self.recorded = false;
                if let Some(el) = &self.game_over {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Box Shooter starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(GameConfig::default(), seed)));

        setup_touch_pad(&document, game.clone())?;
        setup_keyboard(&window, game.clone())?;
        setup_restart_button(&document, game.clone())?;

        let scheduler = AnimationFrames::new().ok_or("no window")?;
        let mut hud = Hud::find(&document);
        let frames = FrameLoop::start(scheduler, game.clone(), move |g| hud.update(g));

        GAME.with(|slot| *slot.borrow_mut() = Some(game));
        FRAMES.with(|slot| *slot.borrow_mut() = Some(frames));

        log::info!("Box Shooter running!");
        Ok(())
    }

    /// Viewport x of every current contact
    fn contact_xs(event: &TouchEvent) -> Vec<f32> {
        let touches = event.touches();
        (0..touches.length())
            .filter_map(|i| touches.get(i))
            .map(|touch| touch.client_x() as f32)
            .collect()
    }

    fn setup_touch_pad(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let Some(pad_el) = document.get_element_by_id("touch-pad") else {
            log::warn!("No #touch-pad element, touch controls disabled");
            return Ok(());
        };

        let target = pad_el.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            // Measured per event; the layout can change between touches
            let rect = target.get_bounding_client_rect();
            let pad = ControlPad::new(rect.left() as f32, rect.width() as f32);
            game.borrow_mut()
                .input
                .apply_touches(&pad, contact_xs(&event));
        });
        for kind in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            pad_el.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        }
        closure.forget();
        Ok(())
    }

    fn key_control(key: &str) -> Option<Control> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Control::Left),
            "ArrowRight" | "d" | "D" => Some(Control::Right),
            " " | "ArrowUp" | "w" | "W" => Some(Control::Fire),
            _ => None,
        }
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(control) = key_control(&event.key()) {
                    event.prevent_default();
                    g.input.press(control);
                } else if matches!(event.key().as_str(), "r" | "R" | "Enter") && g.is_over() {
                    g.restart();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(control) = key_control(&event.key()) {
                    game.borrow_mut().input.release(control);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Current world as JSON, for a JS renderer
    pub fn snapshot_json() -> Option<String> {
        GAME.with(|slot| {
            let slot = slot.borrow();
            let game = slot.as_ref()?.try_borrow().ok()?;
            serde_json::to_string(&game.snapshot()).ok()
        })
    }

    pub fn high_scores_json() -> Option<String> {
        HIGH_SCORES.with(|hs| hs.borrow().to_json().ok())
    }

    pub fn stop() {
        FRAMES.with(|slot| {
            if let Some(frames) = slot.borrow_mut().take() {
                frames.stop();
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn snapshot_json() -> Option<String> {
    wasm_game::snapshot_json()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn high_scores_json() -> Option<String> {
    wasm_game::high_scores_json()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_game() {
    wasm_game::stop();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use anyhow::{Context, Result, ensure};
    use box_shooter::platform::ManualScheduler;
    use box_shooter::sim::GameEvent;
    use box_shooter::{Control, FrameLoop, Game, GameConfig, HighScores};
    use clap::Parser;

    #[derive(Parser, Debug)]
    #[command(name = "box-shooter", about = "Play seeded box shooter sessions headlessly")]
    pub struct Cli {
        /// Seed of the first session; later sessions use seed + n
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Number of sessions to play
        #[arg(long, default_value_t = 5)]
        sessions: u32,

        /// Frame limit per session
        #[arg(long, default_value_t = 36_000)]
        max_frames: u32,

        /// Simulated display refresh rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// JSON file overriding the default game config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the leaderboard as JSON
        #[arg(long)]
        json: bool,
    }

    #[derive(Debug, Default)]
    struct Tally {
        shots: u32,
        kills: u32,
        spawned: u32,
    }

    #[derive(Debug)]
    struct Outcome {
        seed: u64,
        score: u32,
        lives: u32,
        frames: u32,
        finished: bool,
        tally: Tally,
    }

    /// Chase the lowest enemy and fire when lined up under it
    fn steer(game: &mut Game) {
        let player = *game.state.player();
        let target = game
            .state
            .enemies()
            .iter()
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))
            .copied();

        game.input.clear();
        let Some(target) = target else {
            return;
        };
        let dx = target.center_x() - player.center_x();
        let dead_zone = player.speed() / 2.0;
        if dx < -dead_zone {
            game.input.press(Control::Left);
        } else if dx > dead_zone {
            game.input.press(Control::Right);
        }
        if dx.abs() < target.w() / 2.0 {
            game.input.press(Control::Fire);
        }
    }

    fn play_session(config: GameConfig, seed: u64, cli: &Cli) -> Outcome {
        let game = Rc::new(RefCell::new(Game::new(config, seed)));
        let tally = Rc::new(RefCell::new(Tally::default()));
        let scheduler = ManualScheduler::new();

        let observed = tally.clone();
        let frames = FrameLoop::start(scheduler.clone(), game.clone(), move |g| {
            let mut t = observed.borrow_mut();
            for event in g.events() {
                match event {
                    GameEvent::ProjectileFired => t.shots += 1,
                    GameEvent::EnemySpawned => t.spawned += 1,
                    GameEvent::EnemyDestroyed { .. } => t.kills += 1,
                    GameEvent::LifeLost { remaining } => {
                        log::debug!("Life lost, {} remaining", remaining)
                    }
                    GameEvent::GameOver { .. } => {}
                }
            }
        });

        let frame_ms = 1000.0 / cli.fps;
        let mut frame = 0;
        while frame < cli.max_frames && !game.borrow().is_over() {
            steer(&mut game.borrow_mut());
            scheduler.fire(f64::from(frame) * frame_ms);
            frame += 1;
        }
        frames.stop();

        let g = game.borrow();
        Outcome {
            seed,
            score: g.status().score,
            lives: g.status().lives,
            frames: frame,
            finished: g.is_over(),
            tally: tally.take(),
        }
    }

    pub fn run(cli: Cli) -> Result<()> {
        ensure!(cli.fps.is_finite() && cli.fps > 0.0, "--fps must be positive");

        let config = match &cli.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => GameConfig::default(),
        };

        let mut high_scores = HighScores::new();
        for n in 0..cli.sessions {
            let seed = cli.seed.wrapping_add(u64::from(n));
            let outcome = play_session(config.clone(), seed, &cli);
            let rank = if outcome.finished {
                high_scores.add_score(box_shooter::highscores::HighScoreEntry {
                    score: outcome.score,
                    ticks: u64::from(outcome.frames),
                    seed: outcome.seed,
                    timestamp: f64::from(n),
                })
            } else {
                None
            };

            println!(
                "session {:>3}  seed {:<20}  score {:>6}  lives {}  frames {:>6}  shots {:>5}  kills {:>5}  spawned {:>5}{}{}",
                n + 1,
                outcome.seed,
                outcome.score,
                outcome.lives,
                outcome.frames,
                outcome.tally.shots,
                outcome.tally.kills,
                outcome.tally.spawned,
                if outcome.finished { "" } else { "  (frame limit)" },
                rank.map(|r| format!("  #{r}")).unwrap_or_default(),
            );
        }

        if cli.json {
            println!("{}", high_scores.to_json()?);
        } else {
            println!("\nHigh scores:");
            for (i, entry) in high_scores.entries().iter().enumerate() {
                println!("{:>3}. {:>6}  (seed {})", i + 1, entry.score, entry.seed);
            }
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Box Shooter (headless) starting...");
    headless::run(headless::Cli::parse())
}
