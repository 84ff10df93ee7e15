//! Platform frame schedulers
//!
//! - `headless`: callbacks queued until the host fires them (native runner, tests)
//! - `web`: `requestAnimationFrame` (wasm32 only)

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::ManualScheduler;
#[cfg(target_arch = "wasm32")]
pub use web::AnimationFrames;
