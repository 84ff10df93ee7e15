//! `requestAnimationFrame` scheduler

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::driver::{FrameCallback, FrameRequest, FrameScheduler};

/// Frame callbacks from the browser's display refresh
pub struct AnimationFrames {
    window: web_sys::Window,
}

impl AnimationFrames {
    /// `None` outside a window context (e.g. in a worker)
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequest {
        // A cancelled callback is never called and its closure leaks; the
        // loop only cancels on stop so this is at most one per loop.
        let closure = Closure::once_into_js(move |time: f64| callback(time));
        match self
            .window
            .request_animation_frame(closure.unchecked_ref())
        {
            Ok(id) => FrameRequest(id),
            Err(err) => {
                log::error!("requestAnimationFrame failed: {:?}", err);
                FrameRequest(0)
            }
        }
    }

    fn cancel_frame(&self, request: FrameRequest) {
        if let Err(err) = self.window.cancel_animation_frame(request.0) {
            log::warn!("cancelAnimationFrame failed: {:?}", err);
        }
    }
}
