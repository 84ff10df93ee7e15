//! Axis-aligned hitboxes and the overlap test
//!
//! Every simulated entity (player, projectile, enemy) is a [`Hitbox`]:
//! - `pos`: top-left corner, y grows downward
//! - `size`: width and height, both strictly positive
//! - `speed`: distance moved per step along the entity's direction of travel

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with a scalar speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Top-left corner
    pub pos: Vec2,
    /// Width (x) and height (y)
    pub size: Vec2,
    /// Raw speed as configured; read through [`Hitbox::speed`]
    #[serde(default)]
    pub speed: f32,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        debug_assert!(w > 0.0 && h > 0.0, "hitbox dimensions must be positive");
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            speed: 0.0,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.size.y
    }

    /// Right edge (x + w)
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Bottom edge (y + h)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Horizontal center
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Effective speed: negative, NaN or infinite speeds count as zero
    #[inline]
    pub fn speed(&self) -> f32 {
        if self.speed.is_finite() && self.speed > 0.0 {
            self.speed
        } else {
            0.0
        }
    }

    /// Clamp horizontally into `[min_x, max_x - w]`
    pub fn clamp_x(&mut self, min_x: f32, max_x: f32) {
        let upper = (max_x - self.size.x).max(min_x);
        self.pos.x = self.pos.x.clamp(min_x, upper);
    }
}

/// Check whether two hitboxes intersect with non-zero area
///
/// Touching edges do not count. Symmetric in its arguments.
#[inline]
pub fn overlaps(a: &Hitbox, b: &Hitbox) -> bool {
    a.x() < b.right() && a.right() > b.x() && a.y() < b.bottom() && a.bottom() > b.y()
}
