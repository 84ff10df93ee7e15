//! Input mapping onto the three logical controls
//!
//! Touch contacts and discrete buttons both write the same
//! [`ControlState`]; the frame driver copies it before every step.

use serde::{Deserialize, Serialize};

use crate::sim::ControlState;

/// One of the three logical controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Left,
    Fire,
    Right,
}

/// Measured horizontal extent of the touch region
///
/// Split into three equal zones, left to right: move-left, fire, move-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPad {
    /// Left edge, in the same coordinate space as the contacts
    pub left: f32,
    pub width: f32,
}

impl ControlPad {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    /// Zone under a contact at `x`, `None` outside the region
    pub fn zone_at(&self, x: f32) -> Option<Control> {
        let rel = x - self.left;
        if !rel.is_finite() || rel < 0.0 || rel > self.width {
            return None;
        }
        let third = self.width / 3.0;
        if rel < third {
            Some(Control::Left)
        } else if rel < 2.0 * third {
            Some(Control::Fire)
        } else {
            Some(Control::Right)
        }
    }
}

/// Owns the control flags written between frames
#[derive(Debug, Clone, Default)]
pub struct InputController {
    state: ControlState,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the flags with the zones under the current touch contacts
    ///
    /// Every flag is cleared first, so lifting all fingers stops all controls.
    pub fn apply_touches<I>(&mut self, pad: &ControlPad, contacts: I)
    where
        I: IntoIterator<Item = f32>,
    {
        self.clear();
        for x in contacts {
            if let Some(control) = pad.zone_at(x) {
                self.set(control, true);
            }
        }
    }

    pub fn press(&mut self, control: Control) {
        self.set(control, true);
    }

    pub fn release(&mut self, control: Control) {
        self.set(control, false);
    }

    pub fn clear(&mut self) {
        self.state = ControlState::default();
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        match control {
            Control::Left => self.state.left,
            Control::Fire => self.state.fire,
            Control::Right => self.state.right,
        }
    }

    /// Copy of the flags for one simulation step
    pub fn snapshot(&self) -> ControlState {
        self.state
    }

    fn set(&mut self, control: Control, held: bool) {
        match control {
            Control::Left => self.state.left = held,
            Control::Fire => self.state.fire = held,
            Control::Right => self.state.right = held,
        }
    }
}
