//! Control-key surface and shared key snapshot
//!
//! The entire control surface is nine physical keys: W/A/S/D for motion and
//! steering, 1/2/3 for the speed factor, P for capture, Q for quit. The
//! window thread samples the physical key state into a [`KeySnapshot`] each
//! pump; the polling loops read it through the [`InputSource`] trait so the
//! state machine can run against a test double as well.

use parking_lot::Mutex;
use std::sync::Arc;

/// The nine keys the console reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ControlKey {
    /// "w": forward
    W,
    /// "a": steer left
    A,
    /// "s": backward
    S,
    /// "d": steer right
    D,
    /// "1": speed factor 1.0
    Key1,
    /// "2": speed factor 1.5
    Key2,
    /// "3": speed factor 2.0
    Key3,
    /// "p": capture current frame
    P,
    /// "q": quit
    Q,
}

impl ControlKey {
    /// Every key on the control surface
    pub const ALL: [ControlKey; 9] = [
        ControlKey::W,
        ControlKey::A,
        ControlKey::S,
        ControlKey::D,
        ControlKey::Key1,
        ControlKey::Key2,
        ControlKey::Key3,
        ControlKey::P,
        ControlKey::Q,
    ];

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Instantaneous key state provider.
///
/// Implemented by the live window snapshot and by test doubles; the state
/// machine never talks to a keyboard driver directly.
pub trait InputSource {
    /// Is the key physically held right now?
    fn pressed(&self, key: ControlKey) -> bool;
}

/// Shared snapshot of the currently held control keys.
///
/// Written by the window pump, read by the input poller. A reader may
/// observe a snapshot that is stale by one pump; correctness only needs
/// eventual propagation, not per-key atomicity.
#[derive(Clone, Default)]
pub struct KeySnapshot {
    held: Arc<Mutex<u16>>,
}

impl KeySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with the set of currently held keys
    pub fn store<I: IntoIterator<Item = ControlKey>>(&self, held: I) {
        let mut bits = 0u16;
        for key in held {
            bits |= key.bit();
        }
        *self.held.lock() = bits;
    }
}

impl InputSource for KeySnapshot {
    fn pressed(&self, key: ControlKey) -> bool {
        *self.held.lock() & key.bit() != 0
    }
}
