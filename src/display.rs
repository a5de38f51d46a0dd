//! Video window: display sink and keyboard sampling
//!
//! Wraps a `minifb` window. The window opens immediately in a placeholder
//! state ("waiting for stream") and is recreated at the stream's native size
//! when the first frame arrives. Every pump also samples the control keys
//! into the shared [`KeySnapshot`], which is the only keyboard surface the
//! rest of the program sees.
//!
//! The window is owned by the display loop and released on drop, on both
//! the normal quit path and abnormal termination.

use crate::error::{Error, Result};
use crate::input::keys::{ControlKey, KeySnapshot};
use minifb::{Key, Window, WindowOptions};

/// Window size before the first frame announces the stream dimensions
const PLACEHOLDER_WIDTH: usize = 640;
const PLACEHOLDER_HEIGHT: usize = 480;

/// Cap on window pump rate; also paces the display loop when no frames arrive
const TARGET_FPS: usize = 60;

fn to_minifb(key: ControlKey) -> Key {
    match key {
        ControlKey::W => Key::W,
        ControlKey::A => Key::A,
        ControlKey::S => Key::S,
        ControlKey::D => Key::D,
        ControlKey::Key1 => Key::Key1,
        ControlKey::Key2 => Key::Key2,
        ControlKey::Key3 => Key::Key3,
        ControlKey::P => Key::P,
        ControlKey::Q => Key::Q,
    }
}

/// Tracks the stream's announced source so the window caption follows it.
///
/// The source can change at runtime, e.g. after the downlink reconnects to
/// a different camera, so the caption must not latch the first value.
#[derive(Debug, Default)]
pub struct SourceTracker {
    current: Option<String>,
}

impl SourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `source` differs from the last one seen
    pub fn changed(&mut self, source: &str) -> bool {
        if self.current.as_deref() == Some(source) {
            return false;
        }
        self.current = Some(source.to_string());
        true
    }
}

/// Display sink backed by a `minifb` window
pub struct VideoWindow {
    window: Window,
    keys: KeySnapshot,
    title: String,
    size: (usize, usize),
}

impl VideoWindow {
    /// Open the window in its placeholder state
    pub fn open(title: &str, keys: KeySnapshot) -> Result<Self> {
        let mut window = Window::new(
            &format!("{} (waiting for stream)", title),
            PLACEHOLDER_WIDTH,
            PLACEHOLDER_HEIGHT,
            WindowOptions::default(),
        )
        .map_err(|e| Error::Display(e.to_string()))?;
        window.set_target_fps(TARGET_FPS);

        Ok(Self {
            window,
            keys,
            title: title.to_string(),
            size: (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT),
        })
    }

    /// Has the operator closed the window?
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Show the frame source in the title once the stream identifies itself
    pub fn set_caption(&mut self, source: &str) {
        self.window.set_title(&format!("{} [{}]", self.title, source));
    }

    /// Blit one frame, recreating the window if the stream size changed
    pub fn show(&mut self, argb: &[u32], width: usize, height: usize) -> Result<()> {
        if (width, height) != self.size {
            log::info!("Stream size is {}x{}, resizing window", width, height);
            let mut window = Window::new(&self.title, width, height, WindowOptions::default())
                .map_err(|e| Error::Display(e.to_string()))?;
            window.set_target_fps(TARGET_FPS);
            self.window = window;
            self.size = (width, height);
        }

        self.window
            .update_with_buffer(argb, width, height)
            .map_err(|e| Error::Display(e.to_string()))?;
        self.sample_keys();
        Ok(())
    }

    /// Pump the window without a new frame.
    ///
    /// Keeps key sampling and close detection alive while the stream is
    /// idle; the target fps setting paces the call so the display loop
    /// never busy-spins.
    pub fn pump(&mut self) {
        self.window.update();
        self.sample_keys();
    }

    fn sample_keys(&mut self) {
        self.keys.store(
            ControlKey::ALL
                .iter()
                .copied()
                .filter(|&k| self.window.is_key_down(to_minifb(k))),
        );
    }
}
