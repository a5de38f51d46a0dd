//! Application orchestration for the teleop console
//!
//! Wires four cooperating loops around two single-slot latest-wins buffers
//! and a shared run flag:
//!
//! ```text
//! window pump ──► KeySnapshot ──► input-poller ──► command slot ──► command-uplink ──► robot
//! robot ──► frame-receiver ──► frame slot ──► display loop (main thread)
//! ```
//!
//! The loops share no other data. The quit key, the window close button and
//! Ctrl-C all land on the same teardown path: the run flag flips once from
//! running to quitting, every loop observes it within one iteration, and
//! there is no drain of in-flight frames or commands.

use crate::capture::CaptureSink;
use crate::config::AppConfig;
use crate::display::{SourceTracker, VideoWindow};
use crate::error::{Error, Result};
use crate::input::keys::{ControlKey, InputSource, KeySnapshot};
use crate::input::state_machine::{CommandPoller, PollOutcome};
use crate::protocol::{DriveCommand, FrameMessage};
use crate::transport::{CommandUplink, FrameDownlink};
use crossbeam_queue::ArrayQueue;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long a downlink read may block before re-checking the run flag
const DOWNLINK_RECV_TIMEOUT: Duration = Duration::from_millis(250);

/// Pause between downlink reconnect attempts
const RECONNECT_BACKOFF: Duration = Duration::from_secs(1);

/// Sleep when the command slot is empty
const UPLINK_IDLE_SLEEP: Duration = Duration::from_millis(5);

const WINDOW_TITLE: &str = "RaspberryPiCar";

/// Lifecycle coordinator: owns the run flag and starts every loop
pub struct TeleopApp {
    config: AppConfig,
    running: Arc<AtomicBool>,
    keys: KeySnapshot,
}

impl TeleopApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(true)),
            keys: KeySnapshot::new(),
        }
    }

    /// Connect both channels, start the loops, and block until quit.
    ///
    /// Connection failure is fatal and reported before any loop starts.
    pub fn run(&mut self) -> Result<()> {
        let uplink = CommandUplink::connect(&self.config.network.command_address)?;
        let downlink = FrameDownlink::connect(&self.config.network.frame_address)?;

        // Ctrl-C joins the quit key and the window close button on the
        // shared teardown path
        let r = Arc::clone(&self.running);
        ctrlc::set_handler(move || {
            info!("Received interrupt, quitting");
            r.store(false, Ordering::Relaxed);
        })
        .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

        let frame_slot: Arc<ArrayQueue<FrameMessage>> = Arc::new(ArrayQueue::new(1));
        let command_slot: Arc<ArrayQueue<DriveCommand>> = Arc::new(ArrayQueue::new(1));

        let receiver = self.spawn_frame_receiver(downlink, Arc::clone(&frame_slot))?;
        let poller = self.spawn_input_poller(Arc::clone(&command_slot))?;
        let sender = self.spawn_command_sender(uplink, Arc::clone(&command_slot))?;

        // The window must live on the main thread
        let result = self.display_loop(frame_slot);

        self.running.store(false, Ordering::Relaxed);
        for (name, handle) in [
            ("frame-receiver", receiver),
            ("input-poller", poller),
            ("command-uplink", sender),
        ] {
            if handle.join().is_err() {
                error!("{} thread panicked", name);
            }
        }

        result
    }

    /// Downlink reads into the latest-frame slot.
    ///
    /// A slow display never backs up this path: force_push evicts the
    /// undisplayed frame and the newest one wins.
    fn spawn_frame_receiver(
        &self,
        downlink: FrameDownlink,
        slot: Arc<ArrayQueue<FrameMessage>>,
    ) -> Result<JoinHandle<()>> {
        let running = Arc::clone(&self.running);
        let addr = self.config.network.frame_address.clone();

        let handle = thread::Builder::new()
            .name("frame-receiver".to_string())
            .spawn(move || {
                run_frame_receiver(
                    downlink,
                    &addr,
                    &slot,
                    &running,
                    DOWNLINK_RECV_TIMEOUT,
                    RECONNECT_BACKOFF,
                );
                debug!("Frame receiver exiting");
            })?;
        Ok(handle)
    }

    /// Free-running poll loop deriving one command per iteration
    fn spawn_input_poller(&self, slot: Arc<ArrayQueue<DriveCommand>>) -> Result<JoinHandle<()>> {
        let running = Arc::clone(&self.running);
        let keys = self.keys.clone();
        let mut poller = CommandPoller::new(self.config.control.base_speed);
        let interval = Duration::from_millis(self.config.control.poll_interval_ms);

        let handle = thread::Builder::new()
            .name("input-poller".to_string())
            .spawn(move || {
                while running.load(Ordering::Relaxed) {
                    match poller.poll(&keys) {
                        PollOutcome::Quit => {
                            info!("Quit key pressed");
                            running.store(false, Ordering::Relaxed);
                            break;
                        }
                        PollOutcome::Command(cmd) => {
                            // Latest command wins; an unsent one is stale
                            let _ = slot.force_push(cmd);
                        }
                    }
                    thread::sleep(interval);
                }
                debug!("Input poller exiting");
            })?;
        Ok(handle)
    }

    /// Drains the command slot onto the uplink, fire-and-forget
    fn spawn_command_sender(
        &self,
        mut uplink: CommandUplink,
        slot: Arc<ArrayQueue<DriveCommand>>,
    ) -> Result<JoinHandle<()>> {
        let running = Arc::clone(&self.running);

        let handle = thread::Builder::new()
            .name("command-uplink".to_string())
            .spawn(move || {
                while running.load(Ordering::Relaxed) {
                    match slot.pop() {
                        Some(cmd) => {
                            if let Err(e) = uplink.send(&cmd) {
                                // Never retried: the next polling tick
                                // produces a fresher command
                                warn!("Command send failed, dropping: {}", e);
                            }
                        }
                        None => thread::sleep(UPLINK_IDLE_SLEEP),
                    }
                }
                debug!("Command sender exiting");
            })?;
        Ok(handle)
    }

    /// Display loop: blit frames, watch the capture key, detect window close
    fn display_loop(&mut self, frame_slot: Arc<ArrayQueue<FrameMessage>>) -> Result<()> {
        let mut window = VideoWindow::open(WINDOW_TITLE, self.keys.clone())?;
        let mut capture = CaptureSink::new(&self.config.capture.output_dir)?;
        let debounce = Duration::from_millis(self.config.capture.debounce_ms);

        let mut last_frame: Option<FrameMessage> = None;
        let mut last_capture: Option<Instant> = None;
        let mut source_tracker = SourceTracker::new();

        while self.running.load(Ordering::Relaxed) {
            if !window.is_open() {
                info!("Window closed, quitting");
                break;
            }

            if let Some(frame) = frame_slot.pop() {
                // Follows source changes too, e.g. a different camera
                // after a downlink reconnect
                if source_tracker.changed(&frame.source) {
                    window.set_caption(&frame.source);
                }
                if let Err(e) = window.show(&frame.to_argb(), frame.width as usize, frame.height as usize)
                {
                    warn!("Display update failed: {}", e);
                }
                last_frame = Some(frame);
            } else {
                window.pump();
            }

            if self.keys.pressed(ControlKey::P) {
                let due = last_capture.map_or(true, |t| t.elapsed() >= debounce);
                if due {
                    match last_frame {
                        Some(ref frame) => {
                            if let Err(e) = capture.save(frame) {
                                error!("{}", e);
                            }
                            last_capture = Some(Instant::now());
                        }
                        None => debug!("Capture requested before any frame arrived"),
                    }
                }
            }
        }

        self.running.store(false, Ordering::Relaxed);
        Ok(())
    }
}

/// Frame receive loop: downlink reads into the latest-frame slot until the
/// run flag clears.
///
/// On disconnect the loop reconnects with a fixed backoff, resuming frame
/// delivery without a process restart. Malformed frames are logged and
/// dropped; the stream keeps flowing.
fn run_frame_receiver(
    mut downlink: FrameDownlink,
    addr: &str,
    slot: &ArrayQueue<FrameMessage>,
    running: &AtomicBool,
    recv_timeout: Duration,
    reconnect_backoff: Duration,
) {
    while running.load(Ordering::Relaxed) {
        match downlink.recv_timeout(recv_timeout) {
            Ok(Some(frame)) => {
                let _ = slot.force_push(frame);
            }
            Ok(None) => {
                // No frame within the timeout; re-check the run flag
            }
            Err(e @ Error::FrameDecode(_)) | Err(e @ Error::FrameTooLarge(_)) => {
                warn!("Dropping bad frame: {}", e);
            }
            Err(e) => {
                warn!("Frame downlink lost ({}), reconnecting to {}", e, addr);
                while running.load(Ordering::Relaxed) {
                    thread::sleep(reconnect_backoff);
                    match FrameDownlink::connect(addr) {
                        Ok(d) => {
                            downlink = d;
                            info!("Frame downlink reconnected");
                            break;
                        }
                        Err(e) => debug!("Reconnect attempt failed: {}", e),
                    }
                }
            }
        }
    }
}
