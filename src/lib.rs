//! DrishtiTeleop - Operator console for a remote-controlled robot car
//!
//! This library provides the core components of a bidirectional teleop
//! link: a keyboard-driven command uplink and a live video frame downlink,
//! plus on-demand dataset capture of received frames.

pub mod app;
pub mod capture;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod protocol;
pub mod transport;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
