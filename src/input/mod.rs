//! Operator input: key surface, shared snapshot, and command derivation

pub mod keys;
pub mod state_machine;

pub use keys::{ControlKey, InputSource, KeySnapshot};
pub use state_machine::{CommandPoller, PollOutcome, SpeedFactor};
