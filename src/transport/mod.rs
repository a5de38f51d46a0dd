//! TCP transport for the teleop link
//!
//! Two logically independent connections to fixed, pre-configured robot
//! addresses:
//! - [`CommandUplink`]: push-only command channel, fire-and-forget
//! - [`FrameDownlink`]: pull-style frame stream with timeout-bounded reads
//!
//! Both use length-prefixed framing (4-byte big-endian length, then the
//! payload). Connection failure at startup is fatal; once running, uplink
//! send failures drop the command (the next polling tick produces a fresher
//! one) and downlink failures surface to the caller for reconnection.

pub mod downlink;
pub mod uplink;

pub use downlink::FrameDownlink;
pub use uplink::CommandUplink;
