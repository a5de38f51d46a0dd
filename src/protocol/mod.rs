//! Wire protocol for the teleop link
//!
//! Two message kinds travel over two independent TCP connections:
//! - Drive commands (uplink, operator to robot): MessagePack map
//! - Video frames (downlink, robot to operator): raw BGR pixel messages
//!
//! Both directions use the same framing: a 4-byte big-endian length prefix
//! followed by the message payload.

pub mod command;
pub mod frame;

pub use command::{DriveCommand, ANGLE_LEFT, ANGLE_RIGHT, ANGLE_STRAIGHT};
pub use frame::{FrameMessage, MAX_FRAME_BYTES};
