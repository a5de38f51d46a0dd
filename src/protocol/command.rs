//! Drive command codec
//!
//! The uplink payload is a MessagePack map with exactly two keys, `speed`
//! and `angle`. Both ends agree on this format out of band; there is no
//! version field and no schema negotiation. The robot drops messages it
//! cannot decode.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Steering angle: straight ahead
pub const ANGLE_STRAIGHT: u16 = 0;
/// Steering angle: left turn
pub const ANGLE_LEFT: u16 = 45;
/// Steering angle: right turn, encoded near the wrap-around of the
/// 0-359 range rather than as a negative value
pub const ANGLE_RIGHT: u16 = 315;

/// One motion command for the robot.
///
/// `speed` is the latched factor times the base magnitude; forward is
/// negative per the robot's magnitude convention, backward positive,
/// zero is neutral. `angle` is one of the three steering constants.
/// The two axes are independent and combinable (forward-left is valid).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveCommand {
    pub speed: i32,
    pub angle: u16,
}

impl DriveCommand {
    /// Neutral command: no motion, wheels straight
    pub const STOP: Self = Self {
        speed: 0,
        angle: ANGLE_STRAIGHT,
    };

    /// Serialize to a MessagePack map with named keys
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Exact inverse of [`encode`](Self::encode)
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}
