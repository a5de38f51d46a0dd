//! Keyboard-to-command state machine
//!
//! Evaluated once per iteration of the input polling loop. The protocol is
//! level-driven: every iteration emits exactly one command derived from the
//! instantaneous key state, even when identical to the previous one, so the
//! robot always holds a fresh command. Only the speed factor is latched
//! across iterations.
//!
//! Resolution rules, evaluated fresh every iteration:
//! 1. Quit key overrides all other outputs for the iteration
//! 2. Factor keys 1/2/3, checked in order; value persists when none is held
//! 3. Motion keys, forward before backward; neither held means speed 0
//! 4. Steering keys, right before left; neither held means straight

use crate::input::keys::{ControlKey, InputSource};
use crate::protocol::{DriveCommand, ANGLE_LEFT, ANGLE_RIGHT, ANGLE_STRAIGHT};

/// Latched speed multiplier selected with the 1/2/3 keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedFactor {
    /// Factor 1.0 ("1")
    #[default]
    Normal,
    /// Factor 1.5 ("2")
    Fast,
    /// Factor 2.0 ("3")
    Turbo,
}

impl SpeedFactor {
    /// Multiplier applied to the base speed magnitude
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Normal => 1.0,
            Self::Fast => 1.5,
            Self::Turbo => 2.0,
        }
    }
}

/// Result of one polling iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Send this command to the robot
    Command(DriveCommand),
    /// Quit key held; no further commands required
    Quit,
}

/// Derives drive commands from the instantaneous key state.
///
/// Holds the only piece of state that survives between iterations: the
/// latched speed factor.
pub struct CommandPoller {
    base_speed: i32,
    factor: SpeedFactor,
}

impl CommandPoller {
    /// Create a poller with the configured base speed magnitude
    pub fn new(base_speed: i32) -> Self {
        Self {
            base_speed,
            factor: SpeedFactor::default(),
        }
    }

    /// Currently latched speed factor
    pub fn factor(&self) -> SpeedFactor {
        self.factor
    }

    /// Evaluate one polling iteration against the injected input source
    pub fn poll<I: InputSource>(&mut self, input: &I) -> PollOutcome {
        if input.pressed(ControlKey::Q) {
            return PollOutcome::Quit;
        }

        if input.pressed(ControlKey::Key1) {
            self.factor = SpeedFactor::Normal;
        } else if input.pressed(ControlKey::Key2) {
            self.factor = SpeedFactor::Fast;
        } else if input.pressed(ControlKey::Key3) {
            self.factor = SpeedFactor::Turbo;
        }

        // Forward is negative per the robot's magnitude convention
        let magnitude = (self.factor.multiplier() * self.base_speed as f32) as i32;
        let speed = if input.pressed(ControlKey::W) {
            -magnitude
        } else if input.pressed(ControlKey::S) {
            magnitude
        } else {
            0
        };

        let angle = if input.pressed(ControlKey::D) {
            ANGLE_RIGHT
        } else if input.pressed(ControlKey::A) {
            ANGLE_LEFT
        } else {
            ANGLE_STRAIGHT
        };

        PollOutcome::Command(DriveCommand { speed, angle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test double for the input source
    struct HeldKeys(Vec<ControlKey>);

    impl InputSource for HeldKeys {
        fn pressed(&self, key: ControlKey) -> bool {
            self.0.contains(&key)
        }
    }

    fn poll(poller: &mut CommandPoller, held: &[ControlKey]) -> PollOutcome {
        poller.poll(&HeldKeys(held.to_vec()))
    }

    fn command(outcome: PollOutcome) -> DriveCommand {
        match outcome {
            PollOutcome::Command(cmd) => cmd,
            PollOutcome::Quit => panic!("expected a command, got quit"),
        }
    }

    #[test]
    fn test_no_keys_emits_neutral_command() {
        let mut poller = CommandPoller::new(30);
        assert_eq!(command(poll(&mut poller, &[])), DriveCommand::STOP);
    }

    #[test]
    fn test_forward_and_backward() {
        let mut poller = CommandPoller::new(30);
        assert_eq!(command(poll(&mut poller, &[ControlKey::W])).speed, -30);
        assert_eq!(command(poll(&mut poller, &[ControlKey::S])).speed, 30);
    }

    #[test]
    fn test_forward_wins_over_backward() {
        let mut poller = CommandPoller::new(30);
        let both = command(poll(&mut poller, &[ControlKey::W, ControlKey::S]));
        let forward_only = command(poll(&mut poller, &[ControlKey::W]));
        assert_eq!(both, forward_only);
    }

    #[test]
    fn test_steering_priority() {
        let mut poller = CommandPoller::new(30);
        assert_eq!(command(poll(&mut poller, &[ControlKey::D])).angle, ANGLE_RIGHT);
        assert_eq!(command(poll(&mut poller, &[ControlKey::A])).angle, ANGLE_LEFT);
        assert_eq!(
            command(poll(&mut poller, &[ControlKey::D, ControlKey::A])).angle,
            ANGLE_RIGHT
        );
        assert_eq!(command(poll(&mut poller, &[])).angle, ANGLE_STRAIGHT);
    }

    #[test]
    fn test_factor_latches_across_iterations() {
        let mut poller = CommandPoller::new(30);
        poll(&mut poller, &[ControlKey::Key3]);
        assert_eq!(poller.factor(), SpeedFactor::Turbo);

        // Factor key released, no other factor key held
        let cmd = command(poll(&mut poller, &[ControlKey::W]));
        assert_eq!(cmd.speed, -60);
        assert_eq!(poller.factor(), SpeedFactor::Turbo);

        // Explicitly back to normal
        let cmd = command(poll(&mut poller, &[ControlKey::Key1, ControlKey::W]));
        assert_eq!(cmd.speed, -30);
    }

    #[test]
    fn test_factor_key_priority_in_order() {
        let mut poller = CommandPoller::new(30);
        poll(
            &mut poller,
            &[ControlKey::Key1, ControlKey::Key2, ControlKey::Key3],
        );
        assert_eq!(poller.factor(), SpeedFactor::Normal);
    }

    #[test]
    fn test_forward_right_with_fast_factor() {
        let mut poller = CommandPoller::new(30);
        let cmd = command(poll(
            &mut poller,
            &[ControlKey::W, ControlKey::D, ControlKey::Key2],
        ));
        assert_eq!(
            cmd,
            DriveCommand {
                speed: -45,
                angle: ANGLE_RIGHT
            }
        );
    }

    #[test]
    fn test_quit_overrides_motion_keys() {
        let mut poller = CommandPoller::new(30);
        let outcome = poll(
            &mut poller,
            &[ControlKey::Q, ControlKey::W, ControlKey::D],
        );
        assert_eq!(outcome, PollOutcome::Quit);
    }
}
