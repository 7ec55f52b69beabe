use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::input::InputSample;

/// Discrete movement state of the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Standing,
    Walking,
    Jumping,
    Falling,
    Ducking,
    Hurting,
}

impl PlayerState {
    pub const ALL: [PlayerState; 6] = [
        PlayerState::Standing,
        PlayerState::Walking,
        PlayerState::Jumping,
        PlayerState::Falling,
        PlayerState::Ducking,
        PlayerState::Hurting,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlayerState::Standing => "Standing",
            PlayerState::Walking => "Walking",
            PlayerState::Jumping => "Jumping",
            PlayerState::Falling => "Falling",
            PlayerState::Ducking => "Ducking",
            PlayerState::Hurting => "Hurting",
        }
    }

    pub fn is_airborne(self) -> bool {
        matches!(self, PlayerState::Jumping | PlayerState::Falling)
    }

    /// States in which input drives horizontal acceleration.
    pub fn accepts_drive(self) -> bool {
        !matches!(self, PlayerState::Hurting | PlayerState::Ducking)
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Advance the state machine by one tick.
///
/// Runs after velocity integration. May overwrite `velocity.y` when entering a
/// jump or cutting one short; never touches `velocity.x`.
pub fn advance(
    state: PlayerState,
    input: &InputSample,
    velocity: &mut Vec2,
    on_floor: bool,
    jump_force: f32,
) -> PlayerState {
    let mut next = match state {
        PlayerState::Standing if on_floor && input.axis != 0.0 => PlayerState::Walking,
        PlayerState::Walking if !on_floor => PlayerState::Falling,
        PlayerState::Walking if input.axis == 0.0 => PlayerState::Standing,
        PlayerState::Jumping if velocity.y > 0.0 => PlayerState::Falling,
        PlayerState::Jumping if !input.jump && velocity.y < -jump_force / 2.0 => {
            // Short hop: releasing jump before the apex halves the climb.
            velocity.y = -jump_force * 0.5;
            PlayerState::Falling
        },
        PlayerState::Falling | PlayerState::Hurting if on_floor => PlayerState::Standing,
        PlayerState::Ducking if !input.duck => PlayerState::Standing,
        held => held,
    };

    // Grounded actions can fire in the same tick as a stand/walk resolution.
    if matches!(next, PlayerState::Standing | PlayerState::Walking) && on_floor {
        if input.jump {
            next = PlayerState::Jumping;
            velocity.y = -jump_force;
        } else if input.duck {
            next = PlayerState::Ducking;
        }
    }

    next
}
