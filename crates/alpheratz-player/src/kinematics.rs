use glam::Vec2;

use crate::config::MotionConfig;
use crate::input::InputSample;
use crate::state::PlayerState;

/// Integrate one tick of gravity, input drive, and drag.
///
/// Pure: reads the current state but never changes it.
pub fn integrate(
    state: PlayerState,
    input: &InputSample,
    config: &MotionConfig,
    velocity: Vec2,
    dt: f32,
) -> Vec2 {
    let mut v = velocity;

    v.y = (v.y + config.gravity * config.gravity_scale * dt).min(config.max_fall_speed);

    if state.accepts_drive() {
        v.x += input.axis * config.acceleration * dt;
        v.x = v.x.clamp(-config.max_speed, config.max_speed);
    }

    if state.is_airborne() && input.axis == 0.0 {
        v.x = decay(v.x, config.air_resistance * dt);
    }

    if matches!(state, PlayerState::Ducking | PlayerState::Standing) {
        v.x = decay(v.x, config.friction * dt);
    }

    v
}

/// `lerp(value, 0, weight)` with the weight capped so a long frame never
/// pushes the value past zero.
fn decay(value: f32, weight: f32) -> f32 {
    value * (1.0 - weight.clamp(0.0, 1.0))
}
