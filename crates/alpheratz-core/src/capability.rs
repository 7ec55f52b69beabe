use glam::Vec2;

/// Opaque 2D movement capability supplied by the host physics engine.
///
/// The controller never inspects world geometry itself; it asks whether the
/// body is standing on something and hands over a velocity to be resolved.
pub trait MotionProvider {
    /// Whether the body touched a walkable surface during the last `move_by`.
    fn is_grounded(&self) -> bool;

    /// Move the body by `velocity * dt`, sliding against the world.
    ///
    /// Updates the grounded status reported for the next tick.
    fn move_by(&mut self, velocity: Vec2, dt: f32) -> MoveResult;
}

/// Outcome of a single `MotionProvider::move_by` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Displacement actually applied after collisions.
    pub displacement: Vec2,
    /// Velocity after sliding (e.g. downward speed zeroed on landing).
    pub velocity: Vec2,
}

/// Collision shapes owned by the character that the hit-reaction sequence toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    /// The character's own hurtbox / body shape.
    Body,
    /// The damage-dealing shape used to stomp hazards.
    Stomp,
}

/// Enables or disables a named collision shape.
///
/// Implementations apply the change at the next safe point of the tick, not
/// in the middle of collision processing.
pub trait ColliderToggle {
    fn set_enabled(&mut self, collider: ColliderKind, enabled: bool);

    /// Apply queued changes. Called by the frame driver once per tick.
    fn flush(&mut self) {}
}

/// Handle returned by a [`Scheduler`] for cancelling a pending callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Cooperative delayed-callback capability running on the single update queue.
///
/// Callbacks are represented by an event value `E` that the owner dispatches
/// when the timer comes due, so scheduled work never aliases the owner's state.
pub trait Scheduler<E> {
    /// Fire `event` once after `delay` seconds.
    fn after(&mut self, delay: f32, event: E) -> TimerId;

    /// Fire `event` every `period` seconds until cancelled.
    fn every(&mut self, period: f32, event: E) -> TimerId;

    /// Cancel a pending timer. Returns `false` if it already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;
}
