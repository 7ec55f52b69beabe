use glam::Vec2;

use crate::capability::{MotionProvider, MoveResult};

/// How far below a surface the feet may start and still land on it.
const LAND_TOLERANCE: f32 = 0.1;

/// A horizontal one-way floor in y-down world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorSpan {
    pub left: f32,
    pub right: f32,
    /// Surface height. Larger values are lower on screen.
    pub y: f32,
}

impl FloorSpan {
    pub fn new(left: f32, right: f32, y: f32) -> Self {
        Self { left, right, y }
    }

    fn covers(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }
}

/// Minimal motion provider over a set of one-way floors.
///
/// Tracks the character's feet position. Bodies only collide with a span when
/// travelling downward across its surface, so jumps pass through from below.
#[derive(Debug, Clone)]
pub struct SpanWorld {
    spans: Vec<FloorSpan>,
    spawn: Vec2,
    position: Vec2,
    grounded: bool,
    fall_limit: Option<f32>,
}

impl SpanWorld {
    pub fn new(spawn: Vec2, spans: Vec<FloorSpan>) -> Self {
        let grounded = spans
            .iter()
            .any(|s| s.covers(spawn.x) && (spawn.y - s.y).abs() <= LAND_TOLERANCE);
        Self {
            spans,
            spawn,
            position: spawn,
            grounded,
            fall_limit: None,
        }
    }

    /// Respawn at the spawn point once the feet drop below `y`.
    pub fn with_fall_limit(mut self, y: f32) -> Self {
        self.fall_limit = Some(y);
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Highest span crossed by a downward move from `from` to `to`.
    fn landing_surface(&self, from: Vec2, to: Vec2) -> Option<f32> {
        self.spans
            .iter()
            .filter(|s| s.covers(to.x) && from.y <= s.y + LAND_TOLERANCE && to.y >= s.y)
            .map(|s| s.y)
            .min_by(f32::total_cmp)
    }
}

impl MotionProvider for SpanWorld {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn move_by(&mut self, velocity: Vec2, dt: f32) -> MoveResult {
        let start = self.position;
        let mut resolved = velocity;
        let mut target = start + velocity * dt;

        self.grounded = false;
        if velocity.y >= 0.0
            && let Some(surface) = self.landing_surface(start, target)
        {
            target.y = surface;
            resolved.y = 0.0;
            self.grounded = true;
        }

        if let Some(limit) = self.fall_limit
            && target.y > limit
        {
            tracing::debug!(y = target.y, limit, "Fell out of world, respawning");
            target = self.spawn;
            resolved = Vec2::ZERO;
        }

        self.position = target;
        MoveResult {
            displacement: target - start,
            velocity: resolved,
        }
    }
}
