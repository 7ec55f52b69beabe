use crate::capability::{ColliderKind, ColliderToggle};

/// Applied enable state of the character's collision shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderStates {
    pub body: bool,
    pub stomp: bool,
}

impl Default for ColliderStates {
    fn default() -> Self {
        Self {
            body: true,
            stomp: true,
        }
    }
}

impl ColliderStates {
    pub fn get(&self, collider: ColliderKind) -> bool {
        match collider {
            ColliderKind::Body => self.body,
            ColliderKind::Stomp => self.stomp,
        }
    }

    fn set(&mut self, collider: ColliderKind, enabled: bool) {
        match collider {
            ColliderKind::Body => self.body = enabled,
            ColliderKind::Stomp => self.stomp = enabled,
        }
    }
}

/// Collider toggles that only take effect when the tick reaches its safe point.
///
/// Requests are queued in arrival order and replayed by [`flush`](ColliderToggle::flush),
/// so an off-then-on pair inside one tick is still observed by the collision
/// system as two distinct changes.
#[derive(Debug, Clone, Default)]
pub struct DeferredColliders {
    applied: ColliderStates,
    pending: Vec<(ColliderKind, bool)>,
    /// Every applied change, oldest first.
    history: Vec<(ColliderKind, bool)>,
}

impl DeferredColliders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, collider: ColliderKind) -> bool {
        self.applied.get(collider)
    }

    pub fn states(&self) -> ColliderStates {
        self.applied
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn history(&self) -> &[(ColliderKind, bool)] {
        &self.history
    }
}

impl ColliderToggle for DeferredColliders {
    fn set_enabled(&mut self, collider: ColliderKind, enabled: bool) {
        self.pending.push((collider, enabled));
    }

    fn flush(&mut self) {
        for (collider, enabled) in self.pending.drain(..) {
            self.applied.set(collider, enabled);
            self.history.push((collider, enabled));
            tracing::debug!(?collider, enabled, "Collider toggled");
        }
    }
}
