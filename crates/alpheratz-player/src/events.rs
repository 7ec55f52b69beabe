use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::state::PlayerState;

/// Notifications raised by the player, delivered synchronously within the tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    StateChanged { from: PlayerState, to: PlayerState },
    /// A hit was accepted and knockback applied.
    Hurt { knockback: Vec2 },
    InvincibilityEnded,
    /// The stomp collider defeated a hazard.
    HazardDefeated,
    /// Cosmetic emote request. Fire-and-forget.
    Emote(u8),
}

/// Observer of [`PlayerEvent`]s.
pub trait PlayerListener {
    fn on_event(&mut self, event: &PlayerEvent);
}

impl<F: FnMut(&PlayerEvent)> PlayerListener for F {
    fn on_event(&mut self, event: &PlayerEvent) {
        self(event)
    }
}

/// Listener registry owned by a player.
#[derive(Default)]
pub struct Listeners {
    listeners: Vec<Box<dyn PlayerListener>>,
}

impl Listeners {
    pub fn subscribe(&mut self, listener: impl PlayerListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: PlayerEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
