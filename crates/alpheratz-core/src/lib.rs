pub mod capability;
pub mod colliders;
pub mod timer;
pub mod world;

pub use capability::{ColliderKind, ColliderToggle, MotionProvider, MoveResult, Scheduler, TimerId};
pub use colliders::{ColliderStates, DeferredColliders};
pub use timer::TimerQueue;
pub use world::{FloorSpan, SpanWorld};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use crate::capability::{ColliderKind, ColliderToggle, MotionProvider, MoveResult};

    /// Motion provider with a caller-controlled grounded flag and no geometry.
    ///
    /// Every `move_by` is recorded and the velocity is returned unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct StaticMotion {
        pub grounded: bool,
        pub moves: Vec<(Vec2, f32)>,
    }

    impl StaticMotion {
        pub fn grounded() -> Self {
            Self {
                grounded: true,
                moves: Vec::new(),
            }
        }

        pub fn airborne() -> Self {
            Self::default()
        }

        pub fn last_velocity(&self) -> Option<Vec2> {
            self.moves.last().map(|(v, _)| *v)
        }
    }

    impl MotionProvider for StaticMotion {
        fn is_grounded(&self) -> bool {
            self.grounded
        }

        fn move_by(&mut self, velocity: Vec2, dt: f32) -> MoveResult {
            self.moves.push((velocity, dt));
            MoveResult {
                displacement: velocity * dt,
                velocity,
            }
        }
    }

    /// Collider toggle that applies immediately and remembers every call.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingColliders {
        pub calls: Vec<(ColliderKind, bool)>,
        pub flushes: usize,
    }

    impl RecordingColliders {
        /// Last requested state for `collider`, or enabled if never touched.
        pub fn is_enabled(&self, collider: ColliderKind) -> bool {
            self.calls
                .iter()
                .rev()
                .find(|(c, _)| *c == collider)
                .is_none_or(|(_, enabled)| *enabled)
        }
    }

    impl ColliderToggle for RecordingColliders {
        fn set_enabled(&mut self, collider: ColliderKind, enabled: bool) {
            self.calls.push((collider, enabled));
        }

        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    /// Shared log that listener closures can push into.
    #[derive(Debug)]
    pub struct EventLog<T> {
        entries: Rc<RefCell<Vec<T>>>,
    }

    impl<T> Default for EventLog<T> {
        fn default() -> Self {
            Self {
                entries: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl<T: Clone + 'static> EventLog<T> {
        pub fn new() -> Self {
            Self::default()
        }

        /// A closure that clones each observed value into the log.
        pub fn recorder(&self) -> impl FnMut(&T) + 'static {
            let entries = Rc::clone(&self.entries);
            move |event: &T| entries.borrow_mut().push(event.clone())
        }

        pub fn entries(&self) -> Vec<T> {
            self.entries.borrow().clone()
        }

        pub fn clear(&self) {
            self.entries.borrow_mut().clear();
        }
    }
}
