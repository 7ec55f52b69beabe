use glam::Vec2;

use alpheratz_core::{ColliderToggle, DeferredColliders, MotionProvider, MoveResult, TimerQueue};

use crate::input::{InputSample, InputSource};
use crate::invincibility::SequenceStep;
use crate::player::Player;
use crate::state::PlayerState;

/// Summary of one fixed-timestep frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub input: InputSample,
    pub state: PlayerState,
    pub moved: MoveResult,
    /// Hurt-sequence steps that ran after the physics step.
    pub steps_run: usize,
}

/// Composition root for a single character.
///
/// Owns the player, its injected collaborators, and the update queue that
/// runs hurt-sequence steps. Each frame runs the physics step first, then the
/// due timer steps, then flushes collider toggles at the safe point.
#[derive(Debug)]
pub struct FrameDriver<M, I, C = DeferredColliders> {
    player: Player,
    motion: M,
    input: I,
    colliders: C,
    timers: TimerQueue<SequenceStep>,
    tick: u64,
}

impl<M, I, C> FrameDriver<M, I, C>
where
    M: MotionProvider,
    I: InputSource,
    C: ColliderToggle,
{
    pub fn new(player: Player, motion: M, input: I, colliders: C) -> Self {
        Self {
            player,
            motion,
            input,
            colliders,
            timers: TimerQueue::new(),
            tick: 0,
        }
    }

    pub fn tick(&mut self, dt: f32) -> TickReport {
        let input = self.input.sample();
        let moved = self.player.physics_tick(&input, dt, &mut self.motion);

        self.timers.advance(dt);
        let player = &mut self.player;
        let colliders = &mut self.colliders;
        let steps_run = self
            .timers
            .run_due(|timers, step| player.run_step(step, timers, &mut *colliders));

        self.colliders.flush();

        let report = TickReport {
            tick: self.tick,
            input,
            state: self.player.state(),
            moved,
            steps_run,
        };
        self.tick += 1;
        report
    }

    /// Run `n` frames of `dt` seconds.
    pub fn run(&mut self, n: usize, dt: f32) -> Vec<TickReport> {
        (0..n).map(|_| self.tick(dt)).collect()
    }

    /// Damage event from a hazard.
    pub fn hurt(&mut self, impact: Vec2) -> bool {
        self.player
            .hurt(impact, &mut self.timers, &mut self.colliders)
    }

    pub fn hurt_default(&mut self) -> bool {
        self.player
            .hurt_default(&mut self.timers, &mut self.colliders)
    }

    /// The stomp collider reported a defeated hazard.
    pub fn hazard_defeated(&mut self) {
        self.player.on_hazard_defeated();
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut M {
        &mut self.motion
    }

    pub fn colliders(&self) -> &C {
        &self.colliders
    }

    pub fn timers(&self) -> &TimerQueue<SequenceStep> {
        &self.timers
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::input::{FixedInput, ScriptedInput};
    use alpheratz_core::test_helpers::StaticMotion;
    use alpheratz_core::{ColliderKind, FloorSpan, SpanWorld};

    const DT: f32 = 1.0 / 60.0;

    fn flat_driver<I: InputSource>(input: I) -> FrameDriver<SpanWorld, I> {
        let world = SpanWorld::new(Vec2::ZERO, vec![FloorSpan::new(-1000.0, 1000.0, 0.0)]);
        FrameDriver::new(
            Player::with_seed(PlayerConfig::default(), 3),
            world,
            input,
            DeferredColliders::new(),
        )
    }

    #[test]
    fn idle_player_stays_standing_on_floor() {
        let mut d = flat_driver(FixedInput(InputSample::idle()));
        let reports = d.run(30, DT);
        assert!(reports.iter().all(|r| r.state == PlayerState::Standing));
        assert_eq!(d.motion().position(), Vec2::ZERO);
        assert_eq!(d.ticks(), 30);
    }

    #[test]
    fn walking_moves_right() {
        let mut d = flat_driver(FixedInput(InputSample::walk(1.0)));
        d.run(60, DT);
        assert_eq!(d.player().state(), PlayerState::Walking);
        assert!(d.motion().position().x > 0.0);
    }

    #[test]
    fn jump_arc_returns_to_standing() {
        let script = ScriptedInput::new()
            .at(0, InputSample::jump())
            .at(20, InputSample::idle());
        let mut d = flat_driver(script);
        let reports = d.run(120, DT);

        let states: Vec<PlayerState> = reports.iter().map(|r| r.state).collect();
        assert_eq!(states[0], PlayerState::Jumping);
        assert!(states.contains(&PlayerState::Falling));
        assert_eq!(*states.last().unwrap(), PlayerState::Standing);
        assert_eq!(d.motion().position().y, 0.0);
    }

    #[test]
    fn walking_off_a_ledge_falls() {
        let world = SpanWorld::new(Vec2::ZERO, vec![FloorSpan::new(-10.0, 10.0, 0.0)]);
        let mut d = FrameDriver::new(
            Player::with_seed(PlayerConfig::default(), 3),
            world,
            FixedInput(InputSample::walk(1.0)),
            DeferredColliders::new(),
        );
        let reports = d.run(60, DT);
        assert!(reports.iter().any(|r| r.state == PlayerState::Falling));
    }

    #[test]
    fn hurt_enters_hurting_after_first_frame() {
        let mut d = flat_driver(FixedInput(InputSample::idle()));
        d.run(2, DT);
        assert!(d.hurt_default());

        let first = d.tick(DT);
        assert_eq!(first.steps_run, 1, "Delayed hurting entry fires this frame");
        assert_eq!(d.player().state(), PlayerState::Hurting);
        assert!(!d.colliders().is_enabled(ColliderKind::Stomp));
    }

    #[test]
    fn collider_toggles_wait_for_end_of_frame() {
        let mut d = flat_driver(FixedInput(InputSample::idle()));
        d.hurt_default();
        assert!(
            d.colliders().is_enabled(ColliderKind::Stomp),
            "Disabled only at the safe point"
        );
        d.tick(DT);
        assert!(!d.colliders().is_enabled(ColliderKind::Stomp));
    }

    #[test]
    fn grounded_flag_is_read_before_moving() {
        let mut d = FrameDriver::new(
            Player::with_seed(PlayerConfig::default(), 3),
            StaticMotion::airborne(),
            FixedInput(InputSample::jump()),
            DeferredColliders::new(),
        );
        d.tick(DT);
        assert_eq!(d.player().state(), PlayerState::Standing, "Cannot jump in the air");
        d.motion_mut().grounded = true;
        d.tick(DT);
        assert_eq!(d.player().state(), PlayerState::Jumping);
    }
}
