use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use alpheratz_core::{ColliderToggle, MotionProvider, MoveResult, Scheduler};

use crate::config::PlayerConfig;
use crate::events::{Listeners, PlayerEvent, PlayerListener};
use crate::input::InputSample;
use crate::invincibility::{InvincibilitySequence, SequenceStep, StepOutcome};
use crate::kinematics::integrate;
use crate::state::{PlayerState, advance};

/// Mutable per-frame motion data owned by the player.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionState {
    pub velocity: Vec2,
    pub state: PlayerState,
    pub invincible: bool,
    pub facing_left: bool,
}

/// Read-only view for animation and debug overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    pub velocity: Vec2,
    pub facing_left: bool,
    pub invincible: bool,
    pub opacity: f32,
}

impl std::fmt::Display for PlayerSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} v=({:.1}, {:.1}) facing={}",
            self.state,
            self.velocity.x,
            self.velocity.y,
            if self.facing_left { "left" } else { "right" }
        )?;
        if self.invincible {
            write!(f, " invincible alpha={:.2}", self.opacity)?;
        }
        Ok(())
    }
}

/// The playable character: state machine, kinematics, and hit reaction.
#[derive(Debug)]
pub struct Player {
    config: PlayerConfig,
    motion: MotionState,
    opacity: f32,
    sequence: Option<InvincibilitySequence>,
    /// Superseded reactions still restoring their colliders.
    draining: Vec<InvincibilitySequence>,
    next_generation: u64,
    listeners: Listeners,
    rng: StdRng,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic cosmetic rolls, for tests and replays.
    pub fn with_seed(config: PlayerConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PlayerConfig, rng: StdRng) -> Self {
        Self {
            config,
            motion: MotionState::default(),
            opacity: 1.0,
            sequence: None,
            draining: Vec::new(),
            next_generation: 0,
            listeners: Listeners::default(),
            rng,
        }
    }

    pub fn subscribe(&mut self, listener: impl PlayerListener + 'static) {
        self.listeners.subscribe(listener);
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn state(&self) -> PlayerState {
        self.motion.state
    }

    pub fn velocity(&self) -> Vec2 {
        self.motion.velocity
    }

    /// Override the current velocity, e.g. for a spawn impulse.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.motion.velocity = velocity;
    }

    pub fn facing_left(&self) -> bool {
        self.motion.facing_left
    }

    pub fn is_invincible(&self) -> bool {
        self.motion.invincible
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Whether a hit reaction is running, including its collider settle tail.
    pub fn is_reacting(&self) -> bool {
        self.sequence.is_some() || !self.draining.is_empty()
    }

    /// Whether the blink loop of the current hit reaction is scheduled.
    pub fn is_blinking(&self) -> bool {
        self.sequence
            .as_ref()
            .is_some_and(InvincibilitySequence::is_blinking)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.motion.state,
            velocity: self.motion.velocity,
            facing_left: self.motion.facing_left,
            invincible: self.motion.invincible,
            opacity: self.opacity,
        }
    }

    /// Integrate, advance the state machine, then resolve motion against the world.
    pub fn physics_tick(
        &mut self,
        input: &InputSample,
        dt: f32,
        motion: &mut impl MotionProvider,
    ) -> MoveResult {
        let on_floor = motion.is_grounded();
        let current = self.motion.state;

        let mut velocity = integrate(current, input, &self.config.motion, self.motion.velocity, dt);
        let next = advance(
            current,
            input,
            &mut velocity,
            on_floor,
            self.config.motion.jump_force,
        );
        self.set_state(next);

        if velocity.x > 0.0 {
            self.motion.facing_left = false;
        } else if velocity.x < 0.0 {
            self.motion.facing_left = true;
        }

        let result = motion.move_by(velocity, dt);
        self.motion.velocity = result.velocity;
        result
    }

    /// Take a hit. Knockback pushes away from the facing direction.
    ///
    /// Returns `false` without side effects while invincible. A hit during the
    /// collider settle tail of an earlier reaction is accepted; that tail keeps
    /// running but no longer re-arms the stomp collider.
    pub fn hurt(
        &mut self,
        impact: Vec2,
        scheduler: &mut impl Scheduler<SequenceStep>,
        colliders: &mut impl ColliderToggle,
    ) -> bool {
        if self.motion.invincible {
            tracing::debug!("Hit ignored while invincible");
            return false;
        }

        if let Some(mut previous) = self.sequence.take() {
            previous.supersede();
            self.draining.push(previous);
        }

        let dir = if self.motion.facing_left { 1.0 } else { -1.0 };
        let knockback = Vec2::new(dir * impact.x, -impact.y);
        self.motion.velocity = knockback;
        self.motion.invincible = true;
        let generation = self.next_generation;
        self.next_generation += 1;
        self.sequence = Some(InvincibilitySequence::start(
            generation,
            &self.config.hurt,
            self.config.motion.invincibility_duration,
            scheduler,
            colliders,
        ));

        tracing::debug!(?knockback, "Player hurt");
        self.listeners.emit(PlayerEvent::Hurt { knockback });
        self.listeners.emit(PlayerEvent::Emote(self.config.hurt.emote));
        true
    }

    /// `hurt` with the configured default impact.
    pub fn hurt_default(
        &mut self,
        scheduler: &mut impl Scheduler<SequenceStep>,
        colliders: &mut impl ColliderToggle,
    ) -> bool {
        let impact = self.config.hurt.default_impact;
        self.hurt(impact, scheduler, colliders)
    }

    /// Dispatch a due hurt-sequence step to the reaction that scheduled it.
    pub fn run_step(
        &mut self,
        tagged: SequenceStep,
        scheduler: &mut impl Scheduler<SequenceStep>,
        colliders: &mut impl ColliderToggle,
    ) {
        if let Some(idx) = self
            .draining
            .iter()
            .position(|s| s.generation() == tagged.generation)
        {
            let outcome =
                self.draining[idx].step(tagged.step, &self.config.hurt, scheduler, colliders);
            if outcome == StepOutcome::Complete {
                self.draining.swap_remove(idx);
            }
            return;
        }

        let Some(sequence) = self
            .sequence
            .as_mut()
            .filter(|s| s.generation() == tagged.generation)
        else {
            tracing::trace!(?tagged, "Hurt step with no matching sequence");
            return;
        };

        match sequence.step(tagged.step, &self.config.hurt, scheduler, colliders) {
            StepOutcome::Idle => {},
            StepOutcome::EnterHurting => self.set_state(PlayerState::Hurting),
            StepOutcome::SetOpacity(alpha) => self.opacity = alpha,
            StepOutcome::Ended => {
                self.motion.invincible = false;
                self.opacity = 1.0;
                self.listeners.emit(PlayerEvent::InvincibilityEnded);
            },
            StepOutcome::Complete => self.sequence = None,
        }
    }

    /// The stomp collider defeated a hazard: bounce, and sometimes emote.
    pub fn on_hazard_defeated(&mut self) {
        self.motion.velocity.y = -self.config.motion.jump_force;
        self.listeners.emit(PlayerEvent::HazardDefeated);
        if self.rng.random::<f32>() < self.config.stomp.emote_chance {
            self.listeners.emit(PlayerEvent::Emote(self.config.stomp.emote));
        }
    }

    fn set_state(&mut self, next: PlayerState) {
        let from = self.motion.state;
        if from == next {
            return;
        }
        self.motion.state = next;
        tracing::debug!(%from, to = %next, "Player state changed");
        self.listeners
            .emit(PlayerEvent::StateChanged { from, to: next });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpheratz_core::ColliderKind;
    use alpheratz_core::TimerQueue;
    use alpheratz_core::test_helpers::{EventLog, RecordingColliders, StaticMotion};

    use crate::invincibility::HurtStep;

    const DT: f32 = 1.0 / 60.0;

    fn player() -> Player {
        Player::with_seed(PlayerConfig::default(), 7)
    }

    #[test]
    fn starts_standing_visible_and_vulnerable() {
        let p = player();
        assert_eq!(p.state(), PlayerState::Standing);
        assert_eq!(p.opacity(), 1.0);
        assert!(!p.is_invincible());
        assert!(!p.facing_left());
    }

    #[test]
    fn walk_input_on_floor_walks_and_moves() {
        let mut p = player();
        let mut world = StaticMotion::grounded();
        p.physics_tick(&InputSample::walk(1.0), DT, &mut world);
        assert_eq!(p.state(), PlayerState::Walking);
        let moved = world.last_velocity().unwrap();
        assert!(moved.x > 0.0);
    }

    #[test]
    fn facing_follows_horizontal_velocity() {
        let mut p = player();
        let mut world = StaticMotion::grounded();
        p.physics_tick(&InputSample::walk(-1.0), DT, &mut world);
        assert!(p.facing_left());

        // Friction alone never flips facing.
        for _ in 0..5 {
            p.physics_tick(&InputSample::idle(), DT, &mut world);
        }
        assert!(p.facing_left());

        for _ in 0..30 {
            p.physics_tick(&InputSample::walk(1.0), DT, &mut world);
        }
        assert!(!p.facing_left());
    }

    #[test]
    fn jump_sets_upward_velocity() {
        let mut p = player();
        let mut world = StaticMotion::grounded();
        p.physics_tick(&InputSample::jump(), DT, &mut world);
        assert_eq!(p.state(), PlayerState::Jumping);
        assert_eq!(p.velocity().y, -p.config().motion.jump_force);
    }

    #[test]
    fn short_hop_cuts_jump() {
        let mut p = player();
        let mut world = StaticMotion::grounded();
        p.physics_tick(&InputSample::jump(), DT, &mut world);
        world.grounded = false;
        p.physics_tick(&InputSample::idle(), DT, &mut world);
        assert_eq!(p.state(), PlayerState::Falling);
        assert_eq!(p.velocity().y, -p.config().motion.jump_force * 0.5);
    }

    #[test]
    fn state_changes_are_broadcast() {
        let log = EventLog::new();
        let mut p = player();
        p.subscribe(log.recorder());
        let mut world = StaticMotion::grounded();
        p.physics_tick(&InputSample::walk(1.0), DT, &mut world);
        p.physics_tick(&InputSample::walk(1.0), DT, &mut world);
        p.physics_tick(&InputSample::idle(), DT, &mut world);

        assert_eq!(
            log.entries(),
            vec![
                PlayerEvent::StateChanged {
                    from: PlayerState::Standing,
                    to: PlayerState::Walking
                },
                PlayerEvent::StateChanged {
                    from: PlayerState::Walking,
                    to: PlayerState::Standing
                },
            ]
        );
    }

    #[test]
    fn hurt_applies_knockback_away_from_facing() {
        let mut p = player();
        let mut timers = TimerQueue::new();
        let mut colliders = RecordingColliders::default();

        assert!(p.hurt(Vec2::new(100.0, 200.0), &mut timers, &mut colliders));
        assert_eq!(p.velocity(), Vec2::new(-100.0, -200.0));
        assert!(p.is_invincible());
        assert!(!colliders.is_enabled(ColliderKind::Stomp));
        assert_eq!(p.state(), PlayerState::Standing, "Hurting is entered later");
    }

    #[test]
    fn hurt_facing_left_knocks_right() {
        let mut p = player();
        let mut world = StaticMotion::grounded();
        p.physics_tick(&InputSample::walk(-1.0), DT, &mut world);
        let mut timers = TimerQueue::new();
        let mut colliders = RecordingColliders::default();
        p.hurt(Vec2::new(100.0, 200.0), &mut timers, &mut colliders);
        assert_eq!(p.velocity().x, 100.0);
    }

    #[test]
    fn second_hurt_while_invincible_is_noop() {
        let log = EventLog::new();
        let mut p = player();
        let mut timers = TimerQueue::new();
        let mut colliders = RecordingColliders::default();
        p.hurt_default(&mut timers, &mut colliders);
        p.subscribe(log.recorder());

        p.set_velocity(Vec2::new(5.0, 5.0));
        let timers_before = timers.len();
        let calls_before = colliders.calls.len();

        assert!(!p.hurt(Vec2::new(300.0, 300.0), &mut timers, &mut colliders));
        assert_eq!(p.velocity(), Vec2::new(5.0, 5.0));
        assert_eq!(timers.len(), timers_before);
        assert_eq!(colliders.calls.len(), calls_before);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn hurt_emits_hurt_and_emote() {
        let log = EventLog::new();
        let mut p = player();
        p.subscribe(log.recorder());
        let mut timers = TimerQueue::new();
        let mut colliders = RecordingColliders::default();
        p.hurt(Vec2::new(10.0, 20.0), &mut timers, &mut colliders);
        assert_eq!(
            log.entries(),
            vec![
                PlayerEvent::Hurt {
                    knockback: Vec2::new(-10.0, -20.0)
                },
                PlayerEvent::Emote(7),
            ]
        );
    }

    fn run_timers(
        p: &mut Player,
        timers: &mut TimerQueue<SequenceStep>,
        colliders: &mut RecordingColliders,
        dt: f32,
    ) {
        timers.advance(dt);
        timers.run_due(|timers, step| p.run_step(step, timers, &mut *colliders));
    }

    #[test]
    fn hit_after_window_during_settle_is_accepted() {
        let mut p = player();
        let mut timers = TimerQueue::new();
        let mut colliders = RecordingColliders::default();
        p.hurt_default(&mut timers, &mut colliders);

        run_timers(&mut p, &mut timers, &mut colliders, 2.0);
        run_timers(&mut p, &mut timers, &mut colliders, 0.01);
        run_timers(&mut p, &mut timers, &mut colliders, 0.01);
        assert_eq!(colliders.calls.last(), Some(&(ColliderKind::Body, true)));
        assert!(!p.is_invincible());
        assert!(p.is_reacting(), "Stomp not yet re-armed");

        assert!(p.hurt_default(&mut timers, &mut colliders));
        assert!(p.is_invincible());

        // The first reaction finishes its tail but leaves stomp disabled.
        run_timers(&mut p, &mut timers, &mut colliders, 0.02);
        assert!(!colliders.is_enabled(ColliderKind::Stomp));
        assert!(p.is_invincible());
        assert!(p.is_blinking());

        run_timers(&mut p, &mut timers, &mut colliders, 2.0);
        for _ in 0..3 {
            run_timers(&mut p, &mut timers, &mut colliders, 0.05);
        }
        assert!(!p.is_reacting());
        assert!(colliders.is_enabled(ColliderKind::Stomp));
        assert!(timers.is_empty());
    }

    #[test]
    fn stray_step_without_sequence_is_ignored() {
        let mut p = player();
        let mut timers = TimerQueue::new();
        let mut colliders = RecordingColliders::default();
        p.run_step(
            SequenceStep {
                generation: 0,
                step: HurtStep::EnterHurting,
            },
            &mut timers,
            &mut colliders,
        );
        assert_eq!(p.state(), PlayerState::Standing);
        assert!(colliders.calls.is_empty());
    }

    #[test]
    fn stomp_bounces() {
        let log = EventLog::new();
        let mut p = player();
        p.subscribe(log.recorder());
        p.on_hazard_defeated();
        assert_eq!(p.velocity().y, -p.config().motion.jump_force);
        assert_eq!(log.entries()[0], PlayerEvent::HazardDefeated);
    }

    #[test]
    fn stomp_emote_respects_chance() {
        let mut always = PlayerConfig::default();
        always.stomp.emote_chance = 1.0;
        let log = EventLog::new();
        let mut p = Player::with_seed(always, 1);
        p.subscribe(log.recorder());
        p.on_hazard_defeated();
        assert!(log.entries().contains(&PlayerEvent::Emote(3)));

        let mut never = PlayerConfig::default();
        never.stomp.emote_chance = 0.0;
        let log = EventLog::new();
        let mut p = Player::with_seed(never, 1);
        p.subscribe(log.recorder());
        for _ in 0..50 {
            p.on_hazard_defeated();
        }
        assert!(!log.entries().contains(&PlayerEvent::Emote(3)));
    }

    #[test]
    fn snapshot_reflects_state() {
        let p = player();
        let snap = p.snapshot();
        assert_eq!(snap.state, PlayerState::Standing);
        assert_eq!(snap.opacity, 1.0);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"Standing\""));
    }

    #[test]
    fn snapshot_display_mentions_invincibility_only_when_set() {
        let mut p = player();
        assert_eq!(p.snapshot().to_string(), "Standing v=(0.0, 0.0) facing=right");

        let mut timers = TimerQueue::new();
        let mut colliders = RecordingColliders::default();
        p.hurt(Vec2::new(100.0, 200.0), &mut timers, &mut colliders);
        assert_eq!(
            p.snapshot().to_string(),
            "Standing v=(-100.0, -200.0) facing=right invincible alpha=1.00"
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fall_speed_cap_holds_across_ticks(
                inputs in proptest::collection::vec(
                    (-1.0f32..=1.0, any::<bool>(), any::<bool>(), any::<bool>()),
                    1..120,
                )
            ) {
                let mut p = player();
                let mut world = StaticMotion::grounded();
                let cap = p.config().motion.max_fall_speed;
                for (axis, jump, duck, grounded) in inputs {
                    world.grounded = grounded;
                    p.physics_tick(&InputSample::new(axis, jump, duck), DT, &mut world);
                    prop_assert!(p.velocity().y <= cap);
                    prop_assert!(PlayerState::ALL.contains(&p.state()));
                    prop_assert_ne!(p.state(), PlayerState::Hurting);
                }
            }
        }
    }
}
