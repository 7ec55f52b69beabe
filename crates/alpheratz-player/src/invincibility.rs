use alpheratz_core::{ColliderKind, ColliderToggle, Scheduler, TimerId};

use crate::config::HurtTiming;

/// Timed steps of the hit-reaction sequence, dispatched by the timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HurtStep {
    /// Force the hurting state once knockback has registered.
    EnterHurting,
    /// Flip opacity between dim and full.
    Blink,
    /// Invincibility window elapsed.
    Finish,
    BodyOff,
    BodyOn,
    RearmStomp,
}

/// Timer payload: a step tagged with the hit reaction that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceStep {
    pub generation: u64,
    pub step: HurtStep,
}

/// What the owner must apply after a step runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Idle,
    EnterHurting,
    SetOpacity(f32),
    /// Invincibility is over: clear the flag and restore full opacity.
    Ended,
    /// Colliders are restored and the sequence can be dropped.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Invincible,
    /// Window over, colliders being cycled back on.
    Settling,
    Done,
}

/// One running hit reaction.
///
/// Starting the sequence disables the stomp collider and arms three timers:
/// the delayed hurt-state entry, the repeating blink, and the finish. The
/// finish step cancels the blink (the only cancellation in the sequence) and
/// chains the collider restore as one-shot steps.
///
/// A sequence replaced by a newer hit keeps running its collider restore but
/// leaves the stomp collider to the newer sequence.
#[derive(Debug, Clone)]
pub struct InvincibilitySequence {
    generation: u64,
    blink: Option<TimerId>,
    dimmed: bool,
    phase: Phase,
    superseded: bool,
}

impl InvincibilitySequence {
    pub fn start(
        generation: u64,
        timing: &HurtTiming,
        duration: f32,
        scheduler: &mut impl Scheduler<SequenceStep>,
        colliders: &mut impl ColliderToggle,
    ) -> Self {
        let tag = |step| SequenceStep { generation, step };
        scheduler.after(timing.hurt_state_delay, tag(HurtStep::EnterHurting));
        colliders.set_enabled(ColliderKind::Stomp, false);
        let blink = scheduler.every(timing.blink_period, tag(HurtStep::Blink));
        scheduler.after(duration, tag(HurtStep::Finish));
        tracing::debug!(generation, duration, "Invincibility started");

        Self {
            generation,
            blink: Some(blink),
            dimmed: false,
            phase: Phase::Invincible,
            superseded: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A newer hit took over; the stomp collider is no longer ours to re-arm.
    pub fn supersede(&mut self) {
        self.superseded = true;
    }

    /// Whether the invincibility window is still open.
    pub fn is_invincible(&self) -> bool {
        self.phase == Phase::Invincible
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Whether the blink loop is still scheduled.
    pub fn is_blinking(&self) -> bool {
        self.blink.is_some()
    }

    pub fn step(
        &mut self,
        step: HurtStep,
        timing: &HurtTiming,
        scheduler: &mut impl Scheduler<SequenceStep>,
        colliders: &mut impl ColliderToggle,
    ) -> StepOutcome {
        let generation = self.generation;
        let tag = |step| SequenceStep { generation, step };
        match (step, self.phase) {
            (HurtStep::EnterHurting, Phase::Invincible) => StepOutcome::EnterHurting,
            (HurtStep::Blink, Phase::Invincible) => {
                self.dimmed = !self.dimmed;
                StepOutcome::SetOpacity(if self.dimmed {
                    timing.blink_opacity
                } else {
                    1.0
                })
            },
            (HurtStep::Finish, Phase::Invincible) => {
                if let Some(blink) = self.blink.take() {
                    scheduler.cancel(blink);
                }
                self.dimmed = false;
                self.phase = Phase::Settling;
                scheduler.after(timing.collider_settle_delay, tag(HurtStep::BodyOff));
                tracing::debug!("Invincibility ended");
                StepOutcome::Ended
            },
            (HurtStep::BodyOff, Phase::Settling) => {
                colliders.set_enabled(ColliderKind::Body, false);
                scheduler.after(timing.collider_toggle_gap, tag(HurtStep::BodyOn));
                StepOutcome::Idle
            },
            (HurtStep::BodyOn, Phase::Settling) => {
                colliders.set_enabled(ColliderKind::Body, true);
                scheduler.after(timing.stomp_rearm_delay, tag(HurtStep::RearmStomp));
                StepOutcome::Idle
            },
            (HurtStep::RearmStomp, Phase::Settling) => {
                if self.superseded {
                    tracing::trace!(generation, "Stomp left to newer hit");
                } else {
                    colliders.set_enabled(ColliderKind::Stomp, true);
                }
                self.phase = Phase::Done;
                StepOutcome::Complete
            },
            (step, phase) => {
                tracing::trace!(?step, ?phase, "Out-of-phase hurt step ignored");
                StepOutcome::Idle
            },
        }
    }
}
