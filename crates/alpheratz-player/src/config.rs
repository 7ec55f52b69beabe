use std::fmt;
use std::ops::RangeInclusive;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Horizontal acceleration while input is held (units/s^2).
pub const ACCELERATION: f32 = 280.0;
/// Horizontal speed cap while driven by input.
pub const MAX_SPEED: f32 = 72.0;
/// Ground friction decay rate.
pub const FRICTION: f32 = 10.0;
/// Airborne horizontal decay rate when no input is held.
pub const AIR_RESISTANCE: f32 = 0.8;
/// Initial upward jump speed.
pub const JUMP_FORCE: f32 = 270.0;
/// World gravity (units/s^2, y-down).
pub const GRAVITY: f32 = 980.0;
pub const GRAVITY_SCALE: f32 = 1.0;
/// Terminal downward speed.
pub const MAX_FALL_SPEED: f32 = 200.0;
/// Seconds of invincibility after taking a hit.
pub const INVINCIBILITY_DURATION: f32 = 2.0;

/// Tunable movement constants. Fixed once the player is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub acceleration: f32,
    pub max_speed: f32,
    pub friction: f32,
    pub air_resistance: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub gravity_scale: f32,
    pub max_fall_speed: f32,
    pub invincibility_duration: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION,
            max_speed: MAX_SPEED,
            friction: FRICTION,
            air_resistance: AIR_RESISTANCE,
            jump_force: JUMP_FORCE,
            gravity: GRAVITY,
            gravity_scale: GRAVITY_SCALE,
            max_fall_speed: MAX_FALL_SPEED,
            invincibility_duration: INVINCIBILITY_DURATION,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("motion.acceleration", self.acceleration, 100.0..=500.0)?;
        check("motion.max_speed", self.max_speed, 10.0..=100.0)?;
        check("motion.friction", self.friction, 1.0..=20.0)?;
        check("motion.air_resistance", self.air_resistance, 0.0..=5.0)?;
        check("motion.jump_force", self.jump_force, 0.0..=500.0)?;
        check("motion.gravity", self.gravity, 1.0..=10_000.0)?;
        check("motion.gravity_scale", self.gravity_scale, 0.1..=2.0)?;
        check("motion.max_fall_speed", self.max_fall_speed, 100.0..=200.0)?;
        check(
            "motion.invincibility_duration",
            self.invincibility_duration,
            0.1..=10.0,
        )
    }
}

/// Delays of the hit-reaction sequence, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HurtTiming {
    /// Wait before forcing the hurting state, lets the knockback register first.
    pub hurt_state_delay: f32,
    /// Interval between opacity flips while invincible.
    pub blink_period: f32,
    /// Opacity of the dim blink phase.
    pub blink_opacity: f32,
    /// Wait after invincibility ends before toggling the body collider.
    pub collider_settle_delay: f32,
    /// Gap between disabling and re-enabling the body collider.
    pub collider_toggle_gap: f32,
    /// Wait after the body collider returns before the stomp collider is re-armed.
    pub stomp_rearm_delay: f32,
    /// Knockback used when a hazard does not supply its own.
    pub default_impact: Vec2,
    /// Emote played when hit.
    pub emote: u8,
}

impl Default for HurtTiming {
    fn default() -> Self {
        Self {
            hurt_state_delay: 0.01,
            blink_period: 0.05,
            blink_opacity: 0.5,
            collider_settle_delay: 0.01,
            collider_toggle_gap: 0.01,
            stomp_rearm_delay: 0.02,
            default_impact: Vec2::new(100.0, 200.0),
            emote: 7,
        }
    }
}

impl HurtTiming {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("hurt.hurt_state_delay", self.hurt_state_delay, 0.0..=1.0)?;
        check("hurt.blink_period", self.blink_period, 0.01..=1.0)?;
        check("hurt.blink_opacity", self.blink_opacity, 0.0..=1.0)?;
        check(
            "hurt.collider_settle_delay",
            self.collider_settle_delay,
            0.0..=1.0,
        )?;
        check("hurt.collider_toggle_gap", self.collider_toggle_gap, 0.0..=1.0)?;
        check("hurt.stomp_rearm_delay", self.stomp_rearm_delay, 0.0..=1.0)
    }
}

/// Reaction to defeating a hazard with the stomp collider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StompConfig {
    /// Probability of playing `emote` on a successful stomp.
    pub emote_chance: f32,
    pub emote: u8,
}

impl Default for StompConfig {
    fn default() -> Self {
        Self {
            emote_chance: 0.1,
            emote: 3,
        }
    }
}

/// Full player configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub motion: MotionConfig,
    pub hurt: HurtTiming,
    pub stomp: StompConfig,
}

impl PlayerConfig {
    /// Parse and validate a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `ALPHERATZ_PLAYER_CONFIG` or `config/player.toml`.
    pub fn load() -> Self {
        let path = std::env::var("ALPHERATZ_PLAYER_CONFIG")
            .unwrap_or_else(|_| "config/player.toml".to_string());
        Self::load_from(&path)
    }

    /// Falls back to defaults if the file is missing, unparseable, or out of range.
    pub fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to load {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        self.hurt.validate()?;
        check("stomp.emote_chance", self.stomp.emote_chance, 0.0..=1.0)
    }
}

/// Construction-time configuration problems.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(m) => write!(f, "invalid player config: {m}"),
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} = {value} is outside [{min}, {max}]"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn check(field: &'static str, value: f32, range: RangeInclusive<f32>) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
