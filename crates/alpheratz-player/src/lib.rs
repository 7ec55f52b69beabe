pub mod config;
pub mod driver;
pub mod events;
pub mod input;
pub mod invincibility;
pub mod kinematics;
pub mod player;
pub mod state;

pub use config::{ConfigError, HurtTiming, MotionConfig, PlayerConfig, StompConfig};
pub use driver::{FrameDriver, TickReport};
pub use events::{PlayerEvent, PlayerListener};
pub use input::{FixedInput, InputSample, InputSource, ScriptedInput};
pub use invincibility::{HurtStep, InvincibilitySequence, SequenceStep};
pub use player::{MotionState, Player, PlayerSnapshot};
pub use state::PlayerState;
