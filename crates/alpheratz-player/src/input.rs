/// Normalized controls for a single physics tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSample {
    /// Horizontal axis in [-1, 1], positive is right.
    pub axis: f32,
    pub jump: bool,
    pub duck: bool,
}

impl InputSample {
    pub fn new(axis: f32, jump: bool, duck: bool) -> Self {
        Self {
            axis: clamp_axis(axis),
            jump,
            duck,
        }
    }

    /// Build a sample from per-action strengths as reported by an input map.
    pub fn from_actions(left: f32, right: f32, jump: bool, duck: bool) -> Self {
        Self::new(right - left, jump, duck)
    }

    pub fn idle() -> Self {
        Self::default()
    }

    pub fn walk(axis: f32) -> Self {
        Self::new(axis, false, false)
    }

    pub fn jump() -> Self {
        Self::new(0.0, true, false)
    }

    pub fn duck() -> Self {
        Self::new(0.0, false, true)
    }

    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }

    pub fn with_duck(mut self, duck: bool) -> Self {
        self.duck = duck;
        self
    }
}

fn clamp_axis(axis: f32) -> f32 {
    if axis.is_finite() {
        axis.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Supplies one input sample per physics tick.
pub trait InputSource {
    fn sample(&mut self) -> InputSample;
}

/// Always returns the same sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedInput(pub InputSample);

impl InputSource for FixedInput {
    fn sample(&mut self) -> InputSample {
        self.0
    }
}

/// Replays a keyed timeline of samples, one tick per call.
///
/// Each key holds from its tick until the next key. Before the first key the
/// source is idle.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    keys: Vec<(u64, InputSample)>,
    tick: u64,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key. Keys may be given in any order.
    pub fn at(mut self, tick: u64, sample: InputSample) -> Self {
        self.keys.retain(|(t, _)| *t != tick);
        self.keys.push((tick, sample));
        self.keys.sort_by_key(|(t, _)| *t);
        self
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    fn current(&self) -> InputSample {
        self.keys
            .iter()
            .take_while(|(t, _)| *t <= self.tick)
            .last()
            .map(|(_, s)| *s)
            .unwrap_or_default()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> InputSample {
        let sample = self.current();
        self.tick += 1;
        sample
    }
}
