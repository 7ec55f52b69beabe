use crate::capability::{Scheduler, TimerId};

/// Shortest accepted repeat period in seconds.
pub const MIN_PERIOD: f32 = 0.001;

/// Slack when comparing due times, absorbs accumulated `dt` rounding.
const DUE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
struct Timer<E> {
    id: TimerId,
    due: f64,
    period: Option<f64>,
    /// Tie-breaker so timers due at the same instant fire in scheduling order.
    seq: u64,
    event: E,
}

/// Single-threaded queue of one-shot and repeating timers.
///
/// The queue owns its own clock. The host advances it once per frame and then
/// pops due events one at a time, so a handler that cancels a timer prevents
/// any later firing of it within the same frame.
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    now: f64,
    next_id: u64,
    next_seq: u64,
    timers: Vec<Timer<E>>,
}

impl<E: Clone> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            next_seq: 0,
            timers: Vec::new(),
        }
    }

    /// Seconds elapsed on the queue clock.
    pub fn now(&self) -> f32 {
        self.now as f32
    }

    /// Move the clock forward. Non-finite or negative `dt` is ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.now += f64::from(dt);
        }
    }

    /// Remove and return the earliest due event, re-arming it if it repeats.
    pub fn pop_due(&mut self) -> Option<E> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.now + DUE_EPSILON)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;

        match self.timers[idx].period {
            Some(period) => {
                let seq = self.bump_seq();
                let timer = &mut self.timers[idx];
                timer.due += period;
                timer.seq = seq;
                Some(timer.event.clone())
            },
            None => Some(self.timers.swap_remove(idx).event),
        }
    }

    /// Pop and dispatch every due event in order, handing the queue back to
    /// the handler so it can schedule or cancel follow-up timers.
    pub fn run_due(&mut self, mut handler: impl FnMut(&mut Self, E)) -> usize {
        let mut fired = 0;
        while let Some(event) = self.pop_due() {
            handler(self, event);
            fired += 1;
        }
        fired
    }

    /// Whether `id` is still scheduled.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn push(&mut self, delay: f32, period: Option<f32>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        let delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self.timers.push(Timer {
            id,
            due: self.now + f64::from(delay),
            period: period.map(f64::from),
            seq,
            event,
        });
        id
    }
}

impl<E: Clone> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize_period(period: f32) -> f32 {
    if period.is_finite() {
        period.max(MIN_PERIOD)
    } else {
        MIN_PERIOD
    }
}

impl<E: Clone> Scheduler<E> for TimerQueue<E> {
    fn after(&mut self, delay: f32, event: E) -> TimerId {
        self.push(delay, None, event)
    }

    fn every(&mut self, period: f32, event: E) -> TimerId {
        let period = sanitize_period(period);
        self.push(period, Some(period), event)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        let removed = self.timers.len() != before;
        if !removed {
            tracing::trace!(timer = id.0, "Cancel of inactive timer ignored");
        }
        removed
    }
}
