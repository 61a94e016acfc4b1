use std::time::Duration;

/// Outcome of advancing the countdown by one tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CountdownStatus {
    /// Still counting; the value is the whole seconds left to display.
    Running(u64),
    /// The delay has fully elapsed; reveal now.
    Elapsed,
}

/// Tick-driven timer behind "read aloud, then reveal after a delay".
///
/// The timer only moves when [`tick`](Self::tick) is called from the event
/// loop, so the interface stays responsive while it runs, and dropping the
/// value aborts it without firing. The holder is expected to drop it on the
/// first `Elapsed`; further ticks keep answering `Elapsed` and nothing else.
#[derive(Debug, Clone)]
pub struct RevealCountdown {
    remaining: Duration,
}

impl RevealCountdown {
    pub fn new(delay_secs: u64) -> Self {
        Self {
            remaining: Duration::from_secs(delay_secs),
        }
    }

    /// Advance the timer by `dt`.
    pub fn tick(&mut self, dt: Duration) -> CountdownStatus {
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            CountdownStatus::Elapsed
        } else {
            CountdownStatus::Running(self.seconds_left())
        }
    }

    /// Whole seconds left, rounded up so "3" stays on screen for the full
    /// first second of a three second delay.
    pub fn seconds_left(&self) -> u64 {
        let carry = if self.remaining.subsec_nanos() > 0 { 1 } else { 0 };
        self.remaining.as_secs() + carry
    }
}
