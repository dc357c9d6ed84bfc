//! Long-press detection for the `clear` key.
//!
//! Time is passed in explicitly so the timer can be driven by any event
//! loop (and by tests) without sleeping.

use std::time::{Duration, Instant};

/// What a release of the key means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// Released before the delay elapsed: an ordinary press.
    Tap,
    /// The long press already fired; the release does nothing more.
    AfterLongPress,
    /// Released without a matching press.
    Spurious,
}

#[derive(Clone, Debug)]
pub struct LongPress {
    delay: Duration,
    deadline: Option<Instant>,
    fired: bool,
}

impl LongPress {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            fired: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer. Pressing again while armed restarts it.
    pub fn press(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
        self.fired = false;
    }

    /// When the armed timer is due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once, the first time it is polled at or after
    /// the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.fired = true;
                true
            }
            _ => false,
        }
    }

    /// Handle the key release. The pending timer is always cancelled first,
    /// so a release racing the deadline counts as a tap.
    pub fn release(&mut self) -> Release {
        let armed = self.deadline.take().is_some();
        let fired = std::mem::take(&mut self.fired);
        match (armed, fired) {
            (true, _) => Release::Tap,
            (false, true) => Release::AfterLongPress,
            (false, false) => Release::Spurious,
        }
    }

    /// Abort the gesture (pointer left, touch cancelled) without acting.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.fired = false;
    }
}
