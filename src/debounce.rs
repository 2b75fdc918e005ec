use std::time::Duration;

/// Collapses a burst of calls into a single one.
///
/// In trailing mode the last value of a burst is released once `wait` has
/// passed without another call. In leading mode the first call of a burst is
/// released immediately and every further call is swallowed until `wait` has
/// passed without another call.
///
/// The ui runs as a frame loop without timers, so time is passed in by the
/// caller: `now` is any monotonic clock, e.g. `egui::InputState::time`.
/// Callers are expected to `poll` once per frame and to schedule a repaint
/// after [`Debouncer::time_remaining`].
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    wait: Duration,
    immediate: bool,
    deadline: Option<Duration>,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn trailing(wait: Duration) -> Self {
        Self {
            wait,
            immediate: false,
            deadline: None,
            pending: None,
        }
    }

    #[allow(dead_code)] // the slider only needs the trailing mode
    pub fn leading(wait: Duration) -> Self {
        Self {
            immediate: true,
            ..Self::trailing(wait)
        }
    }

    /// Register a call. Returns a value that has to be acted upon right now:
    /// in leading mode the value itself if this call starts a burst, in
    /// trailing mode the value of a previous burst whose deadline passed
    /// without anybody polling for it.
    pub fn call(&mut self, now: Duration, value: T) -> Option<T> {
        let overdue = self.poll(now);

        let call_now = self.immediate && self.deadline.is_none();
        self.deadline = Some(now + self.wait);

        if call_now {
            return Some(value);
        }
        if !self.immediate {
            self.pending = Some(value);
        }
        overdue
    }

    /// Release the pending value if the quiet period is over.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Time until the current quiet period ends, `None` if there is none.
    pub fn time_remaining(&self, now: Duration) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_sub(now))
    }

    #[cfg(test)]
    pub fn is_waiting(&self) -> bool {
        self.deadline.is_some()
    }
}
