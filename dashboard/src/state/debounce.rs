use std::time::{Duration, Instant};

/// Quiet period before typed search text is submitted.
pub const SEARCH_DELAY: Duration = Duration::from_millis(500);

/// A simple debouncer that tracks when an action should be triggered
/// after a period of inactivity
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_event: None,
        }
    }

    /// Register that an event occurred, restarting the quiet period
    pub fn trigger(&mut self) {
        self.last_event = Some(Instant::now());
    }

    /// Returns true once the quiet period after the last event has elapsed.
    /// The pending action is consumed.
    pub fn should_execute(&mut self) -> bool {
        match self.last_event {
            Some(last) if last.elapsed() >= self.delay => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before the pending action fires, `None` if nothing is pending
    pub fn time_remaining(&self) -> Option<Duration> {
        self.last_event
            .map(|last| self.delay.saturating_sub(last.elapsed()))
    }

    /// Cancel any pending action
    pub fn reset(&mut self) {
        self.last_event = None;
    }

    pub fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }
}

/// Search input that emits its text once typing settles.
#[derive(Debug, Clone)]
pub struct SearchBox {
    debouncer: Debouncer,
    text: String,
    last_emitted: String,
}

impl SearchBox {
    /// `initial` counts as already submitted, so it is never emitted again
    /// unchanged.
    pub fn new(delay: Duration, initial: &str) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            text: initial.to_string(),
            last_emitted: initial.to_string(),
        }
    }

    pub fn input(&mut self, text: &str) {
        self.text = text.to_string();
        self.debouncer.trigger();
    }

    /// The settled text, if the quiet period has passed and it changed since
    /// the last emission.
    pub fn poll(&mut self) -> Option<String> {
        if self.debouncer.should_execute() {
            self.emit()
        } else {
            None
        }
    }

    /// Emit pending text right away, e.g. when input ends.
    pub fn flush(&mut self) -> Option<String> {
        if self.debouncer.is_pending() {
            self.debouncer.reset();
            self.emit()
        } else {
            None
        }
    }

    pub fn time_remaining(&self) -> Option<Duration> {
        self.debouncer.time_remaining()
    }

    fn emit(&mut self) -> Option<String> {
        if self.text == self.last_emitted {
            return None;
        }
        self.last_emitted = self.text.clone();
        Some(self.text.clone())
    }
}
