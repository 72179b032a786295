//! Debounced autosave policy for the step-content editor.
//!
//! Content edits are buffered for a fixed quiet period before a save request
//! is issued; a new edit restarts the timer. The first change notification
//! immediately after initial load is suppressed, so loading unmodified
//! content never produces a spurious save. Navigating away cancels any
//! pending deadline.
//!
//! The policy is a pure state machine over injected clock readings, so the
//! host drives it from whatever timer facility it has.

use chrono::{DateTime, Duration, Utc};

/// Debounce state for one editor's autosave.
#[derive(Debug, Clone)]
pub struct AutosavePolicy {
    quiet: Duration,
    primed: bool,
    deadline: Option<DateTime<Utc>>,
}

impl AutosavePolicy {
    /// Creates a policy with the given quiet period.
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            primed: false,
            deadline: None,
        }
    }

    /// Records a change notification.
    ///
    /// The first notification after load only primes the policy (editors
    /// emit one when hydrating initial content); every later notification
    /// arms or restarts the quiet-period deadline.
    pub fn note_change(&mut self, now: DateTime<Utc>) {
        if !self.primed {
            self.primed = true;
            return;
        }
        self.deadline = Some(now + self.quiet);
    }

    /// Whether a save is pending (armed but not yet fired or cancelled).
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the quiet period has elapsed.
    #[must_use]
    pub fn due(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Consumes a due deadline.
    ///
    /// Returns true exactly once per elapsed quiet period; the host issues
    /// the save request when it does.
    pub fn fire(&mut self, now: DateTime<Utc>) -> bool {
        if self.due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Cancels any pending save (the user navigated away).
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
