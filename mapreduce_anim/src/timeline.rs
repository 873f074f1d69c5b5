// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-length transition timing.
//!
//! The [`Animator`](crate::animator::Animator) never looks at a clock: it
//! only starts the next step when told the current transition has finished.
//! [`Timeline`] is the piece of the frame loop that decides *when* that is.
//! Every transition lasts the same [`Duration`]; the frame loop calls
//! [`begin`](Timeline::begin) when it presents a transition and
//! [`poll`](Timeline::poll) on every tick.
//!
//! ```rust,ignore
//! let mut timeline = Timeline::new(Duration::from_millis(1_000, Timebase::NANOS));
//! presenter.apply(&animator.start(&mut tracer));
//! timeline.begin(now());
//!
//! loop {
//!     let t = now();
//!     if timeline.poll(t) {
//!         presenter.apply(&animator.on_transition_end(&mut tracer));
//!         timeline.begin(t);
//!     }
//!     presenter.sample(timeline.progress(t));
//! }
//! ```

use crate::time::{Duration, HostTime};

/// Tracks the single transition currently on screen.
#[derive(Clone, Copy, Debug)]
pub struct Timeline {
    duration: Duration,
    started_at: Option<HostTime>,
}

impl Timeline {
    /// Creates an idle timeline whose transitions last `duration`.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            started_at: None,
        }
    }

    /// Returns the length of every transition.
    #[inline]
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns whether a transition is in progress.
    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Starts timing a new transition at `now`, replacing any previous one.
    pub fn begin(&mut self, now: HostTime) {
        self.started_at = Some(now);
    }

    /// Returns how far the current transition has progressed, in `[0, 1]`.
    ///
    /// An idle timeline reports `1.0` (everything is at rest).
    #[must_use]
    pub fn progress(&self, now: HostTime) -> f64 {
        let Some(start) = self.started_at else {
            return 1.0;
        };
        if self.duration == Duration::ZERO {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(start).ticks();
        if elapsed >= self.duration.ticks() {
            1.0
        } else {
            elapsed as f64 / self.duration.ticks() as f64
        }
    }

    /// Returns whether the current transition has run its full length.
    #[must_use]
    pub fn is_finished(&self, now: HostTime) -> bool {
        self.started_at
            .is_some_and(|start| now.saturating_duration_since(start) >= self.duration)
    }

    /// Reports a finished transition exactly once.
    ///
    /// Returns `true` the first time it is called at or after the end of the
    /// current transition and goes idle; returns `false` otherwise.
    pub fn poll(&mut self, now: HostTime) -> bool {
        if self.is_finished(now) {
            self.started_at = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timeline_is_at_rest() {
        let timeline = Timeline::new(Duration(100));
        assert!(!timeline.is_running());
        assert_eq!(timeline.progress(HostTime(50)), 1.0);
        assert!(!timeline.is_finished(HostTime(1_000)));
    }

    #[test]
    fn progress_is_linear_and_clamped() {
        let mut timeline = Timeline::new(Duration(100));
        timeline.begin(HostTime(1_000));
        assert_eq!(timeline.progress(HostTime(900)), 0.0, "before start");
        assert_eq!(timeline.progress(HostTime(1_025)), 0.25);
        assert_eq!(timeline.progress(HostTime(1_100)), 1.0);
        assert_eq!(timeline.progress(HostTime(5_000)), 1.0);
    }

    #[test]
    fn poll_reports_completion_once() {
        let mut timeline = Timeline::new(Duration(100));
        timeline.begin(HostTime(0));
        assert!(!timeline.poll(HostTime(99)));
        assert!(timeline.poll(HostTime(100)));
        assert!(!timeline.poll(HostTime(101)), "already reported");
        assert!(!timeline.is_running());
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut timeline = Timeline::new(Duration::ZERO);
        timeline.begin(HostTime(7));
        assert_eq!(timeline.progress(HostTime(7)), 1.0);
        assert!(timeline.poll(HostTime(7)));
    }
}
