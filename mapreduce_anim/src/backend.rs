// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract between the animator and whatever draws it.
//!
//! The animator produces one [`Transition`] per step. A presentation layer
//! (an SVG writer, a DOM binding, a test double) implements [`Presenter`] to
//! turn that transition into something on screen:
//!
//! - [`apply`](Presenter::apply) is called once per transition, right after
//!   the animator applies a step. The presenter binds the frame's pieces by
//!   key and sets up the enter/update/exit animations the step calls for.
//! - [`sample`](Presenter::sample) is called on every frame-loop tick with the
//!   transition's progress in `[0, 1]`.
//!
//! # Crate boundaries
//!
//! `mapreduce_anim` owns the data model, the step machine and this contract.
//! Geometry, styling and easing live in `mapreduce_render`, which depends on
//! this crate. Application code wires both together in a frame loop paced by
//! a [`Timeline`](crate::timeline::Timeline).

use crate::animator::Transition;

/// Draws the transitions produced by the animator.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(now: HostTime) {
///     if timeline.poll(now) {
///         tracer.transition_end(&TransitionEndEvent { cycle, step, timestamp: now });
///         let transition = animator.on_transition_end(&mut tracer);
///         presenter.apply(&transition);
///         timeline.begin(now);
///     }
///     presenter.sample(timeline.progress(now));
/// }
/// ```
pub trait Presenter {
    /// Binds a new transition, replacing the one in progress.
    fn apply(&mut self, transition: &Transition);

    /// Advances the current transition to `progress` in `[0, 1]`.
    ///
    /// Presenters that only care about settled frames can ignore this.
    fn sample(&mut self, progress: f64) {
        _ = progress;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::animator::{Animator, AnimatorConfig, Step};
    use crate::trace::Tracer;

    #[derive(Default)]
    struct StepLog {
        steps: Vec<Step>,
        pieces: Vec<usize>,
    }

    impl Presenter for StepLog {
        fn apply(&mut self, transition: &Transition) {
            self.steps.push(transition.step);
            self.pieces.push(transition.frame.len());
        }
    }

    #[test]
    fn presenter_sees_every_transition() {
        let mut animator = Animator::new(AnimatorConfig::diagram());
        let mut tracer = Tracer::none();
        let mut log = StepLog::default();

        log.apply(&animator.start(&mut tracer));
        for _ in 0..3 {
            log.sample(0.5);
            log.apply(&animator.on_transition_end(&mut tracer));
        }
        assert_eq!(log.steps, [Step::Setup, Step::PreMap, Step::Map, Step::PostMap]);
        // Setup: 60 | 30 18. PreMap splits 60. Map adds 2 + 2. PostMap joins.
        assert_eq!(log.pieces, [3, 4, 8, 7]);
    }
}
