// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the step loop.
//!
//! This module provides a [`TraceSink`] trait with one method per event the
//! animator and its frame loop emit. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies.
//! - `trace-rich` (implies `trace`) gates the per-piece [`PieceChange`]
//!   events and the corresponding `TraceSink` method.

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use crate::animator::Step;
use crate::layer::{Frame, FrameChanges, Generation};
#[cfg(feature = "trace-rich")]
use crate::layer::PieceKey;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a piece took part in a transition.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// New in this frame.
    Entered,
    /// Present before and after.
    Updated,
    /// Removed by this frame.
    Exited,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after the animator applies a step to the layer store.
#[derive(Clone, Copy, Debug)]
pub struct StepEvent {
    /// Run counter.
    pub cycle: u64,
    /// The step that was applied.
    pub step: Step,
    /// The layer the step transformed.
    pub layer: Generation,
    /// The generation counter after the step.
    pub generation: Generation,
}

/// Emitted after the store is captured into a new frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameEvent {
    /// Run counter.
    pub cycle: u64,
    /// The step that produced the frame.
    pub step: Step,
    /// Number of pieces in the frame.
    pub pieces: usize,
    /// Number of pieces that entered.
    pub entered: usize,
    /// Number of pieces that were kept.
    pub updated: usize,
    /// Number of pieces that exited.
    pub exited: usize,
}

impl FrameEvent {
    /// Summarizes a frame and its changes.
    #[must_use]
    pub fn new(cycle: u64, step: Step, frame: &Frame, changes: &FrameChanges) -> Self {
        Self {
            cycle,
            step,
            pieces: frame.len(),
            entered: changes.entered.len(),
            updated: changes.updated.len(),
            exited: changes.exited.len(),
        }
    }
}

/// Emitted when the generation counter reaches its maximum and the run
/// starts over.
#[derive(Clone, Copy, Debug)]
pub struct RestartEvent {
    /// The cycle that just ended.
    pub cycle: u64,
    /// The generation counter it ended at.
    pub reached: Generation,
}

/// Marks the moment a transition is handed to the presenter.
#[derive(Clone, Copy, Debug)]
pub struct TransitionBeginEvent {
    /// Run counter.
    pub cycle: u64,
    /// The step being animated.
    pub step: Step,
    /// Host time the transition started.
    pub timestamp: HostTime,
}

/// Marks the moment a transition finishes on screen.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEndEvent {
    /// Run counter.
    pub cycle: u64,
    /// The step that was animated.
    pub step: Step,
    /// Host time the transition finished.
    pub timestamp: HostTime,
}

/// A per-piece change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceChange {
    /// The piece that changed.
    pub key: PieceKey,
    /// How it changed.
    pub kind: ChangeKind,
}

#[cfg(feature = "trace-rich")]
impl PieceChange {
    /// Flattens a frame's changes into one record per piece.
    #[must_use]
    pub fn collect(frame: &Frame, changes: &FrameChanges) -> Vec<Self> {
        let keyed = |kind| move |&i: &usize| Self {
            key: frame.pieces[i].key,
            kind,
        };
        changes
            .entered
            .iter()
            .map(keyed(ChangeKind::Entered))
            .chain(changes.updated.iter().map(keyed(ChangeKind::Updated)))
            .chain(changes.exited.iter().map(|p| Self {
                key: p.key,
                kind: ChangeKind::Exited,
            }))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the animator and the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a step is applied.
    fn on_step(&mut self, e: &StepEvent) {
        _ = e;
    }

    /// Called after a frame is captured.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called when the run starts over.
    fn on_restart(&mut self, e: &RestartEvent) {
        _ = e;
    }

    /// Called when a transition starts on screen.
    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        _ = e;
    }

    /// Called when a transition finishes on screen.
    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        _ = e;
    }

    /// Called with per-piece changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_piece_changes(&mut self, cycle: u64, changes: &[PieceChange]) {
        _ = (cycle, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`StepEvent`].
    #[inline]
    pub fn step(&mut self, e: &StepEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_step(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RestartEvent`].
    #[inline]
    pub fn restart(&mut self, e: &RestartEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_restart(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionBeginEvent`].
    #[inline]
    pub fn transition_begin(&mut self, e: &TransitionBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEndEvent`].
    #[inline]
    pub fn transition_end(&mut self, e: &TransitionEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits per-piece changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn piece_changes(&mut self, cycle: u64, changes: &[PieceChange]) {
        if let Some(s) = &mut self.sink {
            s.on_piece_changes(cycle, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::{Animator, AnimatorConfig};

    fn sample_step() -> StepEvent {
        StepEvent {
            cycle: 3,
            step: Step::Map,
            layer: Generation::new(4),
            generation: Generation::new(4),
        }
    }

    #[test]
    fn frame_event_counts_changes() {
        let animator = {
            let mut a = Animator::new(AnimatorConfig::diagram());
            let _ = a.start(&mut Tracer::none());
            a
        };
        let frame = animator.frame();
        let changes = FrameChanges::between(&Frame::default(), frame);
        let e = FrameEvent::new(0, Step::Setup, frame, &changes);
        assert_eq!((e.pieces, e.entered, e.updated, e.exited), (3, 3, 0, 0));
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_step(&sample_step());
        sink.on_restart(&RestartEvent {
            cycle: 0,
            reached: Generation::new(12),
        });
        sink.on_transition_end(&TransitionEndEvent {
            cycle: 0,
            step: Step::Setup,
            timestamp: HostTime(0),
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.step(&sample_step());
        tracer.transition_begin(&TransitionBeginEvent {
            cycle: 0,
            step: Step::PreMap,
            timestamp: HostTime(5),
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            steps: Vec<Step>,
            restarts: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_step(&mut self, e: &StepEvent) {
                self.steps.push(e.step);
            }
            fn on_restart(&mut self, e: &RestartEvent) {
                self.restarts.push(e.cycle);
            }
        }

        let mut sink = RecordingSink {
            steps: Vec::new(),
            restarts: Vec::new(),
        };
        let config = AnimatorConfig {
            max_generation: Generation::new(2),
            ..AnimatorConfig::diagram()
        };
        let mut animator = Animator::new(config);
        let mut tracer = Tracer::new(&mut sink);
        let _ = animator.start(&mut tracer);
        for _ in 0..6 {
            let _ = animator.on_transition_end(&mut tracer);
        }
        drop(tracer);
        assert_eq!(
            sink.steps,
            [
                Step::Setup,
                Step::PreMap,
                Step::Map,
                Step::PostMap,
                Step::Reduce,
                Step::PostReduce,
                Step::Setup,
            ]
        );
        assert_eq!(sink.restarts, [0]);
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn piece_changes_cover_every_piece() {
        let mut animator = Animator::new(AnimatorConfig::diagram());
        let mut tracer = Tracer::none();
        let _ = animator.start(&mut tracer);
        let t = animator.on_transition_end(&mut tracer);
        let records = PieceChange::collect(&t.frame, &t.changes);
        let count = |kind| records.iter().filter(|r| r.kind == kind).count();
        assert_eq!(count(ChangeKind::Entered), 2);
        assert_eq!(count(ChangeKind::Updated), 2);
        assert_eq!(count(ChangeKind::Exited), 1);
    }
}
