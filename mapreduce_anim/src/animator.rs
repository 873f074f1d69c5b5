// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The step state machine that drives the diagram.
//!
//! One run walks a generation counter from zero up to
//! [`AnimatorConfig::max_generation`] in steps of two. Each cycle applies five
//! transformations to the [`LayerStore`]:
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            ▼                                              │
//! Setup ──► PreMap ──► Map ──► PostMap ──► Reduce ──► PostReduce
//!   ▲                                                       │
//!   └──────────────── generation >= max ────────────────────┘
//! ```
//!
//! | step         | transformation                  | label               |
//! |--------------|---------------------------------|---------------------|
//! | `Setup`      | `reset`, generation = 0         | hidden              |
//! | `PreMap`     | `split(g, piece_size)`          | "Map" at `g`        |
//! | `Map`        | `map(g)`                        | unchanged           |
//! | `PostMap`    | `join(g)`                       | unchanged           |
//! | `Reduce`     | `reduce(g + 2)`                 | "Reduce" at `g + 2` |
//! | `PostReduce` | `tidy_up(g + 2)`, generation += 2 | unchanged         |
//!
//! # Driving
//!
//! The animator is cooperative and never blocks. [`Animator::start`] applies
//! `Setup` and returns the resulting [`Transition`]; from then on exactly one
//! transition is in flight. When the presentation layer has finished
//! animating it, the frame loop calls [`Animator::on_transition_end`], which
//! applies the next step and returns the next transition. There is no other
//! way to advance, so two transformations can never overlap.

use crate::layer::{Frame, FrameChanges, Generation, LayerStore};
use crate::trace::{FrameEvent, RestartEvent, StepEvent, Tracer};

/// Sizes, factors and bounds for one run of the diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatorConfig {
    /// Size of the reduced piece generation 0 starts with.
    pub start_size: f64,
    /// Chunk size used when splitting a layer before mapping.
    pub piece_size: f64,
    /// Scale applied to each mapped copy.
    pub growth: f64,
    /// Scale applied to a layer's total when it is reduced.
    pub shrinkage: f64,
    /// The run restarts once the generation counter reaches this value.
    pub max_generation: Generation,
}

impl AnimatorConfig {
    /// The values the diagram is drawn with.
    #[must_use]
    pub const fn diagram() -> Self {
        Self {
            start_size: 60.0,
            piece_size: 30.0,
            growth: 0.8,
            shrinkage: 0.8,
            max_generation: Generation::new(12),
        }
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self::diagram()
    }
}

/// One state of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Fresh layers, generation counter back at zero.
    Setup,
    /// The current layer is split into chunks.
    PreMap,
    /// Chunks are copied into the two layers ahead.
    Map,
    /// The current layer is joined into one reduced piece.
    PostMap,
    /// The next layer is reduced to a single piece.
    Reduce,
    /// The reduced piece is moved back to offset zero.
    PostReduce,
}

impl Step {
    /// Returns a short lowercase name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::PreMap => "pre-map",
            Self::Map => "map",
            Self::PostMap => "post-map",
            Self::Reduce => "reduce",
            Self::PostReduce => "post-reduce",
        }
    }
}

/// Text of the step label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelText {
    /// Shown from `PreMap` until `Reduce`.
    Map,
    /// Shown from `Reduce` until the next `PreMap`.
    Reduce,
}

impl LabelText {
    /// Returns the text to display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Map => "Map",
            Self::Reduce => "Reduce",
        }
    }
}

/// The step label and the column it is centred on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Label {
    /// What the label says.
    pub text: LabelText,
    /// Column the label sits above.
    pub generation: Generation,
}

/// The outcome of applying one step.
#[derive(Clone, Debug)]
pub struct Transition {
    /// Run counter; incremented on every restart.
    pub cycle: u64,
    /// The step that was applied.
    pub step: Step,
    /// The layer the step transformed.
    pub layer: Generation,
    /// The generation counter after the step.
    pub generation: Generation,
    /// The label to show, or `None` to hide it.
    pub label: Option<Label>,
    /// Every piece after the step.
    pub frame: Frame,
    /// What changed relative to the previous transition's frame.
    pub changes: FrameChanges,
}

/// Drives a [`LayerStore`] through the steps of the diagram.
#[derive(Clone, Debug)]
pub struct Animator {
    store: LayerStore,
    generation: Generation,
    cycle: u64,
    in_flight: Option<Step>,
    label: Option<Label>,
    frame: Frame,
}

impl Animator {
    /// Creates an animator that has not started yet.
    #[must_use]
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            store: LayerStore::new(config),
            generation: Generation::ZERO,
            cycle: 0,
            in_flight: None,
            label: None,
            frame: Frame::default(),
        }
    }

    /// Returns the layer store.
    #[inline]
    #[must_use]
    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AnimatorConfig {
        self.store.config()
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns how many times the run has restarted.
    #[inline]
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Returns the step whose transition is on screen, if any.
    #[inline]
    #[must_use]
    pub fn in_flight(&self) -> Option<Step> {
        self.in_flight
    }

    /// Returns the current label.
    #[inline]
    #[must_use]
    pub fn label(&self) -> Option<Label> {
        self.label
    }

    /// Returns the frame of the transition in flight.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Resets the layers and returns the `Setup` transition.
    ///
    /// Calling this while a transition is in flight abandons it.
    pub fn start(&mut self, tracer: &mut Tracer<'_>) -> Transition {
        self.apply(Step::Setup, tracer)
    }

    /// Signals that the transition in flight has finished and applies the
    /// next step.
    ///
    /// # Panics
    ///
    /// Panics if no transition is in flight (i.e. [`start`](Self::start) was
    /// never called).
    pub fn on_transition_end(&mut self, tracer: &mut Tracer<'_>) -> Transition {
        let Some(finished) = self.in_flight else {
            panic!("no transition in flight; call `start` first");
        };
        let next = self.next_step(finished);
        if next == Step::Setup {
            tracer.restart(&RestartEvent {
                cycle: self.cycle,
                reached: self.generation,
            });
            self.cycle += 1;
        }
        self.apply(next, tracer)
    }

    /// Returns the step that follows `finished`.
    fn next_step(&self, finished: Step) -> Step {
        match finished {
            Step::Setup | Step::PostReduce => {
                if self.generation < self.config().max_generation {
                    Step::PreMap
                } else {
                    Step::Setup
                }
            }
            Step::PreMap => Step::Map,
            Step::Map => Step::PostMap,
            Step::PostMap => Step::Reduce,
            Step::Reduce => Step::PostReduce,
        }
    }

    /// Applies `step` to the store and packages the result.
    fn apply(&mut self, step: Step, tracer: &mut Tracer<'_>) -> Transition {
        let current = self.generation;
        let next = current.ahead(1);
        let layer = match step {
            Step::Setup => {
                self.store.reset();
                self.generation = Generation::ZERO;
                self.label = None;
                Generation::ZERO
            }
            Step::PreMap => {
                let piece_size = self.config().piece_size;
                self.store.split(current, piece_size);
                self.label = Some(Label {
                    text: LabelText::Map,
                    generation: current,
                });
                current
            }
            Step::Map => {
                self.store.map(current);
                current
            }
            Step::PostMap => {
                self.store.join(current);
                current
            }
            Step::Reduce => {
                self.store.reduce(next);
                self.label = Some(Label {
                    text: LabelText::Reduce,
                    generation: next,
                });
                next
            }
            Step::PostReduce => {
                let _ = self.store.tidy_up(next);
                self.generation = next;
                next
            }
        };

        tracer.step(&StepEvent {
            cycle: self.cycle,
            step,
            layer,
            generation: self.generation,
        });

        let frame = self.store.snapshot();
        let changes = FrameChanges::between(&self.frame, &frame);
        tracer.frame(&FrameEvent::new(self.cycle, step, &frame, &changes));
        #[cfg(feature = "trace-rich")]
        tracer.piece_changes(self.cycle, &crate::trace::PieceChange::collect(&frame, &changes));

        self.frame.clone_from(&frame);
        self.in_flight = Some(step);

        Transition {
            cycle: self.cycle,
            step,
            layer,
            generation: self.generation,
            label: self.label,
            frame,
            changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::layer::PieceKey;

    fn g(n: u32) -> Generation {
        Generation::new(n)
    }

    fn shape(animator: &Animator, generation: Generation) -> Vec<(f64, f64)> {
        animator
            .store()
            .layer(generation)
            .map(|l| l.pieces().iter().map(|p| (p.offset, p.size)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn start_seeds_layers_and_hides_label() {
        let mut animator = Animator::new(AnimatorConfig::diagram());
        let t = animator.start(&mut Tracer::none());
        assert_eq!(t.step, Step::Setup);
        assert_eq!(t.label, None);
        assert_eq!(t.generation, g(0));
        assert_eq!(shape(&animator, g(0)), [(0.0, 60.0)]);
        assert_eq!(shape(&animator, g(2)), [(0.0, 30.0), (30.0, 18.0)]);
        assert_eq!(t.changes.entered.len(), 3);
        assert_eq!(animator.in_flight(), Some(Step::Setup));
    }

    #[test]
    #[should_panic(expected = "no transition in flight")]
    fn advancing_before_start_panics() {
        let mut animator = Animator::new(AnimatorConfig::diagram());
        let _ = animator.on_transition_end(&mut Tracer::none());
    }

    #[test]
    fn first_cycle_walks_every_step() {
        let mut animator = Animator::new(AnimatorConfig::diagram());
        let mut tracer = Tracer::none();
        let _ = animator.start(&mut tracer);

        let t = animator.on_transition_end(&mut tracer);
        assert_eq!(t.step, Step::PreMap);
        assert_eq!(
            t.label,
            Some(Label {
                text: LabelText::Map,
                generation: g(0)
            })
        );
        assert_eq!(shape(&animator, g(0)), [(0.0, 30.0), (30.0, 30.0)]);

        let t = animator.on_transition_end(&mut tracer);
        assert_eq!(t.step, Step::Map);
        assert_eq!(t.layer, g(0));
        assert_eq!(shape(&animator, g(4)), [(0.0, 24.0), (24.0, 24.0)]);
        assert_eq!(t.changes.entered.len(), 4, "two copies into each layer");

        let t = animator.on_transition_end(&mut tracer);
        assert_eq!(t.step, Step::PostMap);
        assert_eq!(shape(&animator, g(0)), [(0.0, 60.0)]);

        let t = animator.on_transition_end(&mut tracer);
        assert_eq!(t.step, Step::Reduce);
        assert_eq!(t.layer, g(2));
        assert_eq!(t.label.map(|l| (l.text, l.generation)), Some((LabelText::Reduce, g(2))));
        let reduced = shape(&animator, g(2));
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced[0].0, 96.0);
        assert!((reduced[0].1 - 76.8).abs() < 1e-9);

        let t = animator.on_transition_end(&mut tracer);
        assert_eq!(t.step, Step::PostReduce);
        assert_eq!(t.generation, g(2));
        assert_eq!(shape(&animator, g(2))[0].0, 0.0);
        assert_eq!(t.label.map(|l| l.text), Some(LabelText::Reduce), "label persists");

        let t = animator.on_transition_end(&mut tracer);
        assert_eq!(t.step, Step::PreMap);
        assert_eq!(t.layer, g(2));
    }

    #[test]
    fn run_reaches_max_then_restarts_fresh() {
        let config = AnimatorConfig::diagram();
        let mut animator = Animator::new(config);
        let mut tracer = Tracer::none();
        let first = animator.start(&mut tracer);

        // Six cycles of five steps take the counter from 0 to 12.
        let mut last = first.clone();
        for _ in 0..30 {
            last = animator.on_transition_end(&mut tracer);
            assert!(last.frame.has_unique_keys(), "keys unique at {:?}", last.step);
        }
        assert_eq!(last.step, Step::PostReduce);
        assert_eq!(animator.generation(), g(12));
        assert_eq!(animator.cycle(), 0);

        let restart = animator.on_transition_end(&mut tracer);
        assert_eq!(restart.step, Step::Setup);
        assert_eq!(restart.cycle, 1);
        assert_eq!(animator.generation(), g(0));
        assert_eq!(restart.label, None);
        assert_eq!(restart.frame, first.frame);
        assert_eq!(animator.store().layers().len(), 2, "layers cleared on restart");

        let t = animator.on_transition_end(&mut tracer);
        assert_eq!((t.step, t.layer), (Step::PreMap, g(0)));
    }

    #[test]
    fn max_generation_zero_restarts_immediately() {
        let config = AnimatorConfig {
            max_generation: g(0),
            ..AnimatorConfig::diagram()
        };
        let mut animator = Animator::new(config);
        let mut tracer = Tracer::none();
        let _ = animator.start(&mut tracer);
        let t = animator.on_transition_end(&mut tracer);
        assert_eq!((t.step, t.cycle), (Step::Setup, 1));
    }

    #[test]
    fn reduce_conserves_scaled_total() {
        let mut animator = Animator::new(AnimatorConfig::diagram());
        let mut tracer = Tracer::none();
        let _ = animator.start(&mut tracer);
        let mut expected = 0.0;
        for _ in 0..4 {
            let t = animator.on_transition_end(&mut tracer);
            if t.step == Step::PostMap {
                expected = animator.store().total_size(g(2)) * 0.8;
            }
        }
        let pieces = animator.store().layer(g(2)).unwrap().pieces();
        assert_eq!(pieces.len(), 1);
        assert!((pieces[0].size - expected).abs() < 1e-9);
    }

    #[test]
    fn post_reduce_rekeys_the_tidied_piece() {
        let mut animator = Animator::new(AnimatorConfig::diagram());
        let mut tracer = Tracer::none();
        let _ = animator.start(&mut tracer);
        let mut t = animator.on_transition_end(&mut tracer);
        while t.step != Step::PostReduce {
            t = animator.on_transition_end(&mut tracer);
        }
        let size = shape(&animator, g(2))[0].1;
        assert!(t.changes.exited.iter().any(|p| p.key == PieceKey::new(g(2), 96.0, size)));
        let entered: Vec<_> = t.changes.entered.iter().map(|&i| t.frame.pieces[i].key).collect();
        assert_eq!(entered, [PieceKey::new(g(2), 0.0, size)]);
    }
}
