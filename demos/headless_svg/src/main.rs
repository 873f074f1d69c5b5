// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless frame loop for the map/reduce diagram.
//!
//! Drives the [`Animator`] on a synthetic clock for a little more than one
//! full cycle, rendering through an [`SvgPresenter`]. Every transition is
//! written out as an SVG file captured halfway through its tween, and all
//! trace events go to both a
//! [`PrettyPrintSink`](mapreduce_debug::pretty::PrettyPrintSink) on stderr and a
//! [`RecorderSink`](mapreduce_debug::recorder::RecorderSink). The recording
//! is exported as Chrome trace JSON at the end.
//!
//! Usage: `headless_svg [OUTPUT_DIR]` (default `frames`).

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use mapreduce_anim::animator::{Animator, AnimatorConfig, Transition};
use mapreduce_anim::backend::Presenter;
use mapreduce_anim::time::{Duration, HostTime, Timebase};
use mapreduce_anim::timeline::Timeline;
use mapreduce_anim::trace::{
    FrameEvent, PieceChange, RestartEvent, StepEvent, TraceSink, Tracer, TransitionBeginEvent,
    TransitionEndEvent,
};
use mapreduce_render::{SceneConfig, SvgPresenter};

use mapreduce_debug::pretty::PrettyPrintSink;
use mapreduce_debug::recorder::RecorderSink;

/// One full cycle with the diagram preset, plus the restart and a few more.
const TRANSITION_COUNT: u32 = 34;
/// Transition length on screen.
const TRANSITION_MS: u64 = 1_000;
/// Frame loop tick (≈60 Hz).
const TICK_NS: u64 = 16_666_667;

/// Fans every event out to the pretty printer and the recorder.
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_step(&mut self, e: &StepEvent) {
        self.pretty.on_step(e);
        self.recorder.on_step(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.pretty.on_frame(e);
        self.recorder.on_frame(e);
    }

    fn on_restart(&mut self, e: &RestartEvent) {
        self.pretty.on_restart(e);
        self.recorder.on_restart(e);
    }

    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        self.pretty.on_transition_begin(e);
        self.recorder.on_transition_begin(e);
    }

    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        self.pretty.on_transition_end(e);
        self.recorder.on_transition_end(e);
    }

    fn on_piece_changes(&mut self, cycle: u64, changes: &[PieceChange]) {
        self.pretty.on_piece_changes(cycle, changes);
        self.recorder.on_piece_changes(cycle, changes);
    }
}

fn main() {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "frames".into()));
    fs::create_dir_all(&out_dir).expect("failed to create output directory");

    let timebase = Timebase::NANOS;
    let mut tee = Tee {
        pretty: PrettyPrintSink::stderr(timebase),
        recorder: RecorderSink::new(),
    };

    let mut animator = Animator::new(AnimatorConfig::diagram());
    let mut presenter = SvgPresenter::new(SceneConfig::diagram());
    let mut timeline = Timeline::new(Duration::from_millis(TRANSITION_MS, timebase));

    // Start at 1s so the trace does not begin at the origin.
    let mut now = HostTime(1_000_000_000);
    {
        let mut tracer = Tracer::new(&mut tee);

        let mut transition = animator.start(&mut tracer);
        begin(&mut tracer, &mut presenter, &mut timeline, &transition, now);
        let mut index = 0;
        let mut captured = false;

        while index < TRANSITION_COUNT {
            now = HostTime(now.ticks() + TICK_NS);
            let progress = timeline.progress(now);
            presenter.sample(progress);

            if !captured && progress >= 0.5 {
                let name = format!("{index:03}-{}.svg", transition.step.name());
                fs::write(out_dir.join(name), presenter.document().to_string())
                    .expect("failed to write SVG frame");
                captured = true;
            }

            if timeline.poll(now) {
                tracer.transition_end(&TransitionEndEvent {
                    cycle: transition.cycle,
                    step: transition.step,
                    timestamp: now,
                });
                index += 1;
                captured = false;
                transition = animator.on_transition_end(&mut tracer);
                begin(&mut tracer, &mut presenter, &mut timeline, &transition, now);
            }
        }
    }

    let path = out_dir.join("trace.json");
    let file = File::create(&path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    mapreduce_debug::chrome::export(tee.recorder.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {TRANSITION_COUNT} frames and {} to {} (reached generation {}, cycle {})",
        path.display(),
        out_dir.display(),
        animator.generation(),
        animator.cycle(),
    );
}

fn begin(
    tracer: &mut Tracer<'_>,
    presenter: &mut SvgPresenter,
    timeline: &mut Timeline,
    transition: &Transition,
    now: HostTime,
) {
    presenter.apply(transition);
    timeline.begin(now);
    tracer.transition_begin(&TransitionBeginEvent {
        cycle: transition.cycle,
        step: transition.step,
        timestamp: now,
    });
}
