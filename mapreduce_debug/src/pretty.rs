// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use mapreduce_anim::time::{HostTime, Timebase};
use mapreduce_anim::trace::{
    FrameEvent, PieceChange, RestartEvent, StepEvent, TraceSink, TransitionBeginEvent,
    TransitionEndEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_step(&mut self, e: &StepEvent) {
        let _ = writeln!(
            self.writer,
            "[step] cycle={} {} layer={} generation={}",
            e.cycle,
            e.step.name(),
            e.layer,
            e.generation,
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] cycle={} {} pieces={} +{} ={} -{}",
            e.cycle,
            e.step.name(),
            e.pieces,
            e.entered,
            e.updated,
            e.exited,
        );
    }

    fn on_restart(&mut self, e: &RestartEvent) {
        let _ = writeln!(
            self.writer,
            "[restart] cycle={} reached={}",
            e.cycle, e.reached,
        );
    }

    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[transition:begin] cycle={} {} at {:.1}ms",
            e.cycle,
            e.step.name(),
            self.host_ms(e.timestamp),
        );
    }

    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        let _ = writeln!(
            self.writer,
            "[transition:end] cycle={} {} at {:.1}ms",
            e.cycle,
            e.step.name(),
            self.host_ms(e.timestamp),
        );
    }

    fn on_piece_changes(&mut self, cycle: u64, changes: &[PieceChange]) {
        let _ = writeln!(
            self.writer,
            "[pieces] cycle={cycle} changes={}",
            changes.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapreduce_anim::animator::Step;
    use mapreduce_anim::layer::Generation;

    #[test]
    fn pretty_print_step() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_step(&StepEvent {
            cycle: 1,
            step: Step::PostReduce,
            layer: Generation::new(4),
            generation: Generation::new(4),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[step]"), "got: {output}");
        assert!(output.contains("post-reduce layer=4"), "got: {output}");
    }

    #[test]
    fn pretty_print_transition_in_millis() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_transition_end(&TransitionEndEvent {
            cycle: 0,
            step: Step::Map,
            timestamp: HostTime(2_500_000_000),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[transition:end] cycle=0 map at 2500.0ms\n");
    }
}
