// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Transitions become duration slices named after their step. Step, frame
//! and restart events carry no timestamp of their own, so they are placed at
//! the most recent transition boundary.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use mapreduce_anim::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut now_us = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::TransitionBegin(e) => {
                now_us = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "B",
                    "name": e.step.name(),
                    "cat": "Transition",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "cycle": e.cycle,
                    }
                }));
            }
            RecordedEvent::TransitionEnd(e) => {
                now_us = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "E",
                    "name": e.step.name(),
                    "cat": "Transition",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "cycle": e.cycle,
                    }
                }));
            }
            RecordedEvent::Step(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Step",
                    "cat": "Animator",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "cycle": e.cycle,
                        "step": e.step.name(),
                        "layer": e.layer.get(),
                        "generation": e.generation.get(),
                    }
                }));
            }
            RecordedEvent::Frame(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": "Pieces",
                    "cat": "Animator",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "total": e.pieces,
                        "entered": e.entered,
                        "updated": e.updated,
                        "exited": e.exited,
                    }
                }));
            }
            RecordedEvent::Restart(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Restart",
                    "cat": "Animator",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "cycle": e.cycle,
                        "reached": e.reached.get(),
                    }
                }));
            }
            RecordedEvent::PieceChangesCount { cycle, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "PieceChanges",
                    "cat": "Rich",
                    "ts": now_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "cycle": cycle,
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
