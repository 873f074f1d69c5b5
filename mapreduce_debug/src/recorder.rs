// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Per-piece events ([`on_piece_changes`](TraceSink::on_piece_changes)) store
//! only the count.

use mapreduce_anim::animator::Step;
use mapreduce_anim::layer::Generation;
use mapreduce_anim::time::HostTime;
use mapreduce_anim::trace::{
    FrameEvent, PieceChange, RestartEvent, StepEvent, TraceSink, TransitionBeginEvent,
    TransitionEndEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_STEP: u8 = 1;
const TAG_FRAME: u8 = 2;
const TAG_RESTART: u8 = 3;
const TAG_TRANSITION_BEGIN: u8 = 4;
const TAG_TRANSITION_END: u8 = 5;
const TAG_PIECE_CHANGES_COUNT: u8 = 6;

const STEPS: [Step; 6] = [
    Step::Setup,
    Step::PreMap,
    Step::Map,
    Step::PostMap,
    Step::Reduce,
    Step::PostReduce,
];

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "counts capped at u32::MAX for recording"
    )]
    fn write_count(&mut self, n: usize) {
        self.write_u32(n.min(u32::MAX as usize) as u32);
    }

    fn write_generation(&mut self, g: Generation) {
        self.write_u32(g.get());
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "STEPS has six entries"
    )]
    fn write_step(&mut self, step: Step) {
        let index = STEPS.iter().position(|&s| s == step).unwrap_or_default();
        self.write_u8(index as u8);
    }
}

impl TraceSink for RecorderSink {
    fn on_step(&mut self, e: &StepEvent) {
        self.write_u8(TAG_STEP);
        self.write_u64(e.cycle);
        self.write_step(e.step);
        self.write_generation(e.layer);
        self.write_generation(e.generation);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_u8(TAG_FRAME);
        self.write_u64(e.cycle);
        self.write_step(e.step);
        self.write_count(e.pieces);
        self.write_count(e.entered);
        self.write_count(e.updated);
        self.write_count(e.exited);
    }

    fn on_restart(&mut self, e: &RestartEvent) {
        self.write_u8(TAG_RESTART);
        self.write_u64(e.cycle);
        self.write_generation(e.reached);
    }

    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        self.write_u8(TAG_TRANSITION_BEGIN);
        self.write_u64(e.cycle);
        self.write_step(e.step);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        self.write_u8(TAG_TRANSITION_END);
        self.write_u64(e.cycle);
        self.write_step(e.step);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_piece_changes(&mut self, cycle: u64, changes: &[PieceChange]) {
        self.write_u8(TAG_PIECE_CHANGES_COUNT);
        self.write_u64(cycle);
        self.write_count(changes.len());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`StepEvent`].
    Step(StepEvent),
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`RestartEvent`].
    Restart(RestartEvent),
    /// A [`TransitionBeginEvent`].
    TransitionBegin(TransitionBeginEvent),
    /// A [`TransitionEndEvent`].
    TransitionEnd(TransitionEndEvent),
    /// Per-piece change count for a transition.
    PieceChangesCount {
        /// Run counter.
        cycle: u64,
        /// Number of piece changes.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Iteration stops at the first truncated or malformed record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_count(&mut self) -> Option<usize> {
        self.read_u32().map(|n| n as usize)
    }

    fn read_generation(&mut self) -> Option<Generation> {
        let value = self.read_u32()?;
        (value % 2 == 0).then(|| Generation::new(value))
    }

    fn read_step(&mut self) -> Option<Step> {
        STEPS.get(usize::from(self.read_u8()?)).copied()
    }

    fn decode_step(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Step(StepEvent {
            cycle: self.read_u64()?,
            step: self.read_step()?,
            layer: self.read_generation()?,
            generation: self.read_generation()?,
        }))
    }

    fn decode_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Frame(FrameEvent {
            cycle: self.read_u64()?,
            step: self.read_step()?,
            pieces: self.read_count()?,
            entered: self.read_count()?,
            updated: self.read_count()?,
            exited: self.read_count()?,
        }))
    }

    fn decode_restart(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Restart(RestartEvent {
            cycle: self.read_u64()?,
            reached: self.read_generation()?,
        }))
    }

    fn decode_transition_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransitionBegin(TransitionBeginEvent {
            cycle: self.read_u64()?,
            step: self.read_step()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_transition_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransitionEnd(TransitionEndEvent {
            cycle: self.read_u64()?,
            step: self.read_step()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_piece_changes_count(&mut self) -> Option<RecordedEvent> {
        let cycle = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::PieceChangesCount { cycle, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_STEP => self.decode_step(),
            TAG_FRAME => self.decode_frame(),
            TAG_RESTART => self.decode_restart(),
            TAG_TRANSITION_BEGIN => self.decode_transition_begin(),
            TAG_TRANSITION_END => self.decode_transition_end(),
            TAG_PIECE_CHANGES_COUNT => self.decode_piece_changes_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
