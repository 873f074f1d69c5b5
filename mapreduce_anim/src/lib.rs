// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer model and step machine for the animated map/reduce diagram.
//!
//! `mapreduce_anim` holds everything about the diagram that is not drawing:
//! the layers of sized pieces, the transformations that move pieces between
//! them, and the state machine that applies those transformations one step
//! at a time. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Timeline::poll() ──► Animator::on_transition_end()
//!                              │
//!                              ▼
//!                  LayerStore::{split, map, join, reduce, tidy_up}
//!                              │
//!                              ▼
//!            LayerStore::snapshot() ──► Frame ──► FrameChanges
//!                                                    │
//!                 ┌──────────────────────────────────┘
//!                 ▼
//!   Transition ──► Presenter::apply() ──► Presenter::sample()
//! ```
//!
//! **[`layer`]**: Generation-indexed layer arena, pieces and their keys,
//! frame capture and keyed diffing.
//!
//! **[`animator`]**: The `Setup → PreMap → Map → PostMap → Reduce →
//! PostReduce` cycle, the step label and the restart rule.
//!
//! **[`timeline`]**: Fixed-duration transition pacing against [`time`].
//!
//! **[`backend`]**: The [`Presenter`](backend::Presenter) trait implemented
//! by drawing crates.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! step-loop instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-piece
//!   change events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animator;
pub mod backend;
pub mod layer;
pub mod time;
pub mod timeline;
pub mod trace;
