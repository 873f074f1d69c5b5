// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing for the map/reduce diagram.
//!
//! This crate sits between [`mapreduce_anim`]'s transitions and an output
//! surface. It defines:
//!
//! - [`SceneConfig`] and [`RectStyle`]: layout constants and the per-piece
//!   drawing state
//! - [`RectTween`]: how one keyed piece moves over a transition, sampled with
//!   cubic in-out easing
//! - [`Scene`]: the step-specific enter/update/exit rules, column headers and
//!   the step label
//! - [`SvgPresenter`]: a [`Presenter`](mapreduce_anim::backend::Presenter)
//!   that renders the scene as an SVG document

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod scene;
mod style;
mod svg;
mod tween;

pub use scene::{Header, LabelPlacement, Scene};
pub use style::{RectStyle, Rgb8, SceneConfig};
pub use svg::{SvgDocument, SvgPresenter};
pub use tween::{RectTween, TweenKind, ease_cubic_in_out};
