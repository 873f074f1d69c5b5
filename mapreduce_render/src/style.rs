// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colours, rectangle styles and scene layout constants.

use core::fmt;

use kurbo::{Rect, Size};
use mapreduce_anim::layer::Generation;

/// An opaque sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// CSS `blue`.
    pub const BLUE: Self = Self::new(0, 0, 255);
    /// CSS `red`.
    pub const RED: Self = Self::new(255, 0, 0);
    /// CSS `grey`.
    pub const GREY: Self = Self::new(128, 128, 128);

    /// Creates a colour from its channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Formats as a `#rrggbb` hex triplet.
impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Everything needed to draw one piece at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectStyle {
    /// Geometry in figure coordinates.
    pub rect: Rect,
    /// Fill colour.
    pub fill: Rgb8,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
    /// Outline opacity in `[0, 1]`; zero means no outline.
    pub stroke_opacity: f64,
}

impl RectStyle {
    /// A fully opaque, unstroked rectangle.
    #[must_use]
    pub const fn solid(rect: Rect, fill: Rgb8) -> Self {
        Self {
            rect,
            fill,
            fill_opacity: 1.0,
            stroke_opacity: 0.0,
        }
    }

    /// Returns a copy with the same top edge and the given height.
    #[must_use]
    pub fn with_height(self, height: f64) -> Self {
        Self {
            rect: Rect::from_origin_size(self.rect.origin(), Size::new(self.rect.width(), height)),
            ..self
        }
    }

    /// Returns a copy with a different fill opacity.
    #[must_use]
    pub const fn with_fill_opacity(self, fill_opacity: f64) -> Self {
        Self {
            fill_opacity,
            ..self
        }
    }

    /// Returns a copy with a different outline opacity.
    #[must_use]
    pub const fn with_stroke_opacity(self, stroke_opacity: f64) -> Self {
        Self {
            stroke_opacity,
            ..self
        }
    }

    /// Interpolates geometry and opacities; the fill colour is taken from
    /// `to`.
    #[must_use]
    pub fn lerp(self, to: Self, t: f64) -> Self {
        let origin = self.rect.origin().lerp(to.rect.origin(), t);
        let size = Size::new(
            lerp(self.rect.width(), to.rect.width(), t),
            lerp(self.rect.height(), to.rect.height(), t),
        );
        Self {
            rect: Rect::from_origin_size(origin, size),
            fill: to.fill,
            fill_opacity: lerp(self.fill_opacity, to.fill_opacity, t),
            stroke_opacity: lerp(self.stroke_opacity, to.stroke_opacity, t),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Layout and colours of the drawn diagram.
///
/// Vertical positions are in pixels; the header and label baselines are
/// measured from the top of the document, piece rectangles from the top of
/// the figure area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    /// Width of one column; a piece at generation `g` is drawn at
    /// `g * piece_width`.
    pub piece_width: f64,
    /// Gap inserted between neighbouring pieces of a split layer.
    pub pad: f64,
    /// Document height.
    pub height: f64,
    /// Top of the figure area that holds the pieces.
    pub figure_top: f64,
    /// Baseline of the column headers.
    pub header_baseline: f64,
    /// Baseline of the step label.
    pub label_baseline: f64,
    /// Last generation with a numbered header; later columns show `…`.
    pub max_generation: Generation,
    /// Fill of reduced pieces.
    pub done_fill: Rgb8,
    /// Fill of pieces still waiting for a reduce.
    pub pending_fill: Rgb8,
    /// Outline of freshly split pieces.
    pub stroke: Rgb8,
}

impl SceneConfig {
    /// The layout the diagram is drawn with.
    #[must_use]
    pub const fn diagram() -> Self {
        Self {
            piece_width: 40.0,
            pad: 5.0,
            height: 300.0,
            figure_top: 48.0,
            header_baseline: 16.0,
            label_baseline: 40.0,
            max_generation: Generation::new(12),
            done_fill: Rgb8::BLUE,
            pending_fill: Rgb8::RED,
            stroke: Rgb8::GREY,
        }
    }

    /// Returns the x coordinate of the left edge of column `generation`.
    #[must_use]
    pub fn column_x(&self, generation: Generation) -> f64 {
        f64::from(generation.get()) * self.piece_width
    }

    /// Returns the x coordinate of the centre of the slot after
    /// `generation`, where its header and label sit.
    #[must_use]
    pub fn slot_centre(&self, generation: Generation) -> f64 {
        (f64::from(generation.get()) + 0.5) * self.piece_width
    }

    /// Returns the document width: every header column plus one spare.
    #[must_use]
    pub fn width(&self) -> f64 {
        f64::from(self.max_generation.get() + 4) * self.piece_width
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::diagram()
    }
}
