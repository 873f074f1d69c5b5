// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG output.
//!
//! [`SvgPresenter`] keeps a [`Scene`] in sync with the animator and renders
//! the scene, sampled at the current transition progress, as a standalone
//! SVG document. Headers and the step label sit at the top of the document;
//! pieces are drawn inside a nested `<svg>` offset by the figure top.

use core::fmt;

use mapreduce_anim::animator::Transition;
use mapreduce_anim::backend::Presenter;

use crate::scene::Scene;
use crate::style::{RectStyle, SceneConfig};

/// Renders transitions as SVG documents.
#[derive(Clone, Debug)]
pub struct SvgPresenter {
    scene: Scene,
    progress: f64,
}

impl SvgPresenter {
    /// Creates a presenter with an empty scene.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self {
            scene: Scene::new(config),
            progress: 1.0,
        }
    }

    /// Returns the scene being drawn.
    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the progress the next document is sampled at.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Returns a view that formats the current state as SVG.
    #[must_use]
    pub fn document(&self) -> SvgDocument<'_> {
        SvgDocument {
            scene: &self.scene,
            progress: self.progress,
        }
    }
}

impl Presenter for SvgPresenter {
    fn apply(&mut self, transition: &Transition) {
        self.scene.build(transition);
        self.progress = 0.0;
    }

    fn sample(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, 1.0);
    }
}

/// A scene sampled at one instant, formatted as an SVG document by its
/// [`Display`](fmt::Display) impl.
#[derive(Clone, Copy, Debug)]
pub struct SvgDocument<'a> {
    scene: &'a Scene,
    progress: f64,
}

impl fmt::Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.scene.config();
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            config.width(),
            config.height
        )?;
        for header in self.scene.headers() {
            writeln!(
                f,
                r#"  <text x="{}" y="{}" text-anchor="middle">{}</text>"#,
                header.x, config.header_baseline, header.text
            )?;
        }
        if let Some(label) = self.scene.label() {
            writeln!(
                f,
                r#"  <text x="{}" y="{}" text-anchor="middle">{}</text>"#,
                label.x, config.label_baseline, label.text
            )?;
        }
        writeln!(f, r#"  <svg y="{}">"#, config.figure_top)?;
        for tween in self.scene.tweens() {
            if let Some(style) = tween.sample(self.progress) {
                write_rect(f, config, &style)?;
            }
        }
        writeln!(f, "  </svg>")?;
        writeln!(f, "</svg>")
    }
}

fn write_rect(f: &mut fmt::Formatter<'_>, config: &SceneConfig, style: &RectStyle) -> fmt::Result {
    let r = style.rect;
    write!(
        f,
        r#"    <rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
        r.x0,
        r.y0,
        r.width(),
        r.height(),
        style.fill
    )?;
    if style.fill_opacity < 1.0 {
        write!(f, r#" fill-opacity="{}""#, style.fill_opacity)?;
    }
    if style.stroke_opacity > 0.0 {
        write!(
            f,
            r#" stroke="{}" stroke-opacity="{}""#,
            config.stroke, style.stroke_opacity
        )?;
    }
    writeln!(f, "/>")
}
