// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turns animator transitions into drawable tweens.
//!
//! Each step animates its keyed join differently:
//!
//! | step         | enter                                  | update             | exit                    |
//! |--------------|----------------------------------------|--------------------|-------------------------|
//! | `Setup`      | at split offset                        | held               | removed at once         |
//! | `PreMap`     | at offset, grey outline fades in       | held               | removed at once         |
//! | `Map`        | from parent geometry to split offset   | held               | removed at once         |
//! | `PostMap`    | at offset, fill fades in               | held               | held, then removed      |
//! | `Reduce`     | at split offset, grows from height 0   | held               | shrinks to height 0     |
//! | `PostReduce` | slides from its old offset             | to split offset    | removed at once         |
//!
//! "Held" means the piece stays wherever the previous transition left it,
//! so the scene remembers the last style it produced for every live key.
//! The *split offset* of a piece is its offset plus `index * pad`, which
//! opens small gaps between the pieces of a layer.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;
use mapreduce_anim::animator::{Step, Transition};
use mapreduce_anim::layer::{FramePiece, Generation, PieceKey};

use crate::style::{RectStyle, SceneConfig};
use crate::tween::{RectTween, TweenKind};

/// A column header above the figure.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// The column the header names.
    pub generation: Generation,
    /// `s`, `s + 2`, … or an ellipsis past the maximum generation.
    pub text: String,
    /// Horizontal centre.
    pub x: f64,
}

/// Where the step label is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
    /// Text of the label.
    pub text: &'static str,
    /// Horizontal centre.
    pub x: f64,
}

/// The drawable state of one transition.
#[derive(Clone, Debug)]
pub struct Scene {
    config: SceneConfig,
    headers: Vec<Header>,
    tweens: Vec<RectTween>,
    label: Option<LabelPlacement>,
    held: HashMap<PieceKey, RectStyle>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self {
            headers: headers(&config),
            config,
            tweens: Vec::new(),
            label: None,
            held: HashMap::new(),
        }
    }

    /// Returns the layout.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Returns the column headers.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Returns the tweens of the current transition.
    #[inline]
    #[must_use]
    pub fn tweens(&self) -> &[RectTween] {
        &self.tweens
    }

    /// Returns the label placement, or `None` while the label is hidden.
    #[inline]
    #[must_use]
    pub fn label(&self) -> Option<LabelPlacement> {
        self.label
    }

    /// Returns the tween for `key`, if the piece is drawn.
    #[must_use]
    pub fn tween(&self, key: PieceKey) -> Option<&RectTween> {
        self.tweens.iter().find(|t| t.key == key)
    }

    /// Replaces the current tweens with those for `transition`.
    pub fn build(&mut self, transition: &Transition) -> &[RectTween] {
        self.tweens.clear();
        self.label = transition.label.map(|label| LabelPlacement {
            text: label.text.as_str(),
            x: self.config.slot_centre(label.generation),
        });

        let step = transition.step;
        let frame = &transition.frame;
        let changes = &transition.changes;

        let mut kinds = Vec::new();
        kinds.resize(frame.len(), TweenKind::Update);
        for &i in &changes.entered {
            kinds[i] = TweenKind::Enter;
        }

        for (piece, kind) in frame.pieces.iter().zip(kinds) {
            let tween = match kind {
                TweenKind::Enter => self.enter(step, piece, &changes.exited),
                _ => self.update(step, piece),
            };
            self.tweens.push(tween);
        }
        for piece in &changes.exited {
            if let Some(tween) = self.exit(step, piece) {
                self.tweens.push(tween);
            }
        }

        self.held.clear();
        for tween in &self.tweens {
            if tween.kind != TweenKind::Exit {
                self.held.insert(tween.key, tween.to);
            }
        }
        &self.tweens
    }

    fn enter(&self, step: Step, piece: &FramePiece, exited: &[FramePiece]) -> RectTween {
        let settled = self.split_style(piece);
        let at_offset = self.offset_style(piece);
        let (from, to) = match step {
            Step::Setup => (settled, settled),
            Step::PreMap => {
                let outlined = at_offset.with_stroke_opacity(1.0);
                (at_offset, outlined)
            }
            Step::Map => {
                let source = piece.piece.parent.unwrap_or(piece.key);
                let from = RectStyle {
                    rect: self.rect(source.generation(), source.offset(), source.size()),
                    ..settled
                };
                (from, settled)
            }
            Step::PostMap => (at_offset.with_fill_opacity(0.0), at_offset),
            Step::Reduce => (settled.with_height(0.0), settled),
            Step::PostReduce => {
                // The tidied piece changed key; pick up where its old key was.
                let from = exited
                    .iter()
                    .find(|old| {
                        old.generation() == piece.generation()
                            && old.piece.size.to_bits() == piece.piece.size.to_bits()
                    })
                    .map_or(settled, |old| self.held_style(old));
                (from, settled)
            }
        };
        RectTween {
            key: piece.key,
            kind: TweenKind::Enter,
            from,
            to,
        }
    }

    fn update(&self, step: Step, piece: &FramePiece) -> RectTween {
        let held = self.held_style(piece);
        let to = match step {
            Step::PostReduce => RectStyle {
                rect: self.split_style(piece).rect,
                ..held
            },
            _ => held,
        };
        RectTween {
            key: piece.key,
            kind: TweenKind::Update,
            from: held,
            to,
        }
    }

    fn exit(&self, step: Step, piece: &FramePiece) -> Option<RectTween> {
        let held = self.held_style(piece);
        match step {
            Step::PostMap => Some(RectTween::fixed(piece.key, TweenKind::Exit, held)),
            Step::Reduce => {
                let from = held.with_height(piece.piece.size);
                Some(RectTween {
                    key: piece.key,
                    kind: TweenKind::Exit,
                    from,
                    to: from.with_height(0.0),
                })
            }
            Step::Setup | Step::PreMap | Step::Map | Step::PostReduce => None,
        }
    }

    /// Returns the last style drawn for the piece, or its settled style if
    /// it was never drawn.
    fn held_style(&self, piece: &FramePiece) -> RectStyle {
        self.held
            .get(&piece.key)
            .copied()
            .unwrap_or_else(|| self.split_style(piece))
    }

    /// The piece at its offset plus the gap for its position in the layer.
    fn split_style(&self, piece: &FramePiece) -> RectStyle {
        let offset = piece.piece.offset + piece.index as f64 * self.config.pad;
        self.style(piece, offset)
    }

    /// The piece at its raw offset, with no gaps.
    fn offset_style(&self, piece: &FramePiece) -> RectStyle {
        self.style(piece, piece.piece.offset)
    }

    fn style(&self, piece: &FramePiece, y: f64) -> RectStyle {
        let fill = if piece.piece.done {
            self.config.done_fill
        } else {
            self.config.pending_fill
        };
        RectStyle::solid(self.rect(piece.generation(), y, piece.piece.size), fill)
    }

    fn rect(&self, generation: Generation, y: f64, height: f64) -> Rect {
        let x = self.config.column_x(generation);
        Rect::new(x, y, x + self.config.piece_width, y + height)
    }
}

/// Headers for every column up to one past the maximum generation.
fn headers(config: &SceneConfig) -> Vec<Header> {
    let last = config.max_generation.ahead(1);
    (0..=last.get())
        .step_by(2)
        .map(|value| {
            let generation = Generation::new(value);
            let text = if generation == Generation::ZERO {
                String::from("s")
            } else if generation > config.max_generation {
                String::from("…")
            } else {
                format!("s + {generation}")
            };
            Header {
                generation,
                text,
                x: config.slot_centre(generation),
            }
        })
        .collect()
}
