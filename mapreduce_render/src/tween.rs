// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed rectangle tweens.

use mapreduce_anim::layer::PieceKey;

use crate::style::RectStyle;

/// Cubic in-out easing on `[0, 1]`.
///
/// Inputs outside the unit interval are clamped.
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Which side of the keyed join a tween belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenKind {
    /// The piece is new in this transition.
    Enter,
    /// The piece was already on screen.
    Update,
    /// The piece is gone once the transition ends.
    Exit,
}

/// How one piece is drawn over the course of a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectTween {
    /// The piece being drawn.
    pub key: PieceKey,
    /// Enter, update or exit.
    pub kind: TweenKind,
    /// Style at the start of the transition.
    pub from: RectStyle,
    /// Style at the end of the transition.
    pub to: RectStyle,
}

impl RectTween {
    /// A tween that holds one style for the whole transition.
    #[must_use]
    pub const fn fixed(key: PieceKey, kind: TweenKind, style: RectStyle) -> Self {
        Self {
            key,
            kind,
            from: style,
            to: style,
        }
    }

    /// Returns whether start and end styles are the same.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.from == self.to
    }

    /// Returns the style at linear progress `t`, or `None` once an exiting
    /// piece has been removed.
    #[must_use]
    pub fn sample(&self, t: f64) -> Option<RectStyle> {
        if self.kind == TweenKind::Exit && t >= 1.0 {
            return None;
        }
        Some(self.from.lerp(self.to, ease_cubic_in_out(t)))
    }
}
