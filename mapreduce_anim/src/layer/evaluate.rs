// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame capture and keyed change tracking.
//!
//! After every transformation the store is captured into a [`Frame`]: the
//! flat list of pieces in layer order, each tagged with its [`PieceKey`] and
//! its position within its layer. Diffing two frames by key yields
//! [`FrameChanges`], the enter/update/exit sets a presenter needs to animate
//! from one frame to the next.
//!
//! Entered and updated entries are indices into the *new* frame. Exited
//! pieces no longer exist anywhere, so they are carried by value.

use alloc::vec::Vec;

use hashbrown::HashSet;

use super::id::{Generation, PieceKey};
use super::piece::Piece;
use super::store::LayerStore;

/// A piece as seen by one rendering frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePiece {
    /// Identity of the piece.
    pub key: PieceKey,
    /// Position of the piece within its layer.
    pub index: usize,
    /// The piece itself.
    pub piece: Piece,
}

impl FramePiece {
    /// Returns the generation of the layer holding the piece.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.key.generation()
    }
}

/// Every piece in the store at one settled point, in layer order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Pieces ordered by generation, then by position within the layer.
    pub pieces: Vec<FramePiece>,
}

impl Frame {
    /// Returns whether the frame holds no pieces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Returns the number of pieces in the frame.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Looks up a piece by key.
    #[must_use]
    pub fn get(&self, key: PieceKey) -> Option<&FramePiece> {
        self.pieces.iter().find(|p| p.key == key)
    }

    /// Returns whether no two pieces share a key.
    #[must_use]
    pub fn has_unique_keys(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.pieces.len());
        self.pieces.iter().all(|p| seen.insert(p.key))
    }
}

/// The keyed difference between two consecutive frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameChanges {
    /// Indices (into the new frame) of pieces that were not in the old one.
    pub entered: Vec<usize>,
    /// Indices (into the new frame) of pieces present in both frames.
    pub updated: Vec<usize>,
    /// Pieces of the old frame that are gone from the new one.
    pub exited: Vec<FramePiece>,
}

impl FrameChanges {
    /// Computes the changes that turn `old` into `new`.
    #[must_use]
    pub fn between(old: &Frame, new: &Frame) -> Self {
        let mut changes = Self::default();
        changes.diff_into(old, new);
        changes
    }

    /// Like [`between`](Self::between), but reuses `self`'s buffers.
    pub fn diff_into(&mut self, old: &Frame, new: &Frame) {
        self.clear();

        let old_keys: HashSet<PieceKey> = old.pieces.iter().map(|p| p.key).collect();
        let new_keys: HashSet<PieceKey> = new.pieces.iter().map(|p| p.key).collect();

        for (i, piece) in new.pieces.iter().enumerate() {
            if old_keys.contains(&piece.key) {
                self.updated.push(i);
            } else {
                self.entered.push(i);
            }
        }
        self.exited.extend(
            old.pieces
                .iter()
                .filter(|p| !new_keys.contains(&p.key))
                .copied(),
        );
    }

    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.entered.clear();
        self.updated.clear();
        self.exited.clear();
    }

    /// Returns whether nothing entered or exited.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}

impl LayerStore {
    /// Captures every piece of the store as a [`Frame`].
    #[must_use]
    pub fn snapshot(&self) -> Frame {
        let mut frame = Frame::default();
        self.snapshot_into(&mut frame);
        frame
    }

    /// Like [`snapshot`](Self::snapshot), but reuses a caller-provided buffer.
    pub fn snapshot_into(&self, frame: &mut Frame) {
        frame.pieces.clear();
        for layer in self.layers() {
            let generation = layer.generation();
            frame
                .pieces
                .extend(layer.pieces().iter().enumerate().map(|(index, piece)| {
                    FramePiece {
                        key: piece.key(generation),
                        index,
                        piece: *piece,
                    }
                }));
        }
    }
}
