// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A sized sub-range of a layer.

use alloc::vec::Vec;

use super::id::{Generation, PieceKey};

/// One contiguous block of a layer.
///
/// `size` is the number of elements the block stands for and `offset` is
/// where it starts within its layer. Pieces produced by a map step remember
/// the key of the piece they came from so the presentation layer can animate
/// them out of their source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Piece {
    /// Position within the layer (sum of the sizes of the preceding pieces).
    pub offset: f64,
    /// Magnitude of the piece.
    pub size: f64,
    /// Whether the piece has been reduced.
    pub done: bool,
    /// Key of the piece this one was mapped from, if any.
    ///
    /// This is a lookup key, not an ownership edge: the source piece is
    /// usually gone by the time anyone reads it.
    pub parent: Option<PieceKey>,
}

impl Piece {
    /// Creates a piece with no parent.
    #[inline]
    #[must_use]
    pub const fn new(offset: f64, size: f64, done: bool) -> Self {
        Self {
            offset,
            size,
            done,
            parent: None,
        }
    }

    /// Returns the identity key of this piece when held by `generation`.
    #[inline]
    #[must_use]
    pub fn key(&self, generation: Generation) -> PieceKey {
        PieceKey::new(generation, self.offset, self.size)
    }

    /// Cuts this piece into chunks of `chunk_size`, plus a remainder chunk if
    /// the size is not an exact multiple.
    ///
    /// Chunk offsets restart at zero and keep the `done` flag of `self`.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is not positive.
    #[must_use]
    pub fn split(&self, chunk_size: f64) -> Vec<Self> {
        assert!(chunk_size > 0.0, "chunk size must be positive");
        // Truncation is floor for the non-negative sizes pieces carry.
        #[expect(
            clippy::cast_possible_truncation,
            reason = "piece sizes are non-negative and far below usize::MAX chunks"
        )]
        let whole = (self.size / chunk_size) as usize;
        let mut chunks = Vec::with_capacity(whole + 1);
        for i in 0..whole {
            chunks.push(Self::new(i as f64 * chunk_size, chunk_size, self.done));
        }
        let remainder = self.size % chunk_size;
        if remainder > 0.0 {
            chunks.push(Self::new(whole as f64 * chunk_size, remainder, self.done));
        }
        chunks
    }
}
