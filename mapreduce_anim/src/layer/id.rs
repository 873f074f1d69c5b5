// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer and piece identity types.

use core::fmt;

/// An even position along the summed axis of the diagram.
///
/// Generation `g` is drawn in column `g`; layers live at every second
/// column, so the layer arena is indexed by `g / 2`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u32);

impl Generation {
    /// The first generation.
    pub const ZERO: Self = Self(0);

    /// Creates a generation from an even value.
    ///
    /// # Panics
    ///
    /// Panics if `value` is odd.
    #[inline]
    #[must_use]
    pub const fn new(value: u32) -> Self {
        assert!(value % 2 == 0, "generation must be even");
        Self(value)
    }

    /// Returns the raw generation value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the slot of this generation in the layer arena.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 / 2) as usize
    }

    /// Returns the generation `steps` layers further along.
    ///
    /// `ahead(1)` is two columns to the right.
    #[inline]
    #[must_use]
    pub const fn ahead(self, steps: u32) -> Self {
        Self(self.0 + 2 * steps)
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generation({})", self.0)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Identity of a piece across frames: `(generation, offset, size)`.
///
/// Offsets and sizes are stored as `f64` bit patterns so the key can be
/// hashed and compared exactly. Two pieces that render at the same place with
/// the same size are the same piece as far as the presentation layer is
/// concerned.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceKey {
    generation: Generation,
    offset_bits: u64,
    size_bits: u64,
}

impl PieceKey {
    /// Creates a key from its parts.
    #[inline]
    #[must_use]
    pub fn new(generation: Generation, offset: f64, size: f64) -> Self {
        // Adding +0.0 folds -0.0 into +0.0 so both map to one key.
        Self {
            generation,
            offset_bits: (offset + 0.0).to_bits(),
            size_bits: (size + 0.0).to_bits(),
        }
    }

    /// Returns the generation of the layer holding the piece.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> Generation {
        self.generation
    }

    /// Returns the piece offset.
    #[inline]
    #[must_use]
    pub fn offset(self) -> f64 {
        f64::from_bits(self.offset_bits)
    }

    /// Returns the piece size.
    #[inline]
    #[must_use]
    pub fn size(self) -> f64 {
        f64::from_bits(self.size_bits)
    }
}

impl fmt::Debug for PieceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PieceKey({self})")
    }
}

impl fmt::Display for PieceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.generation, self.offset(), self.size())
    }
}
