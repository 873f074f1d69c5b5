// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer and piece data model.
//!
//! A *layer* is one column of the diagram, identified by an even
//! [`Generation`]. It holds an ordered run of *pieces*, each a sized block
//! whose offset is the running sum of the sizes before it.
//!
//! - The [`LayerStore`] owns every layer in an append-only arena indexed by
//!   `generation / 2` and implements the transformations the animation steps
//!   through: [`split`](LayerStore::split), [`map`](LayerStore::map),
//!   [`join`](LayerStore::join), [`reduce`](LayerStore::reduce) and
//!   [`tidy_up`](LayerStore::tidy_up).
//! - Pieces are rebuilt by every transformation. The only in-place edit is
//!   the offset reset done by `tidy_up`.
//! - A piece is identified across frames by its [`PieceKey`]
//!   `(generation, offset, size)`. Mapped pieces point back at their source
//!   through that key rather than through a reference.
//!
//! [`LayerStore::snapshot`] turns the store into a [`Frame`], and
//! [`FrameChanges`] diffs two frames into enter/update/exit sets.

mod evaluate;
mod id;
mod piece;
mod store;

pub use evaluate::{Frame, FrameChanges, FramePiece};
pub use id::{Generation, PieceKey};
pub use piece::Piece;
pub use store::{Layer, LayerStore};
