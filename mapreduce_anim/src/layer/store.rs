// Copyright 2026 the Map/Reduce Diagram Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generation-indexed layer arena and the piece transformations.

use alloc::vec::Vec;

use crate::animator::AnimatorConfig;

use super::id::{Generation, PieceKey};
use super::piece::Piece;

/// One column of the diagram: the pieces held at a single generation.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    generation: Generation,
    pieces: Vec<Piece>,
}

impl Layer {
    fn new(generation: Generation) -> Self {
        Self {
            generation,
            pieces: Vec::new(),
        }
    }

    /// Returns the generation of this layer.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns the pieces in offset order.
    #[inline]
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Returns whether the layer holds no pieces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Returns the sum of all piece sizes.
    #[must_use]
    pub fn total_size(&self) -> f64 {
        // `Sum` for floats starts at -0.0; an empty layer must total +0.0.
        self.pieces.iter().fold(0.0, |acc, p| acc + p.size)
    }

    /// Appends a piece at the current end of the layer.
    fn push(&mut self, size: f64, done: bool, parent: Option<PieceKey>) {
        let offset = self.total_size();
        self.pieces.push(Piece {
            offset,
            size,
            done,
            parent,
        });
    }

    /// Reassigns offsets as the running sum of sizes.
    fn restack(&mut self) {
        let mut offset = 0.0;
        for piece in &mut self.pieces {
            piece.offset = offset;
            offset += piece.size;
        }
    }
}

/// Arena of layers addressed by [`Generation`].
///
/// Layers are created on first use and are never removed while a run is in
/// progress; [`reset`](Self::reset) discards all of them at once. Asking for a
/// generation past the end fills the gap with empty layers, so slot `i` always
/// holds generation `2 * i`.
#[derive(Clone, Debug)]
pub struct LayerStore {
    config: AnimatorConfig,
    layers: Vec<Layer>,
}

impl LayerStore {
    /// Creates an empty store using the sizes and factors in `config`.
    #[must_use]
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            config,
            layers: Vec::new(),
        }
    }

    /// Returns the configuration the store was created with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Discards every layer and seeds the starting state.
    ///
    /// Generation 0 gets one reduced piece of `start_size`; generation 2 gets
    /// the mapped output of that piece, already split into `piece_size`
    /// chunks.
    pub fn reset(&mut self) {
        self.layers.clear();
        let AnimatorConfig {
            start_size,
            piece_size,
            growth,
            ..
        } = self.config;
        let seed = Generation::ZERO;
        self.layer_mut(seed).push(start_size, true, None);
        self.layer_mut(seed.ahead(1))
            .push(start_size * growth, false, None);
        self.split(seed.ahead(1), piece_size);
    }

    /// Returns the layer at `generation`, if it has been created.
    #[must_use]
    pub fn layer(&self, generation: Generation) -> Option<&Layer> {
        self.layers.get(generation.index())
    }

    /// Returns all created layers in generation order.
    #[inline]
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns the total size held at `generation` (zero if absent).
    #[must_use]
    pub fn total_size(&self, generation: Generation) -> f64 {
        self.layer(generation).map_or(0.0, Layer::total_size)
    }

    /// Iterates over every piece with its generation, layer by layer.
    pub fn pieces(&self) -> impl Iterator<Item = (Generation, &Piece)> + '_ {
        self.layers
            .iter()
            .flat_map(|layer| layer.pieces.iter().map(move |p| (layer.generation, p)))
    }

    /// Replaces the first piece of the layer with chunks of `chunk_size`.
    ///
    /// Does nothing if the layer is empty or does not exist yet.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is not positive.
    pub fn split(&mut self, generation: Generation, chunk_size: f64) {
        let Some(layer) = self.layers.get_mut(generation.index()) else {
            return;
        };
        if let Some(first) = layer.pieces.first() {
            layer.pieces = first.split(chunk_size);
        }
    }

    /// Sends a grown copy of every piece to the layers one and two steps
    /// ahead.
    ///
    /// Each copy records the key of its source piece. Calling this again for
    /// the same generation first drops the copies made by the previous call,
    /// so downstream layers never hold duplicates.
    pub fn map(&mut self, generation: Generation) {
        let growth = self.config.growth;
        let sources: Vec<(PieceKey, f64)> = match self.layer(generation) {
            Some(layer) => layer
                .pieces
                .iter()
                .map(|p| (p.key(generation), p.size * growth))
                .collect(),
            None => Vec::new(),
        };

        for target in [generation.ahead(1), generation.ahead(2)] {
            let layer = self.layer_mut(target);
            let before = layer.pieces.len();
            layer
                .pieces
                .retain(|p| p.parent.is_none_or(|k| k.generation() != generation));
            if layer.pieces.len() != before {
                layer.restack();
            }
            for &(parent, size) in &sources {
                layer.push(size, false, Some(parent));
            }
        }
    }

    /// Collapses the layer into a single reduced piece holding its total.
    pub fn join(&mut self, generation: Generation) {
        let layer = self.layer_mut(generation);
        let total = layer.total_size();
        layer.pieces.clear();
        layer.push(total, true, None);
    }

    /// Appends a reduced piece of `total * shrinkage` and drops every other
    /// piece.
    ///
    /// The survivor keeps the offset it was appended at (the pre-reduce
    /// total) until [`tidy_up`](Self::tidy_up) moves it back to zero.
    pub fn reduce(&mut self, generation: Generation) {
        let shrinkage = self.config.shrinkage;
        let layer = self.layer_mut(generation);
        let total = layer.total_size();
        layer.push(total * shrinkage, true, None);
        let last = layer.pieces.len() - 1;
        layer.pieces.drain(..last);
    }

    /// Moves the last piece of the layer back to offset zero.
    ///
    /// Returns the offset it had before, or `None` if the layer is empty.
    pub fn tidy_up(&mut self, generation: Generation) -> Option<f64> {
        let piece = self
            .layers
            .get_mut(generation.index())
            .and_then(|layer| layer.pieces.last_mut())?;
        let previous = piece.offset;
        piece.offset = 0.0;
        Some(previous)
    }

    /// Returns the layer at `generation`, creating it (and any missing
    /// layers before it) if needed.
    fn layer_mut(&mut self, generation: Generation) -> &mut Layer {
        let index = generation.index();
        while self.layers.len() <= index {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "layer count is bounded by u32 generations"
            )]
            let next = Generation::new(2 * self.layers.len() as u32);
            self.layers.push(Layer::new(next));
        }
        &mut self.layers[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(n: u32) -> Generation {
        Generation::new(n)
    }

    fn store() -> LayerStore {
        let mut store = LayerStore::new(AnimatorConfig::diagram());
        store.reset();
        store
    }

    fn shape(store: &LayerStore, generation: Generation) -> Vec<(f64, f64)> {
        store
            .layer(generation)
            .map(|l| l.pieces().iter().map(|p| (p.offset, p.size)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn reset_seeds_first_two_layers() {
        let store = store();
        assert_eq!(store.layers().len(), 2);
        assert_eq!(shape(&store, g(0)), [(0.0, 60.0)]);
        assert!(store.layer(g(0)).unwrap().pieces()[0].done);
        assert_eq!(shape(&store, g(2)), [(0.0, 30.0), (30.0, 18.0)]);
        assert!(store.layer(g(2)).unwrap().pieces().iter().all(|p| !p.done));
    }

    #[test]
    fn reset_discards_previous_run() {
        let mut store = store();
        store.map(g(0));
        assert_eq!(store.layers().len(), 3);
        store.reset();
        assert_eq!(store.layers().len(), 2);
        assert_eq!(shape(&store, g(2)), [(0.0, 30.0), (30.0, 18.0)]);
    }

    #[test]
    fn split_missing_or_empty_layer_is_noop() {
        let mut store = store();
        store.split(g(8), 30.0);
        assert!(store.layer(g(8)).is_none(), "split never creates layers");
        store.join(g(4));
        store.layers[2].pieces.clear();
        store.split(g(4), 30.0);
        assert!(store.layer(g(4)).unwrap().is_empty());
    }

    #[test]
    fn map_fills_the_two_layers_ahead() {
        let mut store = store();
        store.split(g(0), 30.0);
        store.map(g(0));

        // 48 already at generation 2, then two copies of 24.
        assert_eq!(
            shape(&store, g(2)),
            [(0.0, 30.0), (30.0, 18.0), (48.0, 24.0), (72.0, 24.0)]
        );
        assert_eq!(shape(&store, g(4)), [(0.0, 24.0), (24.0, 24.0)]);

        let parents: Vec<_> = store
            .layer(g(4))
            .unwrap()
            .pieces()
            .iter()
            .map(|p| p.parent)
            .collect();
        assert_eq!(
            parents,
            [
                Some(PieceKey::new(g(0), 0.0, 30.0)),
                Some(PieceKey::new(g(0), 30.0, 30.0)),
            ]
        );
    }

    #[test]
    fn map_is_idempotent() {
        let mut store = store();
        store.split(g(0), 30.0);
        store.map(g(0));
        let two = shape(&store, g(2));
        let four = shape(&store, g(4));
        store.map(g(0));
        assert_eq!(shape(&store, g(2)), two);
        assert_eq!(shape(&store, g(4)), four);
    }

    #[test]
    fn map_keeps_contributions_from_other_generations() {
        let mut store = store();
        store.split(g(0), 30.0);
        store.map(g(0));
        store.map(g(2));
        // Generation 4 holds the copies from 0 followed by those from 2.
        let four = store.layer(g(4)).unwrap();
        let from: Vec<_> = four
            .pieces()
            .iter()
            .map(|p| p.parent.unwrap().generation())
            .collect();
        assert_eq!(from, [g(0), g(0), g(2), g(2), g(2), g(2)]);

        store.map(g(2));
        assert_eq!(store.layer(g(4)).unwrap().pieces().len(), 6);
    }

    #[test]
    fn join_conserves_total() {
        let mut store = store();
        let before = store.total_size(g(2));
        store.join(g(2));
        let layer = store.layer(g(2)).unwrap();
        assert_eq!(layer.pieces().len(), 1);
        assert_eq!(layer.pieces()[0].size, before);
        assert!(layer.pieces()[0].done);
    }

    #[test]
    fn reduce_keeps_single_shrunk_piece() {
        let mut store = store();
        store.split(g(0), 30.0);
        store.map(g(0));
        let total = store.total_size(g(2));
        store.reduce(g(2));
        let layer = store.layer(g(2)).unwrap();
        assert_eq!(layer.pieces().len(), 1);
        let piece = layer.pieces()[0];
        assert!((piece.size - total * 0.8).abs() < 1e-9);
        assert_eq!(piece.offset, total, "survivor sits at the old total");
        assert!(piece.done);
    }

    #[test]
    fn tidy_up_moves_last_piece_to_zero() {
        let mut store = store();
        store.reduce(g(2));
        assert_eq!(store.tidy_up(g(2)), Some(48.0));
        assert_eq!(store.layer(g(2)).unwrap().pieces()[0].offset, 0.0);
        assert_eq!(store.tidy_up(g(10)), None);
    }

    #[test]
    fn pieces_iterates_layer_then_offset() {
        let store = store();
        let keys: Vec<_> = store.pieces().map(|(gen_, p)| p.key(gen_)).collect();
        assert_eq!(
            keys,
            [
                PieceKey::new(g(0), 0.0, 60.0),
                PieceKey::new(g(2), 0.0, 30.0),
                PieceKey::new(g(2), 30.0, 18.0),
            ]
        );
    }

    #[test]
    fn pushed_pieces_start_at_positive_zero() {
        let mut store = store();
        let seed = store.layer(g(0)).unwrap().pieces()[0];
        assert!(seed.offset.is_sign_positive());
        assert_eq!(seed.key(g(0)), PieceKey::new(g(0), 0.0, 60.0));

        store.join(g(2));
        let joined = store.layer(g(2)).unwrap().pieces()[0];
        assert!(joined.offset.is_sign_positive());
        assert_eq!(joined.key(g(2)), PieceKey::new(g(2), 0.0, 48.0));

        // First copy pushed into a fresh layer.
        store.map(g(2));
        let copy = store.layer(g(6)).unwrap().pieces()[0];
        assert!(copy.offset.is_sign_positive());
        assert_eq!(store.total_size(g(10)), 0.0);
        assert!(store.total_size(g(10)).is_sign_positive());
    }

    #[test]
    fn layer_gaps_are_filled() {
        let mut store = LayerStore::new(AnimatorConfig::diagram());
        store.map(g(4));
        let generations: Vec<_> = store.layers().iter().map(Layer::generation).collect();
        assert_eq!(generations, [g(0), g(2), g(4), g(6), g(8)]);
    }
}
