//! The per-dimension "lens" abstraction driving the random round-robin
//! selection loop (§4.6 of the design notes).
//!
//! Each dimension that must reach a minimum balance — the ada dimension,
//! and one per required native asset — gets its own [`SelectionLens`].
//! The round-robin driver in [`round_robin`] steps every still-active
//! lens once per round until none remain active, mirroring how
//! `TxConstraints` (see [`crate::constraints`]) gives the engine one
//! trait per caller-pluggable concern instead of bundling everything into
//! a single closure.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::rng::UniformSource;
use crate::utxo_index::{UtxoFilter, UtxoIndex};
use crate::AssetId;

/// The mutable working state the round-robin driver threads through every
/// lens step.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Entries committed to the selection so far.
    pub selected: UtxoIndex,
    /// Entries still available to draw from.
    pub leftover: UtxoIndex,
}

/// One dimension of the round-robin selection loop.
pub trait SelectionLens {
    /// The current total this lens is tracking.
    fn current(&self, state: &SelectionState) -> u64;

    /// The balance this lens must reach.
    fn minimum(&self) -> u64;

    /// Attempt to improve this dimension by drawing one more candidate.
    ///
    /// Returns `false` when the lens should be dropped from the rotation:
    /// either no candidate was available, or the best available
    /// candidate would not improve the selection.
    fn try_select_more(&mut self, state: &mut SelectionState, rng: &mut dyn UniformSource) -> bool;
}

fn distance(a: u64, b: u64) -> u64 {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Whether accepting `candidate` would land closer to `target` than
/// staying at `current`.
fn improves(candidate: u64, current: u64, target: u64) -> bool {
    distance(candidate, target) < distance(current, target)
}

/// The ada/coin dimension. Draws ada-only entries first, falling back to
/// any entry, since spending an asset-bearing UTxO to satisfy the coin
/// dimension alone would pull an unwanted asset into the selection.
pub struct CoinLens {
    minimum: u64,
}

impl CoinLens {
    /// A lens targeting `minimum` lovelace/coin.
    pub fn new(minimum: u64) -> Self {
        CoinLens { minimum }
    }
}

impl SelectionLens for CoinLens {
    fn current(&self, state: &SelectionState) -> u64 {
        state.selected.balance().coin().to_u64()
    }

    fn minimum(&self) -> u64 {
        self.minimum
    }

    fn try_select_more(&mut self, state: &mut SelectionState, rng: &mut dyn UniformSource) -> bool {
        let current = self.current(state);
        let target = self.minimum.saturating_mul(2);
        for filter in [UtxoFilter::AdaOnly, UtxoFilter::Any] {
            if let Some((id, bundle)) = state.leftover.select_random(&filter, rng) {
                let candidate = current.saturating_add(bundle.coin().to_u64());
                if current < self.minimum || improves(candidate, current, target) {
                    state.selected.insert(id, bundle);
                    return true;
                }
                state.leftover.insert(id, bundle);
                return false;
            }
        }
        false
    }
}

/// A single native-asset dimension, fixed to one [`AssetId`] for its
/// lifetime.
pub struct AssetLens {
    asset: AssetId,
    minimum: u64,
}

impl AssetLens {
    /// A lens targeting `minimum` units of `asset`.
    pub fn new(asset: AssetId, minimum: u64) -> Self {
        AssetLens { asset, minimum }
    }
}

impl SelectionLens for AssetLens {
    fn current(&self, state: &SelectionState) -> u64 {
        state.selected.balance().tokens().get(&self.asset).to_u64()
    }

    fn minimum(&self) -> u64 {
        self.minimum
    }

    fn try_select_more(&mut self, state: &mut SelectionState, rng: &mut dyn UniformSource) -> bool {
        let current = self.current(state);
        let target = self.minimum.saturating_mul(2);
        let filter = UtxoFilter::WithAsset(self.asset.clone());
        match state.leftover.select_random(&filter, rng) {
            Some((id, bundle)) => {
                let candidate_qty = bundle.tokens().get(&self.asset).to_u64();
                let candidate = current.saturating_add(candidate_qty);
                if current < self.minimum || improves(candidate, current, target) {
                    state.selected.insert(id, bundle);
                    true
                } else {
                    state.leftover.insert(id, bundle);
                    false
                }
            }
            None => false,
        }
    }
}

/// Step every lens in `lenses` once per round, dropping any lens whose
/// step returns `false`, until none remain or `limit` (total selected
/// input count) would be exceeded.
pub(crate) fn round_robin(
    mut lenses: Vec<Box<dyn SelectionLens>>,
    state: &mut SelectionState,
    rng: &mut dyn UniformSource,
    limit: Option<usize>,
) {
    while !lenses.is_empty() {
        let mut next_round = Vec::with_capacity(lenses.len());
        for mut lens in lenses {
            if let Some(limit) = limit {
                if state.selected.len() >= limit {
                    continue;
                }
            }
            if lens.try_select_more(state, rng) {
                next_round.push(lens);
            }
        }
        lenses = next_round;
    }
}
