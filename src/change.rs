// Bitcoin Dev Kit
// Written in 2020 by Alekos Filini <alekos.filini@gmail.com>
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Change output construction.
//!
//! [`make_change`] turns a pre-balance excess into a list of change
//! bundles that respect per-output minimum-ada rules while preserving
//! asset identities from the inputs.

use alloc::vec::Vec;
use core::fmt;

use crate::numeric::{pad_coalesce, partition_natural};
use crate::{AssetId, Coin, TokenBundle, TokenMap};

/// Occurs when `make_change` cannot fund every change output's minimum
/// ada requirement plus the required fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnableToConstructChange {
    /// The smallest additional coin that would have made this call
    /// succeed; a lower bound useful for UI hints.
    pub missing: Coin,
}

impl fmt::Display for UnableToConstructChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unable to construct change: {} more ada needed",
            self.missing
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnableToConstructChange {}

/// Compute change bundles from inputs, an optional extra coin source (a
/// reward withdrawal), the outputs being paid, and the cost that must be
/// carved out of the excess before change is assigned.
///
/// # Panics
///
/// Panics if `sum(outputs) > sum(inputs) + extra_coin_source`, or if
/// `sum(outputs).coin() == 0`. Both are preconditions the caller (the
/// selection engine) is responsible for upholding; violating them is a
/// programming error, not a runtime failure a caller can recover from.
pub fn make_change(
    min_ada_for: &impl Fn(&TokenMap) -> Coin,
    required_cost: Coin,
    extra_coin_source: Coin,
    inputs: &[TokenBundle],
    outputs: &[TokenBundle],
) -> Result<Vec<TokenBundle>, UnableToConstructChange> {
    assert!(!inputs.is_empty(), "make_change: inputs must be non-empty");
    assert!(!outputs.is_empty(), "make_change: outputs must be non-empty");

    let available = TokenBundle::sum(inputs).add(&TokenBundle::from_coin(extra_coin_source));
    let required = TokenBundle::sum(outputs);
    assert!(
        required.leq(&available),
        "make_change precondition violated: sum(outputs) exceeds sum(inputs) + extra"
    );
    assert!(
        !required.coin().is_zero(),
        "make_change precondition violated: sum(outputs).coin() must be > 0"
    );

    let excess = available.subtract_unchecked(&required);
    let excess_coin = excess.coin();
    let excess_assets = excess.tokens();

    let output_assets: Vec<AssetId> = required.tokens().asset_set();
    let input_assets: Vec<AssetId> = TokenBundle::sum(inputs).tokens().asset_set();

    // Step 4: known assets (present in outputs) split proportionally to
    // each output's own holding of that asset.
    let mut change_shapes: Vec<TokenMap> = alloc::vec![TokenMap::empty(); outputs.len()];
    for asset in &output_assets {
        let quantity = excess_assets.get(asset);
        if quantity.is_zero() {
            continue;
        }
        let weights: Vec<u64> = outputs.iter().map(|o| o.tokens().get(asset).to_u64()).collect();
        let shares = partition_natural(quantity.to_u64(), &weights);
        for (shape, share) in change_shapes.iter_mut().zip(shares) {
            shape.insert_adding(asset.clone(), share.into());
        }
    }

    // Step 5: unknown assets (present in inputs but not outputs) are
    // pad-coalesced: the individual input quantities (not their sum) are
    // merged down to the target output count.
    for asset in &input_assets {
        if output_assets.contains(asset) {
            continue;
        }
        let quantities: Vec<u64> = inputs
            .iter()
            .map(|bundle| bundle.tokens().get(asset).to_u64())
            .filter(|q| *q > 0)
            .collect();
        if quantities.is_empty() {
            continue;
        }
        let distribution = pad_coalesce(quantities, outputs.len());
        for (shape, quantity) in change_shapes.iter_mut().zip(distribution) {
            if quantity > 0 {
                shape.insert_adding(asset.clone(), quantity.into());
            }
        }
    }

    // Step 7: carve the required cost out of the coin excess.
    let after_cost = match excess_coin.subtract(required_cost) {
        Some(coin) => coin,
        None => {
            return Err(UnableToConstructChange {
                missing: required_cost.saturating_subtract(excess_coin),
            })
        }
    };

    // Step 8: walk change positions assigning each its minimum ada.
    let mins: Vec<Coin> = change_shapes.iter().map(|m| min_ada_for(m)).collect();
    let mut remaining = after_cost;
    for (index, min) in mins.iter().enumerate() {
        match remaining.subtract(*min) {
            Some(rest) => remaining = rest,
            None => {
                let later: Coin = mins[index + 1..]
                    .iter()
                    .fold(Coin::ZERO, |acc, m| acc.add(*m));
                let missing = min.saturating_subtract(remaining).add(later);
                return Err(UnableToConstructChange { missing });
            }
        }
    }

    // Step 9: distribute whatever coin remains proportionally to each
    // target output's own coin amount.
    let coin_weights: Vec<u64> = outputs.iter().map(|o| o.coin().to_u64()).collect();
    let extra_shares = partition_natural(remaining.to_u64(), &coin_weights);

    let change = change_shapes
        .into_iter()
        .zip(mins)
        .zip(extra_shares)
        .map(|((tokens, min), extra)| TokenBundle::new(min.add(extra.into()), tokens))
        .collect();

    Ok(change)
}
