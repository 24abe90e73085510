//! A coin-selection and migration-planning core for a proof-of-stake
//! UTxO wallet backend.
//!
//! This crate is deliberately narrow: it knows how to pick inputs, build
//! change, and plan a wallet-draining migration, all against a
//! caller-supplied [`TxConstraints`] and source of randomness. It does
//! not talk to a network, sign anything, derive addresses, or persist
//! state — those are the calling application's job.

#![warn(missing_docs)]
#![no_std]

extern crate alloc;

#[macro_use]
#[cfg(feature = "std")]
extern crate std;

mod asset;
mod bundle;
mod change;
mod coin;
mod constraints;
mod lens;
mod migration;
mod numeric;
mod rng;
mod selection;
mod token_map;
mod tx_out;
mod utxo_index;

pub use asset::AssetId;
pub use bundle::TokenBundle;
pub use change::UnableToConstructChange;
pub use coin::{Coin, TokenQuantity};
pub use constraints::TxConstraints;
pub use lens::{AssetLens, CoinLens, SelectionLens, SelectionState};
pub use migration::{categorize_utxo, create_plan, CategorizedUtxo, MigrationPlan};
pub use numeric::{pad_coalesce, partition_natural};
pub use rng::UniformSource;
pub use selection::{
    perform_selection, Correctness, Selection, SelectionCriteria, SelectionError, SelectionLimit,
    SelectionSkeleton, Violation,
};
pub use token_map::TokenMap;
pub use tx_out::{Address, TxOut, UtxoId};
pub use utxo_index::{UtxoFilter, UtxoIndex};

pub(crate) mod collections {
    #![allow(unused)]

    #[cfg(feature = "std")]
    pub use std::collections::*;

    #[cfg(not(feature = "std"))]
    pub type HashMap<K, V> = alloc::collections::BTreeMap<K, V>;
    pub use alloc::collections::*;
}
