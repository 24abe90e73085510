use alloc::vec::Vec;

use crate::collections::{BTreeMap, BTreeSet, HashMap};
use crate::rng::{shuffle_slice, UniformSource};
use crate::{AssetId, TokenBundle, UtxoId};

/// Which entries a [`UtxoIndex::select_random`] draw considers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtxoFilter {
    /// Entries whose bundle carries no native assets.
    AdaOnly,
    /// Entries whose bundle contains the given asset.
    WithAsset(AssetId),
    /// Any entry.
    Any,
}

/// A set of UTxO entries with auxiliary indices so a random draw matching
/// a [`UtxoFilter`] doesn't need to rescan the whole set.
#[derive(Debug, Clone, Default)]
pub struct UtxoIndex {
    entries: BTreeMap<UtxoId, TokenBundle>,
    ada_only: BTreeSet<UtxoId>,
    by_asset: HashMap<AssetId, BTreeSet<UtxoId>>,
}

impl UtxoIndex {
    /// An empty index.
    pub fn empty() -> Self {
        UtxoIndex::default()
    }

    /// Build an index from an iterator of entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (UtxoId, TokenBundle)>) -> Self {
        let mut index = UtxoIndex::empty();
        for (id, bundle) in entries {
            index.insert(id, bundle);
        }
        index
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &UtxoId) -> bool {
        self.entries.contains_key(id)
    }

    /// Iterate over all entries in their natural (insertion/ascending-id)
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&UtxoId, &TokenBundle)> {
        self.entries.iter()
    }

    /// The aggregated balance of every entry.
    pub fn balance(&self) -> TokenBundle {
        TokenBundle::sum(self.entries.values())
    }

    /// Insert or replace an entry, updating the auxiliary indices.
    pub fn insert(&mut self, id: UtxoId, bundle: TokenBundle) {
        self.remove(&id);
        if bundle.is_ada_only() {
            self.ada_only.insert(id.clone());
        }
        for asset in bundle.assets() {
            self.by_asset.entry(asset).or_default().insert(id.clone());
        }
        self.entries.insert(id, bundle);
    }

    /// Remove an entry, updating the auxiliary indices. Returns the
    /// removed bundle, if any.
    pub fn remove(&mut self, id: &UtxoId) -> Option<TokenBundle> {
        let bundle = self.entries.remove(id)?;
        self.ada_only.remove(id);
        for asset in bundle.assets() {
            if let Some(set) = self.by_asset.get_mut(&asset) {
                set.remove(id);
                if set.is_empty() {
                    self.by_asset.remove(&asset);
                }
            }
        }
        Some(bundle)
    }

    fn matching(&self, filter: &UtxoFilter) -> Vec<UtxoId> {
        match filter {
            UtxoFilter::AdaOnly => self.ada_only.iter().cloned().collect(),
            UtxoFilter::WithAsset(asset) => self
                .by_asset
                .get(asset)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default(),
            UtxoFilter::Any => self.entries.keys().cloned().collect(),
        }
    }

    /// Remove and return one entry sampled uniformly among those matching
    /// `filter`, or `None` if no entry matches.
    ///
    /// Every matching entry ties for the draw, so a Fisher-Yates shuffle
    /// of the candidates breaks the tie fairly before the first is taken.
    pub fn select_random(
        &mut self,
        filter: &UtxoFilter,
        rng: &mut impl UniformSource,
    ) -> Option<(UtxoId, TokenBundle)> {
        let mut candidates = self.matching(filter);
        if candidates.is_empty() {
            return None;
        }
        shuffle_slice(&mut candidates, rng);
        let id = candidates.swap_remove(0);
        let bundle = self.remove(&id)?;
        Some((id, bundle))
    }
}
