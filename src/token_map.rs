use alloc::vec::Vec;

use crate::collections::BTreeMap;
use crate::{AssetId, TokenQuantity};

/// A mapping from [`AssetId`] to [`TokenQuantity`].
///
/// The zero-quantity invariant is enforced in the constructor and every
/// mutating method, not defensively at each call site: nothing outside
/// this module can produce a `TokenMap` with a zero entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenMap(BTreeMap<AssetId, TokenQuantity>);

impl TokenMap {
    /// The empty map.
    pub fn empty() -> Self {
        TokenMap(BTreeMap::new())
    }

    /// Build from an iterator of `(asset, quantity)` pairs, dropping zero
    /// quantities and summing duplicates.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (AssetId, TokenQuantity)>) -> Self {
        let mut map = TokenMap::empty();
        for (asset, qty) in pairs {
            map.insert_adding(asset, qty);
        }
        map
    }

    /// Whether there are no non-zero entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct assets held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Quantity held for `asset`; missing entries read as zero.
    pub fn get(&self, asset: &AssetId) -> TokenQuantity {
        self.0.get(asset).copied().unwrap_or(TokenQuantity::ZERO)
    }

    /// Add `quantity` of `asset`, normalising the entry away if the result
    /// is zero (which only happens if `quantity` was already zero, since
    /// stored quantities are never zero).
    pub fn insert_adding(&mut self, asset: AssetId, quantity: TokenQuantity) {
        if quantity.is_zero() {
            return;
        }
        let entry = self.0.entry(asset).or_insert(TokenQuantity::ZERO);
        *entry = entry.add(quantity);
    }

    /// `self + other`, summing shared assets.
    pub fn add(&self, other: &TokenMap) -> TokenMap {
        let mut result = self.clone();
        for (asset, qty) in other.0.iter() {
            result.insert_adding(asset.clone(), *qty);
        }
        result
    }

    /// `self - other` if `other <= self` component-wise, else `None`.
    pub fn subtract(&self, other: &TokenMap) -> Option<TokenMap> {
        if !other.leq(self) {
            return None;
        }
        let mut result = BTreeMap::new();
        for (asset, qty) in self.0.iter() {
            let remaining = qty.subtract(other.get(asset)).unwrap_or(TokenQuantity::ZERO);
            if !remaining.is_zero() {
                result.insert(asset.clone(), remaining);
            }
        }
        TokenMap(result)
    }

    /// Partial order: `self <= other` iff every asset in `self` has a
    /// quantity no greater than its quantity in `other` (missing entries
    /// in `other` read as zero).
    pub fn leq(&self, other: &TokenMap) -> bool {
        self.0.iter().all(|(asset, qty)| *qty <= other.get(asset))
    }

    /// The set of assets with non-zero quantity, in ascending order.
    pub fn asset_set(&self) -> Vec<AssetId> {
        self.0.keys().cloned().collect()
    }

    /// Flat `(asset, quantity)` list, in ascending asset order.
    pub fn flatten(&self) -> Vec<(AssetId, TokenQuantity)> {
        self.0.iter().map(|(a, q)| (a.clone(), *q)).collect()
    }

    /// Iterate over `(asset, quantity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &TokenQuantity)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn asset(n: u8) -> AssetId {
        AssetId::new(vec![n], vec![])
    }

    #[test]
    fn zero_quantity_never_stored() {
        let mut map = TokenMap::empty();
        map.insert_adding(asset(1), TokenQuantity::ZERO);
        assert!(map.is_empty());
    }

    #[test]
    fn subtract_removes_zeroed_entries() {
        let a = TokenMap::from_pairs([(asset(1), TokenQuantity::from_u64(5))]);
        let b = TokenMap::from_pairs([(asset(1), TokenQuantity::from_u64(5))]);
        let diff = a.subtract(&b).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn subtract_fails_when_not_leq() {
        let a = TokenMap::from_pairs([(asset(1), TokenQuantity::from_u64(2))]);
        let b = TokenMap::from_pairs([(asset(1), TokenQuantity::from_u64(5))]);
        assert!(a.subtract(&b).is_none());
    }

    #[test]
    fn leq_treats_missing_as_zero() {
        let a = TokenMap::empty();
        let b = TokenMap::from_pairs([(asset(1), TokenQuantity::from_u64(1))]);
        assert!(a.leq(&b));
        assert!(!b.leq(&a));
    }

    #[test]
    fn add_sums_shared_assets() {
        let a = TokenMap::from_pairs([(asset(1), TokenQuantity::from_u64(2))]);
        let b = TokenMap::from_pairs([(asset(1), TokenQuantity::from_u64(3)), (asset(2), TokenQuantity::from_u64(1))]);
        let sum = a.add(&b);
        assert_eq!(sum.get(&asset(1)), TokenQuantity::from_u64(5));
        assert_eq!(sum.get(&asset(2)), TokenQuantity::from_u64(1));
    }
}
