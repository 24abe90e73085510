use alloc::vec::Vec;

use crate::{AssetId, Coin, TokenMap};

/// A coin plus a map of native-asset quantities: everything a UTxO entry
/// or an output can hold.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenBundle {
    coin: Coin,
    tokens: TokenMap,
}

impl TokenBundle {
    /// The empty bundle: `(0, {})`.
    pub fn empty() -> Self {
        TokenBundle {
            coin: Coin::ZERO,
            tokens: TokenMap::empty(),
        }
    }

    /// Lift a bare coin into a bundle with no native assets.
    pub fn from_coin(coin: Coin) -> Self {
        TokenBundle {
            coin,
            tokens: TokenMap::empty(),
        }
    }

    /// Construct from a coin and a token map.
    pub fn new(coin: Coin, tokens: TokenMap) -> Self {
        TokenBundle { coin, tokens }
    }

    /// The ada component.
    pub fn coin(&self) -> Coin {
        self.coin
    }

    /// Replace the ada component, keeping the token map.
    pub fn set_coin(&self, coin: Coin) -> TokenBundle {
        TokenBundle {
            coin,
            tokens: self.tokens.clone(),
        }
    }

    /// The token map component.
    pub fn tokens(&self) -> &TokenMap {
        &self.tokens
    }

    /// The set of native assets held, in ascending order.
    pub fn assets(&self) -> Vec<AssetId> {
        self.tokens.asset_set()
    }

    /// Whether this bundle carries no native assets.
    pub fn is_ada_only(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Component-wise sum.
    pub fn add(&self, other: &TokenBundle) -> TokenBundle {
        TokenBundle {
            coin: self.coin.add(other.coin),
            tokens: self.tokens.add(&other.tokens),
        }
    }

    /// Component-wise partial subtraction: `Some` iff `other <= self`.
    pub fn subtract(&self, other: &TokenBundle) -> Option<TokenBundle> {
        let coin = self.coin.subtract(other.coin)?;
        let tokens = self.tokens.subtract(&other.tokens)?;
        Some(TokenBundle { coin, tokens })
    }

    /// Subtract without checking the precondition `other <= self`.
    ///
    /// Only call this where the caller has already proved `other <=
    /// self`; violating that is a programming error in this crate, not a
    /// user-facing failure, so it panics rather than returning `None`.
    pub fn subtract_unchecked(&self, other: &TokenBundle) -> TokenBundle {
        debug_assert!(other.leq(self), "subtract_unchecked precondition violated");
        self.subtract(other).unwrap_or_else(|| {
            panic!("subtract_unchecked: {:?} is not <= {:?}", other, self)
        })
    }

    /// Component-wise partial order.
    pub fn leq(&self, other: &TokenBundle) -> bool {
        self.coin <= other.coin && self.tokens.leq(&other.tokens)
    }

    /// Sum a slice of bundles, or `TokenBundle::empty()` for an empty
    /// slice.
    pub fn sum<'a>(bundles: impl IntoIterator<Item = &'a TokenBundle>) -> TokenBundle {
        bundles
            .into_iter()
            .fold(TokenBundle::empty(), |acc, b| acc.add(b))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn asset(n: u8) -> AssetId {
        AssetId::new(vec![n], vec![])
    }

    #[test]
    fn add_is_component_wise() {
        let a = TokenBundle::new(
            Coin::from_u64(10),
            TokenMap::from_pairs([(asset(1), 2u64.into())]),
        );
        let b = TokenBundle::new(
            Coin::from_u64(5),
            TokenMap::from_pairs([(asset(1), 3u64.into())]),
        );
        let sum = a.add(&b);
        assert_eq!(sum.coin(), Coin::from_u64(15));
        assert_eq!(sum.tokens().get(&asset(1)), 5u64.into());
    }

    #[test]
    fn subtract_unchecked_matches_checked() {
        let a = TokenBundle::from_coin(Coin::from_u64(10));
        let b = TokenBundle::from_coin(Coin::from_u64(4));
        assert_eq!(a.subtract_unchecked(&b), a.subtract(&b).unwrap());
    }

    #[test]
    #[should_panic]
    fn subtract_unchecked_panics_on_violation() {
        let a = TokenBundle::from_coin(Coin::from_u64(4));
        let b = TokenBundle::from_coin(Coin::from_u64(10));
        let _ = a.subtract_unchecked(&b);
    }

    #[test]
    fn sum_of_empty_is_empty() {
        let empty: Vec<TokenBundle> = vec![];
        assert_eq!(TokenBundle::sum(&empty), TokenBundle::empty());
    }
}
