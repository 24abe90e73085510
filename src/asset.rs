use alloc::vec::Vec;
use core::fmt;

/// A non-negative quantity of a native asset.
///
/// Shares its representation with [`Coin`](crate::Coin) but is kept as a
/// distinct type so a caller can never add an ada amount to a token
/// quantity by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenQuantity(u64);

impl TokenQuantity {
    /// The zero quantity.
    pub const ZERO: TokenQuantity = TokenQuantity(0);

    /// Construct from a raw quantity.
    pub const fn from_u64(value: u64) -> Self {
        TokenQuantity(value)
    }

    /// The raw quantity.
    pub const fn to_u64(self) -> u64 {
        self.0
    }

    /// `self + other`, saturating at `u64::MAX`.
    pub fn add(self, other: TokenQuantity) -> TokenQuantity {
        TokenQuantity(self.0.saturating_add(other.0))
    }

    /// `self - other` if `self >= other`, else `None`.
    pub fn subtract(self, other: TokenQuantity) -> Option<TokenQuantity> {
        self.0.checked_sub(other.0).map(TokenQuantity)
    }

    /// Whether this is the zero quantity.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for TokenQuantity {
    fn from(value: u64) -> Self {
        TokenQuantity(value)
    }
}

impl fmt::Display for TokenQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `(policy_id, asset_name)` pair identifying a native asset class.
///
/// Both fields are opaque bytes as far as this crate is concerned: it
/// never interprets policy scripts or asset-name encodings, only compares
/// and hashes them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId {
    policy_id: Vec<u8>,
    asset_name: Vec<u8>,
}

impl AssetId {
    /// Construct from raw policy id and asset name bytes.
    pub fn new(policy_id: impl Into<Vec<u8>>, asset_name: impl Into<Vec<u8>>) -> Self {
        AssetId {
            policy_id: policy_id.into(),
            asset_name: asset_name.into(),
        }
    }

    /// The policy id bytes.
    pub fn policy_id(&self) -> &[u8] {
        &self.policy_id
    }

    /// The asset name bytes.
    pub fn asset_name(&self) -> &[u8] {
        &self.asset_name
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.policy_id {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ".")?;
        for b in &self.asset_name {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
