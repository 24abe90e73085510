use alloc::vec::Vec;

use crate::TokenBundle;

/// An opaque recipient address.
///
/// This crate never parses or validates address bytes; address derivation
/// and encoding live in the surrounding wallet (out of scope, §1).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(Vec<u8>);

impl Address {
    /// Wrap opaque address bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Address(bytes.into())
    }

    /// The raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// An opaque identifier for a UTxO entry (e.g. a transaction hash plus
/// output index, encoded by the caller however it likes).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtxoId(Vec<u8>);

impl UtxoId {
    /// Wrap an opaque identifier.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        UtxoId(bytes.into())
    }

    /// The raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A payment target: an address to pay and the bundle it should receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    address: Address,
    bundle: TokenBundle,
}

impl TxOut {
    /// Construct a payment target.
    pub fn new(address: Address, bundle: TokenBundle) -> Self {
        TxOut { address, bundle }
    }

    /// The recipient address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The bundle to be paid.
    pub fn bundle(&self) -> &TokenBundle {
        &self.bundle
    }
}
