use crate::{Coin, TokenBundle, TokenMap, TokenQuantity};

/// Protocol-specific costs, sizes, and limits.
///
/// Every size/cost decision in the selection engine and change
/// construction goes through this trait, so the same algorithm drives
/// whatever concrete protocol the caller plugs in. Implementations are
/// expected to be cheap, pure functions of their argument — the engine
/// may call them many times per selection.
pub trait TxConstraints {
    /// Fixed per-transaction cost, independent of inputs/outputs.
    fn base_cost(&self) -> Coin;

    /// Fixed per-transaction encoded size, independent of inputs/outputs.
    fn base_size(&self) -> u64;

    /// Marginal cost of one more selected input.
    fn input_cost(&self) -> Coin;

    /// Marginal encoded size of one more selected input.
    fn input_size(&self) -> u64;

    /// Marginal cost of an output carrying `bundle`.
    fn output_cost(&self, bundle: &TokenBundle) -> Coin;

    /// Marginal encoded size of an output carrying `bundle`.
    fn output_size(&self, bundle: &TokenBundle) -> u64;

    /// Marginal cost of an ada-only output carrying `coin`.
    fn output_coin_cost(&self, coin: Coin) -> Coin;

    /// Marginal encoded size of an ada-only output carrying `coin`.
    fn output_coin_size(&self, coin: Coin) -> u64;

    /// Minimum ada an output carrying `assets` must hold.
    fn min_ada_for(&self, assets: &TokenMap) -> Coin;

    /// Maximum allowed encoded size of a single output.
    fn max_output_size(&self) -> u64;

    /// Maximum allowed encoded size of the whole transaction.
    fn max_tx_size(&self) -> u64;

    /// Maximum allowed quantity of any single native asset in an output.
    fn max_asset_quantity(&self) -> TokenQuantity;

    /// Marginal cost of a reward withdrawal of `coin` (zero for `coin ==
    /// 0`).
    fn reward_withdrawal_cost(&self, coin: Coin) -> Coin;

    /// Marginal encoded size of a reward withdrawal of `coin` (zero for
    /// `coin == 0`).
    fn reward_withdrawal_size(&self, coin: Coin) -> u64;

    /// Whether `bundle`'s encoded size fits under [`max_output_size`](Self::max_output_size).
    fn output_has_valid_size(&self, bundle: &TokenBundle) -> bool {
        self.output_size(bundle) <= self.max_output_size()
    }

    /// Whether every token quantity in `bundle` fits under
    /// [`max_asset_quantity`](Self::max_asset_quantity).
    fn output_has_valid_token_quantities(&self, bundle: &TokenBundle) -> bool {
        bundle
            .tokens()
            .iter()
            .all(|(_, qty)| *qty <= self.max_asset_quantity())
    }
}
