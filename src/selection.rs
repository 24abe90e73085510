//! The selection engine: turning a UTxO index, a list of payment targets,
//! and a source of randomness into a balanced, fee-paying transaction.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::change::{make_change, UnableToConstructChange};
use crate::constraints::TxConstraints;
use crate::lens::{round_robin, AssetLens, CoinLens, SelectionLens, SelectionState};
use crate::rng::UniformSource;
use crate::tx_out::{Address, TxOut};
use crate::utxo_index::{UtxoFilter, UtxoIndex};
use crate::{Coin, TokenBundle, TokenMap, UtxoId};

/// A cap on how many inputs a selection may draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionLimit {
    /// No cap.
    NoLimit,
    /// At most this many inputs.
    MaximumInputLimit(usize),
}

impl SelectionLimit {
    fn allows(&self, count: usize) -> bool {
        match self {
            SelectionLimit::NoLimit => true,
            SelectionLimit::MaximumInputLimit(max) => count < *max,
        }
    }
}

/// Everything [`perform_selection`] needs: the payment targets, the
/// available pool, an input cap, and an optional reward withdrawal.
#[derive(Debug, Clone)]
pub struct SelectionCriteria {
    /// Non-empty list of payment targets to cover.
    pub outputs_to_cover: Vec<TxOut>,
    /// The pool of entries the engine may draw from.
    pub utxo_available: UtxoIndex,
    /// A cap on the number of inputs drawn.
    pub selection_limit: SelectionLimit,
    /// An extra coin source (e.g. a staking reward withdrawal) added to
    /// the available balance without consuming a UTxO entry.
    pub extra_coin_source: Coin,
}

/// Everything a `cost_for` closure needs to price a candidate selection.
#[derive(Debug, Clone)]
pub struct SelectionSkeleton {
    /// Number of inputs committed so far.
    pub input_count: usize,
    /// The payment targets being covered.
    pub outputs: Vec<TokenBundle>,
    /// The predicted asset content of each change output.
    pub change_shapes: Vec<TokenMap>,
}

/// Why [`perform_selection`], [`Selection::create`], or [`Selection::extend`]
/// failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The available balance (including any extra coin source) cannot
    /// cover the requested outputs at all.
    BalanceInsufficient {
        available: TokenBundle,
        required: TokenBundle,
    },
    /// One or more outputs carry less ada than their assets require.
    InsufficientMinCoinValues { violations: Vec<(TxOut, Coin)> },
    /// The round-robin draw exhausted the available pool (or hit the
    /// input limit) before reaching the required balance.
    SelectionInsufficient {
        inputs_selected: usize,
        required: TokenBundle,
    },
    /// The next input would push the encoded transaction past its
    /// maximum size.
    SelectionFull { required_size: u64, maximum_size: u64 },
    /// Change could not be constructed; see [`UnableToConstructChange`].
    UnableToConstructChange { missing: Coin },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::BalanceInsufficient { available, required } => write!(
                f,
                "insufficient balance: available {} ada, required {} ada",
                available.coin(),
                required.coin()
            ),
            SelectionError::InsufficientMinCoinValues { violations } => {
                write!(f, "{} output(s) below their minimum ada requirement", violations.len())
            }
            SelectionError::SelectionInsufficient { inputs_selected, required } => write!(
                f,
                "selection of {} input(s) still short of {} ada required",
                inputs_selected,
                required.coin()
            ),
            SelectionError::SelectionFull { required_size, maximum_size } => write!(
                f,
                "selection would encode to {} bytes, over its maximum of {}",
                required_size, maximum_size
            ),
            SelectionError::UnableToConstructChange { missing } => {
                write!(f, "unable to construct change: {} more ada needed", missing)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SelectionError {}

impl From<UnableToConstructChange> for SelectionError {
    fn from(err: UnableToConstructChange) -> Self {
        SelectionError::UnableToConstructChange { missing: err.missing }
    }
}

/// One invariant [`Selection::check`] found violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// `sum(inputs) + withdrawal != sum(outputs) + sum(change) + fee`.
    AssetsNotPreserved,
    /// The output or change bundle at this index exceeds the maximum
    /// encoded output size.
    OutputTooLarge(usize),
    /// The output or change bundle at this index holds a token quantity
    /// over the maximum.
    OutputAssetQuantityExceeded(usize),
    /// The output or change bundle at this index holds less ada than its
    /// assets require.
    OutputBelowMinimumAda(usize),
    /// The whole transaction's encoded size exceeds the maximum.
    TransactionTooLarge,
    /// The committed fee is below the recomputed cost.
    FeeBelowCost { fee: Coin, cost: Coin },
}

/// The result of [`Selection::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correctness {
    /// Every invariant holds.
    Valid,
    /// At least one invariant does not hold.
    Invalid(Vec<Violation>),
}

/// A balanced, fee-paying transaction: the engine's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    inputs: Vec<(UtxoId, TokenBundle)>,
    outputs: Vec<TxOut>,
    change: Vec<TokenBundle>,
    fee: Coin,
    reward_withdrawal: Coin,
}

impl Selection {
    /// The selected inputs.
    pub fn inputs(&self) -> &[(UtxoId, TokenBundle)] {
        &self.inputs
    }

    /// The payment targets this selection covers.
    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    /// The constructed change outputs.
    pub fn change(&self) -> &[TokenBundle] {
        &self.change
    }

    /// The committed fee.
    pub fn fee(&self) -> Coin {
        self.fee
    }

    /// The reward withdrawal this selection used, if any.
    pub fn reward_withdrawal(&self) -> Coin {
        self.reward_withdrawal
    }

    /// The `(input_count, output shapes, change shapes)` triple a
    /// `cost_for` closure prices.
    pub fn skeleton(&self) -> SelectionSkeleton {
        SelectionSkeleton {
            input_count: self.inputs.len(),
            outputs: self.outputs.iter().map(|o| o.bundle().clone()).collect(),
            change_shapes: self.change.iter().map(|c| c.tokens().clone()).collect(),
        }
    }

    /// Build a selection directly from a fixed set of inputs, with no
    /// further drawing from a pool.
    ///
    /// Used by the migration planner, which chooses its own inputs
    /// (supporters, then freeriders) rather than letting the engine draw
    /// randomly; the payment target is a single nominal placeholder
    /// output representing "drain everything to the destination", since
    /// address derivation is out of scope for this crate (§1).
    pub fn create(
        constraints: &impl TxConstraints,
        withdrawal: Coin,
        inputs: Vec<(UtxoId, TokenBundle)>,
    ) -> Result<Selection, SelectionError> {
        build_from_fixed_inputs(constraints, withdrawal, inputs)
    }

    /// Rebuild this selection with one additional input.
    pub fn extend(
        &self,
        constraints: &impl TxConstraints,
        input: (UtxoId, TokenBundle),
    ) -> Result<Selection, SelectionError> {
        let mut inputs = self.inputs.clone();
        inputs.push(input);
        build_from_fixed_inputs(constraints, self.reward_withdrawal, inputs)
    }

    /// Re-verify every invariant from the data model plus the
    /// constraints-derived size/cost limits.
    pub fn check(
        &self,
        constraints: &impl TxConstraints,
        cost_for: impl Fn(&SelectionSkeleton) -> Coin,
    ) -> Correctness {
        let mut violations = Vec::new();

        let input_sum = TokenBundle::sum(self.inputs.iter().map(|(_, b)| b));
        let output_sum = TokenBundle::sum(self.outputs.iter().map(|o| o.bundle()));
        let change_sum = TokenBundle::sum(self.change.iter());
        let lhs = input_sum.add(&TokenBundle::from_coin(self.reward_withdrawal));
        let rhs = output_sum.add(&change_sum).add(&TokenBundle::from_coin(self.fee));
        if lhs != rhs {
            violations.push(Violation::AssetsNotPreserved);
        }

        for (index, out) in self.outputs.iter().enumerate() {
            check_bundle_limits(constraints, out.bundle(), index, &mut violations);
        }
        let change_offset = self.outputs.len();
        for (index, change) in self.change.iter().enumerate() {
            check_bundle_limits(constraints, change, change_offset + index, &mut violations);
        }

        let output_bundles: Vec<TokenBundle> = self.outputs.iter().map(|o| o.bundle().clone()).collect();
        let total_size = encoded_size(constraints, self.reward_withdrawal, self.inputs.len(), &output_bundles, &self.change);
        if total_size > constraints.max_tx_size() {
            violations.push(Violation::TransactionTooLarge);
        }

        let cost = cost_for(&self.skeleton());
        if self.fee < cost {
            violations.push(Violation::FeeBelowCost { fee: self.fee, cost });
        }

        if violations.is_empty() {
            Correctness::Valid
        } else {
            Correctness::Invalid(violations)
        }
    }
}

fn check_bundle_limits(
    constraints: &impl TxConstraints,
    bundle: &TokenBundle,
    index: usize,
    violations: &mut Vec<Violation>,
) {
    if !constraints.output_has_valid_size(bundle) {
        violations.push(Violation::OutputTooLarge(index));
    }
    if !constraints.output_has_valid_token_quantities(bundle) {
        violations.push(Violation::OutputAssetQuantityExceeded(index));
    }
    if bundle.coin() < constraints.min_ada_for(bundle.tokens()) {
        violations.push(Violation::OutputBelowMinimumAda(index));
    }
}

/// The encoded size of a transaction with the given inputs, outputs, and
/// change, under `constraints`. Shared by [`Selection::check`] (reporting)
/// and `build_from_fixed_inputs` (the hard `max_tx_size` gate).
fn encoded_size(
    constraints: &impl TxConstraints,
    withdrawal: Coin,
    input_count: usize,
    outputs: &[TokenBundle],
    change: &[TokenBundle],
) -> u64 {
    let mut size = constraints.base_size()
        + constraints.reward_withdrawal_size(withdrawal)
        + (input_count as u64) * constraints.input_size();
    for out in outputs {
        size += constraints.output_size(out);
    }
    for c in change {
        size += constraints.output_size(c);
    }
    size
}

pub(crate) fn default_cost_for(constraints: &impl TxConstraints, withdrawal: Coin) -> impl Fn(&SelectionSkeleton) -> Coin + '_ {
    move |skeleton: &SelectionSkeleton| {
        let mut cost = constraints.base_cost();
        cost = cost.add(constraints.reward_withdrawal_cost(withdrawal));
        for _ in 0..skeleton.input_count {
            cost = cost.add(constraints.input_cost());
        }
        for out in &skeleton.outputs {
            cost = cost.add(constraints.output_cost(out));
        }
        for shape in &skeleton.change_shapes {
            let placeholder = TokenBundle::new(Coin::ZERO, shape.clone());
            cost = cost.add(constraints.output_cost(&placeholder));
        }
        cost
    }
}

fn build_from_fixed_inputs(
    constraints: &impl TxConstraints,
    withdrawal: Coin,
    inputs: Vec<(UtxoId, TokenBundle)>,
) -> Result<Selection, SelectionError> {
    let placeholder_output = TxOut::new(Address::new(Vec::new()), TokenBundle::from_coin(Coin::from_u64(1)));
    let outputs = alloc::vec![placeholder_output];
    let output_bundles: Vec<TokenBundle> = outputs.iter().map(|o| o.bundle().clone()).collect();
    let input_bundles: Vec<TokenBundle> = inputs.iter().map(|(_, b)| b.clone()).collect();

    let available = TokenBundle::sum(&input_bundles).add(&TokenBundle::from_coin(withdrawal));
    let required = TokenBundle::sum(&output_bundles);
    if !required.leq(&available) {
        return Err(SelectionError::BalanceInsufficient { available, required });
    }

    let zero_min_ada = |_: &TokenMap| Coin::ZERO;
    let predicted = make_change(&zero_min_ada, Coin::ZERO, withdrawal, &input_bundles, &output_bundles)?;
    let change_shapes: Vec<TokenMap> = predicted.iter().map(|b| b.tokens().clone()).collect();

    let skeleton = SelectionSkeleton {
        input_count: inputs.len(),
        outputs: output_bundles.clone(),
        change_shapes,
    };
    let cost_for = default_cost_for(constraints, withdrawal);
    let cost = cost_for(&skeleton);

    let min_ada_for = |assets: &TokenMap| constraints.min_ada_for(assets);
    let change = make_change(&min_ada_for, cost, withdrawal, &input_bundles, &output_bundles)?;

    let required_size = encoded_size(constraints, withdrawal, inputs.len(), &output_bundles, &change);
    let maximum_size = constraints.max_tx_size();
    if required_size > maximum_size {
        return Err(SelectionError::SelectionFull { required_size, maximum_size });
    }

    Ok(Selection {
        inputs,
        outputs,
        change,
        fee: cost,
        reward_withdrawal: withdrawal,
    })
}

/// Run the full random round-robin selection loop and construct a
/// balanced selection covering `criteria.outputs_to_cover`.
pub fn perform_selection(
    constraints: &impl TxConstraints,
    cost_for: impl Fn(&SelectionSkeleton) -> Coin,
    criteria: SelectionCriteria,
    rng: &mut impl UniformSource,
) -> Result<Selection, SelectionError> {
    let SelectionCriteria {
        outputs_to_cover,
        utxo_available,
        selection_limit,
        extra_coin_source,
    } = criteria;
    assert!(
        !outputs_to_cover.is_empty(),
        "perform_selection: outputs_to_cover must be non-empty"
    );

    let output_bundles: Vec<TokenBundle> = outputs_to_cover.iter().map(|o| o.bundle().clone()).collect();
    let required = TokenBundle::sum(&output_bundles);

    // Phase A.
    let available_total = utxo_available.balance().add(&TokenBundle::from_coin(extra_coin_source));
    if !required.leq(&available_total) {
        return Err(SelectionError::BalanceInsufficient {
            available: available_total,
            required,
        });
    }
    let mut violations = Vec::new();
    for out in &outputs_to_cover {
        let min = constraints.min_ada_for(out.bundle().tokens());
        if out.bundle().coin() < min {
            violations.push((out.clone(), min));
        }
    }
    if !violations.is_empty() {
        return Err(SelectionError::InsufficientMinCoinValues { violations });
    }

    // Phase B.
    let mut state = SelectionState {
        selected: UtxoIndex::empty(),
        leftover: utxo_available,
    };
    let mut lenses: Vec<Box<dyn SelectionLens>> = alloc::vec![Box::new(CoinLens::new(required.coin().to_u64()))];
    for asset in required.tokens().asset_set() {
        let minimum = required.tokens().get(&asset).to_u64();
        lenses.push(Box::new(AssetLens::new(asset, minimum)));
    }
    let limit = match selection_limit {
        SelectionLimit::NoLimit => None,
        SelectionLimit::MaximumInputLimit(max) => Some(max),
    };
    round_robin(lenses, &mut state, rng, limit);

    let selected_balance = state.selected.balance();
    if !required.leq(&selected_balance) {
        return Err(SelectionError::SelectionInsufficient {
            inputs_selected: state.selected.len(),
            required,
        });
    }

    // Phase C + D, with Phase D's ada-top-up retry loop.
    loop {
        let input_bundles: Vec<TokenBundle> = state.selected.iter().map(|(_, b)| b.clone()).collect();
        let zero_min_ada = |_: &TokenMap| Coin::ZERO;
        let predicted = make_change(&zero_min_ada, Coin::ZERO, extra_coin_source, &input_bundles, &output_bundles)
            .expect("phase C make_change must succeed once the round-robin balance holds");
        let change_shapes: Vec<TokenMap> = predicted.iter().map(|b| b.tokens().clone()).collect();

        let skeleton = SelectionSkeleton {
            input_count: state.selected.len(),
            outputs: output_bundles.clone(),
            change_shapes,
        };
        let cost = cost_for(&skeleton);
        let min_ada_for = |assets: &TokenMap| constraints.min_ada_for(assets);

        match make_change(&min_ada_for, cost, extra_coin_source, &input_bundles, &output_bundles) {
            Ok(change) => {
                return Ok(Selection {
                    inputs: state.selected.iter().map(|(id, b)| (id.clone(), b.clone())).collect(),
                    outputs: outputs_to_cover,
                    change,
                    fee: cost,
                    reward_withdrawal: extra_coin_source,
                });
            }
            Err(err) => {
                if !selection_limit.allows(state.selected.len() + 1) {
                    return Err(SelectionError::UnableToConstructChange { missing: err.missing });
                }
                match state.leftover.select_random(&UtxoFilter::AdaOnly, rng) {
                    Some((id, bundle)) => state.selected.insert(id, bundle),
                    None => return Err(SelectionError::UnableToConstructChange { missing: err.missing }),
                }
            }
        }
    }
}

/// Shrink `fee` by moving as much of it as possible into `selection`'s
/// change outputs, in order, stopping once moving another unit would
/// raise `output_coin_cost` by more than the unit it would save.
///
/// Only used by the migration planner: ordinary `perform_selection`
/// calls already size the fee exactly via `make_change`, so there is
/// nothing left to minimise.
pub(crate) fn minimize_fee(
    constraints: &impl TxConstraints,
    cost_for: &impl Fn(&SelectionSkeleton) -> Coin,
    mut selection: Selection,
) -> Selection {
    let tight_cost = cost_for(&selection.skeleton());
    let mut fee_excess = selection.fee.saturating_subtract(tight_cost);
    for change in selection.change.iter_mut() {
        if fee_excess.is_zero() {
            break;
        }
        let free_units = free_capacity(constraints, change.coin(), fee_excess.to_u64());
        if free_units > 0 {
            *change = change.set_coin(change.coin().add(Coin::from_u64(free_units)));
            fee_excess = fee_excess.saturating_subtract(Coin::from_u64(free_units));
        }
    }
    selection.fee = tight_cost.add(fee_excess);
    selection
}

/// The largest `k <= max` such that `output_coin_cost(coin + k) ==
/// output_coin_cost(coin)`, assuming `output_coin_cost` is non-decreasing
/// in its argument (true of every size-based cost model this crate
/// targets).
fn free_capacity(constraints: &impl TxConstraints, coin: Coin, max: u64) -> u64 {
    let base_cost = constraints.output_coin_cost(coin);
    let mut lo = 0u64;
    let mut hi = max;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if constraints.output_coin_cost(coin.add(Coin::from_u64(mid))) <= base_cost {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}
