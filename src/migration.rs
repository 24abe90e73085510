//! Wallet migration planning: grouping a whole UTxO set into a sequence
//! of draining selections (§4.7 of the design notes).
//!
//! Unlike [`crate::selection::perform_selection`], which draws randomly
//! from a pool to cover a caller-chosen set of payments, the migration
//! planner consumes the *entire* available UTxO set, one
//! [`crate::selection::Selection`] at a time, until nothing worth
//! spending remains.

use alloc::vec::Vec;

use crate::constraints::TxConstraints;
use crate::rng::{shuffle_slice, UniformSource};
use crate::selection::{default_cost_for, minimize_fee, Selection, SelectionError};
use crate::utxo_index::UtxoIndex;
use crate::{Coin, TokenBundle, UtxoId};

/// A single entry with its id and bundle, as handed out by categorisation.
type Entry = (UtxoId, TokenBundle);

/// The available UTxO set split into the three migration roles.
#[derive(Debug, Clone, Default)]
pub struct CategorizedUtxo {
    /// Ada-only entries that carry enough value to be worth spending
    /// and can fund a selection on their own.
    pub supporters: Vec<Entry>,
    /// Entries that cannot stand alone but are worth adding to a
    /// selection someone else seeded.
    pub freeriders: Vec<Entry>,
    /// Entries too small to be worth spending at all: ada-only and not
    /// even enough to cover their own input cost.
    pub ignorables: Vec<Entry>,
}

impl CategorizedUtxo {
    /// Whether every role is empty.
    pub fn is_empty(&self) -> bool {
        self.supporters.is_empty() && self.freeriders.is_empty() && self.ignorables.is_empty()
    }
}

/// Classify every entry in `utxo` into [`CategorizedUtxo`]'s three roles.
///
/// An entry is `Ignorable` when it is ada-only and not even worth the
/// cost of including it as an input. Otherwise it is a `Supporter` when
/// it can fund a standalone selection by itself, or a `Freerider`
/// otherwise (its assets, or its small ada amount, need a supporter to
/// carry them).
pub fn categorize_utxo(constraints: &impl TxConstraints, utxo: &UtxoIndex) -> CategorizedUtxo {
    let mut categorized = CategorizedUtxo::default();
    for (id, bundle) in utxo.iter() {
        if bundle.is_ada_only() && bundle.coin() <= constraints.input_cost() {
            categorized.ignorables.push((id.clone(), bundle.clone()));
            continue;
        }
        let standalone = Selection::create(constraints, Coin::ZERO, alloc::vec![(id.clone(), bundle.clone())]);
        if standalone.is_ok() {
            categorized.supporters.push((id.clone(), bundle.clone()));
        } else {
            categorized.freeriders.push((id.clone(), bundle.clone()));
        }
    }
    categorized
}

/// The outcome of [`create_plan`]: a sequence of selections covering as
/// much of the available set as could be productively spent, plus
/// whatever was left over.
#[derive(Debug, Clone)]
pub struct MigrationPlan {
    /// One selection per group of inputs drained together.
    pub selections: Vec<Selection>,
    /// Entries that could not be placed into any selection.
    pub unselected: CategorizedUtxo,
    /// The sum of every selection's fee.
    pub total_fee: Coin,
}

/// Build a migration plan: repeatedly seed a selection from a supporter,
/// then proactively fold in every remaining freerider and supporter that
/// will still `extend` it — reaching for another supporter even once the
/// freeriders are exhausted, so two inputs that could both stand alone
/// still land in a single transaction — before minimising its fee and
/// opening a fresh selection for whatever is left. `reward_withdrawal` is
/// offered only to the first selection of the plan (§6).
///
/// `rng` shuffles the supporter and freerider pools up front so which
/// entries get folded together isn't an artifact of the caller's
/// insertion order.
pub fn create_plan(
    constraints: &impl TxConstraints,
    mut categorized: CategorizedUtxo,
    reward_withdrawal: Coin,
    rng: &mut impl UniformSource,
) -> MigrationPlan {
    shuffle_slice(&mut categorized.supporters, rng);
    shuffle_slice(&mut categorized.freeriders, rng);

    let mut selections = Vec::new();
    let mut total_fee = Coin::ZERO;
    let mut first = true;

    while let Some(seed) = categorized.supporters.pop() {
        let withdrawal = if first { reward_withdrawal } else { Coin::ZERO };
        first = false;

        let mut current = match Selection::create(constraints, withdrawal, alloc::vec![seed.clone()]) {
            Ok(selection) => selection,
            Err(_) => {
                // Adding the withdrawal made an otherwise-standalone
                // supporter infeasible. `seed` was already proven to fund
                // a selection on its own with no withdrawal attached
                // during categorisation, so retry without one; the
                // withdrawal is simply not used by this plan.
                Selection::create(constraints, Coin::ZERO, alloc::vec![seed])
                    .expect("categorize_utxo already proved this entry funds a standalone selection")
            }
        };

        'grow: loop {
            while let Some(candidate) = categorized.freeriders.pop() {
                match current.extend(constraints, candidate.clone()) {
                    Ok(extended) => current = extended,
                    Err(SelectionError::SelectionFull { .. }) => {
                        categorized.freeriders.push(candidate);
                        break 'grow;
                    }
                    Err(_) => {
                        // This freerider can't be afforded yet (e.g. an
                        // ada shortfall); leave it for the next pass,
                        // which may pull in a supporter that covers it.
                        categorized.freeriders.push(candidate);
                        break;
                    }
                }
            }

            match categorized.supporters.pop() {
                Some(support) => match current.extend(constraints, support.clone()) {
                    Ok(extended) => current = extended,
                    Err(SelectionError::SelectionFull { .. }) => {
                        categorized.supporters.push(support);
                        break 'grow;
                    }
                    Err(_) => {
                        categorized.supporters.push(support);
                        break 'grow;
                    }
                },
                None => break 'grow,
            }
        }

        let cost_for = default_cost_for(constraints, current.reward_withdrawal());
        let current = minimize_fee(constraints, &cost_for, current);
        total_fee = total_fee.add(current.fee());
        selections.push(current);
    }

    MigrationPlan {
        selections,
        unselected: categorized,
        total_fee,
    }
}
