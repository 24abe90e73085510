//! S5 and the categorisation/planner properties P6-P8 from the design
//! notes.

use rand::{rngs::StdRng, SeedableRng};
use utxo_select::{
    categorize_utxo, create_plan, Coin, TokenBundle, TokenMap, TokenQuantity, TxConstraints,
    UtxoId, UtxoIndex,
};

struct FlatConstraints;

impl TxConstraints for FlatConstraints {
    fn base_cost(&self) -> Coin {
        Coin::from_u64(1)
    }
    fn base_size(&self) -> u64 {
        10
    }
    fn input_cost(&self) -> Coin {
        Coin::from_u64(1)
    }
    fn input_size(&self) -> u64 {
        5
    }
    fn output_cost(&self, _bundle: &TokenBundle) -> Coin {
        Coin::ZERO
    }
    fn output_size(&self, _bundle: &TokenBundle) -> u64 {
        5
    }
    fn output_coin_cost(&self, _coin: Coin) -> Coin {
        Coin::ZERO
    }
    fn output_coin_size(&self, _coin: Coin) -> u64 {
        5
    }
    fn min_ada_for(&self, _assets: &TokenMap) -> Coin {
        Coin::from_u64(2)
    }
    fn max_output_size(&self) -> u64 {
        1_000
    }
    fn max_tx_size(&self) -> u64 {
        10_000
    }
    fn max_asset_quantity(&self) -> TokenQuantity {
        TokenQuantity::from_u64(u64::MAX)
    }
    fn reward_withdrawal_cost(&self, _coin: Coin) -> Coin {
        Coin::ZERO
    }
    fn reward_withdrawal_size(&self, _coin: Coin) -> u64 {
        0
    }
}

fn id(n: u8) -> UtxoId {
    UtxoId::new(vec![n])
}

#[test]
fn s5_categorisation() {
    let constraints = FlatConstraints;
    let mut utxo = UtxoIndex::empty();
    utxo.insert(id(1), TokenBundle::from_coin(Coin::from_u64(1)));
    utxo.insert(id(2), TokenBundle::from_coin(Coin::from_u64(2)));
    utxo.insert(id(3), TokenBundle::from_coin(Coin::from_u64(10)));

    let categorized = categorize_utxo(&constraints, &utxo);

    assert_eq!(categorized.ignorables.iter().map(|(i, _)| i.clone()).collect::<Vec<_>>(), vec![id(1)]);
    assert_eq!(categorized.freeriders.iter().map(|(i, _)| i.clone()).collect::<Vec<_>>(), vec![id(2)]);
    assert_eq!(categorized.supporters.iter().map(|(i, _)| i.clone()).collect::<Vec<_>>(), vec![id(3)]);
}

#[test]
fn p7_categorisation_round_trip_preserves_the_multiset() {
    let constraints = FlatConstraints;
    let mut utxo = UtxoIndex::empty();
    utxo.insert(id(1), TokenBundle::from_coin(Coin::from_u64(1)));
    utxo.insert(id(2), TokenBundle::from_coin(Coin::from_u64(2)));
    utxo.insert(id(3), TokenBundle::from_coin(Coin::from_u64(10)));

    let categorized = categorize_utxo(&constraints, &utxo);
    let mut recombined: Vec<UtxoId> = categorized
        .supporters
        .iter()
        .chain(categorized.freeriders.iter())
        .chain(categorized.ignorables.iter())
        .map(|(i, _)| i.clone())
        .collect();
    recombined.sort();
    let mut original: Vec<UtxoId> = utxo.iter().map(|(i, _)| i.clone()).collect();
    original.sort();
    assert_eq!(recombined, original);
}

#[test]
fn p8_planner_partitions_the_pool_and_sums_fees() {
    let constraints = FlatConstraints;
    let mut utxo = UtxoIndex::empty();
    utxo.insert(id(1), TokenBundle::from_coin(Coin::from_u64(10)));
    utxo.insert(id(2), TokenBundle::from_coin(Coin::from_u64(10)));
    utxo.insert(id(3), TokenBundle::from_coin(Coin::from_u64(1)));

    let categorized = categorize_utxo(&constraints, &utxo);
    let mut rng = StdRng::seed_from_u64(2);
    let plan = create_plan(&constraints, categorized, Coin::ZERO, &mut rng);

    let selected_count: usize = plan.selections.iter().map(|s| s.inputs().len()).sum();
    let unselected_count =
        plan.unselected.supporters.len() + plan.unselected.freeriders.len() + plan.unselected.ignorables.len();
    assert_eq!(selected_count + unselected_count, utxo.len());
    assert!(plan.unselected.supporters.is_empty());

    let fee_sum: Coin = plan
        .selections
        .iter()
        .fold(Coin::ZERO, |acc, s| acc.add(s.fee()));
    assert_eq!(fee_sum, plan.total_fee);
}
