//! P1-P5 and P9 from the design notes: balance preservation, change
//! validity/stability/subset, fee monotonicity, and round-robin
//! determinism.

use rand::{rngs::StdRng, SeedableRng};
use utxo_select::{
    perform_selection, Address, AssetId, Coin, Correctness, SelectionCriteria, SelectionLimit,
    SelectionSkeleton, TokenBundle, TokenMap, TokenQuantity, TxConstraints, TxOut, UtxoId,
    UtxoIndex,
};

struct FlatConstraints {
    min_ada: u64,
}

impl TxConstraints for FlatConstraints {
    fn base_cost(&self) -> Coin {
        Coin::from_u64(2)
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
        Coin::from_u64(1)
    }
    fn output_size(&self, _bundle: &TokenBundle) -> u64 {
        5
    }
    fn output_coin_cost(&self, coin: Coin) -> Coin {
        // Strictly increasing in the coin quantity, so P5 has something
        // to observe.
        Coin::from_u64(1 + coin.to_u64() / 1_000)
    }
    fn output_coin_size(&self, _coin: Coin) -> u64 {
        5
    }
    fn min_ada_for(&self, _assets: &TokenMap) -> Coin {
        Coin::from_u64(self.min_ada)
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

fn flat_cost(constraints: &FlatConstraints) -> impl Fn(&SelectionSkeleton) -> Coin + '_ {
    move |skeleton: &SelectionSkeleton| {
        let mut cost = constraints.base_cost();
        for _ in 0..skeleton.input_count {
            cost = cost.add(constraints.input_cost());
        }
        for out in &skeleton.outputs {
            cost = cost.add(constraints.output_cost(out));
        }
        for shape in &skeleton.change_shapes {
            cost = cost.add(constraints.output_cost(&TokenBundle::new(Coin::ZERO, shape.clone())));
        }
        cost
    }
}

fn id(n: u8) -> UtxoId {
    UtxoId::new(vec![n])
}

fn asset(n: u8) -> AssetId {
    AssetId::new(vec![n], vec![])
}

fn sample_pool() -> UtxoIndex {
    let mut utxo = UtxoIndex::empty();
    utxo.insert(id(1), TokenBundle::from_coin(Coin::from_u64(50)));
    utxo.insert(id(2), TokenBundle::from_coin(Coin::from_u64(80)));
    utxo.insert(
        id(3),
        TokenBundle::new(Coin::from_u64(20), TokenMap::from_pairs([(asset(1), 12u64.into())])),
    );
    utxo.insert(id(4), TokenBundle::from_coin(Coin::from_u64(30)));
    utxo
}

fn sample_criteria(pool: UtxoIndex) -> SelectionCriteria {
    SelectionCriteria {
        outputs_to_cover: vec![TxOut::new(
            Address::new(vec![9]),
            TokenBundle::new(Coin::from_u64(15), TokenMap::from_pairs([(asset(1), 5u64.into())])),
        )],
        utxo_available: pool,
        selection_limit: SelectionLimit::NoLimit,
        extra_coin_source: Coin::ZERO,
    }
}

#[test]
fn p1_balance_is_preserved() {
    let constraints = FlatConstraints { min_ada: 2 };
    for seed in 0..8 {
        let criteria = sample_criteria(sample_pool());
        let mut rng = StdRng::seed_from_u64(seed);
        let selection = perform_selection(&constraints, flat_cost(&constraints), criteria, &mut rng).unwrap();

        let input_sum = TokenBundle::sum(selection.inputs().iter().map(|(_, b)| b));
        let output_sum = TokenBundle::sum(selection.outputs().iter().map(|o| o.bundle()));
        let change_sum = TokenBundle::sum(selection.change().iter());
        let rhs = output_sum.add(&change_sum).add(&TokenBundle::from_coin(selection.fee()));
        assert_eq!(input_sum.add(&TokenBundle::from_coin(selection.reward_withdrawal())), rhs);
    }
}

#[test]
fn p2_change_is_valid() {
    let constraints = FlatConstraints { min_ada: 2 };
    let criteria = sample_criteria(sample_pool());
    let mut rng = StdRng::seed_from_u64(4);
    let selection = perform_selection(&constraints, flat_cost(&constraints), criteria, &mut rng).unwrap();

    for change in selection.change() {
        assert!(change.coin() >= constraints.min_ada_for(change.tokens()));
        assert!(constraints.output_has_valid_size(change));
        assert!(constraints.output_has_valid_token_quantities(change));
    }
}

#[test]
fn p3_change_shape_matches_output_count() {
    let constraints = FlatConstraints { min_ada: 2 };
    let criteria = sample_criteria(sample_pool());
    let mut rng = StdRng::seed_from_u64(4);
    let selection = perform_selection(&constraints, flat_cost(&constraints), criteria, &mut rng).unwrap();
    assert_eq!(selection.change().len(), selection.outputs().len());
}

#[test]
fn p4_change_assets_are_a_subset_of_input_assets() {
    let constraints = FlatConstraints { min_ada: 2 };
    let criteria = sample_criteria(sample_pool());
    let mut rng = StdRng::seed_from_u64(4);
    let selection = perform_selection(&constraints, flat_cost(&constraints), criteria, &mut rng).unwrap();

    let input_assets: Vec<AssetId> = TokenBundle::sum(selection.inputs().iter().map(|(_, b)| b))
        .tokens()
        .asset_set();
    for change in selection.change() {
        for a in change.assets() {
            assert!(input_assets.contains(&a));
        }
    }
}

#[test]
fn p5_output_coin_cost_is_monotonic_in_size() {
    let constraints = FlatConstraints { min_ada: 2 };
    let small = constraints.output_coin_cost(Coin::from_u64(100));
    let large = constraints.output_coin_cost(Coin::from_u64(1_000));
    assert!(large > small);
}

#[test]
fn p9_identical_seeds_give_identical_selections() {
    let constraints = FlatConstraints { min_ada: 2 };
    let mut rng_a = StdRng::seed_from_u64(99);
    let mut rng_b = StdRng::seed_from_u64(99);
    let a = perform_selection(&constraints, flat_cost(&constraints), sample_criteria(sample_pool()), &mut rng_a).unwrap();
    let b = perform_selection(&constraints, flat_cost(&constraints), sample_criteria(sample_pool()), &mut rng_b).unwrap();
    assert_eq!(a, b);
}
