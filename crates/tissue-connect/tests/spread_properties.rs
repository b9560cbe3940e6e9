//! Properties of synapse spreading on torus grids.

use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tissue_arena::TissueState;
use tissue_connect::{
    check_consistency_of_matrix_and_tissue, count_from_kind, count_synapses_by_source_offset,
    fill_territories, ordinals_of_source_kind, spread_synapses_into_local_neighbourhoods,
    spread_synapses_into_neighbourhoods, ColumnShiftTable, DistributionMatrix, FillMatrix,
};
use tissue_core::{KindOfCell, TissueCoordinates};
use tissue_test_utils::{connect_shape, store_for};

const TARGET: KindOfCell = KindOfCell(0);
const SOURCE: KindOfCell = KindOfCell(0);

/// Kind 0 sources only from itself; kind 1 only from the sensory kind.
fn filled_store() -> TissueState {
    let shape = connect_shape();
    let store = store_for(shape.clone());
    let m = FillMatrix::new(&shape, vec![18, 0, 0, 0, 0, 12]).unwrap();
    fill_territories(&store, &m, 3).unwrap();
    store
}

fn random_table(seed: u64) -> ColumnShiftTable {
    let mut targets: Vec<(u32, u32)> = (0..5).flat_map(|y| (0..7).map(move |x| (x, y))).collect();
    targets.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    ColumnShiftTable::new(7, 5, targets).unwrap()
}

fn full_matrix() -> DistributionMatrix {
    DistributionMatrix::new(3, 3, vec![2; 9]).unwrap()
}

fn per_column_counts(store: &TissueState) -> Vec<u64> {
    let mut counts = Vec::new();
    for x in 0..7 {
        for y in 0..5 {
            for (target, source) in [(0, 0), (0, 1), (0, 2), (1, 2)] {
                counts.push(count_from_kind(store, KindOfCell(target), KindOfCell(source), x, y));
            }
        }
    }
    counts
}

/// Every ordinal slot, read across the grid, names each column exactly once.
fn assert_ordinals_permute_columns(store: &TissueState) {
    let mut all: Vec<(u32, u32)> = (0..7).flat_map(|x| (0..5).map(move |y| (x, y))).collect();
    all.sort_unstable();
    for slot in 0..9 {
        for cell in 0..2 {
            let mut seen: Vec<(u32, u32)> = all
                .iter()
                .map(|&(x, y)| {
                    let s = store.source_of_synapse(TissueCoordinates::new(x, y, cell), slot);
                    // Fill gives each cell of kind 0 one territory's worth of slots.
                    assert_eq!(s.c, cell, "columnar source changed");
                    (s.x, s.y)
                })
                .collect();
            seen.sort_unstable();
            assert_eq!(seen, all, "cell {cell} slot {slot}");
        }
    }
}

#[test]
fn local_spread_on_torus_reproduces_matrix_in_every_column() {
    let store = filled_store();
    let m = full_matrix();
    spread_synapses_into_local_neighbourhoods(&store, TARGET, SOURCE, &m, 4).unwrap();
    assert!(check_consistency_of_matrix_and_tissue(&store, TARGET, SOURCE, &m, 4).unwrap());
    for x in 0..7 {
        for y in 0..5 {
            let histogram = count_synapses_by_source_offset(&store, TARGET, SOURCE, (x, y), 3, 3)
                .unwrap();
            assert_eq!(histogram, m, "column ({x}, {y})");
        }
    }
}

#[test]
fn spread_with_shift_table_keeps_cardinality() {
    let store = filled_store();
    let before = per_column_counts(&store);
    let m = full_matrix();
    spread_synapses_into_neighbourhoods(&store, TARGET, SOURCE, &m, &random_table(11), 3).unwrap();
    assert_eq!(per_column_counts(&store), before);
    assert!(check_consistency_of_matrix_and_tissue(&store, TARGET, SOURCE, &m, 2).unwrap());
    assert_ordinals_permute_columns(&store);
    assert_eq!(ordinals_of_source_kind(&store, TARGET, SOURCE).len(), 18);
}

#[test]
fn spread_does_not_depend_on_thread_count() {
    let one = filled_store();
    let eight = one.snapshot();
    let m = full_matrix();
    let table = random_table(5);
    spread_synapses_into_neighbourhoods(&one, TARGET, SOURCE, &m, &table, 1).unwrap();
    spread_synapses_into_neighbourhoods(&eight, TARGET, SOURCE, &m, &table, 8).unwrap();
    assert_eq!(one, eight);
}

#[test]
fn fill_does_not_depend_on_thread_count() {
    let shape = connect_shape();
    let m = FillMatrix::new(&shape, vec![7, 6, 5, 4, 4, 4]).unwrap();
    let one = store_for(shape.clone());
    let eight = store_for(shape);
    fill_territories(&one, &m, 1).unwrap();
    fill_territories(&eight, &m, 8).unwrap();
    assert_eq!(one, eight);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn partial_spreads_keep_every_slot_a_permutation(
        seed in any::<u64>(),
        counts in prop::collection::vec(0u32..3, 9),
        threads in 1usize..6,
    ) {
        let store = filled_store();
        let before = per_column_counts(&store);
        let m = DistributionMatrix::new(3, 3, counts).unwrap();
        spread_synapses_into_neighbourhoods(&store, TARGET, SOURCE, &m, &random_table(seed), threads)
            .unwrap();
        prop_assert_eq!(per_column_counts(&store), before);
        assert_ordinals_permute_columns(&store);
    }
}
