//! Small hand-checked connectivity scenarios.

use tissue_connect::{
    check_consistency_of_matrix_and_tissue, count_from_kind, fill_territories,
    spread_synapses_into_local_neighbourhoods, ConnectError, DistributionMatrix, FillMatrix,
};
use tissue_core::{KindOfCell, TissueCoordinates, TissueShape, TorusAxes};
use tissue_test_utils::{single_kind_shape, store_for, tissue_kind, two_kind_shape};

#[test]
fn two_by_two_grid_sources_itself() {
    let shape = single_kind_shape(2, 2, 1, 1, TorusAxes::NONE);
    let store = store_for(shape.clone());
    fill_territories(&store, &FillMatrix::new(&shape, vec![1]).unwrap(), 4).unwrap();
    for x in 0..2 {
        for y in 0..2 {
            let at = TissueCoordinates::new(x, y, 0);
            assert_eq!(store.source_of_synapse(at, 0), at);
        }
    }
}

#[test]
fn two_by_two_grid_with_two_kinds_sources_own_kind() {
    let shape = TissueShape::builder(2, 2)
        .tissue_kind(tissue_kind(1, 1))
        .tissue_kind(tissue_kind(1, 1))
        .build()
        .unwrap();
    let store = store_for(shape.clone());
    let m = FillMatrix::new(&shape, vec![1, 0, 0, 1]).unwrap();
    fill_territories(&store, &m, 2).unwrap();
    for x in 0..2 {
        for y in 0..2 {
            for c in 0..2 {
                let at = TissueCoordinates::new(x, y, c);
                assert_eq!(store.source_of_synapse(at, 0), at);
            }
        }
    }
    // A 1×1 neighbourhood with the identity shift changes nothing.
    let before = store.snapshot();
    let local = DistributionMatrix::new(1, 1, vec![1]).unwrap();
    let metrics =
        spread_synapses_into_local_neighbourhoods(&store, KindOfCell(1), KindOfCell(1), &local, 2)
            .unwrap();
    assert_eq!(metrics.items_visited, 0);
    assert_eq!(store, before);
}

#[test]
fn fill_counts_match_matrix_in_every_column() {
    let shape = two_kind_shape();
    let store = store_for(shape.clone());
    let counts = vec![1, 2, 2, 1, 0, 1, 3, 0];
    let m = FillMatrix::new(&shape, counts.clone()).unwrap();
    fill_territories(&store, &m, 5).unwrap();
    for x in 0..4 {
        for y in 0..3 {
            for target in 0..2u16 {
                for source in 0..4u16 {
                    assert_eq!(
                        count_from_kind(&store, KindOfCell(target), KindOfCell(source), x, y),
                        counts[(target * 4 + source) as usize] as u64,
                        "column ({x}, {y}), {target} <- {source}"
                    );
                }
            }
        }
    }
}

#[test]
fn sensory_sources_point_past_the_tissue() {
    let shape = two_kind_shape();
    let store = store_for(shape.clone());
    let mut m = FillMatrix::zeros(&shape);
    m.set(KindOfCell(0), KindOfCell(3), 6);
    m.set(KindOfCell(1), KindOfCell(2), 4);
    fill_territories(&store, &m, 1).unwrap();
    let at = TissueCoordinates::new(2, 1, 3);
    let sources: Vec<u32> = (0..2).map(|slot| store.source_of_synapse(at, slot).c).collect();
    // Cell 1 of kind 1 holds slots 2 and 3 of the kind's run: sensory cells 1 and 2.
    assert_eq!(sources, vec![5, 6]);
    assert_eq!(shape.kind_at_columnar(6), KindOfCell(2));
}

#[test]
fn empty_sensory_kind_is_rejected() {
    let shape = TissueShape::builder(2, 2)
        .tissue_kind(tissue_kind(1, 2))
        .sensory_kind(0)
        .build()
        .unwrap();
    let store = store_for(shape.clone());
    let m = FillMatrix::new(&shape, vec![1, 1]).unwrap();
    assert_eq!(
        fill_territories(&store, &m, 1),
        Err(ConnectError::EmptySourceKind {
            target: KindOfCell(0),
            source: KindOfCell(1),
        })
    );
}

#[test]
fn consistency_follows_matrix_sum() {
    let shape = two_kind_shape();
    let store = store_for(shape.clone());
    fill_territories(
        &store,
        &FillMatrix::new(&shape, vec![1, 2, 2, 1, 0, 1, 3, 0]).unwrap(),
        2,
    )
    .unwrap();
    let two = DistributionMatrix::new(1, 1, vec![2]).unwrap();
    let three = DistributionMatrix::new(1, 1, vec![3]).unwrap();
    let target = KindOfCell(0);
    assert!(check_consistency_of_matrix_and_tissue(&store, target, KindOfCell(1), &two, 3).unwrap());
    assert!(!check_consistency_of_matrix_and_tissue(&store, target, KindOfCell(1), &three, 3).unwrap());

    // One stray synapse breaks a single column.
    let stray = TissueCoordinates::new(3, 2, 2);
    tissue_core::write_tissue_coordinates_to_bits(
        stray,
        &store.source_coordinates(TissueCoordinates::new(3, 2, 0), 0),
    );
    assert!(!check_consistency_of_matrix_and_tissue(&store, target, KindOfCell(1), &two, 8).unwrap());
}
