use fenris_form::index::{Index, IndexKind};
use fenris_form::multi_index::MultiIndex;

#[test]
fn multi_index_enumerates_with_last_index_fastest() {
    let multi_index = MultiIndex::from_dims(IndexKind::Primary, &[2, 3]);
    assert_eq!(multi_index.rank(), 2);
    assert_eq!(multi_index.dims(), &[2, 3]);
    assert_eq!(multi_index.len(), 6);
    assert_eq!(multi_index.indices()[1], Index::primary(1, 0..3));

    let values = multi_index.values();
    assert_eq!(
        values,
        vec![
            vec![0, 0],
            vec![0, 1],
            vec![0, 2],
            vec![1, 0],
            vec![1, 1],
            vec![1, 2]
        ]
    );
}

#[test]
fn empty_multi_index_has_single_combination() {
    let multi_index = MultiIndex::from_dims(IndexKind::Auxiliary, &[]);
    assert_eq!(multi_index.rank(), 0);
    assert_eq!(multi_index.len(), 1);
    assert!(!multi_index.is_empty());
    assert_eq!(multi_index.values(), vec![Vec::<usize>::new()]);
}

#[test]
fn multi_index_with_zero_dimension_is_empty() {
    let multi_index = MultiIndex::from_dims(IndexKind::Secondary, &[2, 0]);
    assert!(multi_index.is_empty());
    assert!(multi_index.values().is_empty());
}

#[test]
fn partial_ranges_keep_full_axes() {
    let multi_index = MultiIndex::with_dims(vec![Index::secondary(0, [1, 2]), Index::secondary(1, 0..2)], vec![3, 2]);
    assert_eq!(multi_index.dims(), &[3, 2]);
    assert_eq!(multi_index.len(), 6);

    assert_eq!(multi_index.values(), vec![vec![1, 0], vec![1, 1], vec![2, 0], vec![2, 1]]);
    let positions = multi_index.positions();
    assert_eq!(positions.len(), 6);
    assert_eq!(positions[0], vec![0, 0]);
    assert_eq!(positions[5], vec![2, 1]);

    assert!(multi_index.contains(&[1, 0]));
    assert!(multi_index.contains(&[2, 1]));
    assert!(!multi_index.contains(&[0, 1]));
    assert!(!multi_index.contains(&[1, 2]));
    assert!(!multi_index.contains(&[1]));
}

#[test]
fn empty_multi_index_contains_empty_position() {
    let multi_index = MultiIndex::with_dims(vec![], vec![]);
    assert_eq!(multi_index.positions(), vec![Vec::<usize>::new()]);
    assert!(multi_index.contains(&[]));
}
