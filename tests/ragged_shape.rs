use ragged_index::data::RaggedShape;
use ragged_index::debug_invariants::DebugInvariants;
use ragged_index::ragged_error::RaggedError;

#[test]
fn shape_from_ids_and_splits_agree() -> Result<(), Box<dyn std::error::Error>> {
    let from_ids = RaggedShape::from_row_ids(&[0, 0, 2, 2], 3)?;
    let from_splits = RaggedShape::from_row_splits(vec![0, 2, 2, 4])?;
    assert_eq!(from_ids, from_splits);
    assert_eq!(from_splits.row_ids(), from_ids.row_ids());
    assert!(from_ids.validate_invariants().is_ok());
    Ok(())
}

#[test]
fn compact_then_filter_rows() -> Result<(), Box<dyn std::error::Error>> {
    // rows: [a b] [] [c d e]
    let shape = RaggedShape::from_row_splits(vec![0, 2, 2, 5])?;
    let (filtered, new2old) = shape.compact(&[false, false, true, true, true])?;
    assert_eq!(new2old, vec![2, 3, 4]);
    assert_eq!(filtered.num_rows(), 3);
    assert_eq!(filtered.row_splits(), &[0, 0, 0, 3]);
    assert_eq!(filtered.row_ids(), &[2, 2, 2]);
    Ok(())
}

#[test]
fn bad_row_ids_propagate() {
    let err = RaggedShape::from_row_ids(&[2, 1], 3).unwrap_err();
    assert!(matches!(err, RaggedError::InvalidRowId { index: 1, .. }));
}

#[test]
#[should_panic(expected = "[invariants] intentional")]
fn debug_invariants_macro_panics() {
    ragged_index::debug_invariants!(
        Err::<(), RaggedError>(RaggedError::ElementCountOverflow { len: 0 }),
        "intentional"
    );
}
