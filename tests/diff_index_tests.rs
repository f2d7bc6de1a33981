//! Highlight index tests
//!
//! The map is built once per comparison and read by both grids, so it must
//! hold exactly one entry per coordinate with the last reported type.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use sxsview::diff_index::HighlightMap;
use sxsview::{CellCoord, ChangeRecord, ChangeType};
use test_case::test_case;

use common::{change, proptest_config};

fn arb_change_type() -> impl Strategy<Value = ChangeType> {
    prop_oneof![
        Just(ChangeType::Modified),
        Just(ChangeType::Added),
        Just(ChangeType::Removed),
    ]
}

/// Small coordinate space so duplicates are common.
fn arb_changes() -> impl Strategy<Value = Vec<ChangeRecord>> {
    proptest::collection::vec(
        (0u32..12, 0u32..6, arb_change_type()).prop_map(|(r, c, t)| change(r, c, t)),
        0..80,
    )
}

proptest! {
    #![proptest_config(proptest_config(256))]

    #[test]
    fn one_entry_per_coordinate_last_wins(changes in arb_changes()) {
        let map = HighlightMap::build(&changes);

        let mut expected = BTreeMap::new();
        for c in &changes {
            expected.insert((c.row, c.col), c.change_type);
        }

        prop_assert_eq!(map.len(), expected.len());
        for (&(row, col), &change_type) in &expected {
            prop_assert_eq!(map.get(row, col), Some(change_type));
        }
        let coords: Vec<CellCoord> = expected
            .keys()
            .map(|&(row, col)| CellCoord::new(row, col))
            .collect();
        prop_assert_eq!(map.coords(), coords.as_slice());
        prop_assert_eq!(map.counts().total(), expected.len());

        let rows: BTreeSet<u32> = expected.keys().map(|&(row, _)| row).collect();
        prop_assert_eq!(map.changed_rows(), rows);
    }

    #[test]
    fn next_then_prev_returns_to_start(changes in arb_changes(), row in 0u32..12, col in 0u32..6) {
        let map = HighlightMap::build(&changes);
        let Some(next) = map.next_change(Some(CellCoord::new(row, col))) else {
            prop_assert!(map.is_empty());
            return Ok(());
        };
        if map.len() > 1 {
            let back = map.prev_change(Some(next)).unwrap();
            prop_assert_ne!(back, next);
            prop_assert_eq!(map.next_change(Some(back)), Some(next));
        }
    }
}

#[test]
fn two_changes_two_entries() {
    let map = HighlightMap::build(&[
        change(0, 0, ChangeType::Modified),
        change(5, 2, ChangeType::Added),
    ]);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(0, 0), Some(ChangeType::Modified));
    assert_eq!(map.get(5, 2), Some(ChangeType::Added));
    assert_eq!(map.get(5, 1), None);
}

#[test]
fn empty_change_list_builds_empty_map() {
    let map = HighlightMap::build(&[]);
    assert!(map.is_empty());
    assert_eq!(map.next_change(None), None);
    assert_eq!(map.prev_change(Some(CellCoord::new(3, 3))), None);
}

#[test_case(None, Some((1, 4)) ; "from nothing starts at the top")]
#[test_case(Some((1, 4)), Some((2, 0)) ; "steps in row-major order")]
#[test_case(Some((1, 5)), Some((2, 0)) ; "from an unhighlighted cell")]
#[test_case(Some((7, 1)), Some((1, 4)) ; "wraps past the last change")]
fn next_change_order(from: Option<(u32, u32)>, expected: Option<(u32, u32)>) {
    let map = HighlightMap::build(&[
        change(7, 1, ChangeType::Removed),
        change(2, 0, ChangeType::Added),
        change(1, 4, ChangeType::Modified),
    ]);
    let from = from.map(|(r, c)| CellCoord::new(r, c));
    let expected = expected.map(|(r, c)| CellCoord::new(r, c));
    assert_eq!(map.next_change(from), expected);
}
