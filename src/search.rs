//! Find text in a grid's cells.

use serde::{Deserialize, Serialize};

use crate::types::{CellCoord, GridSnapshot, Side};

/// Scan order for a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOrder {
    /// Left to right, then down.
    #[default]
    ByRows,
    /// Top to bottom, then right.
    ByColumns,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub match_case: bool,
    /// The whole cell must equal the query instead of containing it.
    pub match_entire: bool,
    pub order: SearchOrder,
}

/// A match, tagged with the grid it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub side: Side,
    pub row: u32,
    pub col: u32,
}

/// Compiled query: the needle is case-folded once instead of per cell.
struct Matcher<'a> {
    needle: std::borrow::Cow<'a, str>,
    options: &'a SearchOptions,
}

impl<'a> Matcher<'a> {
    fn new(query: &'a str, options: &'a SearchOptions) -> Self {
        let needle = if options.match_case {
            std::borrow::Cow::Borrowed(query)
        } else {
            std::borrow::Cow::Owned(query.to_lowercase())
        };
        Self { needle, options }
    }

    fn is_match(&self, text: &str) -> bool {
        let folded;
        let haystack = if self.options.match_case {
            text
        } else {
            folded = text.to_lowercase();
            folded.as_str()
        };
        if self.options.match_entire {
            haystack == self.needle.as_ref()
        } else {
            haystack.contains(self.needle.as_ref())
        }
    }
}

/// Cell addresses of `snapshot` in scan order.
fn scan(snapshot: &GridSnapshot, order: SearchOrder) -> Box<dyn Iterator<Item = CellCoord> + '_> {
    let rows = snapshot.row_count();
    let cols = snapshot.col_count();
    match order {
        SearchOrder::ByRows => {
            Box::new((0..rows).flat_map(move |r| (0..cols).map(move |c| CellCoord::new(r, c))))
        }
        SearchOrder::ByColumns => {
            Box::new((0..cols).flat_map(move |c| (0..rows).map(move |r| CellCoord::new(r, c))))
        }
    }
}

/// Every matching cell in scan order. An empty query matches nothing.
pub fn find_all(snapshot: &GridSnapshot, query: &str, options: &SearchOptions) -> Vec<CellCoord> {
    if query.is_empty() {
        return Vec::new();
    }
    let matcher = Matcher::new(query, options);
    scan(snapshot, options.order)
        .filter(|c| {
            snapshot
                .cell(c.row, c.col)
                .is_some_and(|text| matcher.is_match(text))
        })
        .collect()
}

/// First match after `from` in scan order, wrapping around. The cell at
/// `from` itself is considered last. A `from` outside the grid starts the
/// scan at the top.
pub fn find_next(
    snapshot: &GridSnapshot,
    query: &str,
    options: &SearchOptions,
    from: Option<CellCoord>,
) -> Option<CellCoord> {
    let hits = find_all(snapshot, query, options);
    let Some(from) = from.filter(|c| snapshot.contains(c.row, c.col)) else {
        return hits.first().copied();
    };
    let key = |c: &CellCoord| match options.order {
        SearchOrder::ByRows => (c.row, c.col),
        SearchOrder::ByColumns => (c.col, c.row),
    };
    let from_key = key(&from);
    hits.iter()
        .find(|c| key(c) > from_key)
        .or_else(|| hits.first())
        .copied()
}

/// Matches from both grids, left first.
pub fn find_all_sides<'a>(
    grids: impl IntoIterator<Item = (Side, &'a GridSnapshot)>,
    query: &str,
    options: &SearchOptions,
) -> Vec<SearchHit> {
    grids
        .into_iter()
        .flat_map(|(side, snapshot)| {
            find_all(snapshot, query, options)
                .into_iter()
                .map(move |c| SearchHit {
                    side,
                    row: c.row,
                    col: c.col,
                })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn grid() -> GridSnapshot {
        GridSnapshot::from_rows(vec![
            vec!["Apple".into(), "banana".into()],
            vec!["apple pie".into(), "APPLE".into()],
        ])
    }

    #[test_case("apple", false, false, 3 ; "contains ignoring case")]
    #[test_case("Apple", true, false, 1 ; "contains with case")]
    #[test_case("apple", false, true, 2 ; "entire ignoring case")]
    #[test_case("apple", true, true, 0 ; "entire with case")]
    fn option_matrix(query: &str, match_case: bool, match_entire: bool, expected: usize) {
        let options = SearchOptions {
            match_case,
            match_entire,
            order: SearchOrder::ByRows,
        };
        assert_eq!(find_all(&grid(), query, &options).len(), expected);
    }

    #[test]
    fn find_next_wraps_and_checks_current_last() {
        let options = SearchOptions::default();
        let g = grid();
        let first = find_next(&g, "apple", &options, None).unwrap();
        assert_eq!(first, CellCoord::new(0, 0));
        let second = find_next(&g, "apple", &options, Some(first)).unwrap();
        assert_eq!(second, CellCoord::new(1, 0));
        let third = find_next(&g, "apple", &options, Some(second)).unwrap();
        assert_eq!(third, CellCoord::new(1, 1));
        assert_eq!(find_next(&g, "apple", &options, Some(third)), Some(first));
        assert_eq!(find_next(&g, "banana", &options, Some(CellCoord::new(0, 1))), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn column_order_changes_sequence() {
        let options = SearchOptions {
            order: SearchOrder::ByColumns,
            ..SearchOptions::default()
        };
        let hits = find_all(&grid(), "apple", &options);
        assert_eq!(
            hits,
            vec![CellCoord::new(0, 0), CellCoord::new(1, 0), CellCoord::new(1, 1)]
        );
        assert_eq!(
            find_next(&grid(), "apple", &options, Some(CellCoord::new(1, 0))),
            Some(CellCoord::new(1, 1))
        );
    }

    #[test]
    fn empty_query_and_out_of_bounds_cursor() {
        let options = SearchOptions::default();
        assert!(find_all(&grid(), "", &options).is_empty());
        assert_eq!(
            find_next(&grid(), "banana", &options, Some(CellCoord::new(40, 40))),
            Some(CellCoord::new(0, 1))
        );
    }

    #[test]
    fn hits_are_tagged_by_side() {
        let left = grid();
        let right = GridSnapshot::from_rows(vec![vec!["banana split".into()]]);
        let hits = find_all_sides(
            [(Side::Left, &left), (Side::Right, &right)],
            "banana",
            &SearchOptions::default(),
        );
        assert_eq!(
            hits,
            vec![
                SearchHit { side: Side::Left, row: 0, col: 1 },
                SearchHit { side: Side::Right, row: 0, col: 0 },
            ]
        );
    }
}
