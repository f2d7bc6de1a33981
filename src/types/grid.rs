use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier of an uploaded file, assigned by the upload service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a sheet, unique within one file's catalog.
pub type SheetName = String;

/// `GET /sheets/{fileId}` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SheetList {
    #[serde(default)]
    pub sheets: Vec<SheetName>,
}

/// Widest grid the viewer will lay out (Excel's column limit).
pub const MAX_GRID_COLS: u32 = 16_384;

/// Excel column width units to CSS pixels: `width * 7 + 5`.
const PX_PER_WIDTH_UNIT: f32 = 7.0;
const WIDTH_PADDING_PX: f32 = 5.0;
/// Points to CSS pixels.
const PX_PER_POINT: f32 = 1.33;

/// Full text content of one sheet at one point in time.
///
/// Replaced wholesale whenever the side's file or sheet changes. `rows` and
/// `cols` are the declared dimensions; `data` may be ragged, and missing cells
/// read as empty. A declared width beyond the longest row is dropped on decode.
///
/// `col_widths` (Excel width units) and `row_heights` (points) carry the
/// sheet's explicit sizes by 0-based index; on the wire the keys are strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSnapshot")]
pub struct GridSnapshot {
    pub rows: u32,
    pub cols: u32,
    pub data: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub col_widths: HashMap<u32, f32>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub row_heights: HashMap<u32, f32>,
}

#[derive(Deserialize)]
struct WireSnapshot {
    #[serde(default)]
    rows: u32,
    #[serde(default)]
    cols: u32,
    #[serde(deserialize_with = "deserialize_cells", default)]
    data: Vec<Vec<String>>,
    #[serde(default)]
    col_widths: HashMap<u32, f32>,
    #[serde(default)]
    row_heights: HashMap<u32, f32>,
}

impl From<WireSnapshot> for GridSnapshot {
    fn from(wire: WireSnapshot) -> Self {
        let cols = wire.cols.min(longest_row(&wire.data));
        Self {
            rows: wire.rows,
            cols,
            data: wire.data,
            col_widths: wire.col_widths,
            row_heights: wire.row_heights,
        }
    }
}

fn longest_row(data: &[Vec<String>]) -> u32 {
    data.iter()
        .map(|r| u32::try_from(r.len()).unwrap_or(u32::MAX))
        .max()
        .unwrap_or(0)
}

impl GridSnapshot {
    /// Build a snapshot from a cell matrix, deriving the dimensions.
    pub fn from_rows(data: Vec<Vec<String>>) -> Self {
        let rows = u32::try_from(data.len()).unwrap_or(u32::MAX);
        let cols = longest_row(&data);
        Self {
            rows,
            cols,
            data,
            ..Self::default()
        }
    }

    /// Number of rows that can actually be addressed.
    pub fn row_count(&self) -> u32 {
        self.rows
            .min(u32::try_from(self.data.len()).unwrap_or(u32::MAX))
    }

    /// Number of columns that can be addressed (the declared width, capped).
    pub fn col_count(&self) -> u32 {
        self.cols.min(MAX_GRID_COLS)
    }

    /// Explicit column widths in pixels. Non-positive sizes are ignored.
    pub fn col_widths_px(&self) -> HashMap<u32, f32> {
        sizes_px(&self.col_widths, |w| w * PX_PER_WIDTH_UNIT + WIDTH_PADDING_PX)
    }

    /// Explicit row heights in pixels. Non-positive sizes are ignored.
    pub fn row_heights_px(&self) -> HashMap<u32, f32> {
        sizes_px(&self.row_heights, |h| h * PX_PER_POINT)
    }

    /// True if `(row, col)` lies inside this grid.
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row < self.row_count() && col < self.col_count()
    }

    /// Cell text, or `None` when the address is outside the grid.
    pub fn cell(&self, row: u32, col: u32) -> Option<&str> {
        if !self.contains(row, col) {
            return None;
        }
        let row_data = self.data.get(row as usize)?;
        Some(row_data.get(col as usize).map_or("", String::as_str))
    }
}

fn sizes_px(sizes: &HashMap<u32, f32>, to_px: impl Fn(f32) -> f32) -> HashMap<u32, f32> {
    sizes
        .iter()
        .filter(|(_, size)| size.is_finite() && **size > 0.0)
        .map(|(&index, &size)| (index, to_px(size).round()))
        .collect()
}

/// Cells arrive as whatever the backend serialized: strings, numbers,
/// booleans, or null. Everything is normalized to display text.
fn deserialize_cells<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Vec<serde_json::Value>> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect())
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => number_text(&n),
        other => other.to_string(),
    }
}

/// Numbers read the way a browser prints them: `1.0` is `1`, very large or
/// very small magnitudes use `1e+21` / `1e-7`.
fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let Some(x) = n.as_f64() else {
        return n.to_string();
    };
    if x == 0.0 {
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&x.abs()) {
        return x.to_string();
    }
    let sci = format!("{x:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => sci,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn lenient_cells() {
        let json = r#"{"rows":2,"cols":3,"data":[["a",1.5,null],[true,7,"x"]]}"#;
        let snap: GridSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.data[0], vec!["a", "1.5", ""]);
        assert_eq!(snap.data[1], vec!["true", "7", "x"]);
    }

    #[test]
    fn ragged_rows_read_as_empty() {
        let snap = GridSnapshot {
            rows: 2,
            cols: 3,
            data: vec![vec!["a".into()], vec!["b".into(), "c".into(), "d".into()]],
            ..GridSnapshot::default()
        };
        assert_eq!(snap.cell(0, 2), Some(""));
        assert_eq!(snap.cell(1, 2), Some("d"));
        assert_eq!(snap.cell(2, 0), None);
        assert_eq!(snap.cell(0, 3), None);
    }

    #[test]
    fn declared_rows_beyond_data_are_not_addressable() {
        let snap = GridSnapshot {
            rows: 10,
            cols: 1,
            data: vec![vec!["only".into()]],
            ..GridSnapshot::default()
        };
        assert_eq!(snap.row_count(), 1);
        assert!(!snap.contains(1, 0));
    }

    #[test]
    fn from_rows_derives_dimensions() {
        let snap = GridSnapshot::from_rows(vec![vec!["a".into()], vec!["b".into(), "c".into()]]);
        assert_eq!((snap.rows, snap.cols), (2, 2));
    }

    #[test_case("1.0", "1" ; "whole float")]
    #[test_case("12345678.0", "12345678" ; "large whole float")]
    #[test_case("3.5", "3.5" ; "fraction")]
    #[test_case("-2.0", "-2" ; "negative whole")]
    #[test_case("-0.0", "0" ; "negative zero")]
    #[test_case("1e21", "1e+21" ; "exponent at threshold")]
    #[test_case("1.5e-7", "1.5e-7" ; "tiny")]
    #[test_case("0.000001", "0.000001" ; "small decimal")]
    #[test_case("42", "42" ; "integer")]
    fn numbers_read_like_the_browser(raw: &str, expected: &str) {
        let json = format!(r#"{{"rows":1,"cols":1,"data":[[{raw}]]}}"#);
        let snap: GridSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap.data[0][0], expected);
    }

    #[test]
    fn declared_cols_are_clamped_to_the_data() {
        let json = r#"{"rows":0,"cols":4000000000,"data":[]}"#;
        let snap: GridSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.col_count(), 0);

        let json = r#"{"rows":1,"cols":9,"data":[["a","b"]]}"#;
        let snap: GridSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.col_count(), 2);
    }

    #[test]
    fn oversized_literal_width_is_capped() {
        let snap = GridSnapshot {
            cols: u32::MAX,
            ..GridSnapshot::default()
        };
        assert_eq!(snap.col_count(), MAX_GRID_COLS);
    }

    #[test]
    fn explicit_sizes_decode_from_string_keys() {
        let json = r#"{"rows":1,"cols":2,"data":[["a","b"]],
            "col_widths":{"1":20.0},"row_heights":{"0":30.0,"4":-1}}"#;
        let snap: GridSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.col_widths.get(&1), Some(&20.0));
        assert_eq!(snap.col_widths_px().get(&1), Some(&145.0));
        let heights = snap.row_heights_px();
        assert_eq!(heights.get(&0), Some(&40.0));
        assert!(!heights.contains_key(&4));
    }
}
