//! Spreadsheet-style cell addresses ("A1", "AB12") for headers and status text.

use crate::types::CellCoord;

/// Convert a 0-based column index to column letters (A, B, ..., Z, AA, AB, ...).
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = u64::from(col) + 1; // 1-based
    while n > 0 {
        n -= 1;
        let offset = u8::try_from(n % 26).unwrap_or(0);
        result.insert(0, char::from(b'A' + offset));
        n /= 26;
    }
    result
}

/// Format a 0-based coordinate as an A1 reference.
pub fn format_cell_ref(coord: CellCoord) -> String {
    format!("{}{}", col_to_letter(coord.col), u64::from(coord.row) + 1)
}

/// Parse a reference like "B3" (or "$B$3") into a 0-based coordinate.
pub fn parse_cell_ref(cell_ref: &str) -> Option<CellCoord> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            // Letters after digits are malformed ("1A")
            if saw_row {
                return None;
            }
            let upper = ch.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(u32::from(upper) - u32::from('A') + 1)?;
            saw_col = true;
        } else if ch.is_ascii_digit() {
            row = row
                .checked_mul(10)?
                .checked_add(u32::from(ch) - u32::from('0'))?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some(CellCoord::new(row - 1, col - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, "A")]
    #[test_case(25, "Z")]
    #[test_case(26, "AA")]
    #[test_case(27, "AB")]
    #[test_case(701, "ZZ")]
    #[test_case(702, "AAA")]
    fn column_letters(col: u32, expected: &str) {
        assert_eq!(col_to_letter(col), expected);
    }

    #[test]
    fn format_and_parse_agree() {
        let coord = CellCoord::new(11, 27);
        assert_eq!(format_cell_ref(coord), "AB12");
        assert_eq!(parse_cell_ref("AB12"), Some(coord));
        assert_eq!(parse_cell_ref("$ab$12"), Some(coord));
    }

    #[test_case("" ; "empty")]
    #[test_case("A" ; "no row")]
    #[test_case("12" ; "no column")]
    #[test_case("A0" ; "row zero")]
    #[test_case("1A" ; "digits first")]
    #[test_case("A-1" ; "punctuation")]
    fn rejects_malformed(input: &str) {
        assert_eq!(parse_cell_ref(input), None);
    }
}
