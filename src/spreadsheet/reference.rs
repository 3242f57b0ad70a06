//! Conversions between spreadsheet-style references and 0-based indexes.
//!
//! Columns use the bijective base-26 letter encoding (A = 0, Z = 25, AA = 26, ...),
//! rows are written 1-based (row "1" is index 0).

/// Converts column letters to a 0-based column index.
///
/// Letters are case-insensitive. Returns None for an empty string, for any
/// non-letter character, or when the index would overflow.
pub(crate) fn col_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters
        .chars()
        .map(|letter| letter.to_ascii_uppercase())
        .try_fold(0usize, |index, letter| {
            if !letter.is_ascii_uppercase() {
                return None;
            }
            let digit = letter as usize - 'A' as usize + 1;
            index.checked_mul(26)?.checked_add(digit)
        })
        .map(|column| column - 1)
}

/// Converts a 1-based row number string to a 0-based row index.
///
/// Returns None for an empty string, for non-digits, and for row "0".
pub(crate) fn row_to_index(number: &str) -> Option<usize> {
    if number.is_empty() || !number.chars().all(|char| char.is_ascii_digit()) {
        return None;
    }
    number
        .parse::<usize>()
        .ok()
        .filter(|row| *row > 0)
        .map(|row| row - 1)
}

/// Converts a 0-based column index to its letters (0 -> "A", 26 -> "AA").
pub(crate) fn index_to_col(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        let digit = (remaining - 1) % 26;
        letters.push((b'A' + digit as u8) as char);
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Converts a 0-based row index to its 1-based row number text.
pub(crate) fn index_to_row(index: usize) -> String {
    (index + 1).to_string()
}

/// Returns the spreadsheet-style reference of a cell (e.g. (0, 0) -> "A1").
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", index_to_col(col), index_to_row(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(col_to_index("A"), Some(0));
        assert_eq!(col_to_index("z"), Some(25));
        assert_eq!(col_to_index("AA"), Some(26));
        assert_eq!(col_to_index("AZ"), Some(51));
        assert_eq!(col_to_index("BA"), Some(52));
        assert_eq!(col_to_index("XFD"), Some(16383));
        assert_eq!(col_to_index(""), None);
        assert_eq!(col_to_index("A1"), None);
    }

    #[test]
    fn column_letters_overflow() {
        assert_eq!(col_to_index(&"Z".repeat(64)), None);
    }

    #[test]
    fn row_numbers() {
        assert_eq!(row_to_index("1"), Some(0));
        assert_eq!(row_to_index("42"), Some(41));
        assert_eq!(row_to_index("0"), None);
        assert_eq!(row_to_index(""), None);
        assert_eq!(row_to_index("-1"), None);
    }

    #[test]
    fn index_round_trip_boundaries() {
        for (index, letters) in [(0, "A"), (25, "Z"), (26, "AA"), (701, "ZZ"), (702, "AAA")] {
            assert_eq!(index_to_col(index), letters);
            assert_eq!(col_to_index(letters), Some(index));
        }
    }

    #[test]
    fn cell_reference() {
        assert_eq!(index_to_reference(0, 0), "A1");
        assert_eq!(index_to_reference(9, 27), "AB10");
    }
}
