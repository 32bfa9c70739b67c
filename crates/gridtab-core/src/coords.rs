//! Conversion between 1-based (row, column) pairs and A1-style references.

use crate::error::GridtabError;
use crate::model::Bounds;

/// Largest row number a worksheet can hold.
pub const MAX_ROWS: u32 = 1_048_576;
/// Largest column number a worksheet can hold (`XFD`).
pub const MAX_COLS: u32 = 16_384;

/// Column letters for a 1-based column number: 1 -> "A", 27 -> "AA".
pub fn column_name(col: u32) -> Result<String, GridtabError> {
    if col == 0 || col > MAX_COLS {
        return Err(GridtabError::InvalidCoordinate { row: 1, col });
    }
    let mut letters = Vec::with_capacity(3);
    let mut n = col;
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    Ok(String::from_utf8_lossy(&letters).into_owned())
}

/// 1-based column number for a run of uppercase letters: "A" -> 1, "AA" -> 27.
///
/// Returns `None` for empty input, non-uppercase characters, or columns past
/// the sheet limit.
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return None;
        }
        col = col.checked_mul(26)?.checked_add(u32::from(b - b'A') + 1)?;
        if col > MAX_COLS {
            return None;
        }
    }
    Some(col)
}

/// Format a 1-based (row, col) pair as an address such as `C7`.
pub fn to_address(row: u32, col: u32) -> Result<String, GridtabError> {
    if row == 0 || row > MAX_ROWS || col == 0 || col > MAX_COLS {
        return Err(GridtabError::InvalidCoordinate { row, col });
    }
    Ok(format!("{}{}", column_name(col)?, row))
}

/// Parse an address such as `C7` into a 1-based (row, col) pair.
///
/// The address must match `[A-Z]+[0-9]+` exactly; lowercase letters, `$`
/// anchors and sheet prefixes are rejected.
pub fn from_address(address: &str) -> Result<(u32, u32), GridtabError> {
    let invalid = || GridtabError::InvalidAddress(address.to_string());

    let split = address
        .find(|c: char| !c.is_ascii_uppercase())
        .ok_or_else(invalid)?;
    let (letters, digits) = address.split_at(split);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let col = column_index(letters).ok_or_else(invalid)?;
    let row: u32 = digits.parse().map_err(|_| invalid())?;
    if row == 0 || row > MAX_ROWS {
        return Err(invalid());
    }
    Ok((row, col))
}

/// Parse a range reference (`A1:C3`, or a single cell `B2`) into bounds.
///
/// Corners given in reverse order (`C3:A1`) are normalised.
pub fn parse_range(reference: &str) -> Result<Bounds, GridtabError> {
    let mut parts = reference.split(':');
    let first = parts.next().unwrap_or_default();
    let second = parts.next();
    if parts.next().is_some() {
        return Err(GridtabError::InvalidRange(reference.to_string()));
    }

    let (r1, c1) = from_address(first.trim())?;
    let (r2, c2) = match second {
        Some(s) => from_address(s.trim())?,
        None => (r1, c1),
    };
    Ok(Bounds::new(r1.min(r2), c1.min(c2), r1.max(r2), c1.max(c2)))
}
