//! Loose tabular text parsing.
//!
//! Input documents are "CSV-ish": comma separated, one record per line,
//! with no reliable quoting. The reader here keeps every line as a row of
//! trimmed cells and leaves the interpretation of columns to [`crate::data`].

use csv::{ReaderBuilder, Terminator, Trim};

/// Splits raw text into rows of trimmed cells.
///
/// Rows end at `\n`; a `\r` before it is trimmed away with the other
/// whitespace, and a lone `\r` stays inside its cell. Lines that are empty
/// after trimming are dropped. Quote characters are kept as ordinary text, so a
/// comma inside a quoted field still splits the field.
///
/// # Example
///
/// ```
/// use craftbook::tabular::parse_loose;
///
/// let rows = parse_loose(" Sword , 2 \r\n\r\n   \nShield,1,extra\n");
/// assert_eq!(rows, vec![
///     vec!["Sword".to_string(), "2".to_string()],
///     vec!["Shield".to_string(), "1".to_string(), "extra".to_string()],
/// ]);
/// ```
pub fn parse_loose(text: &str) -> Vec<Vec<String>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping unreadable line: {}", e);
                continue;
            }
        };
        // A whitespace-only line comes back as a single empty field.
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    rows
}

/// Converts a cell to a number the way the source spreadsheets were read.
///
/// A blank cell counts as `0`. Anything else must parse as a finite decimal
/// number; `NaN`, infinities and non-numeric text give `None`.
///
/// ```
/// use craftbook::tabular::parse_number;
///
/// assert_eq!(parse_number(" 2.5 "), Some(2.5));
/// assert_eq!(parse_number(""), Some(0.0));
/// assert_eq!(parse_number("Ore"), None);
/// assert_eq!(parse_number("inf"), None);
/// ```
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0.0);
    }
    cell.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Removes one pair of double quotes wrapping the whole cell, if present.
///
/// ```
/// use craftbook::tabular::strip_wrapping_quotes;
///
/// assert_eq!(strip_wrapping_quotes("\"Gem\""), "Gem");
/// assert_eq!(strip_wrapping_quotes("\"Gem"), "\"Gem");
/// assert_eq!(strip_wrapping_quotes("\"\""), "");
/// ```
pub fn strip_wrapping_quotes(cell: &str) -> &str {
    if cell.len() >= 2 && cell.starts_with('"') && cell.ends_with('"') {
        &cell[1..cell.len() - 1]
    } else {
        cell
    }
}

/// Drops a leading UTF-8 byte order mark.
///
/// ```
/// use craftbook::tabular::strip_bom;
///
/// assert_eq!(strip_bom("\u{feff}Gem,2"), "Gem,2");
/// assert_eq!(strip_bom("Gem,2"), "Gem,2");
/// ```
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
