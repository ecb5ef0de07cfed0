//! Unit hints embedded in header cells, e.g. `wavelength (nm)` or `flux [Jy]`

use regex::Regex;
use std::sync::LazyLock;

static UNIT_IN_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([^)]+)\)|\[([^\]]+)\]").expect("unit pattern is a valid regex")
});

/// First parenthesized or bracketed unit in a header cell
pub fn extract_unit(header_cell: &str) -> Option<String> {
    let caps = UNIT_IN_HEADER.captures(header_cell)?;
    let unit = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim())
        .unwrap_or("");
    (!unit.is_empty()).then(|| unit.to_string())
}

/// Unit hint for a column, when the index names an existing header cell
pub fn unit_hint(header: &[String], index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| header.get(i))
        .and_then(|cell| extract_unit(cell))
}
