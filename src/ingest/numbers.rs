//! Tolerant number-set parsing for the simulations and plays feeds.
//!
//! Upstream exports are messy: some rows carry `[4, 11, 19]`, some carry
//! the same wrapped in single or double quotes, some carry bare
//! comma-separated digits. All of them normalize to the same `Vec<u8>`.

use crate::types::FeedError;

/// Parse a raw number-set cell into an ordered integer sequence.
///
/// Strips surrounding double quotes, all single quotes, and square
/// brackets before splitting on commas. An empty or unparseable cell is a
/// `FeedError::NumberSet` carrying the original text.
pub fn parse_number_set(raw: &str) -> Result<Vec<u8>, FeedError> {
    let cleaned = raw
        .trim()
        .trim_matches('"')
        .replace('\'', "")
        .replace(['[', ']'], "");

    let numbers: Vec<u8> = cleaned
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| FeedError::NumberSet(raw.to_string()))?;

    if numbers.is_empty() {
        return Err(FeedError::NumberSet(raw.to_string()));
    }
    Ok(numbers)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
