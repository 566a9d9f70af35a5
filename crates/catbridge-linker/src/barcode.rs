//! Barcode field normalization.

use std::collections::HashSet;

use catbridge_core::BarcodeEntry;

/// Tokens shorter than this are not barcodes.
pub const MIN_BARCODE_LEN: usize = 8;

pub const DEFAULT_DELIMITERS: &[char] = &[';', ',', '|', '\n', '\t'];

/// Splits a raw barcode field into ordered entries owned by `owner_id`.
///
/// Tokens are trimmed. Tokens shorter than [`MIN_BARCODE_LEN`] or made of a
/// single repeated digit (`"000000000"`) are dropped, as are repeats of a
/// code already seen in the same field. Positions are assigned after
/// filtering, so the first surviving code is always position 0.
#[must_use]
pub fn normalize(owner_id: &str, raw: Option<&str>, delimiters: &[char]) -> Vec<BarcodeEntry> {
    codes(raw, delimiters)
        .into_iter()
        .enumerate()
        .map(|(position, code)| BarcodeEntry {
            owner_id: owner_id.to_string(),
            code,
            position,
        })
        .collect()
}

/// The surviving codes of a raw barcode field, in order.
#[must_use]
pub fn codes(raw: Option<&str>, delimiters: &[char]) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    raw.split(|c: char| delimiters.contains(&c))
        .map(str::trim)
        .filter(|token| is_valid_code(token))
        .filter(|token| seen.insert(*token))
        .map(str::to_string)
        .collect()
}

/// Joins entries back into a single field, in position order.
#[must_use]
pub fn to_field(entries: &[BarcodeEntry], delimiter: char) -> String {
    let mut ordered: Vec<&BarcodeEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.position);
    ordered
        .iter()
        .map(|e| e.code.as_str())
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

fn is_valid_code(token: &str) -> bool {
    token.chars().count() >= MIN_BARCODE_LEN && !is_repeated_digit(token)
}

fn is_repeated_digit(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_digit() => chars.all(|c| c == first),
        _ => false,
    }
}
