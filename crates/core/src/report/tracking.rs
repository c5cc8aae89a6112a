//! Tracking codes.
//!
//! Format: `YC-<PREFIX>-<8 chars>`, e.g. `YC-VEH-7K3QW9XM`. The random part
//! draws from an alphabet without `0`, `1`, `I` and `O` so codes can be read
//! over the phone. Lookups are case-insensitive.

use rand::Rng;

use super::kind::ReportKind;

const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const RANDOM_LEN: usize = 8;
const BRAND: &str = "YC";

/// Generates a new tracking code for a report kind.
#[must_use]
pub fn generate(kind: ReportKind) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();
    format!("{BRAND}-{}-{suffix}", kind.tracking_prefix())
}

/// Normalizes user input: trims whitespace and upper-cases.
#[must_use]
pub fn normalize(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Parses a (normalized or raw) tracking code, returning its kind if the
/// code is well formed.
#[must_use]
pub fn parse(input: &str) -> Option<ReportKind> {
    let code = normalize(input);
    let mut parts = code.split('-');
    let (Some(brand), Some(prefix), Some(random), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    if brand != BRAND
        || random.len() != RANDOM_LEN
        || !random.bytes().all(|b| ALPHABET.contains(&b))
    {
        return None;
    }

    ReportKind::from_tracking_prefix(prefix)
}
