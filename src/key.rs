//! Phone number to search key conversion.

use crate::{Error, Result};

/// Number of leading characters that form the search key.
pub const KEY_DIGITS: usize = 7;

/// Largest key that fits in 7 digits.
pub const MAX_KEY: u32 = 9_999_999;

/// Parse the search key from a phone number.
///
/// The first 7 characters, with surrounding whitespace trimmed, must be
/// exactly 7 ASCII digits. Anything after them is ignored, so both
/// `"1888888"` and `"18888881234"` map to `1888888`.
pub fn parse_key(phone: &str) -> Result<u32> {
    let prefix = match phone.char_indices().nth(KEY_DIGITS) {
        Some((end, _)) => &phone[..end],
        None if phone.chars().count() == KEY_DIGITS => phone,
        None => return Err(invalid(phone, "need at least the first 7 digits")),
    };

    let digits = prefix.trim();
    if digits.len() != KEY_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(phone, "first 7 characters must be digits"));
    }

    digits
        .parse::<u32>()
        .map_err(|_| invalid(phone, "first 7 characters must be digits"))
}

fn invalid(phone: &str, reason: &'static str) -> Error {
    Error::InvalidPhone {
        input: phone.to_string(),
        reason,
    }
}
