//! Path token codec
//!
//! Encodes a sibling index into a short token. Tokens are self-delimiting and
//! sort in the same order as the indices they encode, so a full path is just
//! the concatenation of one token per tree level.
//!
//! - `n < 62^3`: three base-62 digits, zero padded (`"000"`, `"00z"`, ...)
//! - otherwise: `~` followed by six base-62 digits
//!
//! The alphabet is in ASCII order and `~` sorts after every digit.

use crate::{DomError, DomResult};

/// Base-62 digits in ASCII order
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = 62;

/// Width of a short token
pub const SHORT_WIDTH: usize = 3;

/// Width of a long token's digits (after the marker)
pub const LONG_WIDTH: usize = 6;

/// Marker for long tokens
pub const LONG_MARKER: char = '~';

/// First index that needs a long token
const SHORT_LIMIT: u32 = 62 * 62 * 62;

/// Encode a sibling index as a path token
pub fn encode(n: u32) -> String {
    let mut out = String::with_capacity(LONG_WIDTH + 1);
    encode_into(n, &mut out);
    out
}

/// Append the token for `n` to `out`
pub fn encode_into(n: u32, out: &mut String) {
    let width = if n < SHORT_LIMIT {
        SHORT_WIDTH
    } else {
        out.push(LONG_MARKER);
        LONG_WIDTH
    };

    let mut digits = [b'0'; LONG_WIDTH];
    let mut rest = n as u64;
    for slot in digits[..width].iter_mut().rev() {
        *slot = ALPHABET[(rest % BASE) as usize];
        rest /= BASE;
    }
    out.extend(digits[..width].iter().map(|&b| b as char));
}

/// Decode a single token back into its index
pub fn decode(token: &str) -> DomResult<u32> {
    match split_first(token)? {
        (n, "") => Ok(n),
        _ => Err(DomError::InvalidPathToken(token.to_string())),
    }
}

/// Decode a concatenated path into its per-level indices (root-most first)
///
/// A leading `_` (the prefix of a disconnected node's path) is skipped.
pub fn split_path(path: &str) -> DomResult<Vec<u32>> {
    let mut rest = path.strip_prefix('_').unwrap_or(path);
    let mut indices = Vec::new();
    while !rest.is_empty() {
        let (n, tail) = split_first(rest)?;
        indices.push(n);
        rest = tail;
    }
    Ok(indices)
}

/// Decode the leading token of `path`, returning it and the remainder
fn split_first(path: &str) -> DomResult<(u32, &str)> {
    let invalid = || DomError::InvalidPathToken(path.to_string());

    let (digits, rest, long) = match path.strip_prefix(LONG_MARKER) {
        Some(tail) => {
            let digits = tail.get(..LONG_WIDTH).ok_or_else(invalid)?;
            (digits, &tail[LONG_WIDTH..], true)
        }
        None => {
            let digits = path.get(..SHORT_WIDTH).ok_or_else(invalid)?;
            (digits, &path[SHORT_WIDTH..], false)
        }
    };

    let mut value: u64 = 0;
    for b in digits.bytes() {
        value = value * BASE + digit_value(b).ok_or_else(invalid)?;
    }

    let value = u32::try_from(value).map_err(|_| invalid())?;
    // Long tokens are only canonical for values the short form can't hold
    if long && value < SHORT_LIMIT {
        return Err(invalid());
    }
    Ok((value, rest))
}

fn digit_value(b: u8) -> Option<u64> {
    let v = match b {
        b'0'..=b'9' => b - b'0',
        b'A'..=b'Z' => b - b'A' + 10,
        b'a'..=b'z' => b - b'a' + 36,
        _ => return None,
    };
    Some(v as u64)
}
