use crate::error::Result;
use crate::node::RawNode;

/// Parses the longest valid leading integer of `input`, ignoring trailing
/// garbage: `"12.9kg"` is 12, `"  42 INR"` is 42.
///
/// Leading whitespace and a sign are accepted. Negative values yield `None`,
/// as does input with no leading digits. Values past `u64::MAX` saturate.
pub fn parse_leading_int(input: &str) -> Option<u64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digit_count = digits.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }

    let value = digits[..digit_count].bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    });

    if negative && value != 0 {
        return None;
    }

    Some(value)
}

/// Tolerant integer conversion with a caller-supplied fallback for empty,
/// missing, or non-numeric input.
pub fn coerce_int(value: Option<&str>, fallback: u64) -> u64 {
    match value {
        Some(text) if !text.trim().is_empty() => parse_leading_int(text).unwrap_or(fallback),
        _ => fallback,
    }
}

/// Reads the text at `path` under `node` and coerces it, defaulting to `fallback`.
pub fn int_at(node: &RawNode, path: &str, field: &str, fallback: u64) -> Result<u64> {
    Ok(coerce_int(node.text_at(path, field)?, fallback))
}
