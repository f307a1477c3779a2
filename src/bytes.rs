//! Byte sizes as written in resource limits, e.g. `512Mi`, `2G` or `1.5Gi`.
//!
//! A unit with an `i` (`Ki`, `Mi`, `Gib`) is binary, anything else is decimal.
use nom::{IResult, number::complete::recognize_float};

const UNITS: [&str; 6] = ["", "K", "M", "G", "T", "P"];

fn number(input: &str) -> IResult<&str, &str> {
    recognize_float(input)
}

/// Parses a byte size with an optional unit.
///
/// Returns `None` for empty or negative values and unknown units.
pub fn parse_bytes(value: &str) -> Option<u64> {
    let value = value.trim();
    let (unit, digits) = number(value).ok()?;
    let bytes: f64 = digits.parse().ok()?;
    if !bytes.is_finite() || bytes < 0.0 {
        return None;
    }

    let unit = unit.trim().to_lowercase();
    let Some(prefix) = unit.chars().next() else {
        return Some(bytes.round() as u64);
    };
    let k: f64 = if unit.ends_with('i') || unit.ends_with("ib") {
        1024.0
    } else {
        1000.0
    };
    let exponent = UNITS
        .iter()
        .skip(1)
        .position(|u| u.to_lowercase().starts_with(prefix))?
        + 1;
    Some((bytes * k.powi(exponent as i32)).round() as u64)
}

/// Formats `bytes` with the largest unit that keeps the value at or above one.
///
/// Trailing zeros of the fraction are dropped. Zero has no representation.
pub fn format_bytes(bytes: u64, decimals: usize, binary_units: bool) -> Option<String> {
    if bytes == 0 {
        return None;
    }
    let k = if binary_units { 1024.0 } else { 1000.0 };
    let mut value = bytes as f64;
    let mut ix = 0;
    while value >= k && ix + 1 < UNITS.len() {
        value /= k;
        ix += 1;
    }

    let value = format!("{value:.decimals$}");
    let value = match value.contains('.') {
        true => value.trim_end_matches('0').trim_end_matches('.'),
        false => &value,
    };
    let binary = if binary_units && ix > 0 { "i" } else { "" };
    Some(format!("{value}{}{binary}", UNITS[ix]))
}
