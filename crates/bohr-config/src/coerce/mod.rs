//! Best-effort typing of raw string values from the environment and command line.
//!
//! Values read from JSON files are already typed and never pass through here.

use bohr_core::ConfigValue;

/// How integers are recognised in raw strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionMode {
    /// A leading base-10 integer is enough: `"42abc"` becomes `42` and
    /// `"08:00"` becomes `8`.
    #[default]
    Prefix,
    /// The whole string must be a base-10 integer.
    Strict,
}

/// Coerce a raw string using the default [`CoercionMode::Prefix`] rules
pub fn coerce(raw: &str) -> ConfigValue {
    coerce_with(raw, CoercionMode::Prefix)
}

/// Coerce a raw string into a boolean, an integer or a string.
///
/// `"true"` and `"false"` (exact, case-sensitive) win over everything else,
/// then integer parsing per `mode`, and the original string otherwise.
pub fn coerce_with(raw: &str, mode: CoercionMode) -> ConfigValue {
    match raw {
        "true" => return ConfigValue::Boolean(true),
        "false" => return ConfigValue::Boolean(false),
        _ => {},
    }

    let integer = match mode {
        CoercionMode::Prefix => parse_integer_prefix(raw),
        CoercionMode::Strict => raw.parse::<i64>().ok(),
    };

    match integer {
        Some(value) => ConfigValue::Integer(value),
        None => ConfigValue::String(raw.to_string()),
    }
}

/// Parse the leading integer of `raw`.
///
/// Leading whitespace and a single `+` or `-` sign are accepted, followed by
/// at least one ASCII digit; parsing stops at the first non-digit. Returns
/// `None` when there is no digit or the number does not fit in an `i64`.
pub fn parse_integer_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = unsigned
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for digit in unsigned[..digits].bytes() {
        let digit = i64::from(digit - b'0');
        value = value.checked_mul(10)?;
        // Accumulate negatives directly so i64::MIN stays representable
        value = if negative {
            value.checked_sub(digit)?
        } else {
            value.checked_add(digit)?
        };
    }

    Some(value)
}
