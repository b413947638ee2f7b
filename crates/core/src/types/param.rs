//! Lenient parsing of request parameters.
//!
//! Path segments and query values are never rejected. A value is read the way
//! a forgiving integer conversion reads it: optional surrounding whitespace,
//! an optional sign, then as many decimal digits as are present. Anything that
//! does not start with a digit is zero, and overflow saturates.

/// Parse the leading integer of `input`, returning 0 when there is none.
///
/// ```rust
/// # use bakugai_core::lenient_i32;
/// assert_eq!(lenient_i32("12"), 12);
/// assert_eq!(lenient_i32("12abc"), 12);
/// assert_eq!(lenient_i32("abc"), 0);
/// assert_eq!(lenient_i32(""), 0);
/// ```
#[must_use]
pub fn lenient_i32(input: &str) -> i32 {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
        Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for digit in rest.bytes().take_while(u8::is_ascii_digit) {
        value = value * 10 + i64::from(digit - b'0');
        if value > i64::from(i32::MAX) + 1 {
            break;
        }
    }

    let signed = if negative { -value } else { value };
    i32::try_from(signed).unwrap_or(if negative { i32::MIN } else { i32::MAX })
}
