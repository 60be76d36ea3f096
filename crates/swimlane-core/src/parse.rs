//! Lenient integer parsing for board attribute tokens.

/// Parse the leading integer of `s`, ignoring surrounding whitespace and
/// any trailing garbage.
///
/// Accepts an optional `+`/`-` sign followed by at least one ASCII
/// digit. Returns `None` when no digit follows the sign, so that callers
/// can substitute their own default. Values beyond the `i64` range
/// saturate.
///
/// ```
/// use swimlane_core::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix(" 12px"), Some(12));
/// assert_eq!(parse_int_prefix("-3"), Some(-3));
/// assert_eq!(parse_int_prefix("+"), None);
/// assert_eq!(parse_int_prefix(""), None);
/// ```
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(b - b'0'));
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}
