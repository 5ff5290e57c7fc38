//! Duration grammar: signed sums of `<number><unit>` components.
//!
//! `1h30m`, `-1.5s`, `300ms`, `2us` and `2µs` are all valid. The bare
//! literal `0` is accepted without a unit. The total must fit in a signed
//! 64-bit count of nanoseconds.

use chrono::Duration;

use crate::error::ParseFailure;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

/// Fraction digits kept per component; more than enough for nanosecond
/// resolution of an hour.
const MAX_FRACTION_DIGITS: u32 = 18;

const UNITS: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", NANOS_PER_MICRO),
    ("\u{b5}s", NANOS_PER_MICRO),
    ("\u{3bc}s", NANOS_PER_MICRO),
    ("ms", NANOS_PER_MILLI),
    ("s", NANOS_PER_SEC),
    ("m", NANOS_PER_MIN),
    ("h", NANOS_PER_HOUR),
];

/// Parse a duration such as `1h30m` or `-250ms`.
///
/// # Errors
///
/// Returns a [`ParseFailure`] describing the first malformed component, or
/// [`ParseFailure::OutOfRange`] when the sum overflows.
pub fn parse_duration(text: &str) -> Result<Duration, ParseFailure> {
    let (negative, mut rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if rest == "0" {
        return Ok(Duration::zero());
    }
    if rest.is_empty() {
        return Err(ParseFailure::InvalidSyntax);
    }

    // one extra nanosecond of headroom for i64::MIN
    let limit = if negative {
        u128::from(i64::MAX.unsigned_abs()) + 1
    } else {
        u128::from(i64::MAX.unsigned_abs())
    };

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (nanos, tail) = parse_component(rest)?;
        total = total
            .checked_add(nanos)
            .filter(|t| *t <= limit)
            .ok_or(ParseFailure::OutOfRange)?;
        rest = tail;
    }

    let total = i128::try_from(total).map_err(|_| ParseFailure::OutOfRange)?;
    let signed = if negative { -total } else { total };
    let nanos = i64::try_from(signed).map_err(|_| ParseFailure::OutOfRange)?;
    Ok(Duration::nanoseconds(nanos))
}

/// Parse one `<int>[.<frac>]<unit>` component, returning its length in
/// nanoseconds and the unparsed tail.
fn parse_component(text: &str) -> Result<(u128, &str), ParseFailure> {
    let int_len = text.bytes().take_while(u8::is_ascii_digit).count();
    let (int_digits, after_int) = text.split_at(int_len);

    let (frac_digits, after_frac) = match after_int.strip_prefix('.') {
        Some(tail) => {
            let frac_len = tail.bytes().take_while(u8::is_ascii_digit).count();
            tail.split_at(frac_len)
        }
        None => ("", after_int),
    };
    if int_digits.is_empty() && frac_digits.is_empty() {
        return Err(ParseFailure::InvalidSyntax);
    }

    let unit_len = after_frac
        .find(|c: char| c == '.' || c.is_ascii_digit())
        .unwrap_or(after_frac.len());
    if unit_len == 0 {
        return Err(ParseFailure::MissingUnit);
    }
    let (unit, tail) = after_frac.split_at(unit_len);
    let scale = UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, scale)| *scale)
        .ok_or_else(|| ParseFailure::UnknownUnit(unit.to_string()))?;

    let whole = if int_digits.is_empty() {
        0
    } else {
        int_digits
            .parse::<u128>()
            .map_err(|_| ParseFailure::OutOfRange)?
    };
    let mut nanos = whole.checked_mul(scale).ok_or(ParseFailure::OutOfRange)?;

    let mut frac: u128 = 0;
    let mut denom: u128 = 1;
    for digit in frac_digits.bytes().take(MAX_FRACTION_DIGITS as usize) {
        frac = frac * 10 + u128::from(digit - b'0');
        denom *= 10;
    }
    nanos = nanos
        .checked_add(frac * scale / denom)
        .ok_or(ParseFailure::OutOfRange)?;

    Ok((nanos, tail))
}

/// Render a duration in compact canonical form.
///
/// Zero is `0s`. Durations under a second use a single `ns`, `µs` or `ms`
/// component. Longer durations use `h`, `m` and `s` components with zero
/// components left out, e.g. `1h30m` or `2m0.25s`.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total =
        i128::from(d.num_seconds()) * NANOS_PER_SEC as i128 + i128::from(d.subsec_nanos());
    let sign = if total < 0 { "-" } else { "" };
    let u = total.unsigned_abs();

    if u == 0 {
        return "0s".to_string();
    }

    if u < NANOS_PER_SEC {
        let body = if u < NANOS_PER_MICRO {
            format!("{u}ns")
        } else if u < NANOS_PER_MILLI {
            format!("{}\u{b5}s", with_fraction(u, NANOS_PER_MICRO, 3))
        } else {
            format!("{}ms", with_fraction(u, NANOS_PER_MILLI, 6))
        };
        return format!("{sign}{body}");
    }

    let hours = u / NANOS_PER_HOUR;
    let minutes = (u % NANOS_PER_HOUR) / NANOS_PER_MIN;
    let sec_nanos = u % NANOS_PER_MIN;

    let mut out = String::from(sign);
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if sec_nanos > 0 {
        out.push_str(&with_fraction(sec_nanos, NANOS_PER_SEC, 9));
        out.push('s');
    }
    out
}

/// `value / unit` as a decimal with trailing fraction zeros trimmed.
fn with_fraction(value: u128, unit: u128, digits: usize) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0digits$}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
