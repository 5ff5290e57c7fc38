//! Integer literal grammar shared by the signed and unsigned kinds.
//!
//! Accepts an optional sign followed by a decimal literal, or a prefixed
//! literal: `0x`/`0X` (hex), `0o`/`0O` or a bare leading `0` (octal),
//! `0b`/`0B` (binary). A `_` may separate digits, or follow a base prefix.
//! Width checks happen in the caller.

use crate::error::ParseFailure;

/// Parse a signed integer literal.
///
/// # Errors
///
/// Returns [`ParseFailure::InvalidSyntax`] for malformed text and
/// [`ParseFailure::OutOfRange`] when the magnitude exceeds `i128`.
pub fn parse_signed(text: &str) -> Result<i128, ParseFailure> {
    let (negative, digits) = split_sign(text);
    let magnitude = parse_magnitude(digits)?;
    if negative {
        0i128
            .checked_sub_unsigned(magnitude)
            .ok_or(ParseFailure::OutOfRange)
    } else {
        i128::try_from(magnitude).map_err(|_| ParseFailure::OutOfRange)
    }
}

/// Parse an unsigned integer literal. A leading `-` is rejected.
///
/// # Errors
///
/// Returns [`ParseFailure::NegativeUnsigned`] for negative literals,
/// [`ParseFailure::InvalidSyntax`] for malformed text and
/// [`ParseFailure::OutOfRange`] when the value exceeds `u128`.
pub fn parse_unsigned(text: &str) -> Result<u128, ParseFailure> {
    let (negative, digits) = split_sign(text);
    if negative {
        return Err(ParseFailure::NegativeUnsigned);
    }
    parse_magnitude(digits)
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn parse_magnitude(digits: &str) -> Result<u128, ParseFailure> {
    let (radix, prefixed, body) = split_radix(digits);
    if !separators_ok(body, prefixed) {
        return Err(ParseFailure::InvalidSyntax);
    }
    let body: String = body.chars().filter(|&c| c != '_').collect();
    // from_str_radix would accept a second sign, which is not a literal
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return Err(ParseFailure::InvalidSyntax);
    }
    u128::from_str_radix(&body, radix).map_err(|_| ParseFailure::OutOfRange)
}

/// Returns the radix, whether a base prefix was present, and the digits.
fn split_radix(digits: &str) -> (u32, bool, &str) {
    let lower = digits.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, true, &digits[2..]),
        Some("0o") => (8, true, &digits[2..]),
        Some("0b") => (2, true, &digits[2..]),
        _ if digits.len() > 1 && digits.starts_with('0') => (8, true, &digits[1..]),
        _ => (10, false, digits),
    }
}

/// Each `_` must come right after a digit or the base prefix, and must not
/// end the literal.
fn separators_ok(body: &str, prefixed: bool) -> bool {
    let mut after_digit = prefixed;
    for c in body.chars() {
        if c == '_' {
            if !after_digit {
                return false;
            }
            after_digit = false;
        } else {
            after_digit = true;
        }
    }
    after_digit || body.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal() {
        assert_eq!(parse_signed("0"), Ok(0));
        assert_eq!(parse_signed("1234"), Ok(1234));
        assert_eq!(parse_signed("-1234"), Ok(-1234));
        assert_eq!(parse_signed("+7"), Ok(7));
    }

    #[test]
    fn test_prefixed_bases() {
        assert_eq!(parse_signed("0664"), Ok(0o664));
        assert_eq!(parse_signed("0o17"), Ok(15));
        assert_eq!(parse_signed("0x1234"), Ok(0x1234));
        assert_eq!(parse_signed("0XfF"), Ok(255));
        assert_eq!(parse_signed("0b101"), Ok(5));
        assert_eq!(parse_signed("-0x10"), Ok(-16));
    }

    #[test]
    fn test_invalid_syntax() {
        for bad in ["", "-", "+", "0x", "12a", "089", "0b2", " 1", "--1", "+-1", "0x-1"] {
            assert_eq!(
                parse_signed(bad),
                Err(ParseFailure::InvalidSyntax),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_digit_separators() {
        assert_eq!(parse_signed("1_000"), Ok(1000));
        assert_eq!(parse_signed("-1_000_000"), Ok(-1_000_000));
        assert_eq!(parse_signed("0x_ff_ff"), Ok(0xffff));
        assert_eq!(parse_signed("0b_1010"), Ok(10));
        assert_eq!(parse_signed("0_7"), Ok(7));
        assert_eq!(parse_unsigned("+1_0"), Ok(10));
        for bad in ["_1", "1_", "1__0", "0x_", "0x__1", "0_", "_"] {
            assert_eq!(
                parse_signed(bad),
                Err(ParseFailure::InvalidSyntax),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_unsigned_rejects_sign() {
        assert_eq!(parse_unsigned("-0"), Err(ParseFailure::NegativeUnsigned));
        assert_eq!(parse_unsigned("-5"), Err(ParseFailure::NegativeUnsigned));
        assert_eq!(parse_unsigned("+5"), Ok(5));
    }

    #[test]
    fn test_out_of_range() {
        let too_big = "1".repeat(40);
        assert_eq!(parse_unsigned(&too_big), Err(ParseFailure::OutOfRange));
        assert_eq!(parse_signed(&too_big), Err(ParseFailure::OutOfRange));
    }

    #[test]
    fn test_i128_min_magnitude() {
        let min = i128::MIN.to_string();
        assert_eq!(parse_signed(&min), Ok(i128::MIN));
    }
}
