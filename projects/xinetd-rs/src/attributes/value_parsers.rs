//! Helpers shared by the attribute parsers: strict number parsing, the
//! `k`/`m` suffixed limits, flag lists and token count checks.

use super::{AssignOp, ParsingErrorReason};
use crate::nvlists::{NameValueList, find_value};
use crate::service_config::Mask;

/// Parse `text` as an `i32` in `radix`.
///
/// Leading whitespace and a sign are accepted, anything after the digits is
/// not. Values that do not fit into an `i32` are rejected.
#[must_use]
pub fn parse_int(text: &str, radix: u32) -> Option<i32> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first().copied() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

#[must_use]
pub fn parse_base10(text: &str) -> Option<i32> {
    parse_int(text, 10)
}

/// Parse a non-negative base 10 number that has to fit an `u32`.
#[must_use]
pub fn parse_unsigned(text: &str) -> Option<u32> {
    parse_base10(text).and_then(|v| u32::try_from(v).ok())
}

/// Interpret a size of the form `<num>[k|K|m|M]`.
///
/// `k` multiplies by 1024, `m` by 1024 * 1024, no suffix means bytes.
/// Negative numbers and results that overflow an `u64` are rejected.
#[must_use]
pub fn parse_limit(text: &str) -> Option<u64> {
    let trimmed = text.trim_end();
    let (number, multiplier) = match trimmed.as_bytes().last().copied()? {
        b'k' | b'K' => (&trimmed[..trimmed.len() - 1], 1024),
        b'm' | b'M' => (&trimmed[..trimmed.len() - 1], 1024 * 1024),
        _ => (trimmed, 1),
    };
    let number = number.trim_start();
    let digits = number.strip_prefix('+').unwrap_or(number);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = digits.parse().ok()?;
    value.checked_mul(multiplier)
}

/// The one token of a single valued attribute.
pub fn single_value<'a>(tokens: &[&'a str], attribute: &str) -> Result<&'a str, ParsingErrorReason> {
    match tokens {
        [value] => Ok(*value),
        [] => Err(ParsingErrorReason::MissingValue(attribute.to_owned())),
        _ => Err(wrong_count(attribute, "1", tokens)),
    }
}

pub fn require_values(tokens: &[&str], attribute: &str) -> Result<(), ParsingErrorReason> {
    if tokens.is_empty() {
        return Err(ParsingErrorReason::MissingValue(attribute.to_owned()));
    }
    Ok(())
}

pub fn wrong_count(attribute: &str, expected: &str, tokens: &[&str]) -> ParsingErrorReason {
    ParsingErrorReason::WrongValueCount {
        attribute: attribute.to_owned(),
        expected: expected.to_owned(),
        values: tokens.iter().map(|t| (*t).to_owned()).collect(),
    }
}

/// `yes` or `no`, nothing else.
pub fn parse_yes_no(tokens: &[&str], attribute: &str) -> Result<bool, ParsingErrorReason> {
    match single_value(tokens, attribute)? {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(ParsingErrorReason::UnknownValue(
            format!("value for {attribute}"),
            other.to_owned(),
        )),
    }
}

/// Apply the flags named in `tokens` to `mask`.
///
/// `=` starts from an empty mask, `+=` sets and `-=` clears the named bits.
/// The first unknown name fails the whole list and `mask` keeps its old
/// value.
pub fn apply_value_list(
    tokens: &[&str],
    mask: &mut Mask,
    list: &NameValueList<u32>,
    op: AssignOp,
    description: &str,
) -> Result<(), ParsingErrorReason> {
    let mut updated = match op {
        AssignOp::Set => Mask::empty(),
        AssignOp::Add | AssignOp::Remove => *mask,
    };
    for name in tokens {
        let bit = find_value(list, name)
            .ok_or_else(|| ParsingErrorReason::UnknownFlag(description.to_owned(), (*name).to_owned()))?;
        match op {
            AssignOp::Set | AssignOp::Add => updated.set(bit),
            AssignOp::Remove => updated.clear(bit),
        }
    }
    *mask = updated;
    Ok(())
}

/// Copy `value` into a freshly allocated string, reporting allocation
/// failure instead of aborting.
pub fn owned_string(value: &str, attribute: &str) -> Result<String, ParsingErrorReason> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(value.len())
        .map_err(|_| ParsingErrorReason::OutOfMemory(attribute.to_owned()))?;
    owned.push_str(value);
    Ok(owned)
}

/// Append a copy of `value` to `list`.
pub fn push_owned(list: &mut Vec<String>, value: &str, attribute: &str) -> Result<(), ParsingErrorReason> {
    list.try_reserve(1)
        .map_err(|_| ParsingErrorReason::OutOfMemory(attribute.to_owned()))?;
    list.push(owned_string(value, attribute)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nvlists::{SERVICE_FLAGS, service_flags};

    #[test]
    fn strict_integers() {
        assert_eq!(parse_base10("42"), Some(42));
        assert_eq!(parse_base10("  -7"), Some(-7));
        assert_eq!(parse_base10("+3"), Some(3));
        assert_eq!(parse_base10("42x"), None);
        assert_eq!(parse_base10("4 2"), None);
        assert_eq!(parse_base10(""), None);
        assert_eq!(parse_base10("-"), None);
        assert_eq!(parse_base10("2147483648"), None);
        assert_eq!(parse_base10("-2147483648"), Some(i32::MIN));
        assert_eq!(parse_int("0777", 8), Some(0o777));
        assert_eq!(parse_int("8", 8), None);
    }

    #[test]
    fn limits_with_suffixes() {
        assert_eq!(parse_limit("10k"), Some(10240));
        assert_eq!(parse_limit("10K"), Some(10240));
        assert_eq!(parse_limit("2M"), Some(2_097_152));
        assert_eq!(parse_limit("512"), Some(512));
        assert_eq!(parse_limit("3m "), Some(3 * 1024 * 1024));
        assert_eq!(parse_limit("k"), None);
        assert_eq!(parse_limit(""), None);
        assert_eq!(parse_limit("-1"), None);
        assert_eq!(parse_limit("12g"), None);
    }

    #[test]
    fn limit_overflow_is_rejected() {
        // fits an u64 on its own, but not after the multiplier
        assert_eq!(parse_limit("18446744073709551615M"), None);
        assert_eq!(parse_limit("18014398509481984k"), None);
        assert_eq!(parse_limit("18014398509481983k"), Some(18_014_398_509_481_983 * 1024));
        assert_eq!(parse_limit("99999999999999999999"), None);
    }

    #[test]
    fn value_list_is_all_or_nothing() {
        let mut mask = Mask::empty();
        mask.set(service_flags::REUSE);
        let before = mask;

        let res = apply_value_list(
            &["NODELAY", "BOGUS"],
            &mut mask,
            SERVICE_FLAGS,
            AssignOp::Add,
            "service flag",
        );
        assert!(matches!(res, Err(ParsingErrorReason::UnknownFlag(_, ref v)) if v == "BOGUS"));
        assert_eq!(mask, before);

        apply_value_list(&["NODELAY"], &mut mask, SERVICE_FLAGS, AssignOp::Add, "service flag")
            .unwrap();
        assert!(mask.contains(service_flags::REUSE));
        assert!(mask.contains(service_flags::NODELAY));

        apply_value_list(&["REUSE"], &mut mask, SERVICE_FLAGS, AssignOp::Remove, "service flag")
            .unwrap();
        assert!(!mask.contains(service_flags::REUSE));

        apply_value_list(&["IPv6"], &mut mask, SERVICE_FLAGS, AssignOp::Set, "service flag")
            .unwrap();
        assert_eq!(mask, Mask::from_bits(1 << service_flags::IPV6));
    }

    #[test]
    fn token_counts() {
        assert_eq!(single_value(&["a"], "id").unwrap(), "a");
        assert!(matches!(
            single_value(&[], "id"),
            Err(ParsingErrorReason::MissingValue(_))
        ));
        assert!(matches!(
            single_value(&["a", "b"], "id"),
            Err(ParsingErrorReason::WrongValueCount { .. })
        ));
        assert!(parse_yes_no(&["yes"], "wait").unwrap());
        assert!(!parse_yes_no(&["no"], "wait").unwrap());
        assert!(parse_yes_no(&["YES"], "wait").is_err());
    }
}
