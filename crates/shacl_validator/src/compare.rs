//! Literal ordering and lexical-form checks.
//!
//! Used by the range constraints (`sh:minInclusive` and friends), the pair
//! ordering constraints (`sh:lessThan`, `sh:lessThanOrEquals`) and
//! `sh:datatype`. Values of different kinds are incomparable.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use shacl_core::vocabulary::{rdf, xsd};
use shacl_core::{Literal, Term};
use std::cmp::Ordering;

/// A literal interpreted as an orderable value.
#[derive(Debug, PartialEq)]
enum Comparable<'a> {
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    LocalDateTime(NaiveDateTime),
    Time(NaiveTime),
    Text(&'a str),
}

const INTEGER_TYPES: &[&str] = &[
    xsd::INTEGER,
    xsd::LONG,
    xsd::INT,
    xsd::SHORT,
    xsd::BYTE,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::POSITIVE_INTEGER,
    xsd::NON_POSITIVE_INTEGER,
    xsd::NEGATIVE_INTEGER,
    xsd::UNSIGNED_LONG,
    xsd::UNSIGNED_INT,
    xsd::UNSIGNED_SHORT,
    xsd::UNSIGNED_BYTE,
];

fn is_numeric_type(datatype: &str) -> bool {
    INTEGER_TYPES.contains(&datatype)
        || matches!(datatype, xsd::DECIMAL | xsd::DOUBLE | xsd::FLOAT)
}

fn interpret(literal: &Literal) -> Option<Comparable<'_>> {
    let lexical = literal.value().trim();
    let datatype = literal.effective_datatype();

    if is_numeric_type(datatype) {
        if !is_valid_lexical(datatype, lexical) {
            return None;
        }
        return parse_double(lexical).map(Comparable::Number);
    }

    match datatype {
        xsd::BOOLEAN => parse_boolean(lexical).map(Comparable::Boolean),
        xsd::DATE => parse_date(lexical).map(Comparable::Date),
        xsd::DATE_TIME => match DateTime::parse_from_rfc3339(lexical) {
            Ok(dt) => Some(Comparable::DateTime(dt)),
            Err(_) => parse_local_date_time(lexical).map(Comparable::LocalDateTime),
        },
        xsd::TIME => parse_time(lexical).map(Comparable::Time),
        xsd::STRING | rdf::LANG_STRING => Some(Comparable::Text(literal.value())),
        _ => None,
    }
}

/// Compares two terms by value.
///
/// Returns `None` when either term is a resource, when the literals are of
/// different kinds, or when a lexical form is invalid for its datatype.
pub fn compare_terms(a: &Term, b: &Term) -> Option<Ordering> {
    match (a, b) {
        (Term::Literal(a), Term::Literal(b)) => compare_literals(a, b),
        _ => None,
    }
}

/// Compares two literals by value.
pub fn compare_literals(a: &Literal, b: &Literal) -> Option<Ordering> {
    match (interpret(a)?, interpret(b)?) {
        (Comparable::Number(x), Comparable::Number(y)) => x.partial_cmp(&y),
        (Comparable::Boolean(x), Comparable::Boolean(y)) => Some(x.cmp(&y)),
        (Comparable::Date(x), Comparable::Date(y)) => Some(x.cmp(&y)),
        (Comparable::DateTime(x), Comparable::DateTime(y)) => Some(x.cmp(&y)),
        (Comparable::LocalDateTime(x), Comparable::LocalDateTime(y)) => Some(x.cmp(&y)),
        (Comparable::Time(x), Comparable::Time(y)) => Some(x.cmp(&y)),
        (Comparable::Text(x), Comparable::Text(y)) if a.language() == b.language() => {
            Some(x.cmp(y))
        }
        _ => None,
    }
}

/// Returns true if `lexical` is a valid lexical form of `datatype`.
///
/// Only the XSD types the engine knows are checked; any other datatype
/// accepts every lexical form.
pub fn is_valid_lexical(datatype: &str, lexical: &str) -> bool {
    let lexical = lexical.trim();
    match datatype {
        xsd::INTEGER => is_integer_lexical(lexical),
        xsd::LONG => lexical.parse::<i64>().is_ok(),
        xsd::INT => lexical.parse::<i32>().is_ok(),
        xsd::SHORT => lexical.parse::<i16>().is_ok(),
        xsd::BYTE => lexical.parse::<i8>().is_ok(),
        xsd::UNSIGNED_LONG => lexical.parse::<u64>().is_ok(),
        xsd::UNSIGNED_INT => lexical.parse::<u32>().is_ok(),
        xsd::UNSIGNED_SHORT => lexical.parse::<u16>().is_ok(),
        xsd::UNSIGNED_BYTE => lexical.parse::<u8>().is_ok(),
        xsd::NON_NEGATIVE_INTEGER => signed_integer(lexical).is_some_and(|n| n >= 0),
        xsd::POSITIVE_INTEGER => signed_integer(lexical).is_some_and(|n| n > 0),
        xsd::NON_POSITIVE_INTEGER => signed_integer(lexical).is_some_and(|n| n <= 0),
        xsd::NEGATIVE_INTEGER => signed_integer(lexical).is_some_and(|n| n < 0),
        xsd::DECIMAL => is_decimal_lexical(lexical),
        xsd::DOUBLE | xsd::FLOAT => parse_double(lexical).is_some(),
        xsd::BOOLEAN => parse_boolean(lexical).is_some(),
        xsd::DATE => parse_date(lexical).is_some(),
        xsd::DATE_TIME => {
            DateTime::parse_from_rfc3339(lexical).is_ok()
                || parse_local_date_time(lexical).is_some()
        }
        xsd::TIME => parse_time(lexical).is_some(),
        _ => true,
    }
}

fn is_integer_lexical(lexical: &str) -> bool {
    let digits = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn signed_integer(lexical: &str) -> Option<i128> {
    if is_integer_lexical(lexical) {
        lexical.parse().ok()
    } else {
        None
    }
}

fn is_decimal_lexical(lexical: &str) -> bool {
    let unsigned = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    !(whole.is_empty() && fraction.is_empty())
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit())
}

fn parse_double(lexical: &str) -> Option<f64> {
    match lexical {
        "INF" | "+INF" => return Some(f64::INFINITY),
        "-INF" => return Some(f64::NEG_INFINITY),
        "NaN" => return Some(f64::NAN),
        _ => {}
    }
    // Rust also accepts "inf", "infinity" and "nan", which XSD does not
    if lexical
        .chars()
        .any(|c| c.is_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    lexical.parse().ok()
}

fn parse_boolean(lexical: &str) -> Option<bool> {
    match lexical {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Drops a trailing `Z` or `±hh:mm` timezone.
fn strip_timezone(lexical: &str) -> &str {
    if let Some(stripped) = lexical.strip_suffix('Z') {
        return stripped;
    }
    let Some(split) = lexical.len().checked_sub(6).filter(|&split| split > 0) else {
        return lexical;
    };
    match (lexical.get(..split), lexical.get(split..)) {
        (Some(head), Some(tail))
            if (tail.starts_with('+') || tail.starts_with('-'))
                && tail.as_bytes().get(3) == Some(&b':') =>
        {
            head
        }
        _ => lexical,
    }
}

fn parse_date(lexical: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(strip_timezone(lexical), "%Y-%m-%d").ok()
}

fn parse_local_date_time(lexical: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(lexical, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

fn parse_time(lexical: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(strip_timezone(lexical), "%H:%M:%S%.f").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_numbers_across_types() {
        let five = Literal::integer(5);
        let five_and_half = Literal::typed("5.5", xsd::DECIMAL);
        assert_eq!(compare_literals(&five, &five_and_half), Some(Ordering::Less));
        assert_eq!(
            compare_literals(&five, &Literal::typed("5.0", xsd::DOUBLE)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_compare_dates() {
        let earlier = Literal::typed("2024-01-15", xsd::DATE);
        let later = Literal::typed("2024-03-01", xsd::DATE);
        assert_eq!(compare_literals(&earlier, &later), Some(Ordering::Less));

        let a = Literal::typed("2024-01-15T10:30:00Z", xsd::DATE_TIME);
        let b = Literal::typed("2024-01-15T11:30:00+02:00", xsd::DATE_TIME);
        assert_eq!(compare_literals(&a, &b), Some(Ordering::Greater));
    }

    #[test]
    fn test_timezone_suffix_on_multibyte_text() {
        assert_eq!(strip_timezone("2024-01-15+02:00"), "2024-01-15");
        assert_eq!(strip_timezone("10:00:00Z"), "10:00:00");
        assert_eq!(strip_timezone("日本語x"), "日本語x");
        assert_eq!(strip_timezone("+02:00"), "+02:00");
        assert!(!is_valid_lexical(xsd::DATE, "日本語x"));
        assert!(!is_valid_lexical(xsd::TIME, "é+02:00"));
    }

    #[test]
    fn test_incomparable_kinds() {
        let number = Literal::integer(1);
        let text = Literal::plain("1");
        assert_eq!(compare_literals(&number, &text), None);

        let resource = Term::from(shacl_core::Resource::new("http://example.org/a"));
        assert_eq!(compare_terms(&resource, &Term::from(number)), None);
    }

    #[test]
    fn test_strings_compare_only_within_language() {
        let en = Literal::lang("a", "en");
        let de = Literal::lang("b", "de");
        assert_eq!(compare_literals(&en, &de), None);
        assert_eq!(
            compare_literals(&Literal::plain("a"), &Literal::plain("b")),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_integer_lexical_forms() {
        assert!(is_valid_lexical(xsd::INTEGER, "42"));
        assert!(is_valid_lexical(xsd::INTEGER, "-0042"));
        assert!(!is_valid_lexical(xsd::INTEGER, "4.2"));
        assert!(!is_valid_lexical(xsd::INTEGER, "abc"));
        assert!(is_valid_lexical(xsd::BYTE, "127"));
        assert!(!is_valid_lexical(xsd::BYTE, "128"));
        assert!(!is_valid_lexical(xsd::POSITIVE_INTEGER, "0"));
        assert!(is_valid_lexical(xsd::NON_NEGATIVE_INTEGER, "0"));
    }

    #[test]
    fn test_other_lexical_forms() {
        assert!(is_valid_lexical(xsd::DECIMAL, "3.14"));
        assert!(is_valid_lexical(xsd::DECIMAL, ".5"));
        assert!(!is_valid_lexical(xsd::DECIMAL, "1e3"));
        assert!(is_valid_lexical(xsd::DOUBLE, "1e3"));
        assert!(is_valid_lexical(xsd::DOUBLE, "-INF"));
        assert!(!is_valid_lexical(xsd::DOUBLE, "infinity"));
        assert!(is_valid_lexical(xsd::BOOLEAN, "1"));
        assert!(!is_valid_lexical(xsd::BOOLEAN, "yes"));
        assert!(is_valid_lexical(xsd::DATE, "2024-02-29"));
        assert!(is_valid_lexical(xsd::DATE, "2024-02-29Z"));
        assert!(!is_valid_lexical(xsd::DATE, "2023-02-29"));
        assert!(is_valid_lexical(xsd::DATE_TIME, "2024-01-15T10:30:00"));
        assert!(is_valid_lexical(xsd::TIME, "10:30:00+01:00"));
        assert!(is_valid_lexical("http://example.org/custom", "anything"));
    }
}
