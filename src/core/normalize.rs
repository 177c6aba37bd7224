//! Cleanup and conversion of scraped text.

use crate::utils::error::{CrawlError, Result};
use serde_json::Value;

const CURRENCY_SYMBOLS: [char; 4] = ['$', '₴', '€', '£'];

/// Decodes `+`/percent-encoding until nothing is left to decode, then
/// collapses whitespace runs and trims.
pub fn clean(text: &str) -> String {
    let mut current = decode_once(text);
    loop {
        let next = decode_once(&current);
        if next == current {
            break;
        }
        current = next;
    }

    current.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_once(text: &str) -> String {
    let plus_decoded = text.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(plus_decoded.as_bytes())).into_owned()
}

/// [`clean`] for values coming out of JSON payloads, which may hold anything.
pub fn clean_value(value: &Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(clean(text)),
        other => Err(CrawlError::TypeConversionError {
            value: other.to_string(),
        }),
    }
}

/// Converts a price such as `1.234,56`, `1,234.56` or `$1234.56` to a float.
///
/// A `,` or `.` in the third- or second-to-last position is the fractional
/// separator; every other `,`/`.` is a thousands separator.
pub fn to_number(text: &str) -> Option<f64> {
    let stripped: String = text.chars().filter(|c| !CURRENCY_SYMBOLS.contains(c)).collect();
    let mut chars: Vec<char> = stripped.trim().chars().collect();

    let len = chars.len();
    let fraction_at = if len >= 3 && matches!(chars[len - 3], ',' | '.') {
        Some(len - 3)
    } else if len >= 2 && matches!(chars[len - 2], ',' | '.') {
        Some(len - 2)
    } else {
        None
    };
    if let Some(index) = fraction_at {
        chars[index] = '$';
    }

    let normalized: String = chars
        .into_iter()
        .filter(|c| !matches!(c, ',' | '.'))
        .map(|c| if c == '$' { '.' } else { c })
        .collect();

    match normalized.parse::<f64>() {
        Ok(number) if number.is_finite() => Some(number),
        _ => {
            tracing::error!("The value \"{}\" can not be converted to float", text);
            None
        }
    }
}

pub fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(CrawlError::ValueDeserializationError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_collapses_whitespace_and_decodes() {
        assert_eq!(clean("  Apple \n\t iPhone   15  "), "Apple iPhone 15");
        assert_eq!(clean("Samsung%20Galaxy+S24"), "Samsung Galaxy S24");
        assert_eq!(clean("%D0%B2 %D0%BD%D0%B0%D0%BB%D0%B8%D1%87%D0%B8%D0%B8"), "в наличии");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_clean_decodes_nested_escapes() {
        assert_eq!(clean("%2525"), "%");
        assert_eq!(clean("Case%252B1"), "Case 1");
        assert_eq!(clean("50%25 off"), "50% off");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let inputs = [
            "  Чехол   для\nтелефона ",
            "product/case-123",
            "a+b%20c",
            "%2525",
            "C%2B%2B",
            "100%",
            "\u{a0}non breaking\u{a0}",
            "",
        ];
        for input in inputs {
            let once = clean(input);
            assert_eq!(clean(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_clean_value_rejects_non_strings() {
        assert_eq!(clean_value(&json!("  Kyiv ")).unwrap(), "Kyiv");

        let err = clean_value(&json!(42)).unwrap_err();
        assert!(matches!(err, CrawlError::TypeConversionError { .. }));
        assert!(clean_value(&Value::Null).is_err());
    }

    #[test]
    fn test_to_number_locale_formats() {
        assert_eq!(to_number("1.234,56"), Some(1234.56));
        assert_eq!(to_number("1,234.56"), Some(1234.56));
        assert_eq!(to_number("1234.56"), Some(1234.56));
        assert_eq!(to_number("$1234.56"), Some(1234.56));
        assert_eq!(to_number(" 12,5 "), Some(12.5));
        assert_eq!(to_number("250"), Some(250.0));
        assert_eq!(to_number("1 234₴"), None);
    }

    #[test]
    fn test_to_number_not_convertible() {
        assert_eq!(to_number("abc"), None);
        assert_eq!(to_number(""), None);
        assert_eq!(to_number("$"), None);
        assert_eq!(to_number("inf"), None);
    }

    #[test]
    fn test_parse_json() {
        assert_eq!(parse_json(r#"{"a":1}"#).unwrap(), json!({"a": 1}));

        let err = parse_json("not json").unwrap_err();
        assert!(matches!(err, CrawlError::ValueDeserializationError(_)));
        assert!(parse_json("").is_err());
    }
}
