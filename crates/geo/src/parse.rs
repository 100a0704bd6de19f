//! Lenient coordinate parsing.
//!
//! Coordinates arrive either as JSON numbers or as strings (the favorites
//! store keeps `x`/`y` as text, and button datasets are always text). Strings
//! are read the way a browser's `parseFloat` reads them: leading whitespace
//! is skipped and the longest numeric prefix wins, so `"126.5km"` is `126.5`
//! and `"abc"` is nothing.

use crate::Coordinate;

/// Parse a degree value from a JSON number or numeric string.
///
/// # Returns
/// * `Some(f64)` for finite numbers and strings with a numeric prefix
/// * `None` for null, booleans, objects, arrays, non-numeric or non-finite input
///
/// # Example
/// ```
/// use favmap_geo::parse_degrees;
/// use serde_json::json;
///
/// assert_eq!(parse_degrees(&json!(126.5)), Some(126.5));
/// assert_eq!(parse_degrees(&json!(" 34.81")), Some(34.81));
/// assert_eq!(parse_degrees(&json!("126.5km")), Some(126.5));
/// assert_eq!(parse_degrees(&json!("n/a")), None);
/// ```
pub fn parse_degrees(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_float_prefix(s),
        _ => None,
    }?;

    parsed.is_finite().then_some(parsed)
}

/// Parse a latitude/longitude pair into a valid coordinate.
///
/// Returns `None` when either side fails to parse or the result is outside
/// the valid latitude/longitude range.
pub fn parse_point(latitude: &serde_json::Value, longitude: &serde_json::Value) -> Option<Coordinate> {
    let coord = Coordinate::new(parse_degrees(latitude)?, parse_degrees(longitude)?);
    coord.is_valid().then_some(coord)
}

/// Longest-prefix float parse.
fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when it carries at least one digit.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(parse_degrees(&json!(34.81)), Some(34.81));
        assert_eq!(parse_degrees(&json!(-126)), Some(-126.0));
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(parse_degrees(&json!("34.81")), Some(34.81));
        assert_eq!(parse_degrees(&json!("  126.39 ")), Some(126.39));
        assert_eq!(parse_degrees(&json!("+1.5")), Some(1.5));
        assert_eq!(parse_degrees(&json!("-.5")), Some(-0.5));
        assert_eq!(parse_degrees(&json!("7.")), Some(7.0));
        assert_eq!(parse_degrees(&json!("1e2")), Some(100.0));
    }

    #[test]
    fn test_prefix_semantics() {
        assert_eq!(parse_degrees(&json!("126.5km")), Some(126.5));
        assert_eq!(parse_degrees(&json!("34.1.2")), Some(34.1));
        assert_eq!(parse_degrees(&json!("3e")), Some(3.0));
        assert_eq!(parse_degrees(&json!("3e+x")), Some(3.0));
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert_eq!(parse_degrees(&json!("")), None);
        assert_eq!(parse_degrees(&json!("abc")), None);
        assert_eq!(parse_degrees(&json!(".")), None);
        assert_eq!(parse_degrees(&json!("-")), None);
        assert_eq!(parse_degrees(&json!("undefined")), None);
        assert_eq!(parse_degrees(&json!(null)), None);
        assert_eq!(parse_degrees(&json!(true)), None);
        assert_eq!(parse_degrees(&json!([1.0])), None);
    }

    #[test]
    fn test_rejects_overflow() {
        assert_eq!(parse_degrees(&json!("1e999")), None);
    }

    #[test]
    fn test_parse_point() {
        let coord = parse_point(&json!("34.81"), &json!(126.39)).unwrap();
        assert_eq!(coord.latitude, 34.81);
        assert_eq!(coord.longitude, 126.39);
    }

    #[test]
    fn test_parse_point_rejects_invalid() {
        assert!(parse_point(&json!("x"), &json!(126.39)).is_none());
        assert!(parse_point(&json!(34.81), &json!(null)).is_none());
        assert!(parse_point(&json!(126.39), &json!(34.81)).is_none());
        assert!(parse_point(&json!(95.0), &json!(126.39)).is_none());
        assert!(parse_point(&json!(34.81), &json!(200.0)).is_none());
    }
}
