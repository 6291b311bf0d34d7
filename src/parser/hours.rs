use std::sync::LazyLock;

use regex::Regex;

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d[\d.,]*").unwrap());

/// Playtime in hours from text like `"12.5 hrs on record"` or `"127,3 h registradas"`.
///
/// Unparseable text yields `0.0`; the result is never negative.
pub fn parse_hours(text: &str) -> f64 {
    parse_decimal(text).unwrap_or(0.0)
}

/// First number in `text`, accepting `.` or `,` as decimal mark.
///
/// With both marks present the rightmost one is the decimal mark. A single
/// mark followed by exactly three digits, or a mark that repeats, is a
/// thousands separator (`1,234` and `12.500` are whole numbers).
pub fn parse_decimal(text: &str) -> Option<f64> {
    let raw = NUMBER_RE.find(text)?.as_str().trim_end_matches(['.', ',']);

    let normalized = match (raw.rfind('.'), raw.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal, thousands) = if dot > comma { ('.', ',') } else { (',', '.') };
            raw.replace(thousands, "").replace(decimal, ".")
        }
        (Some(_), None) => single_mark(raw, '.'),
        (None, Some(_)) => single_mark(raw, ','),
        (None, None) => raw.to_string(),
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn single_mark(raw: &str, mark: char) -> String {
    let occurrences = raw.matches(mark).count();
    let digits_after = raw.rsplit(mark).next().map_or(0, str::len);
    if occurrences > 1 || digits_after == 3 {
        raw.replace(mark, "")
    } else {
        raw.replace(mark, ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_comma() {
        assert_eq!(parse_hours("127,3 hrs"), 127.3);
        assert_eq!(parse_hours("127,3 h registradas"), 127.3);
    }

    #[test]
    fn decimal_point() {
        assert_eq!(parse_hours("12.5 hrs on record"), 12.5);
        assert_eq!(parse_hours("0.2 hrs"), 0.2);
        assert_eq!(parse_hours("8 hrs"), 8.0);
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(parse_hours("1,234.5 hrs on record"), 1234.5);
        assert_eq!(parse_hours("1.234,5 h registradas"), 1234.5);
        assert_eq!(parse_hours("2,345 hrs"), 2345.0);
        assert_eq!(parse_hours("1,234,567 hrs"), 1234567.0);
    }

    #[test]
    fn unparseable_defaults_to_zero() {
        assert_eq!(parse_hours(""), 0.0);
        assert_eq!(parse_hours("hrs on record"), 0.0);
        assert_eq!(parse_hours("-"), 0.0);
    }

    #[test]
    fn trailing_mark_ignored() {
        assert_eq!(parse_hours("12. hrs"), 12.0);
        assert_eq!(parse_decimal("$19,99."), Some(19.99));
    }
}
