//! Best-effort normalization of review dates to `year/month/day`.
//!
//! Review pages print dates the way the viewer's locale does
//! (`Posted 11 February`, `October 31, 2023`, `Publicada el 3 de marzo`).
//! Month vocabularies are declared here rather than taken from the system
//! locale database, and every attempt is an explicit (locale, layout) pair
//! tried in a fixed order.
//!
//! Known limitation: a date without a year is assumed to be from the current
//! year, so a review from last February shows up as this February.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::debug;

use super::sanitize::normalize_ws;

static LEAD_IN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:posted\s+on|posted:?|publicad[ao]\s+el|publicad[ao]:|fecha:)\s*").unwrap()
});
static EDIT_NOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[.;]?\s*(?:last\s+edited|updated|última\s+edición|actualizada)\b.*$").unwrap()
});
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{4}\b").unwrap());
static MONTH_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\d\s,]+) (\d{1,2})(,?) (\d{4})$").unwrap());
static DAY_MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}) ([^\d\s,]+)(,?) (\d{4})$").unwrap());
static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})([-/])(\d{1,2})([-/])(\d{1,2})$").unwrap());
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?:st|nd|rd|th|º|ª|o|a)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonthStyle {
    Full,
    Abbreviated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericOrder {
    MonthFirst,
    DayFirst,
}

/// One exact layout, in .NET-style notation: `MMMM d, yyyy`, `d MMM yyyy`, `yyyy-M-d`.
#[derive(Debug, Clone, Copy)]
enum Layout {
    MonthDay { month: MonthStyle, comma: bool },
    DayMonth { month: MonthStyle, comma: bool },
    Numeric { sep: char },
}

const LAYOUTS: [Layout; 10] = [
    Layout::MonthDay { month: MonthStyle::Full, comma: true },
    Layout::MonthDay { month: MonthStyle::Abbreviated, comma: true },
    Layout::MonthDay { month: MonthStyle::Full, comma: false },
    Layout::MonthDay { month: MonthStyle::Abbreviated, comma: false },
    Layout::DayMonth { month: MonthStyle::Full, comma: true },
    Layout::DayMonth { month: MonthStyle::Abbreviated, comma: true },
    Layout::DayMonth { month: MonthStyle::Full, comma: false },
    Layout::DayMonth { month: MonthStyle::Abbreviated, comma: false },
    Layout::Numeric { sep: '-' },
    Layout::Numeric { sep: '/' },
];

struct Locale {
    name: &'static str,
    full: [&'static str; 12],
    abbreviated: [&'static str; 12],
    fillers: &'static [&'static str],
    numeric_order: NumericOrder,
}

const ENGLISH_MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];
const ENGLISH_ABBR: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const SPANISH_MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];
const SPANISH_ABBR: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

static LOCALES: [Locale; 3] = [
    Locale {
        name: "en-US",
        full: ENGLISH_MONTHS,
        abbreviated: ENGLISH_ABBR,
        fillers: &["of", "the", "on"],
        numeric_order: NumericOrder::MonthFirst,
    },
    Locale {
        name: "en-GB",
        full: ENGLISH_MONTHS,
        abbreviated: ENGLISH_ABBR,
        fillers: &["of", "the", "on"],
        numeric_order: NumericOrder::DayFirst,
    },
    Locale {
        name: "es-ES",
        full: SPANISH_MONTHS,
        abbreviated: SPANISH_ABBR,
        fillers: &["de", "del", "el"],
        numeric_order: NumericOrder::DayFirst,
    },
];

impl Locale {
    fn month_exact(&self, word: &str, style: MonthStyle) -> Option<u32> {
        let word = word.to_lowercase();
        let names = match style {
            MonthStyle::Full => &self.full,
            MonthStyle::Abbreviated => &self.abbreviated,
        };
        let word = match style {
            MonthStyle::Full => word.as_str(),
            MonthStyle::Abbreviated => word.trim_end_matches('.'),
        };
        position(names, word)
    }

    /// Full name, abbreviation, or any prefix of the full name of 3+ letters (`sept`).
    fn month_loose(&self, word: &str) -> Option<u32> {
        let word = word.trim_end_matches('.');
        position(&self.full, word)
            .or_else(|| position(&self.abbreviated, word))
            .or_else(|| {
                (word.chars().count() >= 3)
                    .then(|| self.full.iter().position(|m| m.starts_with(word)))
                    .flatten()
                    .map(|i| i as u32 + 1)
            })
    }
}

fn position(names: &[&str; 12], word: &str) -> Option<u32> {
    names.iter().position(|m| *m == word).map(|i| i as u32 + 1)
}

/// Normalize `raw` to `Y/M/D` without zero padding.
///
/// Returns the cleaned input (lead-ins stripped, whitespace collapsed, no
/// appended year) when nothing matches. `current_year` fills in dates that
/// carry no year.
pub fn normalize_date(raw: &str, current_year: i32) -> String {
    let cleaned = clean_date_text(raw);
    if cleaned.is_empty() {
        return cleaned;
    }

    let candidate = if YEAR_RE.is_match(&cleaned) {
        cleaned.clone()
    } else {
        format!("{} {}", cleaned, current_year)
    };

    let exact = LOCALES
        .iter()
        .flat_map(|locale| LAYOUTS.iter().map(move |layout| (locale, layout)))
        .find_map(|(locale, layout)| parse_exact(&candidate, layout, locale));

    let parsed = exact.or_else(|| {
        LOCALES.iter().find_map(|locale| {
            let d = parse_free(&candidate, locale);
            if d.is_some() {
                debug!(raw, locale = locale.name, "date matched free-form");
            }
            d
        })
    });

    match parsed {
        Some(d) => format!("{}/{}/{}", d.year(), d.month(), d.day()),
        None => {
            debug!(raw, "unparseable date, keeping raw text");
            cleaned
        }
    }
}

/// Strip lead-in phrases and edit notes, collapse whitespace, drop edge commas.
fn clean_date_text(raw: &str) -> String {
    let s = normalize_ws(raw);
    let s = LEAD_IN_RE.replace(&s, "");
    let s = EDIT_NOTE_RE.replace(&s, "");
    s.trim()
        .trim_matches(',')
        .trim_end_matches('.')
        .trim()
        .to_string()
}

fn parse_exact(s: &str, layout: &Layout, locale: &Locale) -> Option<NaiveDate> {
    match *layout {
        Layout::MonthDay { month, comma } => {
            let caps = MONTH_DAY_RE.captures(s)?;
            if caps[3].is_empty() == comma {
                return None;
            }
            let m = locale.month_exact(&caps[1], month)?;
            ymd(&caps[4], m, &caps[2])
        }
        Layout::DayMonth { month, comma } => {
            let caps = DAY_MONTH_RE.captures(s)?;
            if caps[3].is_empty() == comma {
                return None;
            }
            let m = locale.month_exact(&caps[2], month)?;
            ymd(&caps[4], m, &caps[1])
        }
        Layout::Numeric { sep } => {
            let caps = NUMERIC_RE.captures(s)?;
            let sep = sep.to_string();
            if caps[2] != sep || caps[4] != sep {
                return None;
            }
            let m = caps[3].parse().ok()?;
            ymd(&caps[1], m, &caps[5])
        }
    }
}

fn ymd(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

#[derive(Debug, Clone, Copy)]
struct Number {
    value: u32,
    digits: usize,
}

/// Lenient per-locale parse: fillers, ordinals and punctuation are ignored,
/// but any other unknown word rejects the input.
fn parse_free(s: &str, locale: &Locale) -> Option<NaiveDate> {
    let lower = s.to_lowercase();
    let mut month: Option<u32> = None;
    let mut numbers: Vec<Number> = Vec::new();

    let tokens = lower
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '/' | '-'))
        .map(|t| t.trim_matches(|c: char| matches!(c, '.' | ',' | ';' | '(' | ')')))
        .filter(|t| !t.is_empty());

    for token in tokens {
        if token.chars().all(|c| c.is_ascii_digit()) {
            numbers.push(Number { value: token.parse().ok()?, digits: token.len() });
        } else if let Some(caps) = ORDINAL_RE.captures(token) {
            numbers.push(Number { value: caps[1].parse().ok()?, digits: caps[1].len() });
        } else if locale.fillers.contains(&token) {
            continue;
        } else if let Some(m) = locale.month_loose(token) {
            if month.replace(m).is_some() {
                return None;
            }
        } else {
            return None;
        }
    }

    match (month, numbers.as_slice()) {
        (Some(m), [a, b]) => {
            let (year, day) = match (a.digits, b.digits) {
                (4, 1..=2) => (a, b),
                (1..=2, 4) => (b, a),
                _ => return None,
            };
            NaiveDate::from_ymd_opt(year.value as i32, m, day.value)
        }
        (None, [a, b, c]) => {
            if a.digits == 4 && b.digits <= 2 && c.digits <= 2 {
                return NaiveDate::from_ymd_opt(a.value as i32, b.value, c.value);
            }
            if c.digits != 4 || a.digits > 2 || b.digits > 2 {
                return None;
            }
            let (m, d) = match locale.numeric_order {
                NumericOrder::MonthFirst => (a.value, b.value),
                NumericOrder::DayFirst => (b.value, a.value),
            };
            NaiveDate::from_ymd_opt(c.value as i32, m, d)
        }
        _ => None,
    }
}
