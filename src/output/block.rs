use std::io::{self, Write};
use std::sync::LazyLock;

use regex::Regex;

use super::format_hours;
use crate::record::ReviewRecord;

pub const DATE_LABEL: &str = "Fecha:";
pub const RECOMMENDATION_LABEL: &str = "Calificación:";
pub const HOURS_LABEL: &str = "Horas jugadas:";
pub const CONTENT_LABEL: &str = "Contenido:";

// Separator lines drift in length when files are edited by hand.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\r?\n)-{3,}[ \t]*(?:\r?\n|$)").unwrap());

/// Labeled fields of one block, as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockFields {
    pub date: String,
    pub recommendation: String,
    pub hours: String,
    pub content: String,
}

/// Four labeled lines plus the content line, without the separator.
///
/// Content made only of dashes would read back as a separator, so it is
/// written with a leading space; `parse_block` trims it off again.
pub fn format_block(record: &ReviewRecord) -> String {
    let content = if SEPARATOR_RE.is_match(&record.cleaned_content) {
        format!(" {}", record.cleaned_content)
    } else {
        record.cleaned_content.clone()
    };
    format!(
        "{} {}\n{} {}\n{} {}\n{}\n{}",
        DATE_LABEL,
        record.raw_date,
        RECOMMENDATION_LABEL,
        record.recommendation,
        HOURS_LABEL,
        format_hours(record.hours_played),
        CONTENT_LABEL,
        content,
    )
}

pub fn write_block<W: Write>(mut w: W, record: &ReviewRecord, separator: &str) -> io::Result<()> {
    writeln!(w, "{}", format_block(record))?;
    writeln!(w, "{}", separator)
}

/// Split a block file into trimmed, non-empty blocks.
pub fn split_blocks(text: &str) -> Vec<&str> {
    let text = text.trim_start_matches('\u{feff}');
    SEPARATOR_RE
        .split(text)
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .collect()
}

/// True when at least one line starts with a known label.
pub fn is_review_block(block: &str) -> bool {
    block.lines().map(str::trim).any(|line| {
        [DATE_LABEL, RECOMMENDATION_LABEL, HOURS_LABEL, CONTENT_LABEL]
            .iter()
            .any(|label| strip_prefix_ci(line, label).is_some())
    })
}

pub fn parse_block(block: &str) -> BlockFields {
    BlockFields {
        date: line_after_label(block, DATE_LABEL),
        recommendation: line_after_label(block, RECOMMENDATION_LABEL),
        hours: line_after_label(block, HOURS_LABEL),
        content: content_after_label(block),
    }
}

fn line_after_label(block: &str, label: &str) -> String {
    block
        .lines()
        .map(str::trim)
        .find_map(|line| strip_prefix_ci(line, label))
        .map(|rest| rest.trim().to_string())
        .unwrap_or_default()
}

fn content_after_label(block: &str) -> String {
    let mut lines = block.lines();
    if !lines.any(|l| l.trim().eq_ignore_ascii_case(CONTENT_LABEL)) {
        return String::new();
    }
    lines.collect::<Vec<_>>().join("\n").trim().to_string()
}

fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.to_lowercase() == prefix.to_lowercase() {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ReviewRecord {
        ReviewRecord::from_parts("11 de febrero", "Recomendado", "12.5", "Me encantó el juego", 2025)
    }

    #[test]
    fn block_layout() {
        let mut buf = Vec::new();
        write_block(&mut buf, &record(), &"-".repeat(80)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Fecha: 11 de febrero",
                "Calificación: Recomendado",
                "Horas jugadas: 12.5",
                "Contenido:",
                "Me encantó el juego",
                &"-".repeat(80),
            ]
        );
    }

    #[test]
    fn split_tolerates_separator_drift() {
        let text = "\u{feff}Fecha: a\r\nContenido:\r\nx\r\n-----\r\nFecha: b\nContenido:\ny\n".to_string()
            + &"-".repeat(120)
            + "\n\n---\n";
        let blocks = split_blocks(&text);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Fecha: a"));
        assert!(blocks[1].ends_with('y'));
    }

    #[test]
    fn dashes_inside_content_do_not_split() {
        let blocks = split_blocks("Fecha: a\nContenido:\nthis -- is --- fine\n---\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(parse_block(blocks[0]).content, "this -- is --- fine");
    }

    #[test]
    fn parse_labeled_fields() {
        let fields = parse_block(
            "fecha: Posted: 11 February\nCALIFICACIÓN: Recommended\nHoras jugadas: 127.3\nContenido:\nline one\nline two\n",
        );
        assert_eq!(fields.date, "Posted: 11 February");
        assert_eq!(fields.recommendation, "Recommended");
        assert_eq!(fields.hours, "127.3");
        assert_eq!(fields.content, "line one\nline two");
    }

    #[test]
    fn missing_labels_are_empty() {
        assert!(!is_review_block("just some text"));
        assert_eq!(parse_block("just some text"), BlockFields::default());
        assert!(is_review_block("  horas jugadas: 3"));
    }

    #[test]
    fn dash_only_content_is_not_a_separator() {
        let r = ReviewRecord::from_parts("Posted 3 March", "Not Recommended", "1", "----", 2025);
        let mut buf = Vec::new();
        write_block(&mut buf, &r, &"-".repeat(80)).unwrap();
        write_block(&mut buf, &record(), &"-".repeat(80)).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let blocks = split_blocks(&text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(parse_block(blocks[0]).content, "----");
        assert_eq!(parse_block(blocks[1]).content, "Me encantó el juego");
    }

    #[test]
    fn fixture_file() {
        let text = std::fs::read_to_string("tests/fixtures/all_reviews.txt").unwrap();
        let blocks = split_blocks(&text);
        assert_eq!(blocks.len(), 3);
        let last = parse_block(blocks[2]);
        assert_eq!(last.recommendation, "Not Recommended");
        assert_eq!(last.content, "很好玩");
    }
}
