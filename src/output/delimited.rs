use std::borrow::Cow;
use std::io::{self, Write};

use super::format_hours;
use crate::record::ReviewRecord;

pub const SEPARATOR: char = ';';
pub const HEADER: &str = "Fecha;Calificacion;Horas;Idioma;Contenido";

fn needs_quotes(field: &str) -> bool {
    field.contains([SEPARATOR, ',', '"', '\n', '\r'])
}

/// Quote a field when it holds the separator, a comma, a quote or a line break.
pub fn quote_field(field: &str) -> Cow<'_, str> {
    if needs_quotes(field) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

pub fn record_fields(record: &ReviewRecord) -> [String; 5] {
    [
        record.normalized_date.clone(),
        record.recommendation.clone(),
        format_hours(record.hours_played),
        record.language.code().to_string(),
        record.cleaned_content.clone(),
    ]
}

pub fn write_header<W: Write>(mut w: W) -> io::Result<()> {
    writeln!(w, "{}", HEADER)
}

pub fn write_row<W: Write>(mut w: W, record: &ReviewRecord) -> io::Result<()> {
    let row = record_fields(record)
        .iter()
        .map(|f| quote_field(f))
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string());
    writeln!(w, "{}", row)
}

/// Read delimited text back the way a spreadsheet would.
#[cfg(test)]
pub(crate) fn read_rows(text: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .delimiter(SEPARATOR as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes())
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}
