use crate::output::block::BlockFields;
use crate::parser::dates::normalize_date;
use crate::parser::extract::RawReview;
use crate::parser::hours::parse_hours;
use crate::parser::language::{detect_language, Language};
use crate::parser::region::{classify_region, Region};
use crate::parser::sanitize::{clean_text, normalize_ws, sanitize_content};

/// A fully normalized review. Built once, never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub raw_date: String,
    pub normalized_date: String,
    pub recommendation: String,
    pub hours_played: f64,
    pub raw_content: String,
    pub cleaned_content: String,
    pub region: Region,
    pub language: Language,
}

impl ReviewRecord {
    /// Derive every field from the captured texts.
    ///
    /// `current_year` is used only for dates that carry no year.
    pub fn from_parts(
        date: &str,
        recommendation: &str,
        hours: &str,
        raw_content: &str,
        current_year: i32,
    ) -> Self {
        let cleaned_content = sanitize_content(raw_content);
        Self::build(date, recommendation, hours, raw_content, cleaned_content, current_year)
    }

    pub fn from_raw(raw: &RawReview, current_year: i32) -> Self {
        Self::from_parts(
            &raw.date,
            &raw.recommendation,
            &raw.hours,
            &raw.content_html,
            current_year,
        )
    }

    /// Rebuild from a block file. Block content is already plain text, so it
    /// is only folded, never parsed as markup again.
    pub fn from_block(fields: &BlockFields, current_year: i32) -> Self {
        let cleaned_content = clean_text(&fields.content);
        Self::build(
            &fields.date,
            &fields.recommendation,
            &fields.hours,
            &fields.content,
            cleaned_content,
            current_year,
        )
    }

    /// Content markup was present but held no text (an image, an embed).
    pub fn markup_only(&self) -> bool {
        self.cleaned_content.is_empty() && !self.raw_content.trim().is_empty()
    }

    fn build(
        date: &str,
        recommendation: &str,
        hours: &str,
        raw_content: &str,
        cleaned_content: String,
        current_year: i32,
    ) -> Self {
        let region = classify_region(&cleaned_content);
        let language = detect_language(&cleaned_content);

        ReviewRecord {
            raw_date: normalize_ws(date),
            normalized_date: normalize_date(date, current_year),
            recommendation: recommendation.trim().to_string(),
            hours_played: parse_hours(hours),
            raw_content: raw_content.to_string(),
            cleaned_content,
            region,
            language,
        }
    }
}
