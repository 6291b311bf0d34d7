use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use scraper::Html;
use tracing::{debug, info, warn};

use crate::error::{Result, ReviewError};
use crate::output::block::{is_review_block, parse_block, split_blocks, write_block};
use crate::output::delimited::{write_header, write_row};
use crate::output::write_file;
use crate::parser::extract::{extract_reviews, RawReview, ReviewSelectors};
use crate::parser::region::Region;
use crate::record::ReviewRecord;
use crate::settings::Settings;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Which page the reviews were captured from.
///
/// `All` writes one file. `Positive` and `Negative` only name the output:
/// reviews are split by region into two files whose names carry the counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    All,
    Positive,
    Negative,
}

impl Mode {
    fn prefix(&self) -> &'static str {
        match self {
            Mode::All => "all",
            Mode::Positive => "positive",
            Mode::Negative => "negative",
        }
    }
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub total: usize,
    pub occidental: usize,
    pub oriental: usize,
    pub files: Vec<PathBuf>,
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ReviewError::MalformedInputFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Captured page → block files in `out_dir`.
///
/// Nothing is created when the page holds no reviews.
pub fn extract_file(
    html_path: &Path,
    out_dir: &Path,
    mode: Mode,
    settings: &Settings,
) -> Result<ExtractSummary> {
    let html = read_input(html_path)?;
    let doc = Html::parse_document(&html);
    let selectors = ReviewSelectors::from_settings(&settings.selectors)?;

    let reviews = extract_reviews(&doc, &selectors)?;
    let records = normalize_all(reviews, settings.chunk_size, current_year());
    info!(count = records.len(), path = %html_path.display(), "reviews extracted");
    let markup_only = records.iter().filter(|r| r.markup_only()).count();
    if markup_only > 0 {
        warn!(count = markup_only, "reviews whose content markup holds no text");
    }

    fs::create_dir_all(out_dir).map_err(|source| ReviewError::Serialization {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let (oriental, occidental): (Vec<&ReviewRecord>, Vec<&ReviewRecord>) =
        records.iter().partition(|r| r.region == Region::Oriental);
    let separator = settings.separator_line();

    let files = match mode {
        Mode::All => {
            let path = out_dir.join("all_reviews.txt");
            write_blocks(&path, records.iter(), &separator)?;
            vec![path]
        }
        Mode::Positive | Mode::Negative => {
            let mut files = Vec::with_capacity(2);
            for (region, bucket) in [(Region::Occidental, &occidental), (Region::Oriental, &oriental)] {
                let name = format!("{}_reviews_{}_{}.txt", mode.prefix(), region, bucket.len());
                let path = out_dir.join(name);
                write_blocks(&path, bucket.iter().copied(), &separator)?;
                files.push(path);
            }
            files
        }
    };

    Ok(ExtractSummary {
        total: records.len(),
        occidental: occidental.len(),
        oriental: oriental.len(),
        files,
    })
}

/// Block file → delimited file. Returns the number of rows written.
pub fn convert_file(txt_path: &Path, csv_path: &Path, settings: &Settings) -> Result<usize> {
    let text = read_input(txt_path)?;
    let blocks: Vec<&str> = split_blocks(&text)
        .into_iter()
        .filter(|b| {
            let keep = is_review_block(b);
            if !keep {
                warn!(block = %b, "skipping block without review labels");
            }
            keep
        })
        .collect();

    if blocks.is_empty() {
        return Err(ReviewError::NoReviewsFound);
    }

    let year = current_year();
    let records: Vec<ReviewRecord> = blocks
        .par_iter()
        .map(|b| ReviewRecord::from_block(&parse_block(b), year))
        .collect();

    write_file(csv_path, |w| {
        if settings.csv_bom {
            w.write_all(UTF8_BOM)?;
        }
        write_header(&mut *w)?;
        for r in &records {
            write_row(&mut *w, r)?;
        }
        Ok(())
    })?;

    info!(rows = records.len(), path = %csv_path.display(), "delimited file written");
    Ok(records.len())
}

/// Normalize lazily read reviews chunk by chunk on the rayon pool.
///
/// Output order matches input order.
pub fn normalize_all<I>(reviews: I, chunk_size: usize, current_year: i32) -> Vec<ReviewRecord>
where
    I: Iterator<Item = RawReview>,
{
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} reviews ({per_sec})")
    {
        pb.set_style(style);
    }

    let mut reviews = reviews;
    let mut records = Vec::new();
    loop {
        let chunk: Vec<RawReview> = reviews.by_ref().take(chunk_size.max(1)).collect();
        if chunk.is_empty() {
            break;
        }
        let normalized: Vec<ReviewRecord> = chunk
            .par_iter()
            .map(|r| ReviewRecord::from_raw(r, current_year))
            .collect();
        debug!(chunk = chunk.len(), "chunk normalized");
        pb.inc(chunk.len() as u64);
        records.extend(normalized);
    }

    pb.finish_and_clear();
    records
}

fn write_blocks<'a, I>(path: &Path, records: I, separator: &str) -> Result<()>
where
    I: IntoIterator<Item = &'a ReviewRecord>,
{
    write_file(path, |w| {
        for r in records {
            write_block(&mut *w, r, separator)?;
        }
        Ok(())
    })
}
