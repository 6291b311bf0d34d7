pub mod block;
pub mod delimited;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, ReviewError};

/// Hours with a `.` decimal point and no trailing `.0`: `12.5`, `8`, `0`.
pub fn format_hours(hours: f64) -> String {
    format!("{}", hours)
}

pub fn create_writer(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ReviewError::Serialization {
            path: path.to_path_buf(),
            source,
        })
}

/// Run `write` against a fresh buffered file and flush it.
pub fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let mut w = create_writer(path)?;
    write(&mut w)
        .and_then(|_| w.flush())
        .map_err(|source| ReviewError::Serialization {
            path: path.to_path_buf(),
            source,
        })
}
