//! Error type and whole-file helpers for tab-delimited interval files.

use crate::interval::Interval;
use crate::streaming::cursor::TrackCursor;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while configuring, opening or scanning interval files.
#[derive(Error, Debug)]
pub enum BedError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Unable to open {}: {source}", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File {0} contains no records")]
    EmptyFile(String),

    #[error("{file} line {line}: expected at least 3 tab-delimited fields, got {found}")]
    MalformedRecord {
        file: String,
        line: usize,
        found: usize,
    },

    #[error("{file} line {line}: invalid genomic coordinate '{value}'")]
    MalformedCoordinate {
        file: String,
        line: usize,
        value: String,
    },

    #[error("Chromosome '{0}' is not in the specified chromosome order")]
    UnknownChromosome(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, BedError>;

/// Open a file for reading, mapping failure to [`BedError::UnreadableFile`].
pub(crate) fn open_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|source| BedError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every record of an interval file, in file order.
pub fn read_intervals<P: AsRef<Path>>(path: P) -> Result<Vec<Interval>> {
    let cursor = TrackCursor::open(path)?;
    drain(cursor)
}

/// Parse intervals from a string (useful for testing).
pub fn parse_intervals(content: &str) -> Result<Vec<Interval>> {
    let cursor = TrackCursor::new(content.as_bytes(), "<memory>")?;
    drain(cursor)
}

fn drain<R: BufRead>(mut cursor: TrackCursor<R>) -> Result<Vec<Interval>> {
    let mut intervals = Vec::new();
    cursor.advance()?;
    while !cursor.is_eof() {
        intervals.push(cursor.current().clone());
        cursor.advance()?;
    }
    Ok(intervals)
}
