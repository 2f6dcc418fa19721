//! Line-level parsing of tab-delimited interval records.
//!
//! Splitting uses memchr to find tab boundaries; only the first three
//! columns are interpreted, the rest are carried through as text.

use crate::bed::{BedError, Result};
use crate::interval::Interval;
use memchr::memchr_iter;

/// Strip a trailing `\n` or `\r\n` from a raw line.
#[inline]
pub fn trim_line_end(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Split a line on tab characters.
#[inline]
pub fn split_tabs(line: &str) -> Vec<&str> {
    let mut fields = Vec::with_capacity(8);
    let mut field_start = 0;
    for tab in memchr_iter(b'\t', line.as_bytes()) {
        fields.push(&line[field_start..tab]);
        field_start = tab + 1;
    }
    fields.push(&line[field_start..]);
    fields
}

/// Parse a genomic coordinate, tolerating surrounding whitespace.
#[inline]
pub fn parse_coordinate(field: &str) -> Option<i64> {
    field.trim().parse().ok()
}

/// Parse one record line (without its terminator) into an [`Interval`].
///
/// `file` and `line` only feed error messages.
pub fn parse_record(line: &str, file: &str, line_number: usize) -> Result<Interval> {
    let fields = split_tabs(line);

    if fields.len() < 3 {
        return Err(BedError::MalformedRecord {
            file: file.to_string(),
            line: line_number,
            found: fields.len(),
        });
    }

    let coordinate = |value: &str| {
        parse_coordinate(value).ok_or_else(|| BedError::MalformedCoordinate {
            file: file.to_string(),
            line: line_number,
            value: value.to_string(),
        })
    };
    let start = coordinate(fields[1])?;
    let end = coordinate(fields[2])?;

    Ok(Interval {
        chrom: fields[0].to_string(),
        start,
        end,
        extra: fields[3..].iter().map(|s| s.to_string()).collect(),
    })
}
