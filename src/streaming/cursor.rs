//! Forward-only cursor over one sorted interval file.
//!
//! The cursor keeps one raw line of lookahead so that end-of-stream is known
//! as soon as the last record has been consumed. It never rewinds.

use crate::bed::{open_file, BedError, Result};
use crate::interval::Interval;
use crate::streaming::buffers::{DEFAULT_INPUT_BUFFER, DEFAULT_LINE_BUFFER};
use crate::streaming::parsing::{parse_record, trim_line_end};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Sequential reader state for a single track (or the anchor file).
pub struct TrackCursor<R: BufRead> {
    reader: R,
    label: String,
    /// Next raw line, already stripped of its terminator.
    lookahead: String,
    lookahead_line: usize,
    has_lookahead: bool,
    line_buf: String,
    lines_read: usize,
    current: Interval,
    record_number: usize,
    eof: bool,
}

impl TrackCursor<BufReader<File>> {
    /// Open an interval file from a path.
    ///
    /// Fails with `UnreadableFile` if it cannot be opened and `EmptyFile` if
    /// it holds no records.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = open_file(path)?;
        let reader = BufReader::with_capacity(DEFAULT_INPUT_BUFFER, file);
        Self::new(reader, path.display().to_string())
    }
}

impl<R: BufRead> TrackCursor<R> {
    /// Wrap any buffered source. The first raw line is read ahead, but no
    /// record is parsed until [`advance`](Self::advance) is called.
    pub fn new(reader: R, label: impl Into<String>) -> Result<Self> {
        let mut cursor = Self {
            reader,
            label: label.into(),
            lookahead: String::with_capacity(DEFAULT_LINE_BUFFER),
            lookahead_line: 0,
            has_lookahead: false,
            line_buf: String::with_capacity(DEFAULT_LINE_BUFFER),
            lines_read: 0,
            current: Interval::default(),
            record_number: 0,
            eof: false,
        };
        cursor.read_raw()?;
        if !cursor.has_lookahead {
            return Err(BedError::EmptyFile(cursor.label));
        }
        Ok(cursor)
    }

    /// Fill the lookahead with the next non-blank line.
    fn read_raw(&mut self) -> Result<()> {
        loop {
            self.line_buf.clear();
            let bytes_read = self.reader.read_line(&mut self.line_buf)?;
            if bytes_read == 0 {
                self.has_lookahead = false;
                return Ok(());
            }
            self.lines_read += 1;

            let line = trim_line_end(&self.line_buf);
            if line.trim().is_empty() {
                continue;
            }

            self.lookahead.clear();
            self.lookahead.push_str(line);
            self.lookahead_line = self.lines_read;
            self.has_lookahead = true;
            return Ok(());
        }
    }

    /// Move to the next record.
    ///
    /// Sets the end-of-stream flag when no lines remain; calling it again at
    /// end-of-stream does nothing. On a parse error the cursor has still
    /// consumed the offending line and `current()` keeps the previous record.
    pub fn advance(&mut self) -> Result<()> {
        if self.eof {
            return Ok(());
        }
        if !self.has_lookahead {
            self.eof = true;
            return Ok(());
        }

        let raw = std::mem::take(&mut self.lookahead);
        let line_number = self.lookahead_line;
        self.read_raw()?;

        self.current = parse_record(&raw, &self.label, line_number)?;
        self.record_number += 1;
        Ok(())
    }

    /// The last successfully parsed record.
    ///
    /// Before the first `advance()` this is an empty placeholder interval.
    #[inline]
    pub fn current(&self) -> &Interval {
        &self.current
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// True while a record is available and lies on `chrom`.
    #[inline]
    pub fn is_on(&self, chrom: &str) -> bool {
        !self.eof && self.current.chrom == chrom
    }

    /// 1-based number of the current record (0 before the first record).
    pub fn record_number(&self) -> usize {
        self.record_number
    }

    /// Source name used in errors and logs.
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn make_cursor(data: &str) -> Result<TrackCursor<BufReader<Cursor<Vec<u8>>>>> {
        let reader = BufReader::new(Cursor::new(data.as_bytes().to_vec()));
        TrackCursor::new(reader, "test")
    }

    #[test]
    fn test_cursor_walks_records() {
        let mut cursor = make_cursor("chr1\t10\t20\nchr1\t30\t40\tx\n").unwrap();
        assert_eq!(cursor.record_number(), 0);

        cursor.advance().unwrap();
        assert_eq!(cursor.current(), &Interval::new("chr1", 10, 20));
        assert!(cursor.is_on("chr1"));

        cursor.advance().unwrap();
        assert_eq!(cursor.current().extra, vec!["x"]);
        assert_eq!(cursor.record_number(), 2);
        assert!(!cursor.is_eof());

        cursor.advance().unwrap();
        assert!(cursor.is_eof());
        assert!(!cursor.is_on("chr1"));

        // Never advances past end-of-stream
        cursor.advance().unwrap();
        assert!(cursor.is_eof());
        assert_eq!(cursor.record_number(), 2);
    }

    #[test]
    fn test_cursor_empty_source() {
        assert!(matches!(make_cursor(""), Err(BedError::EmptyFile(_))));
        assert!(matches!(make_cursor("\n\n"), Err(BedError::EmptyFile(_))));
    }

    #[test]
    fn test_cursor_skips_blank_lines_and_crlf() {
        let mut cursor = make_cursor("chr1\t1\t2\r\n\r\nchr1\t3\t4\r\n\n").unwrap();
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), &Interval::new("chr1", 3, 4));
        cursor.advance().unwrap();
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_cursor_reports_line_of_bad_record() {
        let mut cursor = make_cursor("chr1\t1\t2\n\nchr1\tx\t4\n").unwrap();
        cursor.advance().unwrap();
        let err = cursor.advance().unwrap_err();
        assert!(matches!(err, BedError::MalformedCoordinate { line: 3, .. }));
        // Previous record is kept
        assert_eq!(cursor.current(), &Interval::new("chr1", 1, 2));
    }

    #[test]
    fn test_cursor_open_missing_file() {
        let result = TrackCursor::open("/nonexistent/track.bed");
        assert!(matches!(result, Err(BedError::UnreadableFile { .. })));
    }
}
