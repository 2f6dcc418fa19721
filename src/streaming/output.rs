//! Buffered tab-delimited report writer.
//!
//! Uses itoa for integer formatting to avoid allocation per field.

use crate::bed::BedError;
use crate::interval::Interval;
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use std::io::{BufWriter, Write};

/// Report writer for scan output.
pub struct BedWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
}

impl<W: Write> BedWriter<W> {
    /// Create a new BedWriter with the default 2MB buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output)
    }

    /// Create a new BedWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
        }
    }

    /// Write an interval's columns (no newline).
    #[inline]
    pub fn write_interval(&mut self, interval: &Interval) -> Result<(), BedError> {
        self.write_str(&interval.chrom)?;
        self.write_tab()?;
        self.write_int(interval.start)?;
        self.write_tab()?;
        self.write_int(interval.end)?;
        for field in &interval.extra {
            self.write_tab()?;
            self.write_str(field)?;
        }
        Ok(())
    }

    /// Write an interval followed by newline.
    #[inline]
    pub fn write_interval_line(&mut self, interval: &Interval) -> Result<(), BedError> {
        self.write_interval(interval)?;
        self.write_newline()
    }

    #[inline]
    pub fn write_str(&mut self, s: &str) -> Result<(), BedError> {
        self.writer.write_all(s.as_bytes()).map_err(BedError::Io)
    }

    #[inline]
    pub fn write_tab(&mut self) -> Result<(), BedError> {
        self.writer.write_all(b"\t").map_err(BedError::Io)
    }

    #[inline]
    pub fn write_newline(&mut self) -> Result<(), BedError> {
        self.writer.write_all(b"\n").map_err(BedError::Io)
    }

    /// Write an integer using itoa.
    #[inline]
    pub fn write_int<I: itoa::Integer>(&mut self, n: I) -> Result<(), BedError> {
        self.writer
            .write_all(self.itoa_buf.format(n).as_bytes())
            .map_err(BedError::Io)
    }

    /// Flush the buffered output.
    pub fn flush(&mut self) -> Result<(), BedError> {
        self.writer.flush().map_err(BedError::Io)
    }
}
