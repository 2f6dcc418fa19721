//! Core interval type shared by loci and track records.

use std::fmt;

/// A genomic interval with chromosome, start, end and any trailing columns.
///
/// Coordinates are treated as a closed interval `[start, end]`, so a record
/// with `start == end` covers one position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Interval {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    /// Columns after the third, carried through unmodified.
    pub extra: Vec<String>,
}

/// A region of interest read from the anchor file.
pub type Locus = Interval;

impl Interval {
    /// Create a new interval with no extra columns.
    #[inline]
    pub fn new(chrom: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            extra: Vec::new(),
        }
    }

    /// Attach trailing columns (builder pattern).
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra = extra.into_iter().map(Into::into).collect();
        self
    }

    /// Number of positions covered: `end - start + 1`, saturating at the
    /// `i64` bounds.
    #[inline]
    pub fn size(&self) -> i64 {
        self.end.saturating_sub(self.start).saturating_add(1)
    }

    /// Check if this interval shares at least one position with another.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.chrom == other.chrom && self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chrom, self.start, self.end)?;
        for field in &self.extra {
            write!(f, "\t{}", field)?;
        }
        Ok(())
    }
}
