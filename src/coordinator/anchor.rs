//! Anchor (loci) stream.

use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::bed::{open_file, Result};
use crate::genome::ChromosomeOrder;
use crate::interval::Locus;
use crate::streaming::cursor::TrackCursor;

/// Cursor over the loci file. Every locus must name a registered chromosome.
pub struct AnchorStream<R: BufRead> {
    cursor: TrackCursor<R>,
}

impl<R: BufRead> AnchorStream<R> {
    pub fn new(cursor: TrackCursor<R>) -> Self {
        Self { cursor }
    }

    /// Read the next locus, or `None` at end-of-stream.
    pub fn next_locus(&mut self, order: &ChromosomeOrder) -> Result<Option<Locus>> {
        self.cursor.advance()?;
        if self.cursor.is_eof() {
            return Ok(None);
        }
        let locus = self.cursor.current();
        order.rank(&locus.chrom)?;
        Ok(Some(locus.clone()))
    }

    pub fn label(&self) -> &str {
        self.cursor.label()
    }
}

/// Count the non-blank lines of a loci file. Without header lines this is
/// the number of loci.
pub fn count_loci<P: AsRef<Path>>(path: P) -> Result<usize> {
    let reader = BufReader::new(open_file(path.as_ref())?);
    let mut count = 0;
    for line in reader.lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}
