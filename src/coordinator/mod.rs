//! Multi-track reading coordinator.
//!
//! One anchor file of loci drives any number of track files. Each
//! [`Coordinator::read`] moves the anchor forward by one locus and then
//! advances every track until it has passed that locus, filing each visited
//! record into a per-track buffer:
//!
//! ```text
//!            prior        current_before   current   current_after
//! track:  [----]  [--]      [------|----] |  [--]  | [---|-------]
//! locus:                           |=====================|
//! ```
//!
//! Records on the previous chromosome left after its last locus go to
//! `remainder`; records on chromosomes no locus touched go to `prev_chrs`.
//! [`Coordinator::read_final`] drains whatever is left once the anchor is
//! exhausted.
//!
//! REQUIREMENT: the anchor and every track must be sorted by
//! (chromosome rank, start). This is not checked; unsorted input gives
//! undefined classification.
//!
//! A record that spans several consecutive loci is filed by whichever scan
//! step reaches it first, and records carried over from the previous locus
//! land in `current`. Callers that need an exact upstream/inside/downstream
//! split must recompute it from coordinates.

pub mod anchor;
pub mod buffers;

pub use anchor::{count_loci, AnchorStream};
pub use buffers::{Category, ChromGroups, FinalBuffers, TrackBuffers};

use log::{debug, error, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::bed::{BedError, Result};
use crate::config::RetentionPolicy;
use crate::genome::ChromosomeOrder;
use crate::interval::{Interval, Locus};
use crate::streaming::cursor::TrackCursor;

/// An open coordinator session.
pub struct Coordinator<R: BufRead> {
    order: ChromosomeOrder,
    policy: RetentionPolicy,
    anchor: Option<AnchorStream<R>>,
    tracks: Vec<TrackCursor<R>>,
    buffers: Vec<TrackBuffers>,
    finals: Vec<FinalBuffers>,
    locus: Option<Locus>,
    last_processed_chr: Option<String>,
    loci_read: usize,
    eof: bool,
}

impl Coordinator<BufReader<File>> {
    /// Open the anchor and every track file.
    ///
    /// The chromosome order comes from `order_file` when given, otherwise
    /// from `order_names`. Any failure drops the files opened so far.
    pub fn open(
        anchor: &Path,
        order_file: Option<&Path>,
        order_names: &[String],
        tracks: &[PathBuf],
        policy: RetentionPolicy,
    ) -> Result<Self> {
        let order = match order_file {
            Some(path) => ChromosomeOrder::from_file(path)?,
            None => ChromosomeOrder::from_names(order_names.iter().cloned()),
        };
        if order.is_empty() {
            return Err(BedError::MissingConfiguration(
                "chromosome order is empty".to_string(),
            ));
        }
        if tracks.is_empty() {
            return Err(BedError::MissingConfiguration(
                "no track files specified".to_string(),
            ));
        }

        debug!("Opening loci file {}", anchor.display());
        let anchor = TrackCursor::open(anchor)?;

        let mut cursors = Vec::with_capacity(tracks.len());
        for path in tracks {
            debug!("Opening track {}", path.display());
            cursors.push(TrackCursor::open(path)?);
        }

        Self::from_cursors(order, policy, anchor, cursors)
    }
}

impl<R: BufRead> Coordinator<R> {
    /// Build a session from already-open sources.
    pub fn from_readers(
        order: ChromosomeOrder,
        policy: RetentionPolicy,
        anchor: R,
        tracks: Vec<R>,
    ) -> Result<Self> {
        let anchor = TrackCursor::new(anchor, "loci")?;
        let cursors = tracks
            .into_iter()
            .enumerate()
            .map(|(i, reader)| TrackCursor::new(reader, format!("track {}", i + 1)))
            .collect::<Result<Vec<_>>>()?;
        Self::from_cursors(order, policy, anchor, cursors)
    }

    /// Build a session from cursors; every track cursor is primed onto its
    /// first record.
    pub fn from_cursors(
        order: ChromosomeOrder,
        policy: RetentionPolicy,
        anchor: TrackCursor<R>,
        mut tracks: Vec<TrackCursor<R>>,
    ) -> Result<Self> {
        if order.is_empty() {
            return Err(BedError::MissingConfiguration(
                "chromosome order is empty".to_string(),
            ));
        }
        if tracks.is_empty() {
            return Err(BedError::MissingConfiguration(
                "no track files specified".to_string(),
            ));
        }
        for track in &mut tracks {
            track.advance()?;
        }

        info!(
            "Coordinator ready: {} chromosomes, {} tracks, loci from {}",
            order.len(),
            tracks.len(),
            anchor.label()
        );

        let n = tracks.len();
        Ok(Self {
            order,
            policy,
            anchor: Some(AnchorStream::new(anchor)),
            tracks,
            buffers: vec![TrackBuffers::default(); n],
            finals: vec![FinalBuffers::default(); n],
            locus: None,
            last_processed_chr: None,
            loci_read: 0,
            eof: false,
        })
    }

    /// Read the next locus and advance every track past it.
    ///
    /// Returns `Ok(false)` without doing anything once the session is at
    /// end-of-stream. A malformed locus, an unregistered chromosome or a
    /// track read failure returns the error and ends the session; buffers
    /// filled so far are left as they are.
    pub fn read(&mut self) -> Result<bool> {
        if self.eof {
            return Ok(false);
        }
        let Some(anchor) = self.anchor.as_mut() else {
            self.eof = true;
            return Ok(false);
        };

        let locus = match anchor.next_locus(&self.order) {
            Ok(Some(locus)) => locus,
            Ok(None) => {
                debug!("Loci exhausted after {} loci", self.loci_read);
                self.eof = true;
                return Ok(false);
            }
            Err(e) => {
                error!("{}; closing the coordinator to avoid repeating it", e);
                self.eof = true;
                return Err(e);
            }
        };

        let same_chrom = self.last_processed_chr.as_deref() == Some(locus.chrom.as_str());
        let carry = (same_chrom && self.policy.retain_partial).then_some((locus.start, locus.end));
        for buf in &mut self.buffers {
            buf.reset(carry);
        }

        let previous = self.last_processed_chr.take();
        self.locus = Some(locus.clone());
        for (track, buf) in self.tracks.iter_mut().zip(self.buffers.iter_mut()) {
            let scanned = classify_track(
                track,
                buf,
                &self.order,
                &self.policy,
                &locus,
                previous.as_deref(),
            );
            if let Err(e) = scanned {
                error!("{}: {}", track.label(), e);
                self.last_processed_chr = previous;
                self.eof = true;
                return Err(e);
            }
        }

        self.last_processed_chr = Some(locus.chrom);
        self.loci_read += 1;
        Ok(true)
    }

    /// Drain every track once the loci are exhausted.
    ///
    /// Records on chromosomes ranked below the last processed one are
    /// skipped, the rest of the last processed chromosome goes to
    /// `final_remainder`, and everything after it is grouped by chromosome
    /// into `final_untouched`. `retain_remaining_chrs` is not consulted.
    pub fn read_final(&mut self) -> Result<()> {
        if !self.eof {
            warn!("Final flush requested before the loci file was exhausted");
        }
        self.eof = true;
        self.finals = vec![FinalBuffers::default(); self.buffers.len()];

        let last = match self.last_processed_chr.as_deref() {
            Some(chrom) => Some((chrom, self.order.rank(chrom)?)),
            None => None,
        };

        for (track, fin) in self.tracks.iter_mut().zip(self.finals.iter_mut()) {
            if let Err(e) = drain_track(track, fin, &self.order, last) {
                error!("{}: {}", track.label(), e);
                return Err(e);
            }
            debug!(
                "{}: {} remainder and {} untouched records after last locus",
                track.label(),
                fin.remainder.len(),
                fin.untouched.record_count()
            );
        }
        Ok(())
    }

    /// Release every file. Buffers stay readable. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.anchor.is_some() || !self.tracks.is_empty() {
            debug!("Closing coordinator after {} loci", self.loci_read);
        }
        self.anchor = None;
        self.tracks.clear();
        self.eof = true;
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    pub fn is_open(&self) -> bool {
        self.anchor.is_some()
    }

    /// Number of loci processed so far.
    pub fn loci_read(&self) -> usize {
        self.loci_read
    }

    pub fn track_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    pub fn order(&self) -> &ChromosomeOrder {
        &self.order
    }

    /// Chromosome of the most recently processed locus.
    pub fn last_processed_chr(&self) -> Option<&str> {
        self.last_processed_chr.as_deref()
    }

    /// Copy of the active locus, including its extra columns.
    pub fn current_locus(&self) -> Option<Locus> {
        self.locus.clone()
    }

    pub fn current_chrom(&self) -> Option<&str> {
        self.locus.as_ref().map(|l| l.chrom.as_str())
    }

    pub fn current_start(&self) -> Option<i64> {
        self.locus.as_ref().map(|l| l.start)
    }

    pub fn current_end(&self) -> Option<i64> {
        self.locus.as_ref().map(|l| l.end)
    }

    /// Size of the active locus (`end - start + 1`).
    pub fn current_size(&self) -> Option<i64> {
        self.locus.as_ref().map(Interval::size)
    }

    /// Copy of every step buffer of one track.
    pub fn snapshot(&self, track: usize) -> Option<TrackBuffers> {
        self.buffers.get(track).cloned()
    }

    pub fn prior(&self, track: usize) -> Option<Vec<Interval>> {
        self.buffers.get(track).map(|b| b.prior.clone())
    }

    pub fn current_before(&self, track: usize) -> Option<Vec<Interval>> {
        self.buffers.get(track).map(|b| b.current_before.clone())
    }

    pub fn current(&self, track: usize) -> Option<Vec<Interval>> {
        self.buffers.get(track).map(|b| b.current.clone())
    }

    pub fn current_after(&self, track: usize) -> Option<Vec<Interval>> {
        self.buffers.get(track).map(|b| b.current_after.clone())
    }

    pub fn remainder(&self, track: usize) -> Option<Vec<Interval>> {
        self.buffers.get(track).map(|b| b.remainder.clone())
    }

    pub fn prev_chrs(&self, track: usize) -> Option<ChromGroups> {
        self.buffers.get(track).map(|b| b.prev_chrs.clone())
    }

    /// `current_before ++ current ++ current_after` for one track.
    pub fn overlapping(&self, track: usize) -> Option<Vec<Interval>> {
        self.buffers.get(track).map(TrackBuffers::overlapping)
    }

    pub fn final_remainder(&self, track: usize) -> Option<Vec<Interval>> {
        self.finals.get(track).map(|f| f.remainder.clone())
    }

    pub fn final_untouched(&self, track: usize) -> Option<ChromGroups> {
        self.finals.get(track).map(|f| f.untouched.clone())
    }
}

/// Advance one track past `locus`, filing what it visits into `buf`.
///
/// `previous` is the chromosome of the previous locus; when it differs from
/// the locus chromosome the track is first moved off the old chromosome and
/// over any chromosomes ranked before the new one.
fn classify_track<R: BufRead>(
    f: &mut TrackCursor<R>,
    buf: &mut TrackBuffers,
    order: &ChromosomeOrder,
    policy: &RetentionPolicy,
    locus: &Locus,
    previous: Option<&str>,
) -> Result<()> {
    let chrom = locus.chrom.as_str();
    let (start, end) = (locus.start, locus.end);

    if previous != Some(chrom) {
        if let Some(prev) = previous {
            while f.is_on(prev) {
                if policy.retain_remainder {
                    buf.push(Category::Remainder, f.current().clone());
                }
                f.advance()?;
            }
        }
        let target = order.rank(chrom)?;
        while !f.is_eof() && order.rank(&f.current().chrom)? < target {
            if policy.retain_skipped_chrs {
                buf.push(Category::SkippedChrs, f.current().clone());
            }
            f.advance()?;
        }
    }

    // Ends before the locus
    while f.is_on(chrom) && f.current().end < start {
        if policy.retain_prior {
            buf.push(Category::Prior, f.current().clone());
        }
        f.advance()?;
    }

    // Starts before the locus
    while f.is_on(chrom) && f.current().start < start {
        if f.current().end < start {
            if policy.retain_prior {
                buf.push(Category::Prior, f.current().clone());
            }
        } else if policy.retain_partial {
            buf.push(Category::CurrentBefore, f.current().clone());
        }
        f.advance()?;
    }

    // Ends inside the locus
    while f.is_on(chrom) && f.current().end <= end {
        if f.current().start >= start {
            buf.push(Category::Current, f.current().clone());
        } else if policy.retain_partial {
            buf.push(Category::CurrentBefore, f.current().clone());
        }
        f.advance()?;
    }

    // Starts inside the locus, ends past it
    while f.is_on(chrom) && f.current().start < end {
        if policy.retain_partial {
            buf.push(Category::CurrentAfter, f.current().clone());
        }
        f.advance()?;
    }

    Ok(())
}

/// Move one track to end-of-stream for the final flush.
fn drain_track<R: BufRead>(
    f: &mut TrackCursor<R>,
    fin: &mut FinalBuffers,
    order: &ChromosomeOrder,
    last: Option<(&str, usize)>,
) -> Result<()> {
    if let Some((chrom, rank)) = last {
        while !f.is_eof() && order.rank(&f.current().chrom)? < rank {
            f.advance()?;
        }
        while f.is_on(chrom) {
            fin.remainder.push(f.current().clone());
            f.advance()?;
        }
    }
    while !f.is_eof() {
        fin.untouched.push(f.current().clone());
        f.advance()?;
    }
    Ok(())
}
