//! Scan command - run a whole coordinator pass and report what each locus saw.
//!
//! Count mode writes one line per locus: the locus columns followed by one
//! overlap count per track. Records mode writes one line per classified
//! record: locus chrom/start/end, 1-based track number, category, record.

use std::io::{BufRead, Write};

use crate::bed::BedError;
use crate::coordinator::{Category, Coordinator, TrackBuffers};
use crate::interval::{Interval, Locus};
use crate::streaming::output::BedWriter;

/// Per-track record tallies for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTally {
    pub prior: usize,
    pub current_before: usize,
    pub current: usize,
    pub current_after: usize,
    pub remainder: usize,
    pub skipped: usize,
    pub final_remainder: usize,
    pub final_untouched: usize,
}

impl TrackTally {
    fn add_step(&mut self, buf: &TrackBuffers) {
        self.prior += buf.prior.len();
        self.current_before += buf.current_before.len();
        self.current += buf.current.len();
        self.current_after += buf.current_after.len();
        self.remainder += buf.remainder.len();
        self.skipped += buf.prev_chrs.record_count();
    }
}

/// Statistics from a scan run.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Number of loci processed
    pub loci: usize,
    /// Tallies per track, by track index
    pub tracks: Vec<TrackTally>,
}

impl std::fmt::Display for ScanStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "loci={}", self.loci)?;
        for (i, t) in self.tracks.iter().enumerate() {
            write!(
                f,
                ", track{}=[prior={} before={} current={} after={} remainder={} skipped={} final_remainder={} final_untouched={}]",
                i + 1,
                t.prior,
                t.current_before,
                t.current,
                t.current_after,
                t.remainder,
                t.skipped,
                t.final_remainder,
                t.final_untouched
            )?;
        }
        Ok(())
    }
}

/// Scan command configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanCommand {
    /// Write every classified record instead of per-locus counts
    pub records: bool,
    /// Drain the tracks after the last locus and report the leftovers
    pub final_flush: bool,
}

impl ScanCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set records flag (builder pattern).
    pub fn with_records(mut self, records: bool) -> Self {
        self.records = records;
        self
    }

    /// Set final flush flag (builder pattern).
    pub fn with_final_flush(mut self, final_flush: bool) -> Self {
        self.final_flush = final_flush;
        self
    }

    /// Drive `coordinator` to the end of its loci and write the report.
    pub fn run<R: BufRead, W: Write>(
        &self,
        coordinator: &mut Coordinator<R>,
        output: &mut W,
    ) -> Result<ScanStats, BedError> {
        let n = coordinator.track_count();
        let mut stats = ScanStats {
            loci: 0,
            tracks: vec![TrackTally::default(); n],
        };
        let mut writer = BedWriter::new(output);

        while coordinator.read()? {
            stats.loci += 1;
            let Some(locus) = coordinator.current_locus() else {
                continue;
            };
            let snapshots: Vec<TrackBuffers> =
                (0..n).filter_map(|i| coordinator.snapshot(i)).collect();

            for (tally, buf) in stats.tracks.iter_mut().zip(&snapshots) {
                tally.add_step(buf);
            }

            if self.records {
                self.write_step_records(&mut writer, &locus, &snapshots)?;
            } else {
                writer.write_interval(&locus)?;
                for buf in &snapshots {
                    writer.write_tab()?;
                    writer.write_int(
                        buf.current_before.len() + buf.current.len() + buf.current_after.len(),
                    )?;
                }
                writer.write_newline()?;
            }
        }

        if self.final_flush {
            coordinator.read_final()?;
            self.write_final(&mut writer, coordinator, &mut stats)?;
        }

        writer.flush()?;
        Ok(stats)
    }

    fn write_step_records<W: Write>(
        &self,
        writer: &mut BedWriter<W>,
        locus: &Locus,
        snapshots: &[TrackBuffers],
    ) -> Result<(), BedError> {
        for (i, buf) in snapshots.iter().enumerate() {
            for category in Category::STEP {
                for record in buf.records(category) {
                    write_record_line(writer, Some(locus), i, category, record)?;
                }
            }
        }
        Ok(())
    }

    fn write_final<R: BufRead, W: Write>(
        &self,
        writer: &mut BedWriter<W>,
        coordinator: &Coordinator<R>,
        stats: &mut ScanStats,
    ) -> Result<(), BedError> {
        let n = coordinator.track_count();
        let remainders: Vec<_> = (0..n)
            .map(|i| coordinator.final_remainder(i).unwrap_or_default())
            .collect();
        let untouched: Vec<_> = (0..n)
            .map(|i| coordinator.final_untouched(i).unwrap_or_default())
            .collect();

        for (i, tally) in stats.tracks.iter_mut().enumerate() {
            tally.final_remainder = remainders[i].len();
            tally.final_untouched = untouched[i].record_count();
        }

        if self.records {
            for i in 0..n {
                for record in &remainders[i] {
                    write_record_line(writer, None, i, Category::FinalRemainder, record)?;
                }
                for record in untouched[i].records() {
                    write_record_line(writer, None, i, Category::FinalUntouched, record)?;
                }
            }
        } else {
            writer.write_str("#")?;
            writer.write_str(Category::FinalRemainder.name())?;
            for r in &remainders {
                writer.write_tab()?;
                writer.write_int(r.len())?;
            }
            writer.write_newline()?;
            writer.write_str("#")?;
            writer.write_str(Category::FinalUntouched.name())?;
            for u in &untouched {
                writer.write_tab()?;
                writer.write_int(u.record_count())?;
            }
            writer.write_newline()?;
        }
        Ok(())
    }
}

fn write_record_line<W: Write>(
    writer: &mut BedWriter<W>,
    locus: Option<&Locus>,
    track: usize,
    category: Category,
    record: &Interval,
) -> Result<(), BedError> {
    match locus {
        Some(l) => {
            writer.write_str(&l.chrom)?;
            writer.write_tab()?;
            writer.write_int(l.start)?;
            writer.write_tab()?;
            writer.write_int(l.end)?;
        }
        None => writer.write_str(".\t.\t.")?,
    }
    writer.write_tab()?;
    writer.write_int(track + 1)?;
    writer.write_tab()?;
    writer.write_str(category.name())?;
    writer.write_tab()?;
    writer.write_interval_line(record)
}
