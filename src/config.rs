//! Session configuration: which files to read and what to keep.
//!
//! A [`CoordinatorConfig`] collects the anchor path, chromosome order and
//! track paths, then opens a [`Coordinator`] in one all-or-nothing step.
//! The [`RetentionPolicy`] decides which classification categories are
//! materialized into buffers and which are skipped over.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::bed::{BedError, Result};
use crate::coordinator::{count_loci, Coordinator};

/// Five independent switches controlling which categories are buffered.
///
/// A disabled category is still scanned past; its records are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Keep records that only partially overlap the current locus.
    pub retain_partial: bool,
    /// Keep records on the current chromosome that end before the locus.
    pub retain_prior: bool,
    /// Keep records on chromosomes skipped between two loci.
    pub retain_skipped_chrs: bool,
    /// Keep records left on the previous chromosome after its last locus.
    pub retain_remainder: bool,
    /// Intended for chromosomes left after the last locus. The final flush
    /// currently captures those unconditionally.
    pub retain_remaining_chrs: bool,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RetentionPolicy {
    /// Default policy: partial overlaps kept, everything else discarded.
    pub fn new() -> Self {
        Self {
            retain_partial: true,
            retain_prior: false,
            retain_skipped_chrs: false,
            retain_remainder: false,
            retain_remaining_chrs: false,
        }
    }

    /// Keep every category.
    pub fn all() -> Self {
        Self {
            retain_partial: true,
            retain_prior: true,
            retain_skipped_chrs: true,
            retain_remainder: true,
            retain_remaining_chrs: true,
        }
    }

    pub fn with_retain_partial(mut self, retain: bool) -> Self {
        self.retain_partial = retain;
        self
    }

    pub fn with_retain_prior(mut self, retain: bool) -> Self {
        self.retain_prior = retain;
        self
    }

    pub fn with_retain_skipped_chrs(mut self, retain: bool) -> Self {
        self.retain_skipped_chrs = retain;
        self
    }

    pub fn with_retain_remainder(mut self, retain: bool) -> Self {
        self.retain_remainder = retain;
        self
    }

    pub fn with_retain_remaining_chrs(mut self, retain: bool) -> Self {
        self.retain_remaining_chrs = retain;
        self
    }
}

/// Everything needed to open a coordinator session.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfig {
    anchor: Option<PathBuf>,
    chrom_order: Vec<String>,
    chrom_order_file: Option<PathBuf>,
    tracks: Vec<PathBuf>,
    policy: RetentionPolicy,
}

impl CoordinatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the loci (anchor) file.
    pub fn with_anchor<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.anchor = Some(path.into());
        self
    }

    /// Declare the chromosome order explicitly.
    pub fn with_chrom_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chrom_order = names.into_iter().map(Into::into).collect();
        self
    }

    /// Read the chromosome order from a sizes-like file. Takes precedence
    /// over an explicit list.
    pub fn with_chrom_order_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.chrom_order_file = Some(path.into());
        self
    }

    /// Add a track file. Track indexes follow the order of addition.
    pub fn add_track<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.tracks.push(path.into());
        self
    }

    pub fn with_tracks<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.tracks.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_policy(mut self, policy: RetentionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn anchor(&self) -> Option<&Path> {
        self.anchor.as_deref()
    }

    pub fn tracks(&self) -> &[PathBuf] {
        &self.tracks
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Check that an anchor, a chromosome order and at least one track are
    /// configured. Touches no files.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.anchor.is_none() {
            missing.push("no loci file specified");
        }
        if self.chrom_order_file.is_none() && self.chrom_order.is_empty() {
            missing.push("no chromosome order or chromosome order file specified");
        }
        if self.tracks.is_empty() {
            missing.push("no track files specified");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(BedError::MissingConfiguration(missing.join("; ")))
        }
    }

    /// Open every file and return a ready session.
    ///
    /// Either all files open or none stay open.
    pub fn open(&self) -> Result<Coordinator<BufReader<File>>> {
        self.validate()?;
        let anchor = self.anchor.as_deref().ok_or_else(|| {
            BedError::MissingConfiguration("no loci file specified".to_string())
        })?;
        Coordinator::open(
            anchor,
            self.chrom_order_file.as_deref(),
            &self.chrom_order,
            &self.tracks,
            self.policy,
        )
    }
}

impl fmt::Display for CoordinatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Multitrack BED Coordinator>")?;
        let order = if self.chrom_order.is_empty() {
            "NO"
        } else {
            "YES"
        };
        writeln!(f, "\tCHR ORDER:      {}", order)?;
        match &self.chrom_order_file {
            Some(p) => writeln!(f, "\tCHR ORDER FILE: {}", p.display())?,
            None => writeln!(f, "\tCHR ORDER FILE: -")?,
        }
        match &self.anchor {
            Some(p) => {
                writeln!(f, "\tLOCI FILE:      {}", p.display())?;
                match count_loci(p) {
                    Ok(n) => writeln!(f, "\t                {} loci", n)?,
                    Err(_) => writeln!(f, "\t                (unreadable)")?,
                }
            }
            None => writeln!(f, "\tLOCI FILE:      -")?,
        }
        if self.tracks.is_empty() {
            write!(f, "\tDATA FILE(s):   -")
        } else {
            let paths: Vec<String> = self
                .tracks
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            write!(f, "\tDATA FILE(s):   {}", paths.join("\n\t                "))
        }
    }
}
