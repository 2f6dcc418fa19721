//! Per-track classification buffers.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::interval::Interval;

/// Where a visited track record was filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Same chromosome as the locus, ends before it starts.
    Prior,
    /// Starts upstream of the locus and reaches into it.
    CurrentBefore,
    /// Lies inside the locus (or was carried forward from the previous one).
    Current,
    /// Starts inside the locus and extends past its end.
    CurrentAfter,
    /// Left on the previous chromosome after its last locus.
    Remainder,
    /// On a chromosome that no locus touched, passed while moving forward.
    SkippedChrs,
    /// Tail of the last processed chromosome, collected by the final flush.
    FinalRemainder,
    /// Chromosomes after the last processed one, collected by the final flush.
    FinalUntouched,
}

impl Category {
    /// Categories filled by a single read step, in report order.
    pub const STEP: [Category; 6] = [
        Category::Remainder,
        Category::SkippedChrs,
        Category::Prior,
        Category::CurrentBefore,
        Category::Current,
        Category::CurrentAfter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Prior => "prior",
            Category::CurrentBefore => "current_before",
            Category::Current => "current",
            Category::CurrentAfter => "current_after",
            Category::Remainder => "remainder",
            Category::SkippedChrs => "prev_chrs",
            Category::FinalRemainder => "final_remainder",
            Category::FinalUntouched => "final_untouched",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Records grouped by chromosome, in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromGroups {
    groups: Vec<(String, Vec<Interval>)>,
    index: FxHashMap<String, usize>,
}

impl ChromGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a record under its own chromosome.
    pub fn push(&mut self, interval: Interval) {
        match self.index.get(&interval.chrom) {
            Some(&i) => self.groups[i].1.push(interval),
            None => {
                self.index.insert(interval.chrom.clone(), self.groups.len());
                self.groups.push((interval.chrom.clone(), vec![interval]));
            }
        }
    }

    pub fn get(&self, chrom: &str) -> Option<&[Interval]> {
        self.index.get(chrom).map(|&i| self.groups[i].1.as_slice())
    }

    /// Chromosome names in first-encounter order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Interval])> {
        self.groups.iter().map(|(c, v)| (c.as_str(), v.as_slice()))
    }

    /// Number of chromosomes.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of records across all chromosomes.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|(_, v)| v.len()).sum()
    }

    /// All records, chromosome by chromosome.
    pub fn records(&self) -> impl Iterator<Item = &Interval> {
        self.groups.iter().flat_map(|(_, v)| v.iter())
    }
}

/// Buffers filled for one track by one read step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackBuffers {
    pub prior: Vec<Interval>,
    pub current_before: Vec<Interval>,
    pub current: Vec<Interval>,
    pub current_after: Vec<Interval>,
    pub remainder: Vec<Interval>,
    pub prev_chrs: ChromGroups,
}

impl TrackBuffers {
    /// Empty every buffer, optionally seeding `current` with the previous
    /// step's overlap records that still reach the new locus
    /// (`end >= start || start >= end`).
    pub fn reset(&mut self, carry: Option<(i64, i64)>) {
        let mut carried = Vec::new();
        if let Some((start, end)) = carry {
            let previous = std::mem::take(&mut self.current_before)
                .into_iter()
                .chain(std::mem::take(&mut self.current))
                .chain(std::mem::take(&mut self.current_after));
            carried.extend(previous.filter(|iv| iv.end >= start || iv.start >= end));
        }
        *self = TrackBuffers {
            current: carried,
            ..TrackBuffers::default()
        };
    }

    /// File a record into a step category. Final categories are ignored.
    pub fn push(&mut self, category: Category, interval: Interval) {
        match category {
            Category::Prior => self.prior.push(interval),
            Category::CurrentBefore => self.current_before.push(interval),
            Category::Current => self.current.push(interval),
            Category::CurrentAfter => self.current_after.push(interval),
            Category::Remainder => self.remainder.push(interval),
            Category::SkippedChrs => self.prev_chrs.push(interval),
            Category::FinalRemainder | Category::FinalUntouched => {}
        }
    }

    /// Records of one step category, in filing order.
    pub fn records(&self, category: Category) -> Vec<&Interval> {
        match category {
            Category::Prior => self.prior.iter().collect(),
            Category::CurrentBefore => self.current_before.iter().collect(),
            Category::Current => self.current.iter().collect(),
            Category::CurrentAfter => self.current_after.iter().collect(),
            Category::Remainder => self.remainder.iter().collect(),
            Category::SkippedChrs => self.prev_chrs.records().collect(),
            Category::FinalRemainder | Category::FinalUntouched => Vec::new(),
        }
    }

    /// `current_before ++ current ++ current_after`.
    pub fn overlapping(&self) -> Vec<Interval> {
        self.current_before
            .iter()
            .chain(&self.current)
            .chain(&self.current_after)
            .cloned()
            .collect()
    }
}

/// Buffers filled for one track by the final flush.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalBuffers {
    pub remainder: Vec<Interval>,
    pub untouched: ChromGroups,
}
