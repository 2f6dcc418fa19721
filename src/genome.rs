//! Chromosome order registry.
//!
//! Every cross-file ordering decision goes through the rank of a chromosome
//! in a caller-declared order. The order can be given as a list of names or
//! read from the first column of a chromosome sizes (.genome) file.

use rustc_hash::FxHashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::bed::{open_file, BedError, Result};

/// Ordered list of chromosome names with a name -> rank lookup.
#[derive(Debug, Clone, Default)]
pub struct ChromosomeOrder {
    /// Chromosome order (preserves input order, first occurrence wins)
    order: Vec<String>,
    /// Map of chromosome name to its position in `order`
    ranks: FxHashMap<String, usize>,
}

impl ChromosomeOrder {
    /// Create an empty order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an order from names, keeping the first occurrence of duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order = Self::new();
        for name in names {
            order.push(name.into());
        }
        order
    }

    /// Load the order from a file whose first tab-delimited column is the
    /// chromosome name. Later columns, empty lines and `#` comments are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(open_file(path)?);
        let mut order = Self::new();

        for line_result in reader.lines() {
            let line = line_result?;
            let line = line.trim_end_matches(['\r', '\n']);

            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let chrom = line.split('\t').next().unwrap_or(line);
            order.push(chrom.to_string());
        }

        if order.is_empty() {
            return Err(BedError::EmptyFile(path.display().to_string()));
        }
        Ok(order)
    }

    /// Append a chromosome (ignored if already present).
    pub fn push(&mut self, chrom: String) {
        if !self.ranks.contains_key(&chrom) {
            self.ranks.insert(chrom.clone(), self.order.len());
            self.order.push(chrom);
        }
    }

    /// Rank of a chromosome in the declared order.
    #[inline]
    pub fn rank(&self, chrom: &str) -> Result<usize> {
        self.ranks
            .get(chrom)
            .copied()
            .ok_or_else(|| BedError::UnknownChromosome(chrom.to_string()))
    }

    /// Check if a chromosome exists.
    #[inline]
    pub fn contains(&self, chrom: &str) -> bool {
        self.ranks.contains_key(chrom)
    }

    /// Get all chromosome names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Copy of the chromosome list.
    pub fn to_vec(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
