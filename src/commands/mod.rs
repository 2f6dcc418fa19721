//! Command implementations for the `mtbed` binary.

pub mod scan;

pub use crate::coordinator::count_loci;
pub use scan::{ScanCommand, ScanStats, TrackTally};
