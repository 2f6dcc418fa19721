//! Multitrack BED: stream sorted interval tracks against an anchor file.
//!
//! One small, sorted file of loci (the anchor) drives any number of large,
//! sorted interval files (tracks). For every locus, each track is advanced
//! just far enough to pass it, and every record it visits is filed into a
//! category: before the locus, overlapping it, inside it, on a chromosome
//! no locus touched, and so on. Memory stays bounded by what one locus
//! overlaps, whatever the track sizes.
//!
//! # Example
//!
//! ```rust,no_run
//! use multitrack_bed::{CoordinatorConfig, RetentionPolicy};
//!
//! let mut coordinator = CoordinatorConfig::new()
//!     .with_anchor("genes.bed")
//!     .with_chrom_order_file("hg38.chrom.sizes")
//!     .add_track("ctrl.bed")
//!     .add_track("drug.bed")
//!     .with_policy(RetentionPolicy::new().with_retain_prior(true))
//!     .open()
//!     .unwrap();
//!
//! while coordinator.read().unwrap() {
//!     let ctrl = coordinator.overlapping(0).unwrap();
//!     let drug = coordinator.overlapping(1).unwrap();
//!     println!("{}\t{}\t{}", coordinator.current_locus().unwrap(), ctrl.len(), drug.len());
//! }
//! coordinator.read_final().unwrap();
//! coordinator.close();
//! ```

pub mod bed;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod genome;
pub mod interval;
pub mod streaming;

// Re-export commonly used types
pub use bed::{read_intervals, BedError};
pub use config::{CoordinatorConfig, RetentionPolicy};
pub use coordinator::{Category, ChromGroups, Coordinator, TrackBuffers};
pub use genome::ChromosomeOrder;
pub use interval::{Interval, Locus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bed::{read_intervals, BedError};
    pub use crate::commands::ScanCommand;
    pub use crate::config::{CoordinatorConfig, RetentionPolicy};
    pub use crate::coordinator::{Category, ChromGroups, Coordinator, TrackBuffers};
    pub use crate::genome::ChromosomeOrder;
    pub use crate::interval::{Interval, Locus};
}
