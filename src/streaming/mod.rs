//! Streaming building blocks shared by the coordinator.
//!
//! - Line parsing of tab-delimited interval records
//! - A forward-only cursor over one sorted file
//! - Buffered report output
//!
//! Nothing here loads a whole file; memory is bounded by one line of
//! lookahead per open file.

pub mod buffers;
pub mod cursor;
pub mod output;
pub mod parsing;

pub use cursor::TrackCursor;
pub use output::BedWriter;
pub use parsing::{parse_coordinate, parse_record, split_tabs, trim_line_end};
