//! Buffer size constants for streaming reads and report output.

/// Default input buffer size (256 KB) per open track.
/// Every track stays open for the whole scan, so this is kept moderate.
pub const DEFAULT_INPUT_BUFFER: usize = 256 * 1024;

/// Default output buffer size (2 MB) for reports.
pub const DEFAULT_OUTPUT_BUFFER: usize = 2 * 1024 * 1024;

/// Default line buffer capacity (1 KB).
/// Sufficient for most BED lines.
pub const DEFAULT_LINE_BUFFER: usize = 1024;
