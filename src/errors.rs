//! Error taxonomy of the crate.
//!
//! Format, configuration and usage errors are distinct types so a caller can
//! tell a malformed capture from a bad parameter or a contract violation.
//! [`SplitError`] is the umbrella type returned by the reader, the writer and
//! the splitter.

use std::time::Duration;

use thiserror::Error;

/// Result of a split run.
pub type SplitResult<T> = Result<T, SplitError>;

/* ----- enum SplitError ----- */

/// Errors that can occur while reading, writing or splitting a pcap capture.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The input is not a well formed pcap capture.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The split configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A component was driven outside of its contract.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// The run was cancelled at a record boundary.
    ///
    /// Chunks emitted before the cancellation remain valid; the chunk open at
    /// the time of cancellation is discarded.
    #[error("split cancelled after {packets} packets, at input offset {offset}")]
    Cancelled {
        /// Number of records fully processed before the cancellation.
        packets: u64,
        /// Input offset at which the cancellation was observed.
        offset: u64,
    },

    /// An I/O error occurred on the input or on an output.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/* ----- enum FormatError ----- */

/// The input byte stream is not a valid pcap capture.
///
/// Every variant carries the offset into the input at which the fault was
/// detected. Format errors are never retried and abort the current run.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The magic number is not one of the four known pcap magic values.
    #[error("invalid magic number {magic:#010X} at offset {offset}")]
    BadMagic {
        /// The magic number found, read as big-endian.
        magic: u32,
        /// Offset of the magic number in the input.
        offset: u64,
    },

    /// The input ended in the middle of a header or of a packet record.
    #[error("truncated capture at offset {offset}: {needed} more bytes needed")]
    Truncated {
        /// Offset of the start of the incomplete element.
        offset: u64,
        /// Number of missing bytes.
        needed: usize,
    },

    /// A record declares a captured length above the safety ceiling.
    ///
    /// Guards against unbounded allocation from a corrupt length field.
    #[error("captured length {incl_len} exceeds the ceiling {ceiling} at offset {offset}")]
    OversizedPacket {
        /// Captured length declared by the record header.
        incl_len: u32,
        /// Configured safety ceiling.
        ceiling: u32,
        /// Offset of the start of the record.
        offset: u64,
    },

    /// A record header field contradicts the global header or another field.
    #[error("inconsistent record header at offset {offset}: {field} is {value}, limit {limit}")]
    InconsistentHeader {
        /// Offset of the start of the record.
        offset: u64,
        /// Name of the offending field.
        field: &'static str,
        /// Value found in the record header.
        value: u32,
        /// Bound the value violated.
        limit: u32,
    },
}

impl FormatError {
    /// Offset into the input at which the fault was detected.
    pub fn offset(&self) -> u64 {
        match *self {
            FormatError::BadMagic { offset, .. } => offset,
            FormatError::Truncated { offset, .. } => offset,
            FormatError::OversizedPacket { offset, .. } => offset,
            FormatError::InconsistentHeader { offset, .. } => offset,
        }
    }
}

/* ----- enum ConfigError ----- */

/// The split configuration is invalid. Rejected before any reading begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A count split needs at least one packet per chunk.
    #[error("packet count per chunk must be >= 1")]
    ZeroPacketCount,

    /// A size split needs a strictly positive byte budget.
    #[error("chunk size budget must be > 0 bytes")]
    ZeroChunkSize,

    /// A time split needs a strictly positive window width.
    #[error("time window width must be > 0, got {0:?}")]
    ZeroTimeWindow(Duration),

    /// The split unit name is not one of count, size or time.
    #[error("unknown split unit: {0:?}")]
    UnknownSplitUnit(String),

    /// The threshold value could not be parsed for the given unit.
    #[error("invalid {unit} threshold: {value:?}")]
    InvalidThreshold {
        /// Unit the threshold was parsed for.
        unit: &'static str,
        /// The rejected input value.
        value: String,
    },
}

/* ----- enum UsageError ----- */

/// A component was driven outside of its contract. Fatal, never ignored.
#[derive(Debug, Error)]
pub enum UsageError {
    /// `write_packet` was called on a finished writer.
    #[error("writer used after finish")]
    WriterClosed,

    /// The split policy assigned a chunk index lower than the current one.
    #[error("chunk index regressed from {current} to {next}")]
    ChunkIndexRegressed {
        /// Index of the chunk currently open.
        current: u64,
        /// The lower index the policy returned.
        next: u64,
    },

    /// A packet's payload length does not match its header's captured length.
    #[error("payload length mismatch: header says {expected}, payload is {actual} bytes")]
    PayloadLengthMismatch {
        /// Captured length declared by the record header.
        expected: u32,
        /// Actual payload byte count.
        actual: usize,
    },

    /// A packet is longer than the snapshot length of the output capture.
    #[error("packet length {incl_len} exceeds the output snaplen {snaplen}")]
    PacketExceedsSnaplen {
        /// Captured length of the rejected packet.
        incl_len: u32,
        /// Snapshot length of the output file.
        snaplen: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_exposes_offset() {
        let err = FormatError::Truncated { offset: 40, needed: 7 };
        assert_eq!(err.offset(), 40);

        let err = FormatError::BadMagic { magic: 0xDEADBEEF, offset: 0 };
        assert_eq!(err.offset(), 0);
    }
}
