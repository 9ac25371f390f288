//! Splits classic Pcap captures into multiple smaller, independently valid
//! capture files.
//!
//! Provides `PcapReader` and `PcapWriter` to read and write Pcap streams one
//! packet at a time, and a `Splitter` that cuts a capture into chunks by
//! packet count, cumulative size or time window. Every chunk carries a copy
//! of the source capture's global header, so any standard pcap tool can open
//! it on its own.
//!
//! Packets are opaque byte blobs with their record metadata: nothing above
//! the link layer is decoded, and only the classic Pcap structure is
//! supported (no PcapNg).
//!
//! # Examples
//!
//! ```no_run
//! use std::fs::File;
//!
//! use pcap_split::split::{DirSink, SplitMode, Splitter};
//!
//! let file_in = File::open("capture.pcap").expect("Error opening file");
//!
//! // One output file per 1000 packets.
//! let mut sink = DirSink::new("out", "capture");
//! let splitter = Splitter::new(SplitMode::PacketCount(1000)).unwrap();
//!
//! let summary = splitter.split(file_in, &mut sink).unwrap();
//! println!("emitted {} chunks", summary.chunks);
//! ```

pub mod errors;
pub mod pcap;
pub mod split;

mod common;
mod read_buffer;

pub use common::{DataLink, Endianness, TsResolution};
pub use errors::{ConfigError, FormatError, SplitError, SplitResult, UsageError};
