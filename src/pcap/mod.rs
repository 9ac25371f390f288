//! Contains the Pcap header, packet, reader and writer

mod header;
mod packet;
mod reader;
mod writer;

pub use header::*;
pub use packet::*;
pub use reader::*;
pub use writer::*;

/// Length of the global pcap header, in bytes.
pub const GLOBAL_HEADER_LEN: usize = 24;

/// Length of a per-record header, in bytes.
pub const RECORD_HEADER_LEN: usize = 16;

/// The tcpdump group has changed max snapshot length from 65535 to 262144 and used it as default.
/// see [code](https://github.com/the-tcpdump-group/tcpdump/blob/87c90012f079200b7d49979164e8e9ed89d93d9d/netdissect.h#L342C9-L342C25)
/// default snapshot length 262144 = 2^18
pub const MAXIMUM_SNAPLEN: u32 = 262144;
