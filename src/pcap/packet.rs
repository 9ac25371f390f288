use std::borrow::Cow;
use std::io::Write;
use std::time::Duration;

use byteorder::{ByteOrder, WriteBytesExt};
use derive_into_owned::IntoOwned;

use crate::errors::*;
use crate::pcap::RECORD_HEADER_LEN;
use crate::TsResolution;

/// Pcap packet record header, stored raw.
///
/// The timestamp fraction keeps the unit of the capture it was read from
/// (micro- or nanoseconds, per the magic number), so writing a record back
/// reproduces the input bytes exactly.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub struct PacketHeader {
    /// Timestamp in seconds since EPOCH
    pub ts_sec: u32,
    /// Fractional part of the timestamp, in the capture's own resolution
    pub ts_frac: u32,
    /// Number of octets of the packet saved in the file
    pub incl_len: u32,
    /// Original length of the packet on the wire
    pub orig_len: u32,
}

impl PacketHeader {
    /// Reads a `PacketHeader` from the first 16 bytes of the slice.
    ///
    /// The slice must hold at least [`RECORD_HEADER_LEN`] bytes.
    pub(crate) fn from_slice<B: ByteOrder>(slice: &[u8]) -> PacketHeader {
        PacketHeader {
            ts_sec: B::read_u32(&slice[0..4]),
            ts_frac: B::read_u32(&slice[4..8]),
            incl_len: B::read_u32(&slice[8..12]),
            orig_len: B::read_u32(&slice[12..16]),
        }
    }

    /// Checks the header against the global header and the safety ceiling.
    ///
    /// `offset` is the absolute input offset of the record start, reported in
    /// the error.
    pub(crate) fn validate(&self, snaplen: u32, ceiling: u32, offset: u64) -> Result<(), FormatError> {
        if self.incl_len > ceiling {
            return Err(FormatError::OversizedPacket { incl_len: self.incl_len, ceiling, offset });
        }

        if self.incl_len > snaplen {
            return Err(FormatError::InconsistentHeader {
                offset,
                field: "incl_len > snaplen",
                value: self.incl_len,
                limit: snaplen,
            });
        }

        // orig_len may legally exceed the snaplen, a capture truncates long
        // packets; incl_len must not exceed what was on the wire though.
        if self.incl_len > self.orig_len {
            return Err(FormatError::InconsistentHeader {
                offset,
                field: "incl_len > orig_len",
                value: self.incl_len,
                limit: self.orig_len,
            });
        }

        Ok(())
    }

    /// Writes the header to a writer, 16 bytes in the byte order `B`.
    pub(crate) fn write_to<W: Write, B: ByteOrder>(&self, writer: &mut W) -> Result<(), SplitError> {
        writer.write_u32::<B>(self.ts_sec)?;
        writer.write_u32::<B>(self.ts_frac)?;
        writer.write_u32::<B>(self.incl_len)?;
        writer.write_u32::<B>(self.orig_len)?;

        Ok(())
    }

    /// Timestamp of the record as a `Duration` since EPOCH.
    pub fn timestamp(&self, ts_resolution: TsResolution) -> Duration {
        let frac = match ts_resolution {
            TsResolution::MicroSecond => Duration::from_micros(self.ts_frac as u64),
            TsResolution::NanoSecond => Duration::from_nanos(self.ts_frac as u64),
        };

        Duration::from_secs(self.ts_sec as u64) + frac
    }

    /// On-disk length of the whole record, header included.
    pub fn record_len(&self) -> u64 {
        RECORD_HEADER_LEN as u64 + self.incl_len as u64
    }
}

/// Pcap packet with its header and payload.
///
/// The payload can be owned or borrowed.
#[derive(Clone, Debug, IntoOwned, Eq, PartialEq)]
pub struct PcapPacket<'a> {
    /// Raw record header
    pub header: PacketHeader,
    /// Payload, owned or borrowed, of the packet
    pub data: Cow<'a, [u8]>,
}

impl<'a> PcapPacket<'a> {
    /// Creates a new borrowed `PcapPacket` with the given parameters.
    pub fn new(header: PacketHeader, data: &'a [u8]) -> PcapPacket<'a> {
        PcapPacket { header, data: Cow::Borrowed(data) }
    }

    /// Creates a new owned `PcapPacket` with the given parameters.
    pub fn new_owned(header: PacketHeader, data: Vec<u8>) -> PcapPacket<'static> {
        PcapPacket { header, data: Cow::Owned(data) }
    }

    /// Timestamp of the packet as a `Duration` since EPOCH.
    pub fn timestamp(&self, ts_resolution: TsResolution) -> Duration {
        self.header.timestamp(ts_resolution)
    }
}

#[cfg(test)]
mod tests {
    use byteorder::LittleEndian;

    use super::*;

    #[test]
    fn parses_little_endian_fields() {
        let mut bytes = Vec::new();
        for value in [0x4F633248_u32, 125_000, 4, 90] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        let header = PacketHeader::from_slice::<LittleEndian>(&bytes);
        assert_eq!(header.ts_sec, 0x4F633248);
        assert_eq!(header.ts_frac, 125_000);
        assert_eq!(header.incl_len, 4);
        assert_eq!(header.orig_len, 90);
        assert_eq!(header.record_len(), 20);
    }

    #[test]
    fn validate_checks_lengths() {
        let header = PacketHeader { ts_sec: 0, ts_frac: 0, incl_len: 100, orig_len: 100 };

        assert!(header.validate(65535, 65535, 0).is_ok());

        let err = header.validate(50, 65535, 24).unwrap_err();
        assert!(matches!(err, FormatError::InconsistentHeader { offset: 24, .. }));

        let err = header.validate(65535, 50, 24).unwrap_err();
        assert!(matches!(err, FormatError::OversizedPacket { incl_len: 100, ceiling: 50, offset: 24 }));

        let short_wire = PacketHeader { incl_len: 100, orig_len: 40, ..header };
        assert!(short_wire.validate(65535, 65535, 0).is_err());
    }

    #[test]
    fn timestamp_resolution_applies_to_fraction() {
        let header = PacketHeader { ts_sec: 10, ts_frac: 1_500, incl_len: 0, orig_len: 0 };

        assert_eq!(header.timestamp(TsResolution::MicroSecond), Duration::new(10, 1_500_000));
        assert_eq!(header.timestamp(TsResolution::NanoSecond), Duration::new(10, 1_500));
    }
}
