//! This module contains the `PcapHeader` struct which represents a global pcap header.

use std::io::Write;

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

use crate::errors::*;
use crate::pcap::GLOBAL_HEADER_LEN;
use crate::{DataLink, Endianness, TsResolution};

/// Pcap Global Header
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PcapHeader {
    /// Magic number
    pub magic_number: u32,

    /// Major version number
    pub version_major: u16,

    /// Minor version number
    pub version_minor: u16,

    /// GMT to local timezone correction, should always be 0
    pub ts_correction: i32,

    /// Timestamp accuracy, should always be 0
    pub ts_accuracy: u32,

    /// Max length of captured packet, typically 65535
    pub snaplen: u32,

    /// DataLink type (first layer in the packet)
    pub datalink: DataLink,
}

impl PcapHeader {
    /// Parses a `PcapHeader` from a slice of bytes.
    ///
    /// Returns the parsed header and the remainder of the slice.
    ///
    /// Fails with [`FormatError::Truncated`] if the slice is shorter than 24
    /// bytes and with [`FormatError::BadMagic`] if the magic number is not a
    /// known pcap magic value.
    pub fn from_slice(slice: &[u8]) -> Result<(PcapHeader, &[u8]), FormatError> {
        if slice.len() < GLOBAL_HEADER_LEN {
            return Err(FormatError::Truncated {
                offset: 0,
                needed: GLOBAL_HEADER_LEN - slice.len(),
            });
        }

        // The magic number is always read in big-endian, its value tells the
        // byte order of every other field.
        let magic_number = BigEndian::read_u32(&slice[0..4]);

        let header = match magic_number {
            0xA1B2C3D4 | 0xA1B23C4D => parse_fields::<BigEndian>(magic_number, slice),
            0xD4C3B2A1 | 0x4D3CB2A1 => parse_fields::<LittleEndian>(magic_number, slice),
            _ => return Err(FormatError::BadMagic { magic: magic_number, offset: 0 }),
        };

        return Ok((header, &slice[GLOBAL_HEADER_LEN..]));

        fn parse_fields<B: ByteOrder>(magic_number: u32, slice: &[u8]) -> PcapHeader {
            PcapHeader {
                magic_number,
                version_major: B::read_u16(&slice[4..6]),
                version_minor: B::read_u16(&slice[6..8]),
                ts_correction: B::read_i32(&slice[8..12]),
                ts_accuracy: B::read_u32(&slice[12..16]),
                snaplen: B::read_u32(&slice[16..20]),
                datalink: DataLink::from(B::read_u32(&slice[20..24])),
            }
        }
    }

    /// Writes the header to a writer, 24 bytes in the header's own byte order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), SplitError> {
        return match self.endianness() {
            Endianness::Big => write_fields::<_, BigEndian>(self, writer),
            Endianness::Little => write_fields::<_, LittleEndian>(self, writer),
        };

        fn write_fields<W: Write, B: ByteOrder>(header: &PcapHeader, writer: &mut W) -> Result<(), SplitError> {
            // The magic number is always read in big-endian so it's always written in big-endian too
            writer.write_u32::<BigEndian>(header.magic_number)?;
            writer.write_u16::<B>(header.version_major)?;
            writer.write_u16::<B>(header.version_minor)?;
            writer.write_i32::<B>(header.ts_correction)?;
            writer.write_u32::<B>(header.ts_accuracy)?;
            writer.write_u32::<B>(header.snaplen)?;
            writer.write_u32::<B>(header.datalink.into())?;

            Ok(())
        }
    }

    /// Returns the endianness of the pcap.
    ///
    /// # Panics
    ///
    /// Panics if the magic number is invalid.
    pub fn endianness(&self) -> Endianness {
        match self.magic_number {
            0xA1B2C3D4 | 0xA1B23C4D => Endianness::Big,
            0xD4C3B2A1 | 0x4D3CB2A1 => Endianness::Little,
            _ => unreachable!("Wrong magic number, can't get the header's endianness"),
        }
    }

    /// Returns the timestamp resolution of the pcap.
    ///
    /// # Panics
    ///
    /// Panics if the magic number is invalid.
    pub fn ts_resolution(&self) -> TsResolution {
        match self.magic_number {
            0xA1B2C3D4 | 0xD4C3B2A1 => TsResolution::MicroSecond,
            0xA1B23C4D | 0x4D3CB2A1 => TsResolution::NanoSecond,
            _ => unreachable!("Wrong magic number, can't get the header's timestamp resolution"),
        }
    }
}

/// Creates a new `PcapHeader` with the default parameters:
///
/// ```rust,ignore
/// PcapHeader {
///     magic_number: 0xA1B2C3D4,
///     version_major: 2,
///     version_minor: 4,
///     ts_correction: 0,
///     ts_accuracy: 0,
///     snaplen: 65535,
///     datalink: DataLink::ETHERNET,
/// };
/// ```
impl Default for PcapHeader {
    fn default() -> Self {
        PcapHeader {
            magic_number: 0xA1B2C3D4,
            version_major: 2,
            version_minor: 4,
            ts_correction: 0,
            ts_accuracy: 0,
            snaplen: 65535,
            datalink: DataLink::ETHERNET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_slice() {
        let err = PcapHeader::from_slice(&[0_u8; 10]).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { offset: 0, needed: 14 }));
    }

    #[test]
    fn rejects_unknown_magic() {
        let mut bytes = [0_u8; 24];
        bytes[..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        let err = PcapHeader::from_slice(&bytes).unwrap_err();
        assert!(matches!(err, FormatError::BadMagic { magic: 0xDEADBEEF, offset: 0 }));
    }

    #[test]
    fn header_roundtrip_keeps_bytes() {
        let header = PcapHeader {
            magic_number: 0x4D3CB2A1,
            version_major: 2,
            version_minor: 4,
            ts_correction: -3600,
            ts_accuracy: 0,
            snaplen: 0x1000,
            datalink: DataLink::LINUX_SLL,
        };

        let mut out = Vec::new();
        header.write_to(&mut out).unwrap();
        assert_eq!(out.len(), GLOBAL_HEADER_LEN);

        let (parsed, rem) = PcapHeader::from_slice(&out).unwrap();
        assert_eq!(parsed, header);
        assert!(rem.is_empty());
        assert_eq!(parsed.endianness(), Endianness::Little);
        assert_eq!(parsed.ts_resolution(), TsResolution::NanoSecond);
    }
}
