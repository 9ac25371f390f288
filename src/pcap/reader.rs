use std::borrow::Cow;
use std::io::Read;

use byteorder::{BigEndian, LittleEndian};
use log::debug;

use crate::errors::*;
use crate::pcap::{PacketHeader, PcapHeader, PcapPacket, GLOBAL_HEADER_LEN, MAXIMUM_SNAPLEN, RECORD_HEADER_LEN};
use crate::read_buffer::ReadBuffer;
use crate::Endianness;

/// Reads a pcap from a reader, one packet at a time.
///
/// The pass is single and forward-only: packets are parsed lazily and the
/// stream cannot be rewound. The endianness and the timestamp resolution
/// derived from the magic number apply to every record header.
///
/// # Examples
///
/// ```rust,no_run
/// use std::fs::File;
///
/// use pcap_split::pcap::PcapReader;
///
/// let file_in = File::open("test.pcap").expect("Error opening file");
/// let mut pcap_reader = PcapReader::new(file_in).unwrap();
///
/// // Read test.pcap
/// while let Some(pkt) = pcap_reader.next_packet() {
///     //Check if there is no error
///     let pkt = pkt.unwrap();
///
///     //Do something
/// }
/// ```
#[derive(Debug)]
pub struct PcapReader<R: Read> {
    header: PcapHeader,
    ceiling: u32,
    buffer: ReadBuffer<R>,
}

impl<R: Read> PcapReader<R> {
    /// Creates a new `PcapReader` from an existing reader.
    ///
    /// Parses the global pcap header immediately to verify the integrity of
    /// the stream. The captured length of every subsequent record is bounded
    /// by [`MAXIMUM_SNAPLEN`]; use
    /// [`with_snaplen_ceiling`](Self::with_snaplen_ceiling) to change that
    /// bound.
    ///
    /// # Errors
    /// [`FormatError::BadMagic`] if the stream does not start with a known
    /// pcap magic number, [`FormatError::Truncated`] if it holds fewer than
    /// 24 bytes.
    pub fn new(reader: R) -> Result<PcapReader<R>, SplitError> {
        PcapReader::with_snaplen_ceiling(reader, MAXIMUM_SNAPLEN)
    }

    /// Creates a new `PcapReader` with a custom captured-length ceiling.
    ///
    /// The ceiling bounds the allocation a single corrupt length field can
    /// cause, it does not override the capture's own snaplen.
    pub fn with_snaplen_ceiling(reader: R, ceiling: u32) -> Result<PcapReader<R>, SplitError> {
        let mut buffer = ReadBuffer::new(reader);

        let available = buffer.fill_at_least(GLOBAL_HEADER_LEN)?;
        if available < GLOBAL_HEADER_LEN {
            return Err(FormatError::Truncated { offset: 0, needed: GLOBAL_HEADER_LEN - available }.into());
        }

        let (header, _) = PcapHeader::from_slice(buffer.data())?;
        buffer.consume(GLOBAL_HEADER_LEN);

        debug!(
            "pcap header: version {}.{}, {:?} endian, {:?}, snaplen {}",
            header.version_major,
            header.version_minor,
            header.endianness(),
            header.datalink,
            header.snaplen
        );

        Ok(PcapReader { header, ceiling, buffer })
    }

    /// Returns the next packet record, or `None` at end of input.
    ///
    /// The payload borrows the internal buffer, so the packet must be
    /// dropped before the next call.
    ///
    /// # Errors
    /// [`FormatError::Truncated`] if the input ends mid-record,
    /// [`FormatError::OversizedPacket`] if the declared captured length
    /// exceeds the ceiling, [`FormatError::InconsistentHeader`] if the
    /// lengths contradict the global header. All carry the offset of the
    /// record's first byte.
    pub fn next_packet(&mut self) -> Option<Result<PcapPacket<'_>, SplitError>> {
        match self.buffer.has_data_left() {
            Ok(true) => Some(self.read_packet()),
            Ok(false) => None,
            Err(e) => Some(Err(SplitError::Io(e))),
        }
    }

    fn read_packet(&mut self) -> Result<PcapPacket<'_>, SplitError> {
        let record_start = self.buffer.position();

        let available = self.buffer.fill_at_least(RECORD_HEADER_LEN)?;
        if available < RECORD_HEADER_LEN {
            return Err(FormatError::Truncated {
                offset: record_start,
                needed: RECORD_HEADER_LEN - available,
            }
            .into());
        }

        let header = match self.header.endianness() {
            Endianness::Big => PacketHeader::from_slice::<BigEndian>(self.buffer.data()),
            Endianness::Little => PacketHeader::from_slice::<LittleEndian>(self.buffer.data()),
        };
        header.validate(self.header.snaplen, self.ceiling, record_start)?;

        let record_len = RECORD_HEADER_LEN + header.incl_len as usize;
        let available = self.buffer.fill_at_least(record_len)?;
        if available < record_len {
            return Err(FormatError::Truncated { offset: record_start, needed: record_len - available }.into());
        }

        let record = self.buffer.consume(record_len);

        Ok(PcapPacket {
            header,
            data: Cow::Borrowed(&record[RECORD_HEADER_LEN..]),
        })
    }

    /// Returns the global header of the pcap.
    pub fn header(&self) -> PcapHeader {
        self.header
    }

    /// Number of input bytes consumed so far, global header included.
    pub fn offset(&self) -> u64 {
        self.buffer.position()
    }

    /// Consumes the `PcapReader`, returning the wrapped reader.
    pub fn into_reader(self) -> R {
        self.buffer.into_inner()
    }
}
