use std::io::Write;

use byteorder::{BigEndian, LittleEndian};

use crate::errors::*;
use crate::pcap::{PcapHeader, PcapPacket};
use crate::Endianness;

/// Wraps a writer and emits a Pcap formatted stream into it.
///
/// The global header is written on creation; each
/// [`write_packet`](Self::write_packet) call appends one record;
/// [`finish`](Self::finish) flushes and closes the handle. Writing after
/// `finish` fails with [`UsageError::WriterClosed`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::fs::File;
///
/// use pcap_split::pcap::{PcapReader, PcapWriter};
///
/// let file_in = File::open("test.pcap").expect("Error opening file");
/// let mut pcap_reader = PcapReader::new(file_in).unwrap();
///
/// let file_out = File::create("out.pcap").expect("Error creating file out");
/// let mut pcap_writer = PcapWriter::with_header(file_out, pcap_reader.header()).unwrap();
///
/// // Copy test.pcap into out.pcap
/// while let Some(pkt) = pcap_reader.next_packet() {
///     let pkt = pkt.unwrap();
///     pcap_writer.write_packet(&pkt).unwrap();
/// }
/// pcap_writer.finish().unwrap();
/// ```
#[derive(Debug)]
pub struct PcapWriter<W: Write> {
    header: PcapHeader,
    endianness: Endianness,
    packets_written: u64,
    finished: bool,
    writer: W,
}

impl<W: Write> PcapWriter<W> {
    /// Creates a new `PcapWriter` with the default global header.
    ///
    /// # Errors
    /// Returns an error if the header can't be written.
    pub fn new(writer: W) -> Result<PcapWriter<W>, SplitError> {
        PcapWriter::with_header(writer, PcapHeader::default())
    }

    /// Creates a new `PcapWriter` with the given global header.
    ///
    /// The header is written immediately, byte-for-byte in its own byte
    /// order, so a chunk begun from a source capture's header is
    /// self-describing and independently openable.
    ///
    /// # Errors
    /// Returns an error if the header can't be written.
    pub fn with_header(mut writer: W, header: PcapHeader) -> Result<PcapWriter<W>, SplitError> {
        header.write_to(&mut writer)?;

        Ok(PcapWriter {
            header,
            endianness: header.endianness(),
            packets_written: 0,
            finished: false,
            writer,
        })
    }

    /// Appends a packet record, timestamps and lengths unchanged.
    ///
    /// # Errors
    /// [`UsageError::WriterClosed`] if the writer is already finished,
    /// [`UsageError::PayloadLengthMismatch`] if the payload length differs
    /// from the header's `incl_len`, [`UsageError::PacketExceedsSnaplen`] if
    /// the packet is longer than the output's snaplen.
    pub fn write_packet(&mut self, packet: &PcapPacket) -> Result<(), SplitError> {
        if self.finished {
            return Err(UsageError::WriterClosed.into());
        }

        if packet.data.len() != packet.header.incl_len as usize {
            return Err(UsageError::PayloadLengthMismatch {
                expected: packet.header.incl_len,
                actual: packet.data.len(),
            }
            .into());
        }

        if packet.header.incl_len > self.header.snaplen {
            return Err(UsageError::PacketExceedsSnaplen {
                incl_len: packet.header.incl_len,
                snaplen: self.header.snaplen,
            }
            .into());
        }

        match self.endianness {
            Endianness::Big => packet.header.write_to::<_, BigEndian>(&mut self.writer)?,
            Endianness::Little => packet.header.write_to::<_, LittleEndian>(&mut self.writer)?,
        }
        self.writer.write_all(&packet.data)?;

        self.packets_written += 1;

        Ok(())
    }

    /// Flushes the output and closes the handle. Idempotent.
    pub fn finish(&mut self) -> Result<(), SplitError> {
        if !self.finished {
            self.writer.flush()?;
            self.finished = true;
        }

        Ok(())
    }

    /// Number of packet records written so far.
    pub fn packets_written(&self) -> u64 {
        self.packets_written
    }

    /// Returns the global header this writer was begun with.
    pub fn header(&self) -> PcapHeader {
        self.header
    }

    /// Consumes the `PcapWriter`, returning the wrapped writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcap::PacketHeader;

    fn packet(payload: &[u8]) -> PcapPacket<'_> {
        let header = PacketHeader {
            ts_sec: 1,
            ts_frac: 0,
            incl_len: payload.len() as u32,
            orig_len: payload.len() as u32,
        };
        PcapPacket::new(header, payload)
    }

    #[test]
    fn write_after_finish_is_an_error() {
        let mut writer = PcapWriter::new(Vec::new()).unwrap();
        writer.write_packet(&packet(b"abcd")).unwrap();
        writer.finish().unwrap();
        writer.finish().unwrap();

        let err = writer.write_packet(&packet(b"abcd")).unwrap_err();
        assert!(matches!(err, SplitError::Usage(UsageError::WriterClosed)));
    }

    #[test]
    fn payload_must_match_incl_len() {
        let mut writer = PcapWriter::new(Vec::new()).unwrap();

        let mut bad = packet(b"abcd").into_owned();
        bad.header.incl_len = 3;

        let err = writer.write_packet(&bad).unwrap_err();
        assert!(matches!(
            err,
            SplitError::Usage(UsageError::PayloadLengthMismatch { expected: 3, actual: 4 })
        ));
    }

    #[test]
    fn packet_must_fit_snaplen() {
        let header = PcapHeader { snaplen: 2, ..Default::default() };
        let mut writer = PcapWriter::with_header(Vec::new(), header).unwrap();

        let err = writer.write_packet(&packet(b"abcd")).unwrap_err();
        assert!(matches!(
            err,
            SplitError::Usage(UsageError::PacketExceedsSnaplen { incl_len: 4, snaplen: 2 })
        ));
    }
}
