use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use crate::errors::*;
use crate::pcap::{PcapHeader, PcapReader, PcapWriter};
use crate::split::{ChunkAttributes, ChunkSink, SplitMode, SplitPolicy};

/// Cooperative cancellation flag for a splitting run.
///
/// Clonable and shareable across threads; the splitter checks it after each
/// completed record and aborts with [`SplitError::Cancelled`] when set.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Requests cancellation. Takes effect at the next record boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of a completed splitting run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SplitSummary {
    /// Number of chunks emitted.
    pub chunks: u64,
    /// Number of packet records routed.
    pub packets: u64,
    /// Number of input bytes consumed, global header included.
    pub bytes_read: u64,
}

/// Splits a pcap capture into independently valid chunks.
///
/// Drives the whole pipeline: reads the input packet by packet, asks the
/// [`SplitPolicy`] for each record's chunk index, routes the record to the
/// writer of that chunk and emits every finalized chunk through a
/// [`ChunkSink`], tagged with its ordinal index and attributes.
///
/// Each chunk starts with an unmodified copy of the source capture's global
/// header, so any standard pcap tool can open it on its own.
///
/// On failure, chunks emitted before the fault stay emitted, the in-progress
/// chunk is discarded and the error carries the input byte offset.
///
/// # Examples
///
/// ```
/// use pcap_split::pcap::{PcapPacket, PacketHeader, PcapWriter};
/// use pcap_split::split::{MemorySink, SplitMode, Splitter};
///
/// // Build a two-packet capture in memory.
/// let mut writer = PcapWriter::new(Vec::new()).unwrap();
/// for ts_sec in [1, 2] {
///     let header = PacketHeader { ts_sec, ts_frac: 0, incl_len: 3, orig_len: 3 };
///     writer.write_packet(&PcapPacket::new(header, b"abc")).unwrap();
/// }
/// let capture = writer.into_writer();
///
/// // Split it one packet per chunk.
/// let mut sink = MemorySink::new();
/// let summary = Splitter::new(SplitMode::PacketCount(1))
///     .unwrap()
///     .split(&capture[..], &mut sink)
///     .unwrap();
///
/// assert_eq!(summary.chunks, 2);
/// assert_eq!(sink.chunks.len(), 2);
/// ```
#[derive(Debug)]
pub struct Splitter {
    mode: SplitMode,
    cancel: CancelToken,
}

struct OpenChunk {
    index: u64,
    writer: PcapWriter<Vec<u8>>,
}

impl OpenChunk {
    fn begin(index: u64, header: PcapHeader) -> Result<OpenChunk, SplitError> {
        debug!("opening chunk {index}");
        let writer = PcapWriter::with_header(Vec::new(), header)?;
        Ok(OpenChunk { index, writer })
    }
}

impl Splitter {
    /// Creates a splitter; the threshold is validated here, before any
    /// reading happens.
    pub fn new(mode: SplitMode) -> Result<Splitter, ConfigError> {
        mode.validate()?;
        Ok(Splitter { mode, cancel: CancelToken::new() })
    }

    /// Attaches a cancellation token to the splitter.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Splitter {
        self.cancel = cancel;
        self
    }

    /// Runs one split over `input`, emitting every finalized chunk into
    /// `sink`.
    ///
    /// A single forward pass: records are never buffered beyond the chunk
    /// currently being assembled. An empty capture (valid global header,
    /// zero records) yields zero chunks and no error.
    ///
    /// # Errors
    /// [`FormatError`] aborts the run at the offending record; chunks
    /// already handed to the sink stay emitted, the open chunk is dropped.
    /// [`SplitError::Cancelled`] reports a cancellation observed at a record
    /// boundary, distinct from a format failure.
    pub fn split<R: Read, S: ChunkSink + ?Sized>(&self, input: R, sink: &mut S) -> SplitResult<SplitSummary> {
        let mut policy = SplitPolicy::new(self.mode)?;
        let mut reader = PcapReader::new(input)?;

        let header = reader.header();
        let ts_resolution = header.ts_resolution();

        let mut open: Option<OpenChunk> = None;
        let mut summary = SplitSummary::default();

        while let Some(next) = reader.next_packet() {
            let packet = next?;
            let index = policy.assign(&packet.header, ts_resolution);

            let mut chunk = match open.take() {
                Some(chunk) if chunk.index == index => chunk,
                Some(done) => {
                    if index < done.index {
                        return Err(UsageError::ChunkIndexRegressed { current: done.index, next: index }.into());
                    }
                    Self::emit(done, sink)?;
                    summary.chunks += 1;
                    OpenChunk::begin(index, header)?
                },
                None => OpenChunk::begin(index, header)?,
            };

            chunk.writer.write_packet(&packet)?;
            summary.packets += 1;

            // A chunk the policy already knows is full is finalized here and
            // now, so a later fault cannot discard it.
            if policy.chunk_complete() {
                Self::emit(chunk, sink)?;
                summary.chunks += 1;
            }
            else {
                open = Some(chunk);
            }

            drop(packet);
            if self.cancel.is_cancelled() {
                debug!("cancelled after {} packets", summary.packets);
                return Err(SplitError::Cancelled {
                    packets: summary.packets,
                    offset: reader.offset(),
                });
            }
        }

        if let Some(last) = open.take() {
            Self::emit(last, sink)?;
            summary.chunks += 1;
        }

        summary.bytes_read = reader.offset();
        info!(
            "split {} packets ({} bytes) into {} chunks",
            summary.packets, summary.bytes_read, summary.chunks
        );

        Ok(summary)
    }

    fn emit<S: ChunkSink + ?Sized>(chunk: OpenChunk, sink: &mut S) -> Result<(), SplitError> {
        let OpenChunk { index, mut writer } = chunk;
        writer.finish()?;

        let packets = writer.packets_written();
        let bytes = writer.into_writer();

        let mut attributes = ChunkAttributes::new();
        attributes.insert("chunk.index".to_string(), index.to_string());
        attributes.insert("chunk.packet.count".to_string(), packets.to_string());
        attributes.insert("chunk.byte.count".to_string(), bytes.len().to_string());

        debug!("emitting chunk {index}: {packets} packets, {} bytes", bytes.len());
        sink.emit(index, bytes, attributes)?;

        Ok(())
    }
}
