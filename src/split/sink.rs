//! Destinations for finalized chunks.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Attributes attached to an emitted chunk, as a string-to-string map.
pub type ChunkAttributes = BTreeMap<String, String>;

/// Receives finalized, independently valid pcap chunks in ordinal order.
///
/// A chunk handed to [`emit`](Self::emit) is complete: its global header and
/// every record are already serialized. A failed run never emits its
/// in-progress chunk, so everything a sink receives can be kept.
pub trait ChunkSink {
    /// Takes ownership of one finalized chunk.
    fn emit(&mut self, ordinal: u64, bytes: Vec<u8>, attributes: ChunkAttributes) -> Result<(), std::io::Error>;
}

/// One chunk captured by a [`MemorySink`].
#[derive(Clone, Debug)]
pub struct EmittedChunk {
    /// Ordinal index of the chunk.
    pub ordinal: u64,
    /// The serialized chunk, global header included.
    pub bytes: Vec<u8>,
    /// Attributes attached by the splitter.
    pub attributes: ChunkAttributes,
}

/// Collects emitted chunks in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// The chunks emitted so far, in ordinal order.
    pub chunks: Vec<EmittedChunk>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        MemorySink::default()
    }
}

impl ChunkSink for MemorySink {
    fn emit(&mut self, ordinal: u64, bytes: Vec<u8>, attributes: ChunkAttributes) -> Result<(), std::io::Error> {
        self.chunks.push(EmittedChunk { ordinal, bytes, attributes });
        Ok(())
    }
}

/// Writes each emitted chunk to `<dir>/<stem>-NNNNN.pcap`.
#[derive(Debug)]
pub struct DirSink {
    dir: PathBuf,
    stem: String,
}

impl DirSink {
    /// Creates a sink writing into `dir` with the given file name stem.
    ///
    /// The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        DirSink { dir: dir.into(), stem: stem.into() }
    }

    /// Path of the file a given chunk ordinal is written to.
    pub fn chunk_path(&self, ordinal: u64) -> PathBuf {
        self.dir.join(format!("{}-{:05}.pcap", self.stem, ordinal))
    }
}

impl ChunkSink for DirSink {
    fn emit(&mut self, ordinal: u64, bytes: Vec<u8>, _attributes: ChunkAttributes) -> Result<(), std::io::Error> {
        let mut file = File::create(self.chunk_path(ordinal))?;
        file.write_all(&bytes)?;
        file.flush()
    }
}
