use std::time::Duration;

use crate::errors::ConfigError;
use crate::pcap::PacketHeader;
use crate::split::SplitMode;
use crate::TsResolution;

/// Assigns each packet record of a capture to a chunk index.
///
/// Indices start at 0 and are non-decreasing: once a record lands in chunk
/// `k`, no later record lands below `k`. Chunks are therefore contiguous
/// ranges of the input sequence.
///
/// The policy is stateful and single-use: one instance per splitting run.
#[derive(Debug)]
pub struct SplitPolicy {
    mode: SplitMode,
    packets_seen: u64,
    current_chunk: u64,
    chunk_bytes: u64,
    chunk_packets: u64,
    capture_start: Option<Duration>,
    current_window: u64,
}

impl SplitPolicy {
    /// Creates a policy for the given mode, validating its threshold.
    pub fn new(mode: SplitMode) -> Result<SplitPolicy, ConfigError> {
        mode.validate()?;

        Ok(SplitPolicy {
            mode,
            packets_seen: 0,
            current_chunk: 0,
            chunk_bytes: 0,
            chunk_packets: 0,
            capture_start: None,
            current_window: 0,
        })
    }

    /// Returns the chunk index of the next record, described by its header.
    ///
    /// `ts_resolution` is the resolution of the capture being split; it only
    /// matters for time-window splitting.
    pub fn assign(&mut self, record: &PacketHeader, ts_resolution: TsResolution) -> u64 {
        match self.mode {
            SplitMode::PacketCount(n) => {
                let chunk = self.packets_seen / n;
                self.packets_seen += 1;
                chunk
            },

            SplitMode::ChunkSize(budget) => {
                // The triggering packet opens the next chunk, so a chunk is
                // never empty and a packet never spans two chunks.
                if self.chunk_packets > 0 && self.chunk_bytes + record.record_len() > budget {
                    self.current_chunk += 1;
                    self.chunk_bytes = 0;
                    self.chunk_packets = 0;
                }
                self.chunk_bytes += record.record_len();
                self.chunk_packets += 1;
                self.current_chunk
            },

            SplitMode::TimeWindow(width) => {
                let ts = record.timestamp(ts_resolution);
                let start = *self.capture_start.get_or_insert(ts);

                // Windows are anchored at the first packet of the capture,
                // not at each chunk's first packet, so window boundaries
                // never drift. An empty window produces no chunk: the index
                // advances by one however many windows were skipped.
                if ts > start {
                    let window = ((ts - start).as_nanos() / width.as_nanos()) as u64;
                    if window > self.current_window {
                        self.current_window = window;
                        self.current_chunk += 1;
                    }
                }
                // A timestamp at or before the current window start stays in
                // the current chunk, keeping the assignment non-decreasing.
                self.current_chunk
            },
        }
    }

    /// Returns true when the record just assigned filled its chunk, so the
    /// chunk can be finalized without waiting for the next record.
    ///
    /// Only count and size splits can know this eagerly; a time window stays
    /// open until a later timestamp leaves it or the input ends.
    pub fn chunk_complete(&self) -> bool {
        match self.mode {
            SplitMode::PacketCount(n) => self.packets_seen > 0 && self.packets_seen % n == 0,
            SplitMode::ChunkSize(budget) => self.chunk_bytes >= budget,
            SplitMode::TimeWindow(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(incl_len: u32, ts_sec: u32) -> PacketHeader {
        PacketHeader { ts_sec, ts_frac: 0, incl_len, orig_len: incl_len }
    }

    fn assign_all(mode: SplitMode, records: &[PacketHeader]) -> Vec<u64> {
        let mut policy = SplitPolicy::new(mode).unwrap();
        records
            .iter()
            .map(|r| policy.assign(r, TsResolution::MicroSecond))
            .collect()
    }

    #[test]
    fn count_chunks_are_exact() {
        let records = vec![record(10, 0); 7];
        let chunks = assign_all(SplitMode::PacketCount(3), &records);
        assert_eq!(chunks, [0, 0, 0, 1, 1, 1, 2]);
    }

    #[test]
    fn size_split_never_splits_a_packet() {
        // Each record is 16 + 100 bytes; budget fits two of them.
        let records = vec![record(100, 0); 5];
        let chunks = assign_all(SplitMode::ChunkSize(250), &records);
        assert_eq!(chunks, [0, 0, 1, 1, 2]);
    }

    #[test]
    fn oversized_packet_still_gets_a_chunk() {
        let records = [record(1000, 0), record(1000, 0)];
        let chunks = assign_all(SplitMode::ChunkSize(100), &records);
        assert_eq!(chunks, [0, 1]);
    }

    #[test]
    fn time_windows_are_anchored_at_capture_start() {
        let records = [
            record(10, 100),
            record(10, 101),
            record(10, 102),
            record(10, 105),
            record(10, 106),
            record(10, 110),
        ];
        let chunks = assign_all(SplitMode::TimeWindow(Duration::from_secs(2)), &records);
        // Windows from 100: [100,102) [102,104) [104,106) [106,108) [110,112)
        assert_eq!(chunks, [0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn backwards_timestamp_stays_in_current_chunk() {
        let records = [record(10, 100), record(10, 105), record(10, 101)];
        let chunks = assign_all(SplitMode::TimeWindow(Duration::from_secs(2)), &records);
        assert_eq!(chunks, [0, 1, 1]);
    }

    #[test]
    fn count_chunks_complete_eagerly() {
        let mut policy = SplitPolicy::new(SplitMode::PacketCount(2)).unwrap();

        policy.assign(&record(10, 0), TsResolution::MicroSecond);
        assert!(!policy.chunk_complete());
        policy.assign(&record(10, 0), TsResolution::MicroSecond);
        assert!(policy.chunk_complete());
        policy.assign(&record(10, 0), TsResolution::MicroSecond);
        assert!(!policy.chunk_complete());
    }

    #[test]
    fn size_chunks_complete_once_budget_is_filled() {
        let mut policy = SplitPolicy::new(SplitMode::ChunkSize(250)).unwrap();

        policy.assign(&record(100, 0), TsResolution::MicroSecond);
        assert!(!policy.chunk_complete());
        policy.assign(&record(100, 0), TsResolution::MicroSecond);
        assert!(!policy.chunk_complete());

        // An oversized record fills its chunk on its own.
        let mut policy = SplitPolicy::new(SplitMode::ChunkSize(100)).unwrap();
        policy.assign(&record(1000, 0), TsResolution::MicroSecond);
        assert!(policy.chunk_complete());
    }

    #[test]
    fn time_chunks_never_complete_eagerly() {
        let mut policy = SplitPolicy::new(SplitMode::TimeWindow(Duration::from_secs(1))).unwrap();
        policy.assign(&record(10, 100), TsResolution::MicroSecond);
        assert!(!policy.chunk_complete());
    }

    #[test]
    fn zero_thresholds_are_rejected() {
        assert!(SplitPolicy::new(SplitMode::PacketCount(0)).is_err());
        assert!(SplitPolicy::new(SplitMode::ChunkSize(0)).is_err());
        assert!(SplitPolicy::new(SplitMode::TimeWindow(Duration::ZERO)).is_err());
    }
}
