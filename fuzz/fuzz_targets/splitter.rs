#![no_main]
use libfuzzer_sys::fuzz_target;
use pcap_split::split::{MemorySink, SplitMode, Splitter};

fuzz_target!(|data: &[u8]| {
    let mut sink = MemorySink::new();
    if let Ok(splitter) = Splitter::new(SplitMode::PacketCount(3)) {
        let _ = splitter.split(data, &mut sink);
    }
});
