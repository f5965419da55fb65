#![no_main]

use libfuzzer_sys::fuzz_target;
use triewalk::tracker::CheckpointRow;

// Checkpoint lines come from disk and may be truncated or hand edited.
// Parsing must never panic, and anything it accepts must encode back to a
// line that parses to the same row.
fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(row) = CheckpointRow::parse(line) {
        let encoded = row.encode();
        let again = CheckpointRow::parse(&encoded)
            .unwrap_or_else(|e| panic!("re-parse of {encoded:?} failed: {e}"));
        assert_eq!(again, row, "row changed across encode for line {line:?}");
        assert!(row.path.nibbles().iter().all(|n| *n < 16));
    }
});
