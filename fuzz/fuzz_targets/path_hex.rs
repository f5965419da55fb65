#![no_main]

use libfuzzer_sys::fuzz_target;
use triewalk::{Path, rewind};

// Hex decoding of paths, and the arithmetic applied to whatever it accepts.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(path) = Path::from_hex(text) else {
        return;
    };

    assert_eq!(path.to_hex(), text.to_ascii_lowercase());

    let rewound = rewind(&path);
    if path.is_empty() {
        assert_eq!(rewound, path);
    } else {
        assert!(rewound < path, "rewind({path}) = {rewound}");
    }

    let back = Path::from_key_bytes(&path.to_key_bytes()).expect("padded key fits");
    assert_eq!(back, path.to_even());
});
