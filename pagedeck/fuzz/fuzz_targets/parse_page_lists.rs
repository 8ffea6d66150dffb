#![no_main]

use libfuzzer_sys::fuzz_target;
use pagedeck::input::{PageSelection, parse_order};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // The boundary parsers must reject arbitrary text with an error,
    // never a panic.
    if let Ok(selection) = PageSelection::parse(text) {
        let _ = selection.to_indices(64);
        let _ = selection.contains(1);
    }

    let _ = parse_order(text);
});
