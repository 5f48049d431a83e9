#![no_main]
//! Fuzz target for block location and transaction extraction.
//!
//! Feeds arbitrary text through the full parse and normalize path. Nothing in
//! it may panic: malformed input is skipped or rejected, never fatal.

use libfuzzer_sys::fuzz_target;
use qifport_parser::{normalize_line_endings, QifParser};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(parser) = QifParser::new() else {
        return;
    };

    let source = normalize_line_endings(input);
    for block in parser.blocks(&source) {
        assert!(block.body.end <= source.len());
        for raw in parser.transactions(&source, &block) {
            let _ = qifport_core::normalize(&raw.value);
        }
    }
});
