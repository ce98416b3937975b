//! Fuzz target for VIA JSON flattening.
//!
//! This fuzzer feeds arbitrary byte sequences to the VIA reader and
//! flattener, checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use viatab::via::from_via_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(table) = from_via_slice(data) {
        let _ = viatab::via::io_csv::to_csv_string(&table);
    }
});
