#![no_main]

use cmpds::dataset::parse_column;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the column, the rest is the file content
    let column = usize::from(data[0] % 8) + 1;
    if let Ok(input) = std::str::from_utf8(&data[1..]) {
        let _ = parse_column(input, column, "fuzz");
    }
});
